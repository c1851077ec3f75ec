use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use travel_folio::add_trip::{self, AddTripRequest};
use travel_folio::imaging::{Quality, ThumbnailConfig, WebImageConfig};
use travel_folio::trips::TripStore;
use travel_folio::{config, generate, output, placeholders, process, server, watermark};

/// Shared flags for commands that encode images.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the processing cache and re-encode every image
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let revision = env!("GIT_REVISION");
    if revision.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({revision})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "travel-folio")]
#[command(about = "Localized static site generator for travel photography portfolios")]
#[command(long_about = "\
Localized static site generator for travel photography portfolios

Trips are listed in trips.json; every page is rendered once per locale
(English under /en/, Slovak under /sk/).

Content structure:

  content/
  ├── config.toml                  # Site config (optional, see gen-config)
  ├── trips.json                   # Trips, photos, captions, categories
  ├── about.en.md                  # About page text (optional, per locale)
  └── photos/
      └── peru-2022/
          ├── originals/           # Full-size originals for `watermark`
          │   └── machu_picchu.png
          └── machu_picchu.jpg     # Web image referenced by trips.json

Typical workflow:

  travel-folio add-trip peru-2022 --country Peru --date 2022-03
  travel-folio build
  travel-folio serve

Run 'travel-folio gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render thumbnails and every page for both locales
    Build(CacheArgs),
    /// Validate config.toml and trips.json and list missing photos
    Check,
    /// Resize and watermark a trip's originals into web images
    Watermark {
        /// Trip directory under photos/ (originals in photos/<trip>/originals/)
        trip: String,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Watermark a trip's originals and add or update its trips.json entry
    AddTrip {
        /// Trip directory under photos/ (originals in photos/<trip>/originals/)
        trip: String,
        /// Country shown in the gallery filters
        #[arg(long)]
        country: String,
        /// Region within the country
        #[arg(long)]
        region: Option<String>,
        /// Trip month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Write stand-in images for photos listed in trips.json but missing on disk
    Placeholders,
    /// Serve the built site and the contact API
    Serve {
        /// Listen address (defaults to server.host)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(cache_args) => {
            let site_config = config::load_config(&cli.source)?;
            let store = TripStore::load(&cli.source.join("trips.json"))?;
            init_thread_pool(&site_config.processing);

            println!("==> Thumbnails \u{2192} {}", cli.output.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let processed = process::process(
                &cli.source,
                &cli.output,
                &store,
                &ThumbnailConfig::from_site_config(&site_config),
                !cache_args.no_cache,
                Some(tx),
            );
            join_printer(printer);
            let processed = processed?;

            println!("==> Pages \u{2192} {}", cli.output.display());
            let result = generate::generate(&cli.source, &cli.output, &store, &site_config)?;
            output::print_generate_output(&processed, &result);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let store = TripStore::load(&cli.source.join("trips.json"))?;
            output::print_check_output(&store, &cli.source);
            if process::missing_photos(&cli.source, &store).is_empty() {
                println!("==> Content is valid");
            } else {
                println!("==> Content is valid; build will fail until missing photos exist");
            }
        }
        Command::Watermark { trip, cache } => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let web_config = WebImageConfig::from_site_config(&site_config, &cli.source);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = spawn_watermark_printer(rx);
            let report = watermark::watermark_trip(
                &cli.source.join("photos"),
                &trip,
                &web_config,
                !cache.no_cache,
                Some(tx),
            );
            join_printer(printer);
            output::print_watermark_report(&report?);
        }
        Command::AddTrip {
            trip,
            country,
            region,
            date,
            cache,
        } => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let web_config = WebImageConfig::from_site_config(&site_config, &cli.source);
            let request = AddTripRequest {
                trip,
                country,
                region,
                date,
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = spawn_watermark_printer(rx);
            let summary = add_trip::add_trip(
                &cli.source,
                &request,
                &web_config,
                !cache.no_cache,
                Some(tx),
            );
            join_printer(printer);
            output::print_add_trip_summary(&summary?);
        }
        Command::Placeholders => {
            let site_config = config::load_config(&cli.source)?;
            let font = site_config
                .watermark
                .font
                .as_ref()
                .map(|font| cli.source.join(font));
            let report = placeholders::generate_placeholders(
                &cli.source,
                Quality::new(site_config.images.quality),
                font,
            )?;
            output::print_placeholders_report(&report);
        }
        Command::Serve { host, port } => {
            init_tracing();
            let site_config = config::load_config(&cli.source)?;
            let host = host.unwrap_or_else(|| site_config.server.host.clone());
            let port = port.unwrap_or(site_config.server.port);
            serve_blocking(&site_config, &cli.source, &cli.output, &host, port)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn serve_blocking(
    site_config: &config::SiteConfig,
    source: &Path,
    output_dir: &Path,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(site_config, source, output_dir, host, port))?;
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "travel_folio=info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn spawn_watermark_printer(
    rx: std::sync::mpsc::Receiver<watermark::WatermarkEvent>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for event in rx {
            for line in output::format_watermark_event(&event) {
                println!("{}", line);
            }
        }
    })
}

/// Wait for a progress printer. The sender is dropped when the stage returns.
fn join_printer(printer: std::thread::JoinHandle<()>) {
    if printer.join().is_err() {
        eprintln!("progress printer panicked");
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
