//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is organized around content, not files. A trip or photo is shown
//! by its positional index and title; the file it comes from follows on an
//! indented `Source:` line. Read top to bottom, `check` output is an
//! inventory of the portfolio that still points back at the files on disk.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Trips
//! 001 High Tatras (2 photos) *
//!     Slovakia · High Tatras · 2024-08
//!     001 Tatra peak
//!         Source: tatras-2024/tatra-peak.jpg
//!     002 Old town street
//!         Source: tatras-2024/old-town-street.jpg (missing)
//!
//! Countries: Norway, Peru, Slovakia
//! Categories: city, culture, landscape, mountains, nature
//! ```
//!
//! ## Build
//!
//! ```text
//! High Tatras (2 photos)
//!     001 Tatra peak
//!         Source: tatras-2024/tatra-peak.jpg
//!         thumbnail: cached
//! ```
//!
//! ## Watermark
//!
//! ```text
//! peru-2022 (3 images)
//!     001 machu_picchu.png → machu_picchu.jpg (encoded)
//!     002 broken.png FAILED: decode error
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure apart from `check`, which looks for photo files.

use crate::add_trip::AddTripSummary;
use crate::generate::GenerateResult;
use crate::placeholders::PlaceholderReport;
use crate::process::{ProcessEvent, ProcessResult};
use crate::trips::TripStore;
use crate::types::Locale;
use crate::watermark::{WatermarkEvent, WatermarkReport};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index, title and photo count.
///
/// ```text
/// 001 High Tatras (2 photos)
/// ```
fn entity_header(index: usize, title: &str, count: usize) -> String {
    format!("{} {} ({})", format_index(index), title, photo_count(count))
}

fn photo_count(n: usize) -> String {
    match n {
        1 => "1 photo".to_string(),
        n => format!("{} photos", n),
    }
}

/// Captioned photos show the caption, uncaptioned ones the filename in parens.
fn photo_line(index: usize, caption: &str, filename: &str) -> String {
    if caption.trim().is_empty() {
        format!("{} ({})", format_index(index), filename)
    } else {
        format!("{} {}", format_index(index), caption)
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Inventory of `trips.json`: trips, their photos, and which files are missing.
///
/// Featured trips are marked with `*`.
pub fn format_check_output(store: &TripStore, content_root: &Path) -> Vec<String> {
    let photos_root = content_root.join("photos");
    let mut lines = vec!["Trips".to_string()];
    let mut missing = 0;

    for (i, trip) in store.all_trips().iter().enumerate() {
        let marker = if trip.featured { " *" } else { "" };
        lines.push(format!(
            "{}{}",
            entity_header(i + 1, trip.title.get(Locale::En), trip.photos.len()),
            marker
        ));

        let mut place = vec![trip.country.as_str()];
        place.extend(trip.region.as_deref());
        place.push(&trip.date);
        lines.push(format!("{}{}", indent(1), place.join(" \u{b7} ")));

        for (j, photo) in trip.photos.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                photo_line(j + 1, photo.caption.get(Locale::En), &photo.filename)
            ));
            let exists = photos_root.join(&trip.id).join(&photo.filename).is_file();
            if !exists {
                missing += 1;
            }
            lines.push(format!(
                "{}Source: {}/{}{}",
                indent(2),
                trip.id,
                photo.filename,
                if exists { "" } else { " (missing)" }
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("Countries: {}", store.all_countries().join(", ")));
    let categories: Vec<&str> = store.all_categories().iter().map(|c| c.as_str()).collect();
    lines.push(format!("Categories: {}", categories.join(", ")));

    if missing > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{} missing (run `travel-folio placeholders` for stand-ins)",
            photo_count(missing)
        ));
    }
    lines
}

pub fn print_check_output(store: &TripStore, content_root: &Path) {
    print_lines(format_check_output(store, content_root));
}

// ============================================================================
// build
// ============================================================================

/// Format a single thumbnail progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::TripStarted { title, photo_count: n } => {
            vec![format!("{} ({})", title, photo_count(*n))]
        }
        ProcessEvent::PhotoProcessed {
            index,
            title,
            source_path,
            thumbnail,
        } => {
            let filename = source_path.rsplit('/').next().unwrap_or(source_path);
            vec![
                format!("{}{}", indent(1), photo_line(*index, title, filename)),
                format!("{}Source: {}", indent(2), source_path),
                format!("{}thumbnail: {}", indent(2), thumbnail.as_str()),
            ]
        }
    }
}

/// Summary after thumbnails and pages are written.
pub fn format_generate_output(process: &ProcessResult, result: &GenerateResult) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("Thumbnails: {}", process.cache_stats),
    ];
    if result.photos_copied > 0 {
        lines.push(format!("Photos copied: {}", result.photos_copied));
    }
    for locale in Locale::ALL {
        let about = if result.about_markdown.contains(&locale) {
            format!("about.{}.md", locale.as_str())
        } else {
            "built-in".to_string()
        };
        lines.push(format!(
            "/{}/ \u{2192} home, {} gallery views, {} photo pages, about ({}), contact",
            locale.as_str(),
            result.gallery_views,
            result.photo_pages,
            about
        ));
    }
    lines.push(format!("Generated {} pages", result.pages));
    lines
}

pub fn print_generate_output(process: &ProcessResult, result: &GenerateResult) {
    print_lines(format_generate_output(process, result));
}

// ============================================================================
// watermark
// ============================================================================

pub fn format_watermark_event(event: &WatermarkEvent) -> Vec<String> {
    match event {
        WatermarkEvent::Started { trip, image_count } => {
            let noun = if *image_count == 1 { "image" } else { "images" };
            vec![format!("{} ({} {})", trip, image_count, noun)]
        }
        WatermarkEvent::ImageDone {
            index,
            file,
            output,
            status,
        } => vec![format!(
            "{}{} {} \u{2192} {} ({})",
            indent(1),
            format_index(*index),
            file,
            output,
            status.as_str()
        )],
        WatermarkEvent::ImageFailed {
            index,
            file,
            message,
        } => vec![format!(
            "{}{} {} FAILED: {}",
            indent(1),
            format_index(*index),
            file,
            message
        )],
    }
}

pub fn format_watermark_report(report: &WatermarkReport) -> Vec<String> {
    let mut lines = vec![String::new()];
    if !report.watermarked {
        lines.push(
            "No watermark configured ([watermark] text or image); images were resized only"
                .to_string(),
        );
    }
    lines.push(format!("Success: {}", report.success_count()));
    lines.push(format!("Errors: {}", report.error_count()));
    for failed in &report.failed {
        lines.push(format!("{}{}: {}", indent(1), failed.source, failed.message));
    }
    lines.push(format!("Cache: {}", report.cache_stats));
    lines.push(format!("Output: {}", report.output_dir.display()));

    if report.success_count() > 0 {
        lines.push(String::new());
        lines.push("Next steps:".to_string());
        lines.push(format!(
            "{}1. Review the web images in {}",
            indent(1),
            report.output_dir.display()
        ));
        lines.push(format!(
            "{}2. Run `travel-folio add-trip {} --country <name>` to list them in trips.json",
            indent(1),
            report.trip
        ));
    }
    lines
}

pub fn print_watermark_report(report: &WatermarkReport) {
    print_lines(format_watermark_report(report));
}

// ============================================================================
// add-trip
// ============================================================================

pub fn format_add_trip_summary(summary: &AddTripSummary) -> Vec<String> {
    let action = if summary.created { "Added" } else { "Updated" };
    let mut lines = vec![
        String::new(),
        format!("{} trip {}", action, summary.trip),
        format!("{}Country: {}", indent(1), summary.country),
    ];
    if let Some(region) = &summary.region {
        lines.push(format!("{}Region: {}", indent(1), region));
    }
    lines.push(format!("{}Photos: {}", indent(1), summary.photo_count));
    let categories: Vec<&str> = summary.categories.iter().map(|c| c.as_str()).collect();
    lines.push(format!("{}Categories: {}", indent(1), categories.join(", ")));
    lines.push(format!("{}Images: {}", indent(1), summary.cache_stats));
    lines.push(format!("{}Saved: {}", indent(1), summary.trips_path.display()));

    if !summary.failed.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped {} files:", summary.failed.len()));
        for failed in &summary.failed {
            lines.push(format!("{}{}: {}", indent(1), failed.source, failed.message));
        }
    }

    lines.push(String::new());
    lines.push("Next steps:".to_string());
    for (i, step) in [
        "Update Slovak translations (replace [SK] placeholders)",
        "Refine photo captions",
        "Adjust categories if needed",
        "Set \"featured\": true to show the trip on the home page",
    ]
    .iter()
    .enumerate()
    {
        lines.push(format!("{}{}. {}", indent(1), i + 1, step));
    }
    lines
}

pub fn print_add_trip_summary(summary: &AddTripSummary) {
    print_lines(format_add_trip_summary(summary));
}

// ============================================================================
// placeholders
// ============================================================================

pub fn format_placeholders_report(report: &PlaceholderReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .created
        .iter()
        .map(|key| format!("Created: {}", key))
        .collect();
    lines.push(format!(
        "{} created, {} already present",
        report.created.len(),
        report.existing
    ));
    if !report.created.is_empty() {
        if !report.labeled {
            lines.push("Captions not printed (set watermark.font to label placeholders)".to_string());
        }
        lines.push("Note: Replace these with real photos when ready.".to_string());
    }
    lines
}

pub fn print_placeholders_report(report: &PlaceholderReport) {
    print_lines(format_placeholders_report(report));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStats, VariantStatus};
    use crate::test_helpers::{sample_data, setup_content};
    use crate::types::Category;
    use crate::watermark::FailedImage;
    use std::path::PathBuf;

    fn store() -> TripStore {
        TripStore::from_data(sample_data()).unwrap()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn photo_count_pluralizes() {
        assert_eq!(photo_count(1), "1 photo");
        assert_eq!(photo_count(0), "0 photos");
        assert_eq!(entity_header(3, "Peru", 2), "003 Peru (2 photos)");
    }

    #[test]
    fn uncaptioned_photo_shows_filename() {
        assert_eq!(photo_line(1, "Tatra peak", "tatra-peak.jpg"), "001 Tatra peak");
        assert_eq!(photo_line(2, " ", "x.jpg"), "002 (x.jpg)");
    }

    // =========================================================================
    // check
    // =========================================================================

    #[test]
    fn check_lists_trips_and_photos() {
        let content = setup_content();
        let lines = format_check_output(&store(), content.path());

        assert_eq!(lines[0], "Trips");
        assert_eq!(lines[1], "001 High Tatras (2 photos) *");
        assert_eq!(lines[2], "    Slovakia \u{b7} High Tatras \u{b7} 2024-08");
        assert_eq!(lines[3], "    001 Tatra peak");
        assert_eq!(lines[4], "        Source: tatras-2024/tatra-peak.jpg");
        assert!(lines.contains(&"004 Peru (1 photo) *".to_string()));
        assert!(lines.contains(&"    Peru \u{b7} 2022-03".to_string()));
        assert!(lines.contains(&"Countries: Norway, Peru, Slovakia".to_string()));
        assert!(!lines.iter().any(|l| l.contains("missing")));
    }

    #[test]
    fn check_marks_missing_files() {
        let content = setup_content();
        std::fs::remove_file(content.path().join("photos/svalbard-2023/glacier-lake.jpg")).unwrap();
        let lines = format_check_output(&store(), content.path());

        assert!(lines.contains(&"        Source: svalbard-2023/glacier-lake.jpg (missing)".to_string()));
        assert!(lines.last().unwrap().starts_with("1 photo missing"));
    }

    // =========================================================================
    // build
    // =========================================================================

    #[test]
    fn process_event_lines() {
        let started = ProcessEvent::TripStarted {
            title: "Svalbard".into(),
            photo_count: 1,
        };
        assert_eq!(format_process_event(&started), vec!["Svalbard (1 photo)"]);

        let done = ProcessEvent::PhotoProcessed {
            index: 1,
            title: "Glacier lake".into(),
            source_path: "svalbard-2023/glacier-lake.jpg".into(),
            thumbnail: VariantStatus::Cached,
        };
        assert_eq!(
            format_process_event(&done),
            vec![
                "    001 Glacier lake",
                "        Source: svalbard-2023/glacier-lake.jpg",
                "        thumbnail: cached",
            ]
        );
    }

    #[test]
    fn generate_summary_names_about_source() {
        let process = ProcessResult {
            thumbnails: 5,
            cache_stats: CacheStats {
                hits: 0,
                copies: 0,
                misses: 5,
            },
        };
        let result = GenerateResult {
            pages: 188,
            gallery_views: 84,
            photo_pages: 5,
            photos_copied: 5,
            about_markdown: vec![Locale::Sk],
        };
        let lines = format_generate_output(&process, &result);
        assert!(lines.contains(&"Thumbnails: 5 encoded".to_string()));
        assert!(lines.contains(
            &"/en/ \u{2192} home, 84 gallery views, 5 photo pages, about (built-in), contact"
                .to_string()
        ));
        assert!(lines.iter().any(|l| l.contains("about (about.sk.md)")));
        assert_eq!(lines.last().unwrap(), "Generated 188 pages");
    }

    // =========================================================================
    // watermark
    // =========================================================================

    #[test]
    fn watermark_event_lines() {
        let done = WatermarkEvent::ImageDone {
            index: 1,
            file: "machu_picchu.png".into(),
            output: "machu_picchu.jpg".into(),
            status: VariantStatus::Encoded,
        };
        assert_eq!(
            format_watermark_event(&done),
            vec!["    001 machu_picchu.png \u{2192} machu_picchu.jpg (encoded)"]
        );

        let failed = WatermarkEvent::ImageFailed {
            index: 2,
            file: "broken.png".into(),
            message: "decode error".into(),
        };
        assert_eq!(
            format_watermark_event(&failed),
            vec!["    002 broken.png FAILED: decode error"]
        );
    }

    fn report(watermarked: bool) -> WatermarkReport {
        WatermarkReport {
            trip: "peru-2022".into(),
            output_dir: PathBuf::from("content/photos/peru-2022"),
            processed: Vec::new(),
            failed: vec![FailedImage {
                source: "broken.png".into(),
                message: "decode error".into(),
            }],
            watermarked,
            cache_stats: CacheStats::default(),
        }
    }

    #[test]
    fn watermark_report_counts() {
        let lines = format_watermark_report(&report(true));
        assert!(lines.contains(&"Success: 0".to_string()));
        assert!(lines.contains(&"Errors: 1".to_string()));
        assert!(lines.contains(&"    broken.png: decode error".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Next steps")));
        assert!(!lines.iter().any(|l| l.starts_with("No watermark")));
    }

    #[test]
    fn watermark_report_notes_missing_mark() {
        let lines = format_watermark_report(&report(false));
        assert!(lines.iter().any(|l| l.starts_with("No watermark configured")));
    }

    // =========================================================================
    // add-trip / placeholders
    // =========================================================================

    #[test]
    fn add_trip_summary_lines() {
        let summary = AddTripSummary {
            trip: "peru-2022".into(),
            country: "Peru".into(),
            region: None,
            created: true,
            photo_count: 2,
            categories: vec![Category::Culture, Category::Mountains],
            failed: Vec::new(),
            cache_stats: CacheStats::default(),
            trips_path: PathBuf::from("content/trips.json"),
        };
        let lines = format_add_trip_summary(&summary);
        assert_eq!(lines[1], "Added trip peru-2022");
        assert!(lines.contains(&"    Categories: culture, mountains".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Region")));
        assert!(lines.iter().any(|l| l.contains("replace [SK] placeholders")));
    }

    #[test]
    fn placeholders_report_lines() {
        let report = PlaceholderReport {
            created: vec!["peru-2022/machu-picchu.jpg".into()],
            existing: 4,
            labeled: true,
        };
        assert_eq!(
            format_placeholders_report(&report),
            vec![
                "Created: peru-2022/machu-picchu.jpg",
                "1 created, 4 already present",
                "Note: Replace these with real photos when ready.",
            ]
        );

        let plain = PlaceholderReport {
            labeled: false,
            ..report
        };
        assert!(format_placeholders_report(&plain)
            .iter()
            .any(|l| l.contains("set watermark.font")));

        let none = format_placeholders_report(&PlaceholderReport::default());
        assert_eq!(none, vec!["0 created, 0 already present"]);
    }
}
