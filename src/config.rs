//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml      # optional, overrides stock defaults
//! ├── trips.json
//! └── photos/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Travel Photography"
//! author = "Your Name"
//! email = "hello@example.com"
//! # instagram = "https://instagram.com/yourname"
//!
//! [images]
//! max_width = 1920          # Web-sized images never exceed these bounds
//! max_height = 1080
//! quality = 85              # JPEG quality (1-100)
//!
//! [thumbnails]
//! aspect_ratio = [4, 3]     # width:height of grid thumbnails
//! size = 480                # Short edge in pixels
//!
//! [watermark]
//! text = "© Your Name | yourwebsite.com"
//! # font = "fonts/Inter-Regular.ttf"   # Required to draw the text mark
//! # image = "watermark.png"            # Alternative: composite a PNG mark
//! opacity = 0.7
//! font_size = 24
//! padding = 20
//!
//! [featured]
//! shuffle = true            # Shuffle featured photos on every build
//! # seed = 42               # Fixed seed for reproducible builds
//!
//! [colors.light]
//! background = "#ffffff"
//! ...
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [contact]
//! # log_file = "contact-submissions.jsonl"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Relative paths (`font`,
//! `image`, `log_file`) are resolved against the content root.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used in titles, the footer and contact links.
    pub site: SiteInfo,
    /// Web-sized image output (watermark tool).
    pub images: ImagesConfig,
    /// Grid thumbnail settings.
    pub thumbnails: ThumbnailsConfig,
    pub watermark: WatermarkConfig,
    pub featured: FeaturedConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    pub server: ServerConfig,
    pub contact: ContactConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::Validation(
                "images.max_width and images.max_height must be non-zero".into(),
            ));
        }
        if self.thumbnails.aspect_ratio[0] == 0 || self.thumbnails.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.watermark.opacity) {
            return Err(ConfigError::Validation(
                "watermark.opacity must be between 0.0 and 1.0".into(),
            ));
        }
        if self.watermark.font_size == 0 {
            return Err(ConfigError::Validation(
                "watermark.font_size must be non-zero".into(),
            ));
        }
        if self.watermark.font.is_some() && self.watermark.image.is_some() {
            return Err(ConfigError::Validation(
                "set either watermark.font or watermark.image, not both".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site name, used as the title suffix and in the header.
    pub title: String,
    /// Photographer name, used in the copyright line.
    pub author: String,
    /// Address for the footer `mailto:` link.
    pub email: String,
    /// Instagram profile URL. The footer link is omitted when unset.
    pub instagram: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Travel Photography".to_string(),
            author: "Your Name".to_string(),
            email: "hello@example.com".to_string(),
            instagram: None,
        }
    }
}

/// Web-sized image output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 85,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Aspect ratio as `[width, height]`, e.g. `[4, 3]` for landscape thumbnails.
    pub aspect_ratio: [u32; 2],
    /// Length of the short edge in pixels.
    pub size: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [4, 3],
            size: 480,
        }
    }
}

/// Watermark applied by the `watermark` and `add-trip` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    /// Text drawn in the bottom-right corner.
    pub text: String,
    /// TrueType/OpenType font used to draw `text`.
    pub font: Option<String>,
    /// PNG composited instead of text.
    pub image: Option<String>,
    /// Mark opacity (0.0 - 1.0). The shadow uses half of it.
    pub opacity: f64,
    /// Upper bound for the font size; narrow images get a smaller mark.
    pub font_size: u32,
    /// Inset from the right and bottom edges in pixels.
    pub padding: u32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: "© Your Name | yourwebsite.com".to_string(),
            font: None,
            image: None,
            opacity: 0.7,
            font_size: 24,
            padding: 20,
        }
    }
}

/// The mark the watermark tool will draw, with paths resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkSource {
    Text { text: String, font: PathBuf },
    Image(PathBuf),
    None,
}

impl WatermarkConfig {
    /// Decide which mark to draw. Relative paths resolve against `root`.
    pub fn mark_source(&self, root: &Path) -> MarkSource {
        if let Some(image) = &self.image {
            return MarkSource::Image(root.join(image));
        }
        match &self.font {
            Some(font) if !self.text.trim().is_empty() => MarkSource::Text {
                text: self.text.clone(),
                font: root.join(font),
            },
            _ => MarkSource::None,
        }
    }
}

/// Home page featured photo ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturedConfig {
    pub shuffle: bool,
    /// Fixed shuffle seed. When absent, every build draws a fresh one.
    pub seed: Option<u64>,
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// `serve` command defaults. CLI flags win over these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Contact form submission sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Append each submission as one JSON line to this file.
    pub log_file: Option<String>,
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Cards, footer and CTA band.
    pub surface: String,
    pub text: String,
    /// Captions, descriptions, inactive nav links.
    pub text_muted: String,
    pub border: String,
    /// Buttons and the active filter chip.
    pub accent: String,
    /// Text drawn on top of `accent`.
    pub accent_text: String,
    /// Validation errors and required markers.
    pub error: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f5f5f4".to_string(),
            text: "#171717".to_string(),
            text_muted: "#737373".to_string(),
            border: "#e5e5e5".to_string(),
            accent: "#171717".to_string(),
            accent_text: "#fafafa".to_string(),
            error: "#dc2626".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#171717".to_string(),
            text: "#fafafa".to_string(),
            text_muted: "#a3a3a3".to_string(),
            border: "#262626".to_string(),
            accent: "#fafafa".to_string(),
            accent_text: "#171717".to_string(),
            error: "#f87171".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Travel Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at content/config.toml. Unknown keys cause an error.
# Relative paths are resolved against the content directory.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Shown in the header and as the page title suffix ("Gallery | <title>").
title = "Travel Photography"

# Used in the footer copyright line.
author = "Your Name"

# Footer mail link.
email = "hello@example.com"

# Footer Instagram link. Omitted when unset.
# instagram = "https://instagram.com/yourname"

# ---------------------------------------------------------------------------
# Web-sized images (watermark / add-trip commands)
# ---------------------------------------------------------------------------
[images]
# Images are scaled down to fit inside these bounds, never enlarged.
max_width = 1920
max_height = 1080

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Grid thumbnails (build command)
# ---------------------------------------------------------------------------
[thumbnails]
# Aspect ratio as [width, height] for thumbnail crops.
aspect_ratio = [4, 3]

# Short edge of the thumbnail in pixels.
size = 480

# ---------------------------------------------------------------------------
# Watermark
# ---------------------------------------------------------------------------
[watermark]
# Text drawn in the bottom-right corner. Needs `font` to be set.
text = "© Your Name | yourwebsite.com"

# TrueType/OpenType font file used to draw the text.
# font = "fonts/Inter-Regular.ttf"

# Composite this PNG instead of drawing text. Exclusive with `font`.
# image = "watermark.png"

# Opacity of the mark (0.0 - 1.0). The drop shadow uses half of it.
opacity = 0.7

# Maximum font size in pixels. Narrow images get max(16, width / 40).
font_size = 24

# Distance from the right and bottom edges in pixels.
padding = 20

# ---------------------------------------------------------------------------
# Home page featured photos
# ---------------------------------------------------------------------------
[featured]
# Shuffle the featured photos on every build.
shuffle = true

# Fixed seed for a reproducible order.
# seed = 42

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f5f5f4"       # Cards, footer, call-to-action band
text = "#171717"
text_muted = "#737373"    # Captions, descriptions, inactive links
border = "#e5e5e5"
accent = "#171717"        # Buttons, active filters
accent_text = "#fafafa"
error = "#dc2626"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#171717"
text = "#fafafa"
text_muted = "#a3a3a3"
border = "#262626"
accent = "#fafafa"
accent_text = "#171717"
error = "#f87171"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Development server (serve command)
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 3000

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
# Append every submission as a JSON line to this file.
# Submissions are always written to the server log.
# log_file = "contact-submissions.jsonl"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("bg", &scheme.background),
            ("surface", &scheme.surface),
            ("text", &scheme.text),
            ("text-muted", &scheme.text_muted),
            ("border", &scheme.border),
            ("accent", &scheme.accent),
            ("accent-text", &scheme.accent_text),
            ("error", &scheme.error),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{light}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}\n    }}\n}}",
        light = vars(&colors.light, "    "),
        dark = vars(&colors.dark, "        "),
    )
}
