//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{
    calculate_thumbnail_dimensions, fit_within, placeholder_color, watermark_font_size,
};
use super::params::{
    MarkKind, PlaceholderLabel, PlaceholderParams, Quality, RenderParams, Sharpening,
    ThumbnailParams, Watermark,
};
use crate::config::{MarkSource, SiteConfig};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Placeholder images are always this size.
pub const PLACEHOLDER_SIZE: (u32, u32) = (1200, 800);

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for web-sized, watermarked output.
#[derive(Debug, Clone, PartialEq)]
pub struct WebImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    /// Mark to stamp; `font_size` is the configured maximum, scaled down per image.
    pub watermark: Option<Watermark>,
}

impl WebImageConfig {
    /// Build from site config. Relative mark paths resolve against `root`.
    pub fn from_site_config(config: &SiteConfig, root: &Path) -> Self {
        let wm = &config.watermark;
        let kind = match wm.mark_source(root) {
            MarkSource::Text { text, font } => Some(MarkKind::Text { text, font }),
            MarkSource::Image(path) => Some(MarkKind::Image(path)),
            MarkSource::None => None,
        };
        Self {
            max_width: config.images.max_width,
            max_height: config.images.max_height,
            quality: Quality::new(config.images.quality),
            watermark: kind.map(|kind| Watermark {
                kind,
                font_size: wm.font_size,
                opacity: wm.opacity as f32,
                padding: wm.padding,
            }),
        }
    }
}

/// Plan a web image render without executing it.
///
/// The final size fits inside the configured box; a text mark's font size
/// is scaled to the final width.
pub fn plan_render(
    source: &Path,
    output: &Path,
    source_dims: (u32, u32),
    config: &WebImageConfig,
) -> RenderParams {
    let (width, height) = fit_within(source_dims, config.max_width, config.max_height);
    let watermark = config.watermark.as_ref().map(|mark| Watermark {
        font_size: watermark_font_size(width, mark.font_size),
        ..mark.clone()
    });

    RenderParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
        watermark,
    }
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    pub aspect: (u32, u32),
    pub short_edge: u32,
    pub quality: Quality,
    pub sharpening: Option<Sharpening>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            aspect: (4, 3),
            short_edge: 480,
            quality: Quality::default(),
            sharpening: Some(Sharpening::light()),
        }
    }
}

impl ThumbnailConfig {
    pub fn from_site_config(config: &SiteConfig) -> Self {
        let [w, h] = config.thumbnails.aspect_ratio;
        Self {
            aspect: (w, h),
            short_edge: config.thumbnails.size,
            quality: Quality::new(config.images.quality),
            ..Self::default()
        }
    }
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(
    source: &Path,
    output_path: &Path,
    config: &ThumbnailConfig,
) -> ThumbnailParams {
    let (crop_w, crop_h) = calculate_thumbnail_dimensions(config.aspect, config.short_edge);

    ThumbnailParams {
        source: source.to_path_buf(),
        output: output_path.to_path_buf(),
        crop_width: crop_w,
        crop_height: crop_h,
        quality: config.quality,
        sharpening: config.sharpening,
    }
}

/// Create a thumbnail image at `output_path`.
///
/// Resizes to fill the target aspect ratio, then center-crops.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output_path: &Path,
    config: &ThumbnailConfig,
) -> Result<()> {
    let params = plan_thumbnail(source, output_path, config);
    backend.thumbnail(&params)
}

/// Write a placeholder for the photo identified by `key` (e.g. `trip/file.jpg`).
pub fn create_placeholder(
    backend: &impl ImageBackend,
    output: &Path,
    key: &str,
    quality: Quality,
    label: Option<PlaceholderLabel>,
) -> Result<()> {
    let (width, height) = PLACEHOLDER_SIZE;
    backend.placeholder(&PlaceholderParams {
        output: output.to_path_buf(),
        width,
        height,
        color: placeholder_color(key),
        quality,
        label,
    })
}
