//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Text watermark | `ab_glyph` outlines, blended in [`overlay`](super::overlay) |
//! | Image watermark | PNG decoded by `image`, alpha-composited |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Thumbnail crop | `image::DynamicImage::resize_to_fill` |
//! | Sharpening | `image::imageops::unsharpen` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::overlay::{draw_centered_text, draw_text_mark, overlay_mark_image};
use super::params::{MarkKind, PlaceholderParams, RenderParams, ThumbnailParams, Watermark};
use ab_glyph::FontArc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const PLACEHOLDER_SUBTITLE: &str = "Placeholder Image";

/// Pure Rust backend using the `image` crate ecosystem.
///
/// Parsed fonts are cached per path so a batch run reads each font once.
#[derive(Default)]
pub struct RustBackend {
    fonts: Mutex<HashMap<PathBuf, FontArc>>,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&self, path: &Path) -> Result<FontArc, BackendError> {
        let mut fonts = self
            .fonts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(font) = fonts.get(path) {
            return Ok(font.clone());
        }
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| BackendError::Font {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fonts.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }

    fn apply_watermark(&self, img: &mut RgbImage, mark: &Watermark) -> Result<(), BackendError> {
        match &mark.kind {
            MarkKind::Text { text, font } => {
                let font = self.font(font)?;
                draw_text_mark(img, &font, text, mark.font_size, mark.padding, mark.opacity);
            }
            MarkKind::Image(path) => {
                let overlay = load_image(path)?.to_rgba8();
                overlay_mark_image(img, &overlay, mark.padding, mark.opacity);
            }
        }
        Ok(())
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as baseline JPEG, creating parent directories as needed.
fn save_jpeg(img: RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let mut rgb = if (img.width(), img.height()) == (params.width, params.height) {
            img.to_rgb8()
        } else {
            image::imageops::resize(
                &img.to_rgb8(),
                params.width,
                params.height,
                FilterType::Lanczos3,
            )
        };

        if let Some(mark) = &params.watermark {
            self.apply_watermark(&mut rgb, mark)?;
        }

        save_jpeg(rgb, &params.output, params.quality.value())
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        // Fill-resize then center-crop to exact dimensions
        let filled =
            img.resize_to_fill(params.crop_width, params.crop_height, FilterType::Lanczos3);

        let final_img = if let Some(sharpening) = params.sharpening {
            DynamicImage::from(image::imageops::unsharpen(
                &filled,
                sharpening.sigma,
                sharpening.threshold,
            ))
        } else {
            filled
        };

        save_jpeg(final_img.to_rgb8(), &params.output, params.quality.value())
    }

    fn placeholder(&self, params: &PlaceholderParams) -> Result<(), BackendError> {
        let mut img = RgbImage::from_pixel(params.width, params.height, Rgb(params.color));
        if let Some(label) = &params.label {
            let font = self.font(&label.font)?;
            let height = params.height as f32;
            draw_centered_text(&mut img, &font, &label.title, 48.0, height * 0.5, 0.5);
            draw_centered_text(&mut img, &font, PLACEHOLDER_SUBTITLE, 24.0, height * 0.6, 0.3);
        }
        save_jpeg(img, &params.output, params.quality.value())
    }
}
