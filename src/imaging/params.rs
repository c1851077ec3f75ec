//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides sizes, paths and marks) and the [`backend`](super::backend)
//! (which does the pixel work). Tests swap in a recording mock backend and
//! assert on these values.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 85). Clamped on construction.
//! - [`Sharpening`]: Unsharp-mask parameters for thumbnail crispness.
//! - [`Watermark`]: What to stamp in the bottom-right corner and how strongly.
//! - [`RenderParams`]: Web-sized image: source, output, final size, quality, optional mark.
//! - [`ThumbnailParams`]: Grid thumbnail: source, output, crop size, quality, sharpening.
//! - [`PlaceholderParams`]: Solid-color stand-in image for development, optionally labeled.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Sharpening parameters for unsharp mask.
///
/// - `sigma`: Standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: Minimum brightness difference to sharpen (0 = sharpen all pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    /// Light sharpening suitable for thumbnails.
    pub fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

/// The visible part of a watermark.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkKind {
    /// Text drawn with the given TrueType/OpenType font file.
    Text { text: String, font: PathBuf },
    /// PNG composited as-is (alpha respected).
    Image(PathBuf),
}

/// A watermark anchored to the bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    pub kind: MarkKind,
    /// Pixel size for text marks. Ignored for image marks.
    pub font_size: u32,
    /// 0.0 - 1.0. The text shadow is drawn at half this value.
    pub opacity: f32,
    /// Inset from the right and bottom edges.
    pub padding: u32,
}

/// Parameters for producing one web-sized JPEG.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final dimensions. Equal to the source when no downscale is needed.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub watermark: Option<Watermark>,
}

/// Parameters for a thumbnail operation (resize + center crop).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final crop dimensions.
    pub crop_width: u32,
    pub crop_height: u32,
    pub quality: Quality,
    pub sharpening: Option<Sharpening>,
}

/// Text centered on a placeholder: the photo's caption and a smaller
/// "Placeholder Image" line below it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderLabel {
    pub title: String,
    pub font: PathBuf,
}

/// Parameters for a solid-color placeholder JPEG.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
    pub quality: Quality,
    pub label: Option<PlaceholderLabel>,
}
