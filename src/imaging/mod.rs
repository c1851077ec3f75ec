//! Pure-Rust image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Render** | Lanczos3 resize + watermark (`ab_glyph` text or PNG mark) → JPEG |
//! | **Thumbnail** | `resize_to_fill` + `unsharpen` → JPEG |
//! | **Placeholder** | solid color → JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and placement math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Overlay**: Pixel-level watermark compositing
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod overlay;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use rust_backend::RustBackend;
// Re-exported for the watermark and operations tests
#[cfg(test)]
pub use backend::Dimensions;
pub use operations::{
    ThumbnailConfig, WebImageConfig, create_placeholder, create_thumbnail, get_dimensions,
    plan_render,
};
pub use params::{MarkKind, PlaceholderLabel, Quality, RenderParams, Sharpening, Watermark};
