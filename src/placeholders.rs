//! Stand-in images for development.
//!
//! Lets the site build before any real photos exist: every photo listed in
//! `trips.json` whose file is missing gets a 1200×800 solid-color JPEG. The
//! color is derived from `trip/filename`, so reruns produce identical files.
//! When a font is available (`watermark.font`), the English caption and a
//! "Placeholder Image" line are printed across the middle.

use crate::imaging::{
    BackendError, ImageBackend, PlaceholderLabel, Quality, RustBackend, create_placeholder,
};
use crate::trips::{TripStore, TripsError};
use crate::types::Locale;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error(transparent)]
    Trips(#[from] TripsError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderReport {
    /// `trip/filename` of every file written, in content order.
    pub created: Vec<String>,
    /// Photos that already had a file.
    pub existing: usize,
    /// Whether captions were printed on the created files.
    pub labeled: bool,
}

/// `font` prints captions on the placeholders; `None` leaves them plain.
pub fn generate_placeholders(
    content_root: &Path,
    quality: Quality,
    font: Option<PathBuf>,
) -> Result<PlaceholderReport, PlaceholderError> {
    generate_placeholders_with_backend(&RustBackend::new(), content_root, quality, font)
}

pub fn generate_placeholders_with_backend(
    backend: &impl ImageBackend,
    content_root: &Path,
    quality: Quality,
    font: Option<PathBuf>,
) -> Result<PlaceholderReport, PlaceholderError> {
    let store = TripStore::load(&content_root.join("trips.json"))?;
    let photos_root = content_root.join("photos");
    let mut report = PlaceholderReport {
        labeled: font.is_some(),
        ..PlaceholderReport::default()
    };

    for trip in store.all_trips() {
        for photo in &trip.photos {
            let key = format!("{}/{}", trip.id, photo.filename);
            let output = photos_root.join(&trip.id).join(&photo.filename);
            if output.exists() {
                report.existing += 1;
                continue;
            }
            let label = font.as_ref().map(|font| PlaceholderLabel {
                title: photo.caption.get(Locale::En).to_string(),
                font: font.clone(),
            });
            create_placeholder(backend, &output, &key, quality, label)?;
            report.created.push(key);
        }
    }
    Ok(report)
}
