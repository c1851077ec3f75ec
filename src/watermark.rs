//! Batch resize + watermark for one trip.
//!
//! Reads every supported image in `photos/<trip>/originals/`, fits it inside
//! the configured box, stamps the mark in the bottom-right corner and writes
//! `photos/<trip>/<stem>.jpg`.
//!
//! ```text
//! photos/peru-2024/
//! ├── originals/
//! │   ├── machu_picchu.png
//! │   └── market-day.jpg
//! ├── machu_picchu.jpg      ← written
//! └── market-day.jpg        ← written
//! ```
//!
//! Files are rendered in parallel on the rayon pool. A file that fails is
//! reported and counted; the rest of the batch still runs. Unchanged
//! originals are served from the content-addressed [cache](crate::cache),
//! whose manifest lives at `photos/.cache-manifest.json`.

use crate::cache::{self, CacheManifest, CacheStats, VariantStatus};
use crate::imaging::{
    BackendError, ImageBackend, MarkKind, RustBackend, WebImageConfig, get_dimensions,
    plan_render,
};
use crate::naming::{is_supported_source, output_filename};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid trip name: {0:?}")]
    InvalidTrip(String),
    #[error("Originals directory not found: {0}")]
    OriginalsNotFound(PathBuf),
    #[error("No image files found in {0}")]
    NoImages(PathBuf),
}

/// Progress events sent while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkEvent {
    Started {
        trip: String,
        image_count: usize,
    },
    ImageDone {
        index: usize,
        file: String,
        output: String,
        status: VariantStatus,
    },
    ImageFailed {
        index: usize,
        file: String,
        message: String,
    },
}

/// One successfully written image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Original filename, e.g. `machu_picchu.png`.
    pub source: String,
    /// Output filename, e.g. `machu_picchu.jpg`.
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub status: VariantStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedImage {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkReport {
    pub trip: String,
    pub output_dir: PathBuf,
    /// In sorted source order.
    pub processed: Vec<ProcessedImage>,
    pub failed: Vec<FailedImage>,
    /// False when no mark was configured and images were only resized.
    pub watermarked: bool,
    pub cache_stats: CacheStats,
}

impl WatermarkReport {
    pub fn success_count(&self) -> usize {
        self.processed.len()
    }

    pub fn error_count(&self) -> usize {
        self.failed.len()
    }
}

/// Trip directory names must be a single plain path component.
pub fn check_trip_name(trip: &str) -> Result<(), WatermarkError> {
    let plain = !trip.is_empty()
        && !trip.starts_with('.')
        && !trip.contains(['/', '\\'])
        && trip.trim() == trip;
    if plain {
        Ok(())
    } else {
        Err(WatermarkError::InvalidTrip(trip.to_string()))
    }
}

/// Directory holding a trip's source images.
pub fn originals_dir(photos_root: &Path, trip: &str) -> PathBuf {
    photos_root.join(trip).join("originals")
}

/// Supported images in `photos/<trip>/originals/`, sorted by filename.
pub fn list_originals(photos_root: &Path, trip: &str) -> Result<Vec<PathBuf>, WatermarkError> {
    check_trip_name(trip)?;
    let dir = originals_dir(photos_root, trip);
    if !dir.is_dir() {
        return Err(WatermarkError::OriginalsNotFound(dir));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_source(path))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(WatermarkError::NoImages(dir));
    }
    Ok(files)
}

pub fn watermark_trip(
    photos_root: &Path,
    trip: &str,
    config: &WebImageConfig,
    use_cache: bool,
    progress: Option<Sender<WatermarkEvent>>,
) -> Result<WatermarkReport, WatermarkError> {
    let backend = RustBackend::new();
    watermark_trip_with_backend(&backend, photos_root, trip, config, use_cache, progress)
}

/// Run the batch against a specific backend (allows testing with mock).
pub fn watermark_trip_with_backend(
    backend: &impl ImageBackend,
    photos_root: &Path,
    trip: &str,
    config: &WebImageConfig,
    use_cache: bool,
    progress: Option<Sender<WatermarkEvent>>,
) -> Result<WatermarkReport, WatermarkError> {
    let files = list_originals(photos_root, trip)?;
    let output_dir = photos_root.join(trip);

    if let Some(tx) = &progress {
        tx.send(WatermarkEvent::Started {
            trip: trip.to_string(),
            image_count: files.len(),
        })
        .ok();
    }

    let manifest = Mutex::new(CacheManifest::load_or_empty(photos_root, use_cache));
    let mark_hash = config.watermark.as_ref().and_then(|mark| match &mark.kind {
        MarkKind::Text { font, .. } => cache::hash_file(font).ok(),
        MarkKind::Image(path) => cache::hash_file(path).ok(),
    });

    // a.jpg and a.png both map to a.jpg; the later one is refused
    let mut seen = HashSet::new();
    let jobs: Vec<(usize, &PathBuf, String, bool)> = files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let name = file_name(path);
            let output = output_filename(&name);
            let duplicate = !seen.insert(output.clone());
            (i + 1, path, output, duplicate)
        })
        .collect();

    let results: Vec<Result<ProcessedImage, FailedImage>> = jobs
        .par_iter()
        .map(|(index, source, output, duplicate)| {
            let name = file_name(source);
            let result = if *duplicate {
                Err(format!("{output} is already produced by another original"))
            } else {
                render_one(
                    backend,
                    source,
                    photos_root,
                    trip,
                    output,
                    config,
                    mark_hash.as_deref(),
                    &manifest,
                )
                .map_err(|e| e.to_string())
            };

            let event = match &result {
                Ok((_, _, status)) => WatermarkEvent::ImageDone {
                    index: *index,
                    file: name.clone(),
                    output: output.clone(),
                    status: *status,
                },
                Err(message) => WatermarkEvent::ImageFailed {
                    index: *index,
                    file: name.clone(),
                    message: message.clone(),
                },
            };
            if let Some(tx) = &progress {
                tx.send(event).ok();
            }

            match result {
                Ok((width, height, status)) => Ok(ProcessedImage {
                    source: name,
                    output: output.clone(),
                    width,
                    height,
                    status,
                }),
                Err(message) => Err(FailedImage {
                    source: name,
                    message,
                }),
            }
        })
        .collect();

    let manifest = manifest
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    manifest.save(photos_root)?;

    let mut report = WatermarkReport {
        trip: trip.to_string(),
        output_dir,
        processed: Vec::new(),
        failed: Vec::new(),
        watermarked: config.watermark.is_some(),
        cache_stats: CacheStats::default(),
    };
    for result in results {
        match result {
            Ok(image) => {
                report.cache_stats.record(image.status);
                report.processed.push(image);
            }
            Err(failed) => report.failed.push(failed),
        }
    }
    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Error)]
enum RenderError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[allow(clippy::too_many_arguments)]
fn render_one(
    backend: &impl ImageBackend,
    source: &Path,
    photos_root: &Path,
    trip: &str,
    output: &str,
    config: &WebImageConfig,
    mark_hash: Option<&str>,
    manifest: &Mutex<CacheManifest>,
) -> Result<(u32, u32, VariantStatus), RenderError> {
    let dims = get_dimensions(backend, source)?;
    let output_path = photos_root.join(trip).join(output);
    let params = plan_render(source, &output_path, dims, config);

    // Keys are relative to the photos root so renamed trips reuse their files
    let source_hash = cache::hash_file(source)?;
    let params_hash = cache::hash_render_params(&params, mark_hash);
    let cache_key = format!("{trip}/{output}");

    {
        let mut manifest = manifest.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(status) = manifest.reuse(&source_hash, &params_hash, photos_root, &cache_key)? {
            return Ok((params.width, params.height, status));
        }
    }

    backend.render(&params)?;

    manifest
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(cache_key, source_hash, params_hash);
    Ok((params.width, params.height, VariantStatus::Encoded))
}
