//! Grid thumbnails for the gallery and home pages.
//!
//! Runs before page rendering. Every photo in the content store gets a
//! fill-cropped thumbnail next to its web image in the output tree:
//!
//! ```text
//! dist/
//! ├── .cache-manifest.json
//! └── photos/peru-2022/
//!     ├── machu-picchu.jpg          # copied by generate
//!     └── machu-picchu-thumb.jpg    # 640x480 at the default 4:3 / 480
//! ```
//!
//! Photos are processed in parallel on the rayon pool, one trip at a time so
//! progress output stays grouped. Unchanged sources are served from the
//! content-addressed [cache](crate::cache).

use crate::cache::{self, CacheManifest, CacheStats, VariantStatus};
use crate::imaging::{BackendError, ImageBackend, RustBackend, ThumbnailConfig, create_thumbnail};
use crate::trips::TripStore;
use crate::types::{Locale, PhotoView};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Progress events, one group per trip.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    TripStarted {
        title: String,
        photo_count: usize,
    },
    PhotoProcessed {
        /// 1-based position within the trip.
        index: usize,
        title: String,
        /// `trip/filename`
        source_path: String,
        thumbnail: VariantStatus,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessResult {
    pub thumbnails: usize,
    pub cache_stats: CacheStats,
}

/// Output path of a photo's thumbnail, relative to the output root.
pub fn thumbnail_relpath(photo: &PhotoView) -> String {
    photo.thumb_src().trim_start_matches('/').to_string()
}

/// Photos listed in the store whose file does not exist, in content order.
pub fn missing_photos(content_root: &Path, store: &TripStore) -> Vec<PathBuf> {
    let photos_root = content_root.join("photos");
    store
        .all_trips()
        .iter()
        .flat_map(|trip| {
            trip.photos
                .iter()
                .map(|photo| photos_root.join(&trip.id).join(&photo.filename))
        })
        .filter(|path| !path.is_file())
        .collect()
}

pub fn process(
    content_root: &Path,
    output_dir: &Path,
    store: &TripStore,
    config: &ThumbnailConfig,
    use_cache: bool,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, content_root, output_dir, store, config, use_cache, progress)
}

/// Generate thumbnails using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    content_root: &Path,
    output_dir: &Path,
    store: &TripStore,
    config: &ThumbnailConfig,
    use_cache: bool,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let photos_root = content_root.join("photos");

    // Fail before any work if a referenced photo is missing
    if let Some(missing) = missing_photos(content_root, store).into_iter().next() {
        return Err(ProcessError::SourceNotFound(missing));
    }

    std::fs::create_dir_all(output_dir)?;
    let manifest = Mutex::new(CacheManifest::load_or_empty(output_dir, use_cache));
    let params_hash = cache::hash_thumbnail_params(
        config.aspect,
        config.short_edge,
        config.quality.value(),
        config.sharpening.map(|s| (s.sigma, s.threshold)),
    );
    let mut result = ProcessResult::default();

    for trip in store.all_trips() {
        if let Some(tx) = &progress {
            tx.send(ProcessEvent::TripStarted {
                title: trip.title.get(Locale::En).to_string(),
                photo_count: trip.photos.len(),
            })
            .ok();
        }

        let views: Vec<PhotoView> = trip
            .photos
            .iter()
            .map(|photo| PhotoView::from_trip(trip, photo, Locale::En))
            .collect();

        let statuses = views
            .par_iter()
            .enumerate()
            .map(|(i, view)| {
                let source = photos_root.join(&view.trip_id).join(&view.filename);
                let relpath = thumbnail_relpath(view);
                let status = thumbnail_one(
                    backend,
                    &source,
                    output_dir,
                    &relpath,
                    config,
                    &params_hash,
                    &manifest,
                )?;

                if let Some(tx) = &progress {
                    tx.send(ProcessEvent::PhotoProcessed {
                        index: i + 1,
                        title: view.caption.clone(),
                        source_path: format!("{}/{}", view.trip_id, view.filename),
                        thumbnail: status,
                    })
                    .ok();
                }
                Ok(status)
            })
            .collect::<Result<Vec<_>, ProcessError>>()?;

        for status in statuses {
            result.cache_stats.record(status);
            result.thumbnails += 1;
        }
    }

    manifest
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .save(output_dir)?;
    Ok(result)
}

fn thumbnail_one(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    relpath: &str,
    config: &ThumbnailConfig,
    params_hash: &str,
    manifest: &Mutex<CacheManifest>,
) -> Result<VariantStatus, ProcessError> {
    let source_hash = cache::hash_file(source)?;
    {
        let mut manifest = manifest.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(status) = manifest.reuse(&source_hash, params_hash, output_dir, relpath)? {
            return Ok(status);
        }
    }

    let output = output_dir.join(relpath);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    create_thumbnail(backend, source, &output, config)?;

    manifest
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(relpath.to_string(), source_hash, params_hash.to_string());
    Ok(VariantStatus::Encoded)
}
