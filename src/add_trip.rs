//! Turn a folder of originals into a `trips.json` entry.
//!
//! ```text
//! travel-folio add-trip peru-2024 --country Peru --date 2024-03
//! ```
//!
//! 1. Watermarks `photos/peru-2024/originals/*` into `photos/peru-2024/`.
//! 2. Builds one photo entry per rendered image: caption from the filename,
//!    a `[SK]`-prefixed Slovak placeholder, categories guessed from keywords.
//! 3. Inserts the trip at the front of `trips.json`, or, when the id already
//!    exists, replaces only its `photos` and `categories`.
//!
//! Photos whose render failed are left out of the entry and listed in the
//! summary.

use crate::cache::CacheStats;
use crate::imaging::WebImageConfig;
use crate::naming::{derive_categories, filename_to_caption, trip_name_to_title};
use crate::trips::{self, TripsError};
use crate::types::{Category, Locale, LocalizedText, Photo, Trip, TripsData};
use crate::watermark::{self, FailedImage, WatermarkError, WatermarkEvent};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddTripError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid trips.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Watermark(#[from] WatermarkError),
    #[error(transparent)]
    Trips(#[from] TripsError),
    #[error("Country is required")]
    MissingCountry,
    #[error("Invalid date {0:?}: expected YYYY-MM")]
    InvalidDate(String),
    #[error("No images could be processed for {0}")]
    NothingProcessed(String),
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTripRequest {
    pub trip: String,
    pub country: String,
    pub region: Option<String>,
    /// `YYYY-MM`. Defaults to the current month.
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddTripSummary {
    pub trip: String,
    pub country: String,
    pub region: Option<String>,
    /// True when the trip was inserted, false when an existing one was updated.
    pub created: bool,
    pub photo_count: usize,
    pub categories: Vec<Category>,
    pub failed: Vec<FailedImage>,
    pub cache_stats: CacheStats,
    pub trips_path: PathBuf,
}

/// Slovak placeholder for machine-generated text.
fn sk_placeholder(text: &str) -> String {
    format!("[SK] {text}")
}

/// Photo entry for a source filename.
pub fn photo_entry(source_filename: &str, output_filename: &str) -> Photo {
    let caption = filename_to_caption(source_filename);
    Photo {
        filename: output_filename.to_string(),
        caption: LocalizedText::new(caption.as_str()).with(Locale::Sk, sk_placeholder(&caption)),
        categories: derive_categories(source_filename),
    }
}

/// Union of photo categories in first-seen order.
pub fn collect_categories(photos: &[Photo]) -> Vec<Category> {
    let mut all = Vec::new();
    for category in photos.iter().flat_map(|p| &p.categories) {
        if !all.contains(category) {
            all.push(*category);
        }
    }
    all
}

/// Merge a trip into the data: update `photos`/`categories` of an existing
/// id in place, or insert at the front. Returns true when inserted.
pub fn upsert_trip(data: &mut TripsData, trip: Trip) -> bool {
    match data.trips.iter_mut().find(|t| t.id == trip.id) {
        Some(existing) => {
            existing.photos = trip.photos;
            existing.categories = trip.categories;
            false
        }
        None => {
            data.trips.insert(0, trip);
            true
        }
    }
}

fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// Read `trips.json`, or start empty when it doesn't exist yet.
fn read_trips(path: &Path) -> Result<TripsData, AddTripError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TripsData::default()),
        Err(e) => Err(e.into()),
    }
}

/// Pretty JSON with 2-space indentation and a trailing newline.
fn write_trips(path: &Path, data: &TripsData) -> Result<(), AddTripError> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

pub fn add_trip(
    content_root: &Path,
    request: &AddTripRequest,
    config: &WebImageConfig,
    use_cache: bool,
    progress: Option<Sender<WatermarkEvent>>,
) -> Result<AddTripSummary, AddTripError> {
    let country = request.country.trim();
    if country.is_empty() {
        return Err(AddTripError::MissingCountry);
    }
    let date = match &request.date {
        Some(date) if trips::is_valid_date(date) => date.clone(),
        Some(date) => return Err(AddTripError::InvalidDate(date.clone())),
        None => current_month(),
    };
    let region = request
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let photos_root = content_root.join("photos");
    let report =
        watermark::watermark_trip(&photos_root, &request.trip, config, use_cache, progress)?;
    if report.processed.is_empty() {
        return Err(AddTripError::NothingProcessed(request.trip.clone()));
    }

    let photos: Vec<Photo> = report
        .processed
        .iter()
        .map(|image| photo_entry(&image.source, &image.output))
        .collect();
    let categories = collect_categories(&photos);
    let title = trip_name_to_title(&request.trip);

    let trip = Trip {
        id: request.trip.clone(),
        title: LocalizedText::new(title.as_str()).with(Locale::Sk, sk_placeholder(&title)),
        country: country.to_string(),
        region: region.clone(),
        date,
        featured: false,
        categories: categories.clone(),
        photos,
    };
    let photo_count = trip.photos.len();

    let trips_path = content_root.join("trips.json");
    let mut data = read_trips(&trips_path)?;
    let created = upsert_trip(&mut data, trip);
    trips::validate(&data)?;
    write_trips(&trips_path, &data)?;

    Ok(AddTripSummary {
        trip: request.trip.clone(),
        country: country.to_string(),
        region,
        created,
        photo_count,
        categories,
        failed: report.failed,
        cache_stats: report.cache_stats,
        trips_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Quality;
    use crate::test_helpers::{sample_data, setup_originals};
    use tempfile::TempDir;

    fn config() -> WebImageConfig {
        WebImageConfig {
            max_width: 1920,
            max_height: 1080,
            quality: Quality::new(85),
            watermark: None,
        }
    }

    fn request(trip: &str) -> AddTripRequest {
        AddTripRequest {
            trip: trip.into(),
            country: "Peru".into(),
            region: None,
            date: Some("2024-03".into()),
        }
    }

    #[test]
    fn photo_entry_from_filename() {
        let photo = photo_entry("mountain_sunset.png", "mountain_sunset.jpg");
        assert_eq!(photo.filename, "mountain_sunset.jpg");
        assert_eq!(photo.caption.get(Locale::En), "Mountain Sunset");
        assert_eq!(photo.caption.get(Locale::Sk), "[SK] Mountain Sunset");
        assert_eq!(
            photo.categories,
            vec![Category::Mountains, Category::Landscape]
        );
    }

    #[test]
    fn categories_union_in_first_seen_order() {
        let photos = vec![
            photo_entry("temple.jpg", "temple.jpg"),
            photo_entry("city-sunset.jpg", "city-sunset.jpg"),
            photo_entry("old-temple.jpg", "old-temple.jpg"),
        ];
        assert_eq!(
            collect_categories(&photos),
            vec![Category::Culture, Category::City, Category::Landscape]
        );
    }

    #[test]
    fn upsert_inserts_new_trip_at_front() {
        let mut data = sample_data();
        let mut trip = data.trips[0].clone();
        trip.id = "new-trip".into();
        assert!(upsert_trip(&mut data, trip));
        assert_eq!(data.trips[0].id, "new-trip");
        assert_eq!(data.trips.len(), 5);
    }

    #[test]
    fn upsert_keeps_existing_fields() {
        let mut data = sample_data();
        let existing = data.trips[1].clone();
        let replacement = Trip {
            title: LocalizedText::new("Other"),
            country: "Elsewhere".into(),
            featured: true,
            categories: vec![Category::Animals],
            photos: vec![photo_entry("whale.jpg", "whale.jpg")],
            ..existing.clone()
        };

        assert!(!upsert_trip(&mut data, replacement));
        let updated = &data.trips[1];
        assert_eq!(updated.title, existing.title);
        assert_eq!(updated.country, existing.country);
        assert_eq!(updated.featured, existing.featured);
        assert_eq!(updated.categories, vec![Category::Animals]);
        assert_eq!(updated.photos.len(), 1);
    }

    #[test]
    fn creates_trips_json_when_missing() {
        let tmp = TempDir::new().unwrap();
        setup_originals(tmp.path(), "peru-2024", &["machu_picchu.png", "market-day.jpg"]);

        let summary = add_trip(tmp.path(), &request("peru-2024"), &config(), true, None).unwrap();
        assert!(summary.created);
        assert_eq!(summary.photo_count, 2);
        assert_eq!(summary.categories, vec![Category::Landscape, Category::Culture]);

        let content = std::fs::read_to_string(tmp.path().join("trips.json")).unwrap();
        assert!(content.contains("\n  \"trips\": ["));
        let data: TripsData = serde_json::from_str(&content).unwrap();
        let trip = &data.trips[0];
        assert_eq!(trip.title.get(Locale::En), "Peru 2024");
        assert_eq!(trip.title.get(Locale::Sk), "[SK] Peru 2024");
        assert_eq!(trip.date, "2024-03");
        assert!(!trip.featured);
        assert!(trip.region.is_none());
        assert_eq!(trip.photos[0].filename, "machu_picchu.jpg");
        assert!(tmp.path().join("photos/peru-2024/market-day.jpg").exists());
    }

    #[test]
    fn updates_existing_trip_photos() {
        let tmp = TempDir::new().unwrap();
        let mut data = sample_data();
        data.trips[0].featured = true;
        std::fs::write(
            tmp.path().join("trips.json"),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();
        setup_originals(tmp.path(), "tatras-2024", &["bear.jpg"]);

        let mut req = request("tatras-2024");
        req.country = "Slovakia".into();
        let summary = add_trip(tmp.path(), &req, &config(), true, None).unwrap();
        assert!(!summary.created);

        let data: TripsData =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("trips.json")).unwrap())
                .unwrap();
        assert_eq!(data.trips.len(), 4);
        let trip = &data.trips[0];
        assert_eq!(trip.id, "tatras-2024");
        assert!(trip.featured);
        assert_eq!(trip.region.as_deref(), Some("High Tatras"));
        assert_eq!(trip.categories, vec![Category::Animals]);
        assert_eq!(trip.photos.len(), 1);
    }

    #[test]
    fn rejects_bad_input_before_touching_files() {
        let tmp = TempDir::new().unwrap();
        let mut req = request("peru-2024");
        req.country = "  ".into();
        assert!(matches!(
            add_trip(tmp.path(), &req, &config(), true, None),
            Err(AddTripError::MissingCountry)
        ));

        let mut req = request("peru-2024");
        req.date = Some("March 2024".into());
        assert!(matches!(
            add_trip(tmp.path(), &req, &config(), true, None),
            Err(AddTripError::InvalidDate(_))
        ));

        assert!(matches!(
            add_trip(tmp.path(), &request("peru-2024"), &config(), true, None),
            Err(AddTripError::Watermark(WatermarkError::OriginalsNotFound(_)))
        ));
    }

    #[test]
    fn default_date_is_current_month() {
        let month = current_month();
        assert_eq!(month.len(), 7);
        assert!(trips::is_valid_date(&month));
    }
}
