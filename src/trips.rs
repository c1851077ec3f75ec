//! Content store and query layer.
//!
//! `trips.json` is loaded once into a [`TripStore`]. Everything else here is a
//! pure function from the store (or a list of [`PhotoView`]s) to a view the
//! renderers consume: localized photo lists, distinct countries and regions,
//! and filtered/sorted gallery listings.
//!
//! ## Featured Shuffle
//!
//! The home page shows featured photos in a random order. A static build picks
//! that order once per build with a Fisher–Yates shuffle driven by
//! [`ShuffleRng`]. Passing a fixed seed reproduces the same order.

use crate::naming::slugify;
use crate::types::{Category, Locale, PhotoView, Trip, TripsData};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid trips.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid trip data: {0}")]
    Validation(String),
}

/// Loaded and validated content store.
#[derive(Debug, Clone, Default)]
pub struct TripStore {
    data: TripsData,
}

impl TripStore {
    /// Read, parse and validate a `trips.json` file.
    pub fn load(path: &Path) -> Result<Self, TripsError> {
        let content = fs::read_to_string(path)?;
        let data: TripsData = serde_json::from_str(&content)?;
        Self::from_data(data)
    }

    pub fn from_data(data: TripsData) -> Result<Self, TripsError> {
        validate(&data)?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &TripsData {
        &self.data
    }

    pub fn all_trips(&self) -> &[Trip] {
        &self.data.trips
    }

    pub fn featured_trips(&self) -> Vec<&Trip> {
        self.data.trips.iter().filter(|t| t.featured).collect()
    }

    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        self.data.trips.iter().find(|t| t.id == id)
    }

    /// Every photo of every trip, in content order.
    pub fn all_photos(&self, locale: Locale) -> Vec<PhotoView> {
        photo_views(self.data.trips.iter(), locale)
    }

    /// Photos of featured trips. Shuffled when an RNG is given.
    pub fn featured_photos(&self, locale: Locale, rng: Option<&mut ShuffleRng>) -> Vec<PhotoView> {
        let mut photos = photo_views(self.data.trips.iter().filter(|t| t.featured), locale);
        if let Some(rng) = rng {
            shuffle(&mut photos, rng);
        }
        photos
    }

    pub fn photos_by_category(&self, locale: Locale, category: Category) -> Vec<PhotoView> {
        self.all_photos(locale)
            .into_iter()
            .filter(|p| p.categories.contains(&category))
            .collect()
    }

    pub fn photos_by_country(&self, locale: Locale, country: &str) -> Vec<PhotoView> {
        self.all_photos(locale)
            .into_iter()
            .filter(|p| p.country == country)
            .collect()
    }

    /// Distinct countries, sorted ascending.
    pub fn all_countries(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.data.trips.iter().map(|t| t.country.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// Union of trip-level and photo-level categories, sorted.
    pub fn all_categories(&self) -> Vec<Category> {
        let set: BTreeSet<Category> = self
            .data
            .trips
            .iter()
            .flat_map(|t| {
                t.categories
                    .iter()
                    .chain(t.photos.iter().flat_map(|p| p.categories.iter()))
            })
            .copied()
            .collect();
        set.into_iter().collect()
    }

    /// Country → sorted distinct regions. Countries without any region are absent.
    pub fn regions_by_country(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for trip in &self.data.trips {
            if let Some(region) = trip.region.as_deref().filter(|r| !r.trim().is_empty()) {
                map.entry(trip.country.clone())
                    .or_default()
                    .insert(region.to_string());
            }
        }
        map.into_iter()
            .map(|(country, regions)| (country, regions.into_iter().collect()))
            .collect()
    }
}

fn photo_views<'a>(trips: impl Iterator<Item = &'a Trip>, locale: Locale) -> Vec<PhotoView> {
    trips
        .flat_map(|trip| {
            trip.photos
                .iter()
                .map(move |photo| PhotoView::from_trip(trip, photo, locale))
        })
        .collect()
}

/// Check structural invariants of the content store.
pub fn validate(data: &TripsData) -> Result<(), TripsError> {
    let mut ids = HashSet::new();
    let mut country_slugs: HashMap<String, &str> = HashMap::new();
    // Region pages live under their country, so slugs only need to differ per country
    let mut region_slugs: HashMap<(&str, String), &str> = HashMap::new();

    for trip in &data.trips {
        if trip.id.trim().is_empty() {
            return Err(TripsError::Validation("trip with empty id".into()));
        }
        if trip.id.contains(['/', '\\']) || trip.id.starts_with('.') {
            return Err(TripsError::Validation(format!(
                "trip id '{}' must be a plain directory name",
                trip.id
            )));
        }
        if !ids.insert(trip.id.as_str()) {
            return Err(TripsError::Validation(format!(
                "duplicate trip id '{}'",
                trip.id
            )));
        }
        if !is_valid_date(&trip.date) {
            return Err(TripsError::Validation(format!(
                "trip '{}': date '{}' is not YYYY-MM",
                trip.id, trip.date
            )));
        }
        if trip.country.trim().is_empty() {
            return Err(TripsError::Validation(format!(
                "trip '{}': country is empty",
                trip.id
            )));
        }

        let slug = slugify(&trip.country);
        if slug.is_empty() {
            return Err(TripsError::Validation(format!(
                "trip '{}': country '{}' has no URL-safe characters",
                trip.id, trip.country
            )));
        }
        match country_slugs.get(&slug) {
            Some(other) if *other != trip.country => {
                return Err(TripsError::Validation(format!(
                    "countries '{}' and '{}' map to the same URL '{}'",
                    other, trip.country, slug
                )));
            }
            _ => {
                country_slugs.insert(slug, trip.country.as_str());
            }
        }

        if let Some(region) = trip.region.as_deref().filter(|r| !r.trim().is_empty()) {
            let slug = slugify(region);
            if slug.is_empty() {
                return Err(TripsError::Validation(format!(
                    "trip '{}': region '{}' has no URL-safe characters",
                    trip.id, region
                )));
            }
            match region_slugs.get(&(trip.country.as_str(), slug.clone())) {
                Some(other) if *other != region => {
                    return Err(TripsError::Validation(format!(
                        "regions '{}' and '{}' in {} map to the same URL '{}'",
                        other, region, trip.country, slug
                    )));
                }
                _ => {
                    region_slugs.insert((trip.country.as_str(), slug), region);
                }
            }
        }

        let mut stems = HashSet::new();
        for photo in &trip.photos {
            if photo.filename.trim().is_empty() || photo.filename.contains(['/', '\\']) {
                return Err(TripsError::Validation(format!(
                    "trip '{}': invalid photo filename '{}'",
                    trip.id, photo.filename
                )));
            }
            // Photo pages are addressed by stem, so `a.jpg` and `a.png` collide too
            if !stems.insert(crate::naming::file_stem(&photo.filename)) {
                return Err(TripsError::Validation(format!(
                    "trip '{}': duplicate photo '{}'",
                    trip.id, photo.filename
                )));
            }
        }
    }
    Ok(())
}

/// `YYYY-MM` or `YYYY-MM-DD`.
pub fn is_valid_date(date: &str) -> bool {
    match date.len() {
        7 => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d").is_ok(),
        10 => NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        _ => false,
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Gallery sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest trip first.
    #[default]
    Date,
    /// Country name ascending.
    Country,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Date, SortKey::Country];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Country => "country",
        }
    }
}

/// One combination of gallery filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GalleryFilter {
    pub country: Option<String>,
    /// Only meaningful together with `country`.
    pub region: Option<String>,
    pub category: Option<Category>,
    pub sort: SortKey,
}

impl GalleryFilter {
    /// True when any predicate narrows the listing. Sort order alone does not count.
    pub fn is_active(&self) -> bool {
        self.country.is_some() || self.region.is_some() || self.category.is_some()
    }
}

/// Apply country, region and category predicates, then sort.
///
/// Sorting is stable, so photos with equal keys keep content order.
pub fn filter_photos(photos: &[PhotoView], filter: &GalleryFilter) -> Vec<PhotoView> {
    let mut filtered: Vec<PhotoView> = photos
        .iter()
        .filter(|p| filter.country.as_ref().is_none_or(|c| &p.country == c))
        .filter(|p| {
            filter
                .region
                .as_ref()
                .is_none_or(|r| p.region.as_ref() == Some(r))
        })
        .filter(|p| filter.category.is_none_or(|c| p.categories.contains(&c)))
        .cloned()
        .collect();

    match filter.sort {
        SortKey::Date => filtered.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Country => filtered.sort_by(|a, b| a.country.cmp(&b.country)),
    }
    filtered
}

// ============================================================================
// Shuffling
// ============================================================================

/// Small seedable PRNG (SplitMix64) for build-time shuffles.
#[derive(Debug, Clone)]
pub struct ShuffleRng {
    state: u64,
}

impl ShuffleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS entropy, falling back to the clock if that fails.
    pub fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        let seed = match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(_) => chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64,
        };
        Self::from_seed(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        ((self.next_u64() as u128 * bound as u128) >> 64) as usize
    }
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut ShuffleRng) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_data, trip};
    use crate::types::{LocalizedText, Photo};

    fn store() -> TripStore {
        TripStore::from_data(sample_data()).unwrap()
    }

    #[test]
    fn all_photos_in_content_order() {
        let photos = store().all_photos(Locale::En);
        let names: Vec<&str> = photos.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "tatra-peak.jpg",
                "old-town-street.jpg",
                "glacier-lake.jpg",
                "fjord-view.jpg",
                "machu-picchu.jpg"
            ]
        );
    }

    #[test]
    fn photo_view_is_localized() {
        let photos = store().all_photos(Locale::Sk);
        assert_eq!(photos[0].caption, "Tatranský štít");
        assert_eq!(photos[0].trip_title, "Vysoké Tatry");
        // Missing sk caption falls back to en
        assert_eq!(photos[1].caption, "Old town street");
        assert_eq!(photos[0].src, "/photos/tatras-2024/tatra-peak.jpg");
    }

    #[test]
    fn featured_without_shuffle_keeps_order() {
        let photos = store().featured_photos(Locale::En, None);
        let names: Vec<&str> = photos.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["tatra-peak.jpg", "old-town-street.jpg", "machu-picchu.jpg"]
        );
    }

    #[test]
    fn featured_shuffle_is_a_permutation_and_seeded() {
        let s = store();
        let mut rng_a = ShuffleRng::from_seed(42);
        let mut rng_b = ShuffleRng::from_seed(42);
        let a = s.featured_photos(Locale::En, Some(&mut rng_a));
        let b = s.featured_photos(Locale::En, Some(&mut rng_b));
        assert_eq!(a, b);

        let mut names: Vec<&str> = a.iter().map(|p| p.filename.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["machu-picchu.jpg", "old-town-street.jpg", "tatra-peak.jpg"]
        );
    }

    #[test]
    fn shuffle_reaches_every_position() {
        // Over many seeds each element should land in each slot at least once.
        let mut seen = [[false; 4]; 4];
        for seed in 0..200 {
            let mut items = [0usize, 1, 2, 3];
            shuffle(&mut items, &mut ShuffleRng::from_seed(seed));
            for (pos, item) in items.iter().enumerate() {
                seen[*item][pos] = true;
            }
        }
        assert!(seen.iter().all(|row| row.iter().all(|s| *s)));
    }

    #[test]
    fn shuffle_handles_short_slices() {
        let mut rng = ShuffleRng::from_seed(1);
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);
        let mut one = [7];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [7]);
    }

    #[test]
    fn below_stays_in_bounds() {
        let mut rng = ShuffleRng::from_seed(9);
        for bound in 1..50 {
            assert!(rng.below(bound) < bound);
        }
    }

    #[test]
    fn countries_sorted_and_distinct() {
        assert_eq!(store().all_countries(), vec!["Norway", "Peru", "Slovakia"]);
    }

    #[test]
    fn categories_union_sorted() {
        assert_eq!(
            store().all_categories(),
            vec![
                Category::City,
                Category::Culture,
                Category::Landscape,
                Category::Mountains,
                Category::Nature
            ]
        );
    }

    #[test]
    fn regions_grouped_by_country() {
        let regions = store().regions_by_country();
        assert_eq!(regions.get("Norway"), Some(&vec!["Lofoten".to_string(), "Svalbard".to_string()]));
        assert_eq!(regions.get("Slovakia"), Some(&vec!["High Tatras".to_string()]));
        assert!(!regions.contains_key("Peru"));
    }

    #[test]
    fn photos_by_category_and_country() {
        let s = store();
        let city = s.photos_by_category(Locale::En, Category::City);
        assert_eq!(city.len(), 1);
        assert_eq!(city[0].filename, "old-town-street.jpg");

        let norway = s.photos_by_country(Locale::En, "Norway");
        assert_eq!(norway.len(), 2);
    }

    #[test]
    fn filter_by_country_then_region() {
        let photos = store().all_photos(Locale::En);
        let filter = GalleryFilter {
            country: Some("Norway".into()),
            region: Some("Svalbard".into()),
            ..GalleryFilter::default()
        };
        let result = filter_photos(&photos, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].filename, "glacier-lake.jpg");
    }

    #[test]
    fn filter_by_category() {
        let photos = store().all_photos(Locale::En);
        let filter = GalleryFilter {
            category: Some(Category::Nature),
            ..GalleryFilter::default()
        };
        let result = filter_photos(&photos, &filter);
        let names: Vec<&str> = result.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["glacier-lake.jpg", "fjord-view.jpg"]);
    }

    #[test]
    fn sort_by_date_descending_is_stable() {
        let photos = store().all_photos(Locale::En);
        let result = filter_photos(&photos, &GalleryFilter::default());
        let dates: Vec<&str> = result.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-08", "2024-08", "2023-06", "2023-06", "2022-03"]
        );
        // Equal dates keep content order
        assert_eq!(result[0].filename, "tatra-peak.jpg");
        assert_eq!(result[1].filename, "old-town-street.jpg");
    }

    #[test]
    fn sort_by_country_ascending() {
        let photos = store().all_photos(Locale::En);
        let filter = GalleryFilter {
            sort: SortKey::Country,
            ..GalleryFilter::default()
        };
        let result = filter_photos(&photos, &filter);
        let countries: Vec<&str> = result.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(
            countries,
            vec!["Norway", "Norway", "Peru", "Slovakia", "Slovakia"]
        );
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        let photos = store().all_photos(Locale::En);
        let filter = GalleryFilter {
            country: Some("Peru".into()),
            category: Some(Category::City),
            ..GalleryFilter::default()
        };
        assert!(filter_photos(&photos, &filter).is_empty());
        assert!(filter.is_active());
        assert!(!GalleryFilter::default().is_active());
    }

    #[test]
    fn trip_lookup() {
        let s = store();
        assert_eq!(s.trip_by_id("peru-2022").map(|t| t.country.as_str()), Some("Peru"));
        assert!(s.trip_by_id("nope").is_none());
        assert_eq!(s.featured_trips().len(), 2);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn duplicate_trip_id_rejected() {
        let data = TripsData {
            trips: vec![trip("a", "Peru", "2024-01"), trip("a", "Peru", "2024-02")],
        };
        let err = TripStore::from_data(data).unwrap_err();
        assert!(err.to_string().contains("duplicate trip id"));
    }

    #[test]
    fn bad_date_rejected() {
        for date in ["2024", "2024-13", "March 2024", "2024-02-30"] {
            let data = TripsData {
                trips: vec![trip("a", "Peru", date)],
            };
            assert!(TripStore::from_data(data).is_err(), "{date} accepted");
        }
        let data = TripsData {
            trips: vec![trip("a", "Peru", "2024-02-29")],
        };
        assert!(TripStore::from_data(data).is_ok());
    }

    #[test]
    fn duplicate_photo_rejected() {
        let mut t = trip("a", "Peru", "2024-01");
        let photo = Photo {
            filename: "x.jpg".into(),
            caption: LocalizedText::new("X"),
            categories: vec![],
        };
        t.photos = vec![photo.clone(), photo];
        let err = TripStore::from_data(TripsData { trips: vec![t] }).unwrap_err();
        assert!(err.to_string().contains("duplicate photo"));
    }

    #[test]
    fn path_like_ids_rejected() {
        let data = TripsData {
            trips: vec![trip("../etc", "Peru", "2024-01")],
        };
        assert!(TripStore::from_data(data).is_err());
    }

    #[test]
    fn colliding_country_slugs_rejected() {
        let data = TripsData {
            trips: vec![
                trip("a", "Costa Rica", "2024-01"),
                trip("b", "costa-rica", "2024-02"),
            ],
        };
        let err = TripStore::from_data(data).unwrap_err();
        assert!(err.to_string().contains("same URL"));
    }

    #[test]
    fn colliding_region_slugs_rejected() {
        let data = TripsData {
            trips: vec![
                Trip {
                    region: Some("High Tatras".into()),
                    ..trip("a", "Slovakia", "2024-01")
                },
                Trip {
                    region: Some("High-Tatras".into()),
                    ..trip("b", "Slovakia", "2024-02")
                },
            ],
        };
        let err = TripStore::from_data(data).unwrap_err();
        assert!(err.to_string().contains("same URL 'high-tatras'"), "{err}");
    }

    #[test]
    fn region_without_url_characters_rejected() {
        let data = TripsData {
            trips: vec![
                Trip {
                    region: Some("東京".into()),
                    ..trip("tokyo", "Japan", "2024-04")
                },
                Trip {
                    region: Some("京都".into()),
                    ..trip("kyoto", "Japan", "2024-05")
                },
            ],
        };
        let err = TripStore::from_data(data).unwrap_err();
        assert!(err.to_string().contains("region '東京'"), "{err}");
    }

    #[test]
    fn same_region_slug_allowed_across_countries_and_trips() {
        let data = TripsData {
            trips: vec![
                Trip {
                    region: Some("North".into()),
                    ..trip("a", "Norway", "2023-01")
                },
                Trip {
                    region: Some("North".into()),
                    ..trip("b", "Norway", "2023-02")
                },
                Trip {
                    region: Some("North".into()),
                    ..trip("c", "Peru", "2023-03")
                },
            ],
        };
        assert!(TripStore::from_data(data).is_ok());
    }

    #[test]
    fn load_reads_json_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("trips.json");
        fs::write(&path, serde_json::to_string(&sample_data()).unwrap()).unwrap();
        let s = TripStore::load(&path).unwrap();
        assert_eq!(s.all_trips().len(), 4);
    }

    #[test]
    fn load_reports_json_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("trips.json");
        fs::write(&path, "{\"trips\": [").unwrap();
        assert!(matches!(TripStore::load(&path), Err(TripsError::Json(_))));
    }
}
