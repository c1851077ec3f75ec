//! Shared test utilities.
//!
//! Provides a small in-memory content store covering the interesting query
//! cases (featured and non-featured trips, a country with several regions, a
//! trip without region, a missing Slovak caption) and helpers that write
//! synthetic JPEGs so imaging code can run against real files.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_content();
//! let store = TripStore::load(&tmp.path().join("trips.json")).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Category, Locale, LocalizedText, Photo, Trip, TripsData};

// =========================================================================
// In-memory fixtures
// =========================================================================

/// Minimal trip with no photos.
pub fn trip(id: &str, country: &str, date: &str) -> Trip {
    Trip {
        id: id.to_string(),
        title: LocalizedText::new(id),
        country: country.to_string(),
        region: None,
        date: date.to_string(),
        featured: false,
        categories: vec![],
        photos: vec![],
    }
}

pub fn photo(filename: &str, en: &str, sk: Option<&str>, categories: &[Category]) -> Photo {
    let mut caption = LocalizedText::new(en);
    if let Some(sk) = sk {
        caption = caption.with(Locale::Sk, sk);
    }
    Photo {
        filename: filename.to_string(),
        caption,
        categories: categories.to_vec(),
    }
}

/// Four trips, five photos:
///
/// | trip | country | region | date | featured | photos |
/// |------|---------|--------|------|----------|--------|
/// | tatras-2024 | Slovakia | High Tatras | 2024-08 | yes | tatra-peak, old-town-street |
/// | svalbard-2023 | Norway | Svalbard | 2023-06 | no | glacier-lake |
/// | lofoten-2023 | Norway | Lofoten | 2023-06 | no | fjord-view |
/// | peru-2022 | Peru | - | 2022-03 | yes | machu-picchu |
pub fn sample_data() -> TripsData {
    TripsData {
        trips: vec![
            Trip {
                title: LocalizedText::new("High Tatras").with(Locale::Sk, "Vysoké Tatry"),
                region: Some("High Tatras".into()),
                featured: true,
                categories: vec![Category::Mountains],
                photos: vec![
                    photo(
                        "tatra-peak.jpg",
                        "Tatra peak",
                        Some("Tatranský štít"),
                        &[Category::Mountains, Category::Landscape],
                    ),
                    photo(
                        "old-town-street.jpg",
                        "Old town street",
                        None,
                        &[Category::City, Category::Culture],
                    ),
                ],
                ..trip("tatras-2024", "Slovakia", "2024-08")
            },
            Trip {
                title: LocalizedText::new("Svalbard").with(Locale::Sk, "Svalbard"),
                region: Some("Svalbard".into()),
                photos: vec![photo(
                    "glacier-lake.jpg",
                    "Glacier lake",
                    Some("Ľadovcové jazero"),
                    &[Category::Nature],
                )],
                ..trip("svalbard-2023", "Norway", "2023-06")
            },
            Trip {
                title: LocalizedText::new("Lofoten Islands").with(Locale::Sk, "Lofoty"),
                region: Some("Lofoten".into()),
                photos: vec![photo(
                    "fjord-view.jpg",
                    "Fjord view",
                    Some("Výhľad na fjord"),
                    &[Category::Nature, Category::Landscape],
                )],
                ..trip("lofoten-2023", "Norway", "2023-06")
            },
            Trip {
                title: LocalizedText::new("Peru").with(Locale::Sk, "Peru"),
                featured: true,
                categories: vec![Category::Culture],
                photos: vec![photo(
                    "machu-picchu.jpg",
                    "Machu Picchu",
                    Some("Machu Picchu"),
                    &[Category::Mountains, Category::Culture],
                )],
                ..trip("peru-2022", "Peru", "2022-03")
            },
        ],
    }
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write a small gradient JPEG so decoders and resizers have real pixels.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    img.save(path).unwrap();
}

/// Write a small PNG with an alpha channel.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 200]));
    img.save(path).unwrap();
}

/// Content directory with `trips.json` from [`sample_data`] and a small JPEG
/// (about 120x80) for every photo.
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let data = sample_data();
    std::fs::write(
        tmp.path().join("trips.json"),
        serde_json::to_string_pretty(&data).unwrap(),
    )
    .unwrap();
    // Distinct sizes keep the files distinct for the content-addressed cache
    let photos = data.trips.iter().flat_map(|t| t.photos.iter().map(move |p| (t, p)));
    for (i, (trip, photo)) in photos.enumerate() {
        write_jpeg(
            &tmp.path().join("photos").join(&trip.id).join(&photo.filename),
            120 + 8 * i as u32,
            80,
        );
    }
    tmp
}

/// Put source images into `photos/<trip>/originals/`.
pub fn setup_originals(root: &Path, trip: &str, files: &[&str]) {
    let dir = root.join("photos").join(trip).join("originals");
    for (i, name) in files.iter().enumerate() {
        let height = 48 + i as u32;
        if name.ends_with(".png") {
            write_png(&dir.join(name), 64, height);
        } else {
            write_jpeg(&dir.join(name), 64, height);
        }
    }
}
