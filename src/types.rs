//! Content model shared by the query layer, the renderers and the offline tools.
//!
//! These types mirror `trips.json` one-to-one. Serialization must stay
//! compatible with hand-edited files, so optional fields are skipped when
//! empty and localized strings accept both the object form and a bare string.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Sk,
}

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Sk];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Sk => "sk",
        }
    }

    /// Parse a locale tag, case-insensitive, ignoring any region suffix
    /// (`sk-SK`, `en_GB`).
    pub fn parse(value: &str) -> Option<Self> {
        let lang = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::En),
            "sk" => Some(Locale::Sk),
            _ => None,
        }
    }

    /// The locale the language switcher points to.
    pub fn other(self) -> Self {
        match self {
            Locale::En => Locale::Sk,
            Locale::Sk => Locale::En,
        }
    }

    /// Open Graph locale tag.
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Sk => "sk_SK",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string with per-locale variants.
///
/// Resolution falls back to English when the requested locale is missing or
/// blank, so partially translated content still renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new(en: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Locale::En, en.into());
        Self(map)
    }

    pub fn with(mut self, locale: Locale, text: impl Into<String>) -> Self {
        self.0.insert(locale, text.into());
        self
    }

    pub fn get(&self, locale: Locale) -> &str {
        self.0
            .get(&locale)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.0.get(&Locale::En))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Map(BTreeMap<Locale, String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Plain(s) => LocalizedText::new(s),
            Repr::Map(map) => LocalizedText(map),
        })
    }
}

/// Descriptive tag used for filtering.
///
/// Variants are declared in alphabetical order of their serialized names, so
/// the derived `Ord` matches a plain string sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Animals,
    City,
    Culture,
    Landscape,
    Mountains,
    Nature,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Animals,
        Category::City,
        Category::Culture,
        Category::Landscape,
        Category::Mountains,
        Category::Nature,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::City => "city",
            Category::Culture => "culture",
            Category::Landscape => "landscape",
            Category::Mountains => "mountains",
            Category::Nature => "nature",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub filename: String,
    pub caption: LocalizedText,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub title: LocalizedText,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// `YYYY-MM`; compared as a string for sorting.
    pub date: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Root of `trips.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripsData {
    pub trips: Vec<Trip>,
}

/// A photo joined with its trip and resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoView {
    pub filename: String,
    pub caption: String,
    pub categories: Vec<Category>,
    pub trip_id: String,
    pub trip_title: String,
    pub country: String,
    pub region: Option<String>,
    pub date: String,
    /// Public URL of the web-sized image.
    pub src: String,
}

impl PhotoView {
    pub fn from_trip(trip: &Trip, photo: &Photo, locale: Locale) -> Self {
        Self {
            filename: photo.filename.clone(),
            caption: photo.caption.get(locale).to_string(),
            categories: photo.categories.clone(),
            trip_id: trip.id.clone(),
            trip_title: trip.title.get(locale).to_string(),
            country: trip.country.clone(),
            region: trip.region.clone(),
            date: trip.date.clone(),
            src: format!("/photos/{}/{}", trip.id, photo.filename),
        }
    }

    /// Filename without its extension, used in page URLs. Same stem that
    /// `trips.json` validation deduplicates on.
    pub fn stem(&self) -> &str {
        crate::naming::file_stem(&self.filename)
    }

    /// Public URL of the grid thumbnail generated next to the photo.
    pub fn thumb_src(&self) -> String {
        format!("/photos/{}/{}-thumb.jpg", self.trip_id, self.stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parse_accepts_region_tags() {
        assert_eq!(Locale::parse("sk-SK"), Some(Locale::Sk));
        assert_eq!(Locale::parse("EN_gb"), Some(Locale::En));
        assert_eq!(Locale::parse("de"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn locale_other_toggles() {
        assert_eq!(Locale::En.other(), Locale::Sk);
        assert_eq!(Locale::Sk.other(), Locale::En);
    }

    #[test]
    fn localized_text_falls_back_to_english() {
        let text = LocalizedText::new("Sunset").with(Locale::Sk, "  ");
        assert_eq!(text.get(Locale::Sk), "Sunset");
        let text = LocalizedText::new("Sunset").with(Locale::Sk, "Západ slnka");
        assert_eq!(text.get(Locale::Sk), "Západ slnka");
        assert_eq!(text.get(Locale::En), "Sunset");
    }

    #[test]
    fn localized_text_accepts_plain_string() {
        let text: LocalizedText = serde_json::from_str(r#""Glacier""#).unwrap();
        assert_eq!(text.get(Locale::Sk), "Glacier");
    }

    #[test]
    fn localized_text_serializes_as_object() {
        let text = LocalizedText::new("A").with(Locale::Sk, "B");
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"en":"A","sk":"B"}"#);
    }

    #[test]
    fn category_order_matches_names() {
        let mut names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        let ordered: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ordered);
    }

    #[test]
    fn unknown_category_rejected() {
        let result: Result<Category, _> = serde_json::from_str(r#""food""#);
        assert!(result.is_err());
    }

    #[test]
    fn photo_view_paths() {
        let trip = Trip {
            id: "peru-2024".into(),
            title: LocalizedText::new("Peru 2024"),
            country: "Peru".into(),
            region: None,
            date: "2024-03".into(),
            featured: false,
            categories: vec![],
            photos: vec![],
        };
        let photo = Photo {
            filename: "machu.picchu.jpg".into(),
            caption: LocalizedText::new("Machu Picchu"),
            categories: vec![Category::Mountains],
        };
        let view = PhotoView::from_trip(&trip, &photo, Locale::En);
        assert_eq!(view.src, "/photos/peru-2024/machu.picchu.jpg");
        assert_eq!(view.stem(), "machu.picchu");
        assert_eq!(view.thumb_src(), "/photos/peru-2024/machu.picchu-thumb.jpg");
    }

    #[test]
    fn photo_view_stem_matches_naming() {
        let trip = Trip {
            id: "t".into(),
            title: LocalizedText::new("T"),
            country: "Peru".into(),
            region: None,
            date: "2024-03".into(),
            featured: false,
            categories: vec![],
            photos: vec![],
        };
        for filename in ["lake.jpg", ".hidden", "noext", "a.b.png"] {
            let photo = Photo {
                filename: filename.into(),
                caption: LocalizedText::new("x"),
                categories: vec![],
            };
            let view = PhotoView::from_trip(&trip, &photo, Locale::En);
            assert_eq!(view.stem(), crate::naming::file_stem(filename), "{filename}");
        }
    }
}
