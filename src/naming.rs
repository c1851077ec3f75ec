//! Filename conventions for the offline tooling.
//!
//! Source images are named descriptively (`mountain_sunset.jpg`,
//! `old-town-market.png`). The `add-trip` command turns those names into
//! captions and category guesses, and trip directory names into titles:
//!
//! - `mountain_sunset.jpg` → caption "Mountain Sunset", categories `[mountains, landscape]`
//! - `peru-2024` → title "Peru 2024"
//!
//! Slugs for gallery filter URLs live here too, since they follow the same
//! "name in, URL-safe text out" shape.

use crate::types::Category;
use std::path::Path;

/// Supported source image extensions (lowercase, no dot).
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Keyword → category table. A stem containing the keyword gets the category.
/// Table order decides the order of derived categories.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("mountain", Category::Mountains),
    ("peak", Category::Mountains),
    ("summit", Category::Mountains),
    ("hill", Category::Mountains),
    ("volcano", Category::Mountains),
    ("city", Category::City),
    ("street", Category::City),
    ("building", Category::City),
    ("urban", Category::City),
    ("tower", Category::City),
    ("skyline", Category::City),
    ("animal", Category::Animals),
    ("bird", Category::Animals),
    ("elephant", Category::Animals),
    ("monkey", Category::Animals),
    ("chimp", Category::Animals),
    ("lion", Category::Animals),
    ("tiger", Category::Animals),
    ("fish", Category::Animals),
    ("whale", Category::Animals),
    ("dog", Category::Animals),
    ("cat", Category::Animals),
    ("horse", Category::Animals),
    ("cow", Category::Animals),
    ("deer", Category::Animals),
    ("bear", Category::Animals),
    ("forest", Category::Nature),
    ("tree", Category::Nature),
    ("flower", Category::Nature),
    ("plant", Category::Nature),
    ("jungle", Category::Nature),
    ("river", Category::Nature),
    ("waterfall", Category::Nature),
    ("lake", Category::Nature),
    ("ocean", Category::Nature),
    ("beach", Category::Nature),
    ("sea", Category::Nature),
    ("landscape", Category::Landscape),
    ("view", Category::Landscape),
    ("panorama", Category::Landscape),
    ("sunset", Category::Landscape),
    ("sunrise", Category::Landscape),
    ("sky", Category::Landscape),
    ("cloud", Category::Landscape),
    ("field", Category::Landscape),
    ("valley", Category::Landscape),
    ("temple", Category::Culture),
    ("church", Category::Culture),
    ("mosque", Category::Culture),
    ("market", Category::Culture),
    ("festival", Category::Culture),
    ("traditional", Category::Culture),
    ("local", Category::Culture),
    ("people", Category::Culture),
    ("portrait", Category::Culture),
    ("worker", Category::Culture),
    ("fisherman", Category::Culture),
];

/// File stem: name without directory or final extension.
pub fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Letters, digits and `_` belong to one word.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercase the first character of every word.
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word_char(c);
    }
    out
}

/// `"mountain_sunset.jpg"` → `"Mountain Sunset"`.
pub fn filename_to_caption(filename: &str) -> String {
    let spaced = file_stem(filename).replace(['-', '_'], " ");
    capitalize_words(&spaced).trim().to_string()
}

/// `"peru-2024"` → `"Peru 2024"`. Underscores are kept.
pub fn trip_name_to_title(trip_name: &str) -> String {
    capitalize_words(&trip_name.replace('-', " "))
}

/// Guess categories from keywords in the filename.
///
/// Falls back to `[Landscape]` when nothing matches.
pub fn derive_categories(filename: &str) -> Vec<Category> {
    let stem = file_stem(filename).to_lowercase();
    let mut categories = Vec::new();
    for (keyword, category) in CATEGORY_KEYWORDS {
        if stem.contains(keyword) && !categories.contains(category) {
            categories.push(*category);
        }
    }
    if categories.is_empty() {
        categories.push(Category::Landscape);
    }
    categories
}

/// Web output name for a source image: same stem, `.jpg` extension.
pub fn output_filename(original: &str) -> String {
    format!("{}.jpg", file_stem(original))
}

/// Check whether a path has a supported source image extension.
pub fn is_supported_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// URL-safe slug: lowercase ASCII alphanumerics separated by single dashes.
///
/// Common Latin diacritics are folded (`Slovensko - Tatry` → `slovensko-tatry`,
/// `České Švýcarsko` → `ceske-svycarsko`).
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(fold_diacritic) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_diacritic(c: char) -> Vec<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'č' | 'ç' | 'ć' | 'Č' | 'Ç' | 'Ć' => 'c',
        'ď' | 'Ď' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ě' | 'É' | 'È' | 'Ê' | 'Ë' | 'Ě' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ĺ' | 'ľ' | 'ł' | 'Ĺ' | 'Ľ' | 'Ł' => 'l',
        'ñ' | 'ň' | 'ń' | 'Ñ' | 'Ň' | 'Ń' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => 'o',
        'ŕ' | 'ř' | 'Ŕ' | 'Ř' => 'r',
        'š' | 'ś' | 'Š' | 'Ś' => 's',
        'ť' | 'Ť' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ů' => 'u',
        'ý' | 'ÿ' | 'Ý' => 'y',
        'ž' | 'ź' | 'ż' | 'Ž' | 'Ź' | 'Ż' => 'z',
        'ß' => return vec!['s', 's'],
        other => other,
    };
    vec![folded]
}
