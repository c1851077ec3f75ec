//! HTML generation.
//!
//! Renders the whole site from the content store with [Maud](https://maud.lambda.xyz/).
//! Every page is written once per locale:
//!
//! ```text
//! dist/
//! ├── index.html                 # redirect to /en/
//! ├── 404.html
//! ├── style.css                  # generated color variables + static/style.css
//! ├── nav.js                     # photo page navigation and keys
//! ├── contact.js                 # ?photo= pre-fill
//! ├── photos/<trip>/<file>       # web images (thumbnails come from `process`)
//! └── en/ sk/
//!     ├── index.html             # hero, featured photos, call to action
//!     ├── gallery/index.html     # all photos, newest first
//!     ├── gallery/country-norway/region-lofoten/category-nature/sort-country/index.html
//!     ├── photo/<trip>/<stem>/index.html
//!     ├── about/index.html
//!     ├── contact/index.html
//!     └── contact/sent/index.html
//! ```
//!
//! ## Gallery Views
//!
//! Filtering happens at build time. Each reachable combination of country,
//! region, category and sort order gets its own page at a canonical path
//! built by [`gallery_path`]: segments appear in that fixed order and are
//! omitted when the filter is unset, so `gallery/category-city/` and
//! `gallery/country-peru/sort-country/` are both valid while
//! `gallery/category-city/country-peru/` never exists. Filter controls are
//! plain links between these pages.
//!
//! ## Photo Pages
//!
//! The lightbox is a page per photo. Previous/next follow the default gallery
//! order (newest trip first) and disappear at the ends. Every photo grid
//! carries the path of the page it sits on; when a card is clicked, `nav.js`
//! remembers that page and the grid's order, and the photo page then steps
//! through that list and closes back to it. `nav.js` also maps the arrow
//! keys and Escape onto the same links.

use crate::config::{self, SiteConfig, SiteInfo};
use crate::contact::ContactForm;
use crate::i18n::{self, t, t_count, t_with};
use crate::naming::slugify;
use crate::trips::{GalleryFilter, ShuffleRng, SortKey, TripStore, filter_photos};
use crate::types::{Category, Locale, PhotoView};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Photo not found: {0}")]
    PhotoNotFound(PathBuf),
}

/// What a build wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResult {
    /// Every HTML file, including `index.html` and `404.html` at the root.
    pub pages: usize,
    /// Gallery pages per locale.
    pub gallery_views: usize,
    /// Photo pages per locale.
    pub photo_pages: usize,
    /// Web images copied because they were new or changed.
    pub photos_copied: usize,
    /// Locales that used `about.<locale>.md` instead of the built-in text.
    pub about_markdown: Vec<Locale>,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const NAV_JS: &str = include_str!("../static/nav.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// Query string appended to asset URLs so browsers refetch after a rebuild.
fn asset_version() -> &'static str {
    match env!("GIT_REVISION") {
        "" => env!("CARGO_PKG_VERSION"),
        revision => revision,
    }
}

pub fn generate(
    content_root: &Path,
    output_dir: &Path,
    store: &TripStore,
    config: &SiteConfig,
) -> Result<GenerateResult, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut result = GenerateResult {
        photos_copied: copy_photos(content_root, output_dir, store)?,
        ..GenerateResult::default()
    };

    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    fs::write(output_dir.join("style.css"), css)?;
    fs::write(output_dir.join("nav.js"), NAV_JS)?;
    fs::write(output_dir.join("contact.js"), CONTACT_JS)?;

    let root_redirect = render_redirect(&i18n::localized_path(Locale::default(), "/"));
    fs::write(output_dir.join("index.html"), root_redirect.into_string())?;
    let not_found = render_not_found(&PageContext::new(&config.site, Locale::default(), "/"));
    fs::write(output_dir.join("404.html"), not_found.into_string())?;
    result.pages += 2;

    let views = gallery_views(store);
    // One seed per build so both locales show the same featured order
    let seed = config.featured.shuffle.then(|| {
        config
            .featured
            .seed
            .unwrap_or_else(|| ShuffleRng::from_entropy().next_u64())
    });

    let mut pages = 0;
    for locale in Locale::ALL {
        let locale_dir = output_dir.join(locale.as_str());
        let page = |path: &str| PageContext::new(&config.site, locale, path);
        let mut write = |path: &str, markup: Markup| -> Result<(), GenerateError> {
            let dir = locale_dir.join(path.trim_matches('/'));
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("index.html"), markup.into_string())?;
            pages += 1;
            Ok(())
        };

        let mut rng = seed.map(ShuffleRng::from_seed);
        let featured = store.featured_photos(locale, rng.as_mut());
        write("/", render_home(&page("/"), &featured))?;

        let gallery = GalleryData::new(store, locale);
        for filter in &views {
            let path = gallery_path(filter);
            write(&path, render_gallery(&page(&path), &gallery, filter))?;
        }

        let ordered = filter_photos(&gallery.photos, &GalleryFilter::default());
        for (index, photo) in ordered.iter().enumerate() {
            let path = photo_path(photo);
            write(&path, render_photo_page(&page(&path), &ordered, index))?;
        }

        let about_md = read_about_markdown(content_root, locale)?;
        if about_md.is_some() {
            result.about_markdown.push(locale);
        }
        write("/about/", render_about(&page("/about/"), about_md.as_deref()))?;
        write("/contact/", render_contact(&page("/contact/"), None, None))?;
        write("/contact/sent/", render_contact_sent(&page("/contact/sent/")))?;
    }

    result.pages += pages;
    result.gallery_views = views.len();
    result.photo_pages = store.all_trips().iter().map(|t| t.photos.len()).sum();
    Ok(result)
}

/// Copy web images into `dist/photos/`, skipping files that are up to date.
fn copy_photos(
    content_root: &Path,
    output_dir: &Path,
    store: &TripStore,
) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for trip in store.all_trips() {
        let dest_dir = output_dir.join("photos").join(&trip.id);
        fs::create_dir_all(&dest_dir)?;
        for photo in &trip.photos {
            let src = content_root.join("photos").join(&trip.id).join(&photo.filename);
            if !src.is_file() {
                return Err(GenerateError::PhotoNotFound(src));
            }
            let dest = dest_dir.join(&photo.filename);
            if is_up_to_date(&src, &dest)? {
                continue;
            }
            fs::copy(&src, &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn is_up_to_date(src: &Path, dest: &Path) -> std::io::Result<bool> {
    let Ok(dest_meta) = fs::metadata(dest) else {
        return Ok(false);
    };
    let src_meta = fs::metadata(src)?;
    Ok(src_meta.len() == dest_meta.len() && src_meta.modified()? <= dest_meta.modified()?)
}

fn read_about_markdown(root: &Path, locale: Locale) -> Result<Option<String>, GenerateError> {
    let path = root.join(format!("about.{}.md", locale.as_str()));
    match fs::read_to_string(&path) {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Canonical page path of a gallery view, below the locale prefix.
pub fn gallery_path(filter: &GalleryFilter) -> String {
    let mut path = String::from("/gallery/");
    if let Some(country) = &filter.country {
        path.push_str(&format!("country-{}/", slugify(country)));
    }
    if let Some(region) = &filter.region {
        path.push_str(&format!("region-{}/", slugify(region)));
    }
    if let Some(category) = filter.category {
        path.push_str(&format!("category-{}/", category.as_str()));
    }
    if filter.sort == SortKey::Country {
        path.push_str("sort-country/");
    }
    path
}

/// Every gallery view worth a page.
///
/// Regions only combine with their own country. Categories are the ones that
/// occur in the content, so no view filters on a tag nobody uses.
pub fn gallery_views(store: &TripStore) -> Vec<GalleryFilter> {
    let regions = store.regions_by_country();
    let mut places: Vec<(Option<String>, Option<String>)> = vec![(None, None)];
    for country in store.all_countries() {
        places.push((Some(country.clone()), None));
        for region in regions.get(&country).into_iter().flatten() {
            places.push((Some(country.clone()), Some(region.clone())));
        }
    }

    let categories: Vec<Option<Category>> = std::iter::once(None)
        .chain(store.all_categories().into_iter().map(Some))
        .collect();

    let mut views = Vec::new();
    for (country, region) in &places {
        for category in &categories {
            for sort in SortKey::ALL {
                views.push(GalleryFilter {
                    country: country.clone(),
                    region: region.clone(),
                    category: *category,
                    sort,
                });
            }
        }
    }
    views
}

/// Page path of a photo, below the locale prefix.
pub fn photo_path(photo: &PhotoView) -> String {
    format!("/photo/{}/{}/", photo.trip_id, photo.stem())
}

/// Percent-encode everything outside the URL-unreserved set.
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Encode each segment of an absolute path, keeping the slashes.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Layout
// ============================================================================

/// Where a page lives, plus what every page shares.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub site: &'a SiteInfo,
    pub locale: Locale,
    /// Path below the locale prefix, e.g. `/gallery/`.
    pub path: String,
    /// Copyright year in the footer.
    pub year: i32,
}

impl<'a> PageContext<'a> {
    pub fn new(site: &'a SiteInfo, locale: Locale, path: &str) -> Self {
        Self {
            site,
            locale,
            path: path.to_string(),
            year: chrono::Local::now().year(),
        }
    }

    fn t(&self, key: &'static str) -> &'static str {
        t(self.locale, key)
    }

    /// Localized, URL-encoded link to another page.
    fn href(&self, path: &str) -> String {
        encode_path(&i18n::localized_path(self.locale, path))
    }

    fn section(&self) -> Section {
        match self.path.trim_start_matches('/').split('/').next() {
            Some("") => Section::Home,
            Some("gallery" | "photo") => Section::Gallery,
            Some("about") => Section::About,
            Some("contact") => Section::Contact,
            _ => Section::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    Gallery,
    About,
    Contact,
    Other,
}

const NAV_ITEMS: [(Section, &str, &str); 4] = [
    (Section::Home, "/", "nav.home"),
    (Section::Gallery, "/gallery/", "nav.gallery"),
    (Section::About, "/about/", "nav.about"),
    (Section::Contact, "/contact/", "nav.contact"),
];

/// Renders the base HTML document structure
fn base_document(
    ctx: &PageContext,
    page_title: Option<&str>,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let title = match page_title {
        Some(page) => t_with(
            ctx.locale,
            "metadata.title_template",
            &[("page", page), ("site", &ctx.site.title)],
        ),
        None => ctx.site.title.clone(),
    };
    let description = ctx.t("metadata.description");
    let version = asset_version();

    html! {
        (DOCTYPE)
        html lang=(ctx.locale.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(description);
                meta property="og:type" content="website";
                meta property="og:site_name" content=(ctx.site.title);
                meta property="og:title" content=(title);
                meta property="og:description" content=(description);
                meta property="og:locale" content=(ctx.locale.og_locale());
                @for locale in Locale::ALL {
                    link rel="alternate" hreflang=(locale.as_str())
                        href=(encode_path(&i18n::localized_path(locale, &ctx.path)));
                }
                link rel="stylesheet" href={ "/style.css?v=" (version) };
            }
            body class=[body_class] {
                (site_header(ctx))
                main { (content) }
                (site_footer(ctx))
            }
        }
    }
}

/// Renders the site header with navigation and language switcher
fn site_header(ctx: &PageContext) -> Markup {
    let current = ctx.section();
    let other = ctx.locale.other();
    let switch_href = encode_path(&i18n::switch_locale(
        &i18n::localized_path(ctx.locale, &ctx.path),
        other,
    ));

    html! {
        header.site-header {
            div.container {
                a.brand href=(ctx.href("/")) { (ctx.site.title) }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" aria-label=(ctx.t("nav.menu")) {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                nav.site-nav {
                    ul {
                        @for (section, path, key) in NAV_ITEMS {
                            @let active = section == current;
                            li {
                                a.active[active] href=(ctx.href(path))
                                    aria-current=[active.then_some("page")] { (ctx.t(key)) }
                            }
                        }
                        li {
                            a.language-switcher href=(switch_href) hreflang=(other.as_str())
                                lang=(other.as_str()) title=(ctx.t("nav.language")) {
                                (language_name(other))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A language's name in that language.
fn language_name(locale: Locale) -> &'static str {
    match locale {
        Locale::En => t(locale, "language.en"),
        Locale::Sk => t(locale, "language.sk"),
    }
}

fn site_footer(ctx: &PageContext) -> Markup {
    let year = ctx.year.to_string();
    let copyright = t_with(
        ctx.locale,
        "footer.copyright",
        &[("year", &year), ("author", &ctx.site.author)],
    );

    html! {
        footer.site-footer {
            div.container {
                div.footer-grid {
                    div {
                        h3 { a href=(ctx.href("/")) { (ctx.site.title) } }
                        p.muted { (ctx.t("footer.tagline")) }
                    }
                    div {
                        h3 { (ctx.t("footer.quick_links")) }
                        ul {
                            li { a href=(ctx.href("/gallery/")) { (ctx.t("nav.gallery")) } }
                            li { a href=(ctx.href("/about/")) { (ctx.t("footer.about_me")) } }
                            li { a href=(ctx.href("/contact/")) { (ctx.t("nav.contact")) } }
                        }
                    }
                    div {
                        h3 { (ctx.t("footer.connect")) }
                        ul {
                            li { a href={ "mailto:" (ctx.site.email) } { (ctx.site.email) } }
                            @if let Some(instagram) = &ctx.site.instagram {
                                li {
                                    a href=(instagram) target="_blank" rel="noopener noreferrer" {
                                        "Instagram"
                                    }
                                }
                            }
                        }
                    }
                }
                p.copyright { (copyright) }
            }
        }
    }
}

/// Thumbnail grid linking each photo to its page. `data-back` is where a photo
/// page opened from this grid closes to.
fn photo_grid(ctx: &PageContext, photos: &[PhotoView]) -> Markup {
    html! {
        div.photo-grid data-back=(ctx.href(&ctx.path)) {
            @for photo in photos {
                a.photo-card href=(ctx.href(&photo_path(photo))) {
                    img src=(encode_path(&photo.thumb_src())) alt=(photo.caption) loading="lazy";
                    div.overlay {
                        p.caption { (photo.caption) }
                        p.trip { (photo.trip_title) " · " (photo.country) }
                    }
                }
            }
        }
    }
}

fn category_label(locale: Locale, category: Category) -> &'static str {
    t(locale, category_key(category))
}

fn category_key(category: Category) -> &'static str {
    match category {
        Category::Animals => "categories.animals",
        Category::City => "categories.city",
        Category::Culture => "categories.culture",
        Category::Landscape => "categories.landscape",
        Category::Mountains => "categories.mountains",
        Category::Nature => "categories.nature",
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Plain redirect document for the bare domain.
fn render_redirect(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (target) };
                link rel="canonical" href=(target);
                title { (t(Locale::En, "redirect.text")) }
            }
            body {
                a href=(target) { (t(Locale::En, "redirect.text")) }
            }
        }
    }
}

fn render_home(ctx: &PageContext, featured: &[PhotoView]) -> Markup {
    let content = html! {
        section.hero {
            div.container {
                h1 {
                    (ctx.t("home.hero.title"))
                    span.highlight { (ctx.t("home.hero.title_highlight")) }
                }
                p { (ctx.t("home.hero.description")) }
                div.actions {
                    a.button href=(ctx.href("/gallery/")) { (ctx.t("home.hero.browse_gallery")) " →" }
                    a.button.outline href=(ctx.href("/about/")) { (ctx.t("home.hero.about_me")) }
                }
            }
        }
        section.featured {
            div.container {
                div.section-heading {
                    div {
                        h2 { (ctx.t("home.featured.title")) }
                        p { (ctx.t("home.featured.description")) }
                    }
                    a href=(ctx.href("/gallery/")) { (ctx.t("home.featured.view_all")) " →" }
                }
                (photo_grid(ctx, featured))
            }
        }
        script src={ "/nav.js?v=" (asset_version()) } defer {}
        section.cta {
            div.container {
                h2 { (ctx.t("home.cta.title")) }
                p { (ctx.t("home.cta.description")) }
                a.button href=(ctx.href("/contact/")) { (ctx.t("home.cta.get_in_touch")) }
            }
        }
    };

    base_document(ctx, None, None, content)
}

/// Per-locale inputs shared by every gallery view.
struct GalleryData {
    photos: Vec<PhotoView>,
    countries: Vec<String>,
    categories: Vec<Category>,
    regions: BTreeMap<String, Vec<String>>,
}

impl GalleryData {
    fn new(store: &TripStore, locale: Locale) -> Self {
        Self {
            photos: store.all_photos(locale),
            countries: store.all_countries(),
            categories: store.all_categories(),
            regions: store.regions_by_country(),
        }
    }
}

fn filter_chip(ctx: &PageContext, target: &GalleryFilter, label: &str, selected: bool) -> Markup {
    html! {
        a.chip.selected[selected] href=(ctx.href(&gallery_path(target)))
            aria-current=[selected.then_some("page")] { (label) }
    }
}

fn render_gallery(ctx: &PageContext, data: &GalleryData, filter: &GalleryFilter) -> Markup {
    let photos = filter_photos(&data.photos, filter);
    let regions: &[String] = filter
        .country
        .as_ref()
        .and_then(|c| data.regions.get(c))
        .map(Vec::as_slice)
        .unwrap_or_default();
    let cleared = GalleryFilter {
        sort: filter.sort,
        ..GalleryFilter::default()
    };
    let secondary_open =
        filter.region.is_some() || filter.category.is_some() || filter.sort != SortKey::Date;
    let count = if filter.is_active() {
        t_count(ctx.locale, "gallery.photos_filtered", photos.len())
    } else {
        t_count(ctx.locale, "gallery.photos", photos.len())
    };
    let all = ctx.t("gallery.all");

    let content = html! {
        div.container {
            header.page-header {
                h1 { (ctx.t("gallery.title")) }
                p { (ctx.t("gallery.description")) }
            }
            div.filters {
                div.filter-group {
                    span.filter-label { (ctx.t("gallery.country")) }
                    div.chips {
                        // Changing country always resets the region
                        (filter_chip(ctx, &GalleryFilter { country: None, region: None, ..filter.clone() }, all, filter.country.is_none()))
                        @for country in &data.countries {
                            (filter_chip(
                                ctx,
                                &GalleryFilter { country: Some(country.clone()), region: None, ..filter.clone() },
                                country,
                                filter.country.as_ref() == Some(country),
                            ))
                        }
                    }
                }
                details open[secondary_open] {
                    summary { (ctx.t("gallery.show_all_filters")) }
                    @if !regions.is_empty() {
                        div.filter-group {
                            span.filter-label { (ctx.t("gallery.region")) }
                            div.chips {
                                (filter_chip(ctx, &GalleryFilter { region: None, ..filter.clone() }, all, filter.region.is_none()))
                                @for region in regions {
                                    (filter_chip(
                                        ctx,
                                        &GalleryFilter { region: Some(region.clone()), ..filter.clone() },
                                        region,
                                        filter.region.as_ref() == Some(region),
                                    ))
                                }
                            }
                        }
                    }
                    div.filter-group {
                        span.filter-label { (ctx.t("gallery.category")) }
                        div.chips {
                            (filter_chip(ctx, &GalleryFilter { category: None, ..filter.clone() }, all, filter.category.is_none()))
                            @for category in &data.categories {
                                (filter_chip(
                                    ctx,
                                    &GalleryFilter { category: Some(*category), ..filter.clone() },
                                    category_label(ctx.locale, *category),
                                    filter.category == Some(*category),
                                ))
                            }
                        }
                    }
                    div.filter-group {
                        span.filter-label { (ctx.t("gallery.sort_by")) }
                        div.chips {
                            (filter_chip(ctx, &GalleryFilter { sort: SortKey::Date, ..filter.clone() }, ctx.t("gallery.sort.date"), filter.sort == SortKey::Date))
                            (filter_chip(ctx, &GalleryFilter { sort: SortKey::Country, ..filter.clone() }, ctx.t("gallery.sort.country"), filter.sort == SortKey::Country))
                        }
                    }
                }
                @if filter.is_active() {
                    a.clear-filters href=(ctx.href(&gallery_path(&cleared))) { "× " (ctx.t("gallery.clear_filters")) }
                }
            }
            p.result-count { (count) }
            @if photos.is_empty() {
                div.empty-state {
                    p { (ctx.t("gallery.no_photos")) }
                    a href=(ctx.href(&gallery_path(&cleared))) { (ctx.t("gallery.clear_filters")) }
                }
            } @else {
                (photo_grid(ctx, &photos))
            }
        }
        script src={ "/nav.js?v=" (asset_version()) } defer {}
    };

    base_document(ctx, Some(ctx.t("gallery.title")), None, content)
}

/// Renders a photo page. `photos` is the gallery order, `index` the photo's position in it.
fn render_photo_page(ctx: &PageContext, photos: &[PhotoView], index: usize) -> Markup {
    let photo = &photos[index];
    let prev = index.checked_sub(1).map(|i| ctx.href(&photo_path(&photos[i])));
    let next = photos.get(index + 1).map(|p| ctx.href(&photo_path(p)));
    let close = ctx.href("/gallery/");
    let contact = format!(
        "{}?photo={}",
        ctx.href("/contact/"),
        encode_component(&photo.filename)
    );
    let counter = t_with(
        ctx.locale,
        "lightbox.counter",
        &[
            ("current", &(index + 1).to_string()),
            ("total", &photos.len().to_string()),
        ],
    );

    let content = html! {
        div.lightbox-frame {
            a.lightbox-close href=(close) title=(ctx.t("lightbox.close")) {
                "×" span.visually-hidden { (ctx.t("lightbox.close")) }
            }
            @if let Some(prev) = &prev {
                a.lightbox-prev href=(prev) rel="prev" title=(ctx.t("lightbox.previous")) {
                    "‹" span.visually-hidden { (ctx.t("lightbox.previous")) }
                }
            }
            img src=(encode_path(&photo.src)) alt=(photo.caption);
            @if let Some(next) = &next {
                a.lightbox-next href=(next) rel="next" title=(ctx.t("lightbox.next")) {
                    "›" span.visually-hidden { (ctx.t("lightbox.next")) }
                }
            }
        }
        div.container.lightbox-info {
            div {
                h1 { (photo.caption) }
                p.trip { (photo.trip_title) " · " (photo.country) " · " (photo.date) }
                div.chips {
                    @for category in &photo.categories {
                        span.chip { (category_label(ctx.locale, *category)) }
                    }
                }
            }
            a.button href=(contact) { "✉ " (ctx.t("lightbox.request_full_res")) }
        }
        p.counter data-template=(ctx.t("lightbox.counter")) { (counter) }
        div.nav-zones data-prev=[prev.as_deref()] data-next=[next.as_deref()] data-close=(close) {}
        script src={ "/nav.js?v=" (asset_version()) } defer {}
    };

    base_document(ctx, Some(&photo.caption), Some("lightbox"), content)
}

fn render_about(ctx: &PageContext, markdown: Option<&str>) -> Markup {
    let body = match markdown {
        Some(markdown) => {
            let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
            let mut body_html = String::new();
            md_html::push_html(&mut body_html, parser);
            html! { (PreEscaped(body_html)) }
        }
        None => html! {
            p.lead.muted { (ctx.t("about.professional.intro")) }
            p.muted { (ctx.t("about.professional.experience")) }
            h3 { (ctx.t("about.professional.what_i_do_title")) }
            ul.muted {
                li { (ctx.t("about.professional.what_i_do_1")) }
                li { (ctx.t("about.professional.what_i_do_2")) }
                li { (ctx.t("about.professional.what_i_do_3")) }
            }
            h3 { (ctx.t("about.professional.approach_title")) }
            p.muted { (ctx.t("about.professional.approach")) }
            p.muted {
                strong { (ctx.t("about.professional.languages_title")) ":" }
                " " (ctx.t("about.professional.languages"))
            }
            details {
                summary.button.outline { (ctx.t("about.know_me_better")) }
                div.muted {
                    p { (ctx.t("about.personal.hobbies")) }
                    p { (ctx.t("about.personal.home")) }
                    p { (ctx.t("about.personal.prints")) }
                }
            }
        },
    };

    let content = html! {
        div.container.narrow {
            header.page-header {
                h1 { (ctx.t("about.title")) }
                p { (ctx.t("about.greeting")) }
            }
            article.about-content {
                (body)
                section.about-contact {
                    h2 { (ctx.t("about.contact.title")) }
                    p.muted { (ctx.t("about.contact.description")) }
                    form.contact-form method="post" action="/api/contact" {
                        input type="hidden" name="locale" value=(ctx.locale.as_str());
                        input type="hidden" name="subject" value="Contact from About page";
                        (text_field(ctx, "about-name", "name", "contact.form.name", "text", None, true))
                        (text_field(ctx, "about-email", "email", "contact.form.email", "email", None, true))
                        (message_field(ctx, "about-message", None))
                        button.button type="submit" { (ctx.t("contact.form.send")) }
                    }
                }
            }
        }
    };

    base_document(ctx, Some(ctx.t("about.title")), None, content)
}

fn required_marker(ctx: &PageContext) -> Markup {
    html! { " " span.required { (ctx.t("contact.form.required")) } }
}

fn text_field(
    ctx: &PageContext,
    id: &str,
    name: &str,
    label: &'static str,
    kind: &str,
    value: Option<&str>,
    required: bool,
) -> Markup {
    html! {
        div.field {
            label for=(id) {
                (ctx.t(label))
                @if required { (required_marker(ctx)) }
            }
            input type=(kind) id=(id) name=(name) value=[value] required[required]
                placeholder=(if kind == "email" { "your@email.com" } else { ctx.t(label) });
        }
    }
}

fn message_field(ctx: &PageContext, id: &str, value: Option<&str>) -> Markup {
    html! {
        div.field {
            label for=(id) { (ctx.t("contact.form.message")) (required_marker(ctx)) }
            textarea id=(id) name="message" rows="5" required
                placeholder=(ctx.t("contact.form.message_placeholder")) { (value.unwrap_or_default()) }
        }
    }
}

/// Renders the contact page.
///
/// `form` and `error` are set when a no-JavaScript submission failed
/// validation and the page is shown again with the user's input.
pub fn render_contact(ctx: &PageContext, form: Option<&ContactForm>, error: Option<&str>) -> Markup {
    let value = |get: fn(&ContactForm) -> Option<&str>| form.and_then(get).filter(|v| !v.is_empty());

    let content = html! {
        div.container.narrow {
            header.page-header {
                h1 { (ctx.t("contact.title")) }
                p { (ctx.t("contact.description")) }
            }
            div.info-cards {
                div.info-card {
                    h3 { (ctx.t("contact.email")) }
                    p { (ctx.t("contact.email_desc")) }
                }
                div.info-card {
                    h3 { (ctx.t("contact.photo_purchases")) }
                    p { (ctx.t("contact.photo_purchases_desc")) }
                }
                div.info-card {
                    h3 { (ctx.t("contact.response_time")) }
                    p { (ctx.t("contact.response_time_desc")) }
                }
            }
            div.form-card {
                form.contact-form method="post" action="/api/contact" {
                    @if let Some(error) = error {
                        p.form-error role="alert" { (error) }
                    }
                    input type="hidden" name="locale" value=(ctx.locale.as_str());
                    (text_field(ctx, "contact-name", "name", "contact.form.name", "text", value(|f| Some(f.name.as_str())), true))
                    (text_field(ctx, "contact-email", "email", "contact.form.email", "email", value(|f| Some(f.email.as_str())), true))
                    div.field {
                        label for="contact-subject" { (ctx.t("contact.form.subject")) }
                        input type="text" id="contact-subject" name="subject"
                            value=[value(|f| f.subject.as_deref())]
                            placeholder=(ctx.t("contact.form.subject_placeholder"));
                    }
                    div.field {
                        label for="contact-photo" { (ctx.t("contact.form.photo_reference")) }
                        input type="text" id="contact-photo" name="photoReference"
                            value=[value(|f| f.photo_reference.as_deref())]
                            placeholder=(ctx.t("contact.form.photo_reference_placeholder"));
                        p.hint id="contact-photo-hint" hidden { (ctx.t("contact.form.photo_reference_prefilled")) }
                    }
                    (message_field(ctx, "contact-message", value(|f| Some(f.message.as_str()))))
                    button.button type="submit" { (ctx.t("contact.form.send")) }
                }
            }
            p.purchase-info {
                strong { (ctx.t("contact.photo_purchases")) ":" }
                " " (ctx.t("contact.purchase_info"))
            }
        }
        script src={ "/contact.js?v=" (asset_version()) } defer {}
    };

    base_document(ctx, Some(ctx.t("contact.title")), None, content)
}

fn render_contact_sent(ctx: &PageContext) -> Markup {
    let content = html! {
        div.container.narrow.success {
            h1 { "✓ " (ctx.t("contact.success.title")) }
            p.muted { (ctx.t("contact.success.description")) }
            a.button.outline href=(ctx.href("/contact/")) { (ctx.t("contact.success.send_another")) }
        }
    };

    base_document(ctx, Some(ctx.t("contact.success.title")), None, content)
}

fn render_not_found(ctx: &PageContext) -> Markup {
    let content = html! {
        div.container.narrow.success {
            h1 { (ctx.t("errors.not_found.title")) }
            p.muted { (ctx.t("errors.not_found.description")) }
            @for locale in Locale::ALL {
                a.button.outline href=(i18n::localized_path(locale, "/")) lang=(locale.as_str()) {
                    (t(locale, "errors.not_found.home"))
                }
                " "
            }
        }
    };

    base_document(ctx, Some(ctx.t("errors.not_found.title")), None, content)
}

// ============================================================================
// Tests
// ============================================================================
