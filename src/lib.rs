//! # Travel Folio
//!
//! A static site generator for a bilingual (English / Slovak) travel
//! photography portfolio, plus the small HTTP server that hosts it and
//! accepts contact form submissions.
//!
//! # Architecture
//!
//! `trips.json` is the single source of content. Everything else is derived:
//!
//! ```text
//! photos/<trip>/originals/  →  watermark   →  photos/<trip>/*.jpg   (web images)
//!                           →  add-trip    →  trips.json entry
//! trips.json + photos/      →  build       →  dist/{en,sk}/…        (static HTML)
//! dist/                     →  serve       →  HTTP + POST /api/contact
//! ```
//!
//! `build` runs two steps: [`process`] renders grid thumbnails into the
//! output tree, then [`generate`] copies the web images and writes every
//! page once per locale. Gallery filters (country, region, category, sort)
//! are pre-rendered at canonical paths, so the site works without JavaScript.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`trips`] | Loads and validates `trips.json`; queries, filtering, featured shuffle |
//! | [`types`] | Content types (`Trip`, `Photo`, `Category`) and the `Locale` enum |
//! | [`i18n`] | Message catalogs, localized paths, `Accept-Language` negotiation |
//! | [`generate`] | Renders every page with Maud |
//! | [`process`] | Grid thumbnails, in parallel, with caching |
//! | [`watermark`] | Resizes and watermarks a trip's originals into web images |
//! | [`add_trip`] | `watermark` plus a new or updated `trips.json` entry |
//! | [`placeholders`] | Solid-color stand-ins for missing photos |
//! | [`contact`] | Contact form validation and the submission sink |
//! | [`server`] | axum router: static files, locale redirects, contact API |
//! | [`config`] | `config.toml` loading, validation, and CSS generation |
//! | [`cache`] | Content-addressed manifest so unchanged images are not re-encoded |
//! | [`imaging`] | Pure-Rust image operations behind a mockable backend trait |
//! | [`naming`] | Captions, categories, and slugs derived from file names |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Locale In The Path
//!
//! Every page lives under `/en/` or `/sk/`. Un-prefixed requests are
//! redirected by the server using `Accept-Language`; the static root
//! `index.html` falls back to English for hosts without the server. Pages in
//! the two locales differ only in text, so switching language keeps the
//! current gallery filter and photo.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error and all interpolation is escaped. No template files
//! ship alongside the binary; the stylesheet and scripts are embedded with
//! `include_str!`.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, Lanczos3
//! resizing and JPEG encoding, and `ab_glyph` for text watermarks. No system
//! libraries are needed.

pub mod add_trip;
pub mod cache;
pub mod config;
pub mod contact;
pub mod generate;
pub mod i18n;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod placeholders;
pub mod process;
pub mod server;
pub mod trips;
pub mod types;
pub mod watermark;

#[cfg(test)]
pub(crate) mod test_helpers;
