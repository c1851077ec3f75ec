//! Content-addressed cache for image outputs.
//!
//! Decoding a full-size original, resizing it with Lanczos3 and rasterizing
//! a watermark takes far longer than anything else the tools do. This module
//! lets the watermark tool and the thumbnail stage skip that work when the
//! source image and the render parameters haven't changed since the last run.
//!
//! ## Cache keys
//!
//! Lookups are by the combination of `source_hash` and `params_hash`, not by
//! output path. Renaming a trip or an output file does not invalidate the
//! cache; only image content or parameter changes do.
//!
//! - **`source_hash`**: SHA-256 of the source file contents. Content-based
//!   rather than mtime-based so it survives `git checkout`.
//!
//! - **`params_hash`**: SHA-256 of the render parameters. For web images this
//!   covers the final size, quality and the whole watermark (including a hash
//!   of the font or mark file). For thumbnails it covers aspect ratio, short
//!   edge, quality and sharpening.
//!
//! A cache hit requires a matching entry **and** the previously written file
//! still on disk. When the stored path differs from the requested one, the
//! cached file is copied instead of re-rendered.
//!
//! ## Storage
//!
//! The manifest is a JSON file named `.cache-manifest.json` in the directory
//! the entry paths are relative to: `content/photos/` for watermarked images,
//! `dist/` for thumbnails.

use crate::imaging::{MarkKind, RenderParams};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the cache root.
const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate all existing caches when the key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk cache manifest mapping output paths to their cache entries.
///
/// Lookups go through a runtime `content_index` that maps
/// `"{source_hash}:{params_hash}"` to the stored output path.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
    /// Built at load time, maintained on insert. Never serialized.
    #[serde(skip)]
    content_index: HashMap<String, String>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or the first run).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            content_index: HashMap::new(),
        }
    }

    /// Load from `root`. Returns an empty manifest if the file doesn't exist
    /// or can't be parsed (version mismatch, corruption).
    pub fn load(root: &Path) -> Self {
        let path = manifest_path(root);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let mut manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest.content_index = build_content_index(&manifest.entries);
        manifest
    }

    /// Load unless `use_cache` is false, in which case start empty.
    pub fn load_or_empty(root: &Path, use_cache: bool) -> Self {
        if use_cache {
            Self::load(root)
        } else {
            Self::empty()
        }
    }

    pub fn save(&self, root: &Path) -> io::Result<()> {
        std::fs::create_dir_all(root)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(root), json)
    }

    /// Look up a cached output file by content hashes.
    ///
    /// Returns the stored path (relative to `root`) when an entry matches
    /// **and** the file is still on disk.
    pub fn find_cached(&self, source_hash: &str, params_hash: &str, root: &Path) -> Option<String> {
        let content_key = format!("{}:{}", source_hash, params_hash);
        let stored_path = self.content_index.get(&content_key)?;
        if root.join(stored_path).exists() {
            Some(stored_path.clone())
        } else {
            None
        }
    }

    /// Record a cache entry for an output file.
    ///
    /// An older entry with the same content under a different path is dropped.
    pub fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        let content_key = format!("{}:{}", source_hash, params_hash);

        if let Some(old_path) = self.content_index.get(&content_key)
            && *old_path != output_path
        {
            self.entries.remove(old_path.as_str());
        }

        self.content_index.insert(content_key, output_path.clone());
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }

    /// Try to satisfy `output_path` from the cache.
    ///
    /// Returns `Cached` when the stored file is already at `output_path`,
    /// `Copied` after copying it there from an older path, and `None` on a
    /// miss. A hit is recorded under `output_path`.
    pub fn reuse(
        &mut self,
        source_hash: &str,
        params_hash: &str,
        root: &Path,
        output_path: &str,
    ) -> io::Result<Option<VariantStatus>> {
        let Some(stored) = self.find_cached(source_hash, params_hash, root) else {
            return Ok(None);
        };
        let status = if stored == output_path {
            VariantStatus::Cached
        } else {
            let target = root.join(output_path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(root.join(&stored), &target)?;
            VariantStatus::Copied
        };
        self.insert(
            output_path.to_string(),
            source_hash.to_string(),
            params_hash.to_string(),
        );
        Ok(Some(status))
    }
}

/// How an output file came to exist in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    /// Existing file reused in place.
    Cached,
    /// Reused from a different path.
    Copied,
    /// Freshly rendered.
    Encoded,
}

impl VariantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cached => "cached",
            Self::Copied => "copied",
            Self::Encoded => "encoded",
        }
    }
}

fn build_content_index(entries: &HashMap<String, CacheEntry>) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(output_path, entry)| {
            let content_key = format!("{}:{}", entry.source_hash, entry.params_hash);
            (content_key, output_path.clone())
        })
        .collect()
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of a web image render.
///
/// `mark_file_hash` is the content hash of the font or mark image, so
/// swapping the file behind an unchanged path still invalidates.
pub fn hash_render_params(params: &RenderParams, mark_file_hash: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"render\0");
    hasher.update(params.width.to_le_bytes());
    hasher.update(params.height.to_le_bytes());
    hasher.update(params.quality.value().to_le_bytes());
    match &params.watermark {
        Some(mark) => {
            match &mark.kind {
                MarkKind::Text { text, .. } => {
                    hasher.update(b"\x01text\0");
                    hasher.update(text.as_bytes());
                    hasher.update(b"\0");
                }
                MarkKind::Image(_) => hasher.update(b"\x01image\0"),
            }
            hasher.update(mark.font_size.to_le_bytes());
            hasher.update(mark.opacity.to_le_bytes());
            hasher.update(mark.padding.to_le_bytes());
            hasher.update(mark_file_hash.unwrap_or("").as_bytes());
        }
        None => hasher.update(b"\x00"),
    }
    format!("{:x}", hasher.finalize())
}

/// SHA-256 hash of encoding parameters for a thumbnail.
pub fn hash_thumbnail_params(
    aspect: (u32, u32),
    short_edge: u32,
    quality: u32,
    sharpening: Option<(f32, i32)>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    hasher.update(aspect.0.to_le_bytes());
    hasher.update(aspect.1.to_le_bytes());
    hasher.update(short_edge.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    match sharpening {
        Some((sigma, threshold)) => {
            hasher.update(b"\x01");
            hasher.update(sigma.to_le_bytes());
            hasher.update(threshold.to_le_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn record(&mut self, status: VariantStatus) {
        match status {
            VariantStatus::Cached => self.hits += 1,
            VariantStatus::Copied => self.copies += 1,
            VariantStatus::Encoded => self.misses += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 || self.copies > 0 {
            if self.copies > 0 {
                write!(
                    f,
                    "{} cached, {} copied, {} encoded ({} total)",
                    self.hits,
                    self.copies,
                    self.misses,
                    self.total()
                )
            } else {
                write!(
                    f,
                    "{} cached, {} encoded ({} total)",
                    self.hits,
                    self.misses,
                    self.total()
                )
            }
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}

/// Resolve the cache manifest path for a cache root.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Quality, Watermark};
    use std::fs;
    use tempfile::TempDir;

    fn render(width: u32, watermark: Option<Watermark>) -> RenderParams {
        RenderParams {
            source: "/in.jpg".into(),
            output: "/out.jpg".into(),
            width,
            height: 600,
            quality: Quality::new(85),
            watermark,
        }
    }

    fn text_mark(text: &str, opacity: f32) -> Watermark {
        Watermark {
            kind: MarkKind::Text {
                text: text.into(),
                font: "/f.ttf".into(),
            },
            font_size: 24,
            opacity,
            padding: 20,
        }
    }

    // =========================================================================
    // CacheManifest basics
    // =========================================================================

    #[test]
    fn empty_manifest_has_no_entries() {
        let m = CacheManifest::empty();
        assert_eq!(m.version, MANIFEST_VERSION);
        assert!(m.entries.is_empty());
        assert!(m.content_index.is_empty());
    }

    #[test]
    fn find_cached_hit() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("peru/a.jpg".into(), "src123".into(), "prm456".into());

        fs::create_dir_all(tmp.path().join("peru")).unwrap();
        fs::write(tmp.path().join("peru/a.jpg"), "data").unwrap();

        assert_eq!(
            m.find_cached("src123", "prm456", tmp.path()),
            Some("peru/a.jpg".to_string())
        );
    }

    #[test]
    fn find_cached_misses() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("out.jpg".into(), "hash".into(), "params".into());

        // File not on disk yet
        assert_eq!(m.find_cached("hash", "params", tmp.path()), None);

        fs::write(tmp.path().join("out.jpg"), "data").unwrap();
        assert_eq!(m.find_cached("other", "params", tmp.path()), None);
        assert_eq!(m.find_cached("hash", "other", tmp.path()), None);
        assert!(m.find_cached("hash", "params", tmp.path()).is_some());
    }

    #[test]
    fn insert_removes_stale_entry_on_path_change() {
        let mut m = CacheManifest::empty();
        m.insert("peru-2023/img.jpg".into(), "src".into(), "prm".into());
        m.insert("peru-2024/img.jpg".into(), "src".into(), "prm".into());

        assert!(!m.entries.contains_key("peru-2023/img.jpg"));
        assert!(m.entries.contains_key("peru-2024/img.jpg"));
    }

    #[test]
    fn reuse_in_place_is_cached() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("a.jpg".into(), "s".into(), "p".into());
        fs::write(tmp.path().join("a.jpg"), "data").unwrap();

        let status = m.reuse("s", "p", tmp.path(), "a.jpg").unwrap();
        assert_eq!(status, Some(VariantStatus::Cached));
    }

    #[test]
    fn reuse_from_other_path_copies() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("old/a.jpg".into(), "s".into(), "p".into());
        fs::create_dir_all(tmp.path().join("old")).unwrap();
        fs::write(tmp.path().join("old/a.jpg"), "pixels").unwrap();

        let status = m.reuse("s", "p", tmp.path(), "new/a.jpg").unwrap();
        assert_eq!(status, Some(VariantStatus::Copied));
        assert_eq!(
            fs::read_to_string(tmp.path().join("new/a.jpg")).unwrap(),
            "pixels"
        );
        assert!(m.entries.contains_key("new/a.jpg"));
        assert!(!m.entries.contains_key("old/a.jpg"));
    }

    #[test]
    fn reuse_miss_returns_none() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        assert_eq!(m.reuse("s", "p", tmp.path(), "a.jpg").unwrap(), None);
    }

    // =========================================================================
    // Save / Load
    // =========================================================================

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("x.jpg".into(), "s1".into(), "p1".into());
        m.insert("y.jpg".into(), "s2".into(), "p2".into());

        m.save(tmp.path()).unwrap();
        let loaded = CacheManifest::load(tmp.path());

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(
            loaded.content_index.get("s2:p2"),
            Some(&"y.jpg".to_string())
        );
    }

    #[test]
    fn load_missing_or_corrupt_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(CacheManifest::load(tmp.path()).entries.is_empty());

        fs::write(tmp.path().join(MANIFEST_FILENAME), "not json").unwrap();
        assert!(CacheManifest::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn load_wrong_version_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let json = format!(
            r#"{{"version": {}, "entries": {{"a": {{"source_hash":"h","params_hash":"p"}}}}}}"#,
            MANIFEST_VERSION + 1
        );
        fs::write(tmp.path().join(MANIFEST_FILENAME), json).unwrap();
        assert!(CacheManifest::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn load_or_empty_respects_flag() {
        let tmp = TempDir::new().unwrap();
        let mut m = CacheManifest::empty();
        m.insert("x.jpg".into(), "s".into(), "p".into());
        m.save(tmp.path()).unwrap();

        assert_eq!(CacheManifest::load_or_empty(tmp.path(), true).entries.len(), 1);
        assert!(CacheManifest::load_or_empty(tmp.path(), false).entries.is_empty());
    }

    // =========================================================================
    // Hash functions
    // =========================================================================

    #[test]
    fn hash_file_changes_with_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.bin");

        fs::write(&path, b"version 1").unwrap();
        let h1 = hash_file(&path).unwrap();
        assert_eq!(h1.len(), 64);

        fs::write(&path, b"version 2").unwrap();
        assert_ne!(h1, hash_file(&path).unwrap());
    }

    #[test]
    fn render_hash_tracks_every_parameter() {
        let base = hash_render_params(&render(800, Some(text_mark("© A", 0.7))), Some("f1"));
        assert_eq!(
            base,
            hash_render_params(&render(800, Some(text_mark("© A", 0.7))), Some("f1"))
        );
        assert_ne!(base, hash_render_params(&render(801, Some(text_mark("© A", 0.7))), Some("f1")));
        assert_ne!(base, hash_render_params(&render(800, Some(text_mark("© B", 0.7))), Some("f1")));
        assert_ne!(base, hash_render_params(&render(800, Some(text_mark("© A", 0.5))), Some("f1")));
        assert_ne!(base, hash_render_params(&render(800, Some(text_mark("© A", 0.7))), Some("f2")));
        assert_ne!(base, hash_render_params(&render(800, None), None));
    }

    #[test]
    fn render_hash_ignores_paths() {
        let mut moved = render(800, None);
        moved.source = "/elsewhere/in.jpg".into();
        moved.output = "/elsewhere/out.jpg".into();
        assert_eq!(
            hash_render_params(&render(800, None), None),
            hash_render_params(&moved, None)
        );
    }

    #[test]
    fn hash_thumbnail_params_varies() {
        let base = hash_thumbnail_params((4, 3), 480, 85, Some((0.5, 0)));
        assert_eq!(base, hash_thumbnail_params((4, 3), 480, 85, Some((0.5, 0))));
        assert_ne!(base, hash_thumbnail_params((16, 9), 480, 85, Some((0.5, 0))));
        assert_ne!(base, hash_thumbnail_params((4, 3), 480, 85, None));
    }

    // =========================================================================
    // CacheStats
    // =========================================================================

    #[test]
    fn cache_stats_display() {
        let mut s = CacheStats::default();
        s.record(VariantStatus::Encoded);
        s.record(VariantStatus::Encoded);
        assert_eq!(s.to_string(), "2 encoded");

        s.record(VariantStatus::Cached);
        assert_eq!(s.to_string(), "1 cached, 2 encoded (3 total)");

        s.record(VariantStatus::Copied);
        assert_eq!(s.to_string(), "1 cached, 1 copied, 2 encoded (4 total)");
    }
}
