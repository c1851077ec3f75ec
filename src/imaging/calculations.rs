//! Pure calculation functions for image dimensions and mark placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `(width, height)` down to fit inside `max_width × max_height`.
///
/// Width is constrained first, then height, each step rounding the other
/// edge to the nearest pixel. Images already inside the box are returned
/// unchanged; nothing is ever enlarged.
pub fn fit_within(source: (u32, u32), max_width: u32, max_height: u32) -> (u32, u32) {
    let (mut width, mut height) = source;

    if width > max_width {
        height = (height as f64 * (max_width as f64 / width as f64)).round() as u32;
        width = max_width;
    }

    if height > max_height {
        width = (width as f64 * (max_height as f64 / height as f64)).round() as u32;
        height = max_height;
    }

    (width.max(1), height.max(1))
}

/// Watermark font size for an image `width` pixels wide.
///
/// `max(16, min(configured, width / 40))`: narrow images get a smaller mark,
/// but it never drops below a readable 16px.
pub fn watermark_font_size(width: u32, configured: u32) -> u32 {
    configured.min(width / 40).max(16)
}

/// Pen position for end-anchored text in the bottom-right corner.
///
/// Returns `(x, baseline_y)` such that the text ends `padding` pixels from
/// the right edge and sits on a baseline `padding` pixels above the bottom.
pub fn text_origin(image: (u32, u32), text_width: f32, padding: u32) -> (f32, f32) {
    let (w, h) = image;
    (
        w as f32 - padding as f32 - text_width,
        h as f32 - padding as f32,
    )
}

/// Pen position for text horizontally centered on `image`, vertically
/// centered on `center_y`. The baseline sits a third of the font size below
/// the center line, which roughly centers Latin x-height text.
pub fn centered_text_origin(image: (u32, u32), text_width: f32, center_y: f32, size: f32) -> (f32, f32) {
    ((image.0 as f32 - text_width) / 2.0, center_y + size / 3.0)
}

/// Size for an image mark so it fits inside the padded image area.
pub fn mark_dimensions(mark: (u32, u32), image: (u32, u32), padding: u32) -> (u32, u32) {
    let max_w = image.0.saturating_sub(padding * 2).max(1);
    let max_h = image.1.saturating_sub(padding * 2).max(1);
    fit_within(mark, max_w, max_h)
}

/// Top-left position of an image mark in the bottom-right corner.
pub fn mark_origin(image: (u32, u32), mark: (u32, u32), padding: u32) -> (i64, i64) {
    (
        image.0 as i64 - padding as i64 - mark.0 as i64,
        image.1 as i64 - padding as i64 - mark.1 as i64,
    )
}

/// Calculate thumbnail dimensions from aspect ratio and short edge size.
///
/// ```text
/// (4, 3), 480  → 640x480   landscape: height is the short edge
/// (4, 5), 400  → 400x500   portrait: width is the short edge
/// ```
pub fn calculate_thumbnail_dimensions(aspect: (u32, u32), short_edge: u32) -> (u32, u32) {
    let (aspect_w, aspect_h) = aspect;

    if aspect_w <= aspect_h {
        let w = short_edge;
        let h = (w as f64 * aspect_h as f64 / aspect_w as f64).round() as u32;
        (w, h)
    } else {
        let h = short_edge;
        let w = (h as f64 * aspect_w as f64 / aspect_h as f64).round() as u32;
        (w, h)
    }
}

/// Stable muted color for a placeholder, derived from `key` (the photo path).
///
/// FNV-1a picks the hue; saturation and lightness are fixed so white text
/// and the page chrome stay legible on every placeholder.
pub fn placeholder_color(key: &str) -> [u8; 3] {
    let hash = key.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    });
    let hue = (hash % 360) as f64;
    hsl_to_rgb(hue, 0.35, 0.5)
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // fit_within
    // =========================================================================

    #[test]
    fn fit_keeps_small_images() {
        assert_eq!(fit_within((800, 600), 1920, 1080), (800, 600));
    }

    #[test]
    fn fit_constrains_width() {
        // 4000x2000 → width 1920, height 960
        assert_eq!(fit_within((4000, 2000), 1920, 1080), (1920, 960));
    }

    #[test]
    fn fit_constrains_height_after_width() {
        // 4000x3000 → 1920x1440 → height over → 1440x1080
        assert_eq!(fit_within((4000, 3000), 1920, 1080), (1440, 1080));
    }

    #[test]
    fn fit_portrait() {
        // 3000x4000: width ok after first step? 3000 > 1920 → 1920x2560 → 810x1080
        assert_eq!(fit_within((3000, 4000), 1920, 1080), (810, 1080));
    }

    #[test]
    fn fit_height_only() {
        assert_eq!(fit_within((1000, 2000), 1920, 1080), (540, 1080));
    }

    // =========================================================================
    // watermark placement
    // =========================================================================

    #[test]
    fn font_size_bounds() {
        assert_eq!(watermark_font_size(1920, 24), 24);
        assert_eq!(watermark_font_size(800, 24), 20);
        assert_eq!(watermark_font_size(400, 24), 16);
        assert_eq!(watermark_font_size(4000, 40), 40);
        // Configured below the floor still yields 16
        assert_eq!(watermark_font_size(1920, 10), 16);
    }

    #[test]
    fn text_anchored_at_end() {
        let (x, y) = text_origin((1920, 1080), 300.0, 20);
        assert_eq!(x, 1600.0);
        assert_eq!(y, 1060.0);
    }

    #[test]
    fn centered_text_straddles_midline() {
        let (x, y) = centered_text_origin((1200, 800), 300.0, 400.0, 48.0);
        assert_eq!(x, 450.0);
        assert_eq!(y, 416.0);
    }

    #[test]
    fn mark_fits_and_anchors() {
        assert_eq!(mark_dimensions((200, 50), (1920, 1080), 20), (200, 50));
        // Mark wider than the padded image is scaled down
        assert_eq!(mark_dimensions((400, 100), (240, 160), 20), (200, 50));
        assert_eq!(mark_origin((1920, 1080), (200, 50), 20), (1700, 1010));
    }

    // =========================================================================
    // thumbnails
    // =========================================================================

    #[test]
    fn thumbnail_landscape_aspect() {
        assert_eq!(calculate_thumbnail_dimensions((4, 3), 480), (640, 480));
    }

    #[test]
    fn thumbnail_portrait_aspect() {
        assert_eq!(calculate_thumbnail_dimensions((4, 5), 400), (400, 500));
    }

    #[test]
    fn thumbnail_square_aspect() {
        assert_eq!(calculate_thumbnail_dimensions((1, 1), 200), (200, 200));
    }

    // =========================================================================
    // placeholders
    // =========================================================================

    #[test]
    fn placeholder_color_is_stable_and_varies() {
        let a = placeholder_color("patagonia-2024/torres-del-paine.jpg");
        assert_eq!(a, placeholder_color("patagonia-2024/torres-del-paine.jpg"));
        let b = placeholder_color("iceland-2023/aurora-borealis.jpg");
        let c = placeholder_color("japan-2024/mount-fuji.jpg");
        assert!(a != b || b != c);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), [0, 255, 0]);
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), [0, 0, 255]);
    }
}
