//! Watermark compositing onto decoded RGB pixels.
//!
//! Text is laid out left to right with kerning, measured, and anchored so it
//! ends `padding` pixels from the right edge. A black copy offset by (1, 1)
//! is drawn first as a drop shadow.

use super::calculations::{centered_text_origin, mark_dimensions, mark_origin, text_origin};
use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use image::imageops::FilterType;
use image::{Rgb, RgbImage, RgbaImage};

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

/// Alpha-blend `color` into the pixel at `(x, y)`. Out-of-bounds is ignored.
fn blend(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 || alpha <= 0.0 {
        return;
    }
    let alpha = alpha.min(1.0);
    let Rgb(dst) = img.get_pixel_mut(x as u32, y as u32);
    for (d, s) in dst.iter_mut().zip(color) {
        *d = (*d as f32 * (1.0 - alpha) + s as f32 * alpha).round() as u8;
    }
}

/// Position glyphs on a baseline at y = 0, starting at x = 0.
/// Returns the glyphs and the total advance width.
fn layout(font: &FontArc, size: f32, text: &str) -> (Vec<Glyph>, f32) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut previous = None;
    let mut glyphs = Vec::with_capacity(text.len());

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }
    (glyphs, caret)
}

fn draw_glyphs(
    img: &mut RgbImage,
    font: &FontArc,
    glyphs: &[Glyph],
    origin: (f32, f32),
    color: [u8; 3],
    opacity: f32,
) {
    for glyph in glyphs {
        let mut positioned = glyph.clone();
        positioned.position = point(glyph.position.x + origin.0, glyph.position.y + origin.1);
        if let Some(outlined) = font.outline_glyph(positioned) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend(
                    img,
                    bounds.min.x as i64 + gx as i64,
                    bounds.min.y as i64 + gy as i64,
                    color,
                    coverage * opacity,
                );
            });
        }
    }
}

/// Draw `text` in the bottom-right corner: shadow at half opacity, then white.
pub fn draw_text_mark(
    img: &mut RgbImage,
    font: &FontArc,
    text: &str,
    size: u32,
    padding: u32,
    opacity: f32,
) {
    let (glyphs, width) = layout(font, size as f32, text);
    let (x, y) = text_origin(img.dimensions(), width, padding);
    draw_glyphs(img, font, &glyphs, (x + 1.0, y + 1.0), BLACK, opacity * 0.5);
    draw_glyphs(img, font, &glyphs, (x, y), WHITE, opacity);
}

/// Draw `text` in white, centered horizontally, around the line `center_y`.
pub fn draw_centered_text(
    img: &mut RgbImage,
    font: &FontArc,
    text: &str,
    size: f32,
    center_y: f32,
    opacity: f32,
) {
    let (glyphs, width) = layout(font, size, text);
    let origin = centered_text_origin(img.dimensions(), width, center_y, size);
    draw_glyphs(img, font, &glyphs, origin, WHITE, opacity);
}

/// Composite `mark` in the bottom-right corner, scaled down if it does not fit.
pub fn overlay_mark_image(img: &mut RgbImage, mark: &RgbaImage, padding: u32, opacity: f32) {
    let (mw, mh) = mark_dimensions(mark.dimensions(), img.dimensions(), padding);
    let resized;
    let mark = if (mw, mh) == mark.dimensions() {
        mark
    } else {
        resized = image::imageops::resize(mark, mw, mh, FilterType::Lanczos3);
        &resized
    };

    let (ox, oy) = mark_origin(img.dimensions(), (mw, mh), padding);
    for (x, y, px) in mark.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        blend(
            img,
            ox + x as i64,
            oy + y as i64,
            [r, g, b],
            a as f32 / 255.0 * opacity,
        );
    }
}
