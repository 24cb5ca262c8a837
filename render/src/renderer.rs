//! Software drawing primitives using tiny-skia and cosmic-text
//!
//! All rendering is done on the CPU into a tiny-skia `Pixmap`.
use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping, SwashCache};
use tiny_skia::{
    Color, ColorU8, FillRule, LineCap, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect,
    Stroke, Transform,
};

/// Cached result of text shaping
struct CachedText {
    /// Pre-shaped glyphs ready for rendering
    glyphs: Vec<LayoutGlyph>,
    width: f32,
    height: f32,
}

/// Key for text cache: (text content, font size rounded to tenths)
type TextCacheKey = (String, u32);

pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Axis labels repeat across renders, so shaped text is kept
    text_cache: HashMap<TextCacheKey, CachedText>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            text_cache: HashMap::with_capacity(64),
        }
    }

    /// Ensure text is cached, shaping if needed. Returns (width, height).
    fn ensure_cached(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        let key = (text.to_string(), (font_size * 10.0).round() as u32);
        if let Some(cached) = self.text_cache.get(&key) {
            return (cached.width, cached.height);
        }

        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut text_buffer = Buffer::new(&mut self.font_system, metrics);

        let attrs = Attrs::new().family(Family::SansSerif);
        text_buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        text_buffer.shape_until_scroll(&mut self.font_system, false);

        let mut glyphs = Vec::new();
        let mut width = 0.0f32;
        let mut height = 0.0f32;

        for run in text_buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
            glyphs.extend(run.glyphs.iter().cloned());
        }

        self.text_cache.insert(
            key,
            CachedText {
                glyphs,
                width,
                height,
            },
        );

        (width, height)
    }

    /// Measure text dimensions
    pub fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        self.ensure_cached(text, font_size)
    }

    pub fn fill_rect(&self, pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    pub fn fill_circle(&self, pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    pub fn stroke_line(
        &self,
        pixmap: &mut Pixmap,
        from: (f32, f32),
        to: (f32, f32),
        stroke_width: f32,
        color: Color,
    ) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else { return };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Butt,
            ..Default::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    pub fn stroke_rect(
        &self,
        pixmap: &mut Pixmap,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        stroke_width: f32,
        color: Color,
    ) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: stroke_width,
            ..Default::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draw text with its baseline at `y`
    pub fn draw_text(
        &mut self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
    ) {
        let key = (text.to_string(), (font_size * 10.0).round() as u32);
        self.ensure_cached(text, font_size);
        let glyphs = self
            .text_cache
            .get(&key)
            .map(|c| c.glyphs.clone())
            .unwrap_or_default();

        let text_color = color.to_color_u8();

        for glyph in &glyphs {
            let physical_glyph = glyph.physical((x, y), 1.0);

            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical_glyph.cache_key)
            {
                let mask = GlyphMask {
                    coverage: &image.data,
                    width: image.placement.width,
                    height: image.placement.height,
                    left: physical_glyph.x + image.placement.left,
                    top: physical_glyph.y - image.placement.top,
                };
                blend_glyph_mask(pixmap, &mask, text_color);
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rasterized glyph coverage positioned in pixmap coordinates
struct GlyphMask<'a> {
    coverage: &'a [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
}

/// Source-over blend of a solid colour through a coverage mask.
///
/// Pixmap pixels are premultiplied, so the source is premultiplied by its
/// effective alpha before mixing.
fn blend_glyph_mask(pixmap: &mut Pixmap, mask: &GlyphMask, color: ColorU8) {
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let pixels = pixmap.pixels_mut();
    let area = (mask.width * mask.height) as usize;

    for (idx, &coverage) in mask.coverage.iter().take(area).enumerate() {
        if coverage == 0 {
            continue;
        }
        let px = mask.left + (idx as u32 % mask.width) as i32;
        let py = mask.top + (idx as u32 / mask.width) as i32;
        if !(0..width).contains(&px) || !(0..height).contains(&py) {
            continue;
        }
        let Some(dst) = pixels.get_mut((py * width + px) as usize) else {
            continue;
        };

        let src_a = u32::from(coverage) * u32::from(color.alpha()) / 255;
        let inv_a = 255 - src_a;
        let alpha = (src_a + u32::from(dst.alpha()) * inv_a / 255) as u8;
        let mix =
            |s: u8, d: u8| (((u32::from(s) * src_a + u32::from(d) * inv_a) / 255) as u8).min(alpha);

        if let Some(blended) = PremultipliedColorU8::from_rgba(
            mix(color.red(), dst.red()),
            mix(color.green(), dst.green()),
            mix(color.blue(), dst.blue()),
            alpha,
        ) {
            *dst = blended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_mask_blends_onto_white() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(Color::WHITE);

        let coverage = [255, 128, 0, 255];
        let mask = GlyphMask {
            coverage: &coverage,
            width: 2,
            height: 2,
            left: 1,
            top: 1,
        };
        blend_glyph_mask(&mut pixmap, &mask, ColorU8::from_rgba(0, 0, 0, 255));

        let full = pixmap.pixel(1, 1).unwrap();
        assert_eq!((full.red(), full.alpha()), (0, 255));
        let half = pixmap.pixel(2, 1).unwrap();
        assert!(half.red() > 100 && half.red() < 150);
        assert_eq!(half.alpha(), 255);
        assert_eq!(pixmap.pixel(1, 2).unwrap().red(), 255);
        assert_eq!(pixmap.pixel(0, 0).unwrap().red(), 255);
    }

    #[test]
    fn glyph_mask_is_clipped_to_pixmap() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        pixmap.fill(Color::WHITE);

        let coverage = [255; 9];
        let mask = GlyphMask {
            coverage: &coverage,
            width: 3,
            height: 3,
            left: -1,
            top: -1,
        };
        blend_glyph_mask(&mut pixmap, &mask, ColorU8::from_rgba(0, 0, 0, 255));

        assert_eq!(pixmap.pixel(0, 0).unwrap().red(), 0);
        assert_eq!(pixmap.pixel(1, 1).unwrap().red(), 0);
    }
}
