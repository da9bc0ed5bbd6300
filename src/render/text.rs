//! Glyph rasterization for text annotations using ab_glyph

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;
use tiny_skia::Pixmap;

use super::geometry::text_line_origins;
use crate::domain::TextShape;

/// Fonts tried when no font path is configured
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws text shapes into a pixmap; without a font, text is skipped
#[derive(Clone, Default)]
pub struct TextRasterizer {
    font: Option<FontArc>,
}

impl fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRasterizer {
    /// Rasterizer that draws no glyphs
    pub fn without_font() -> Self {
        Self { font: None }
    }

    /// Rasterizer from raw TrueType/OpenType data
    pub fn from_font_data(data: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(data).context("Failed to parse font data")?;
        Ok(Self { font: Some(font) })
    }

    /// Load the preferred font, falling back to well-known system fonts
    pub fn load(preferred: Option<&Path>) -> Self {
        if let Some(path) = preferred {
            match Self::from_file(path) {
                Ok(rasterizer) => return rasterizer,
                Err(e) => log::warn!("Could not load font {}: {:#}", path.display(), e),
            }
        }

        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(rasterizer) => {
                    log::debug!("Using font {}", path.display());
                    return rasterizer;
                }
                Err(e) => log::debug!("Skipping font {}: {:#}", path.display(), e),
            }
        }

        log::warn!("No usable font found; text annotations will not be drawn");
        Self::without_font()
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        Self::from_font_data(data)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw a text shape, one row per line, with the first baseline at the anchor
    pub fn draw(&self, pixmap: &mut Pixmap, text: &TextShape) {
        let Some(font) = &self.font else {
            return;
        };

        let scale = PxScale::from(text.font_size);
        let scaled = font.as_scaled(scale);
        let [r, g, b, _] = text.color.to_rgba_u8();
        let lines: Vec<&str> = text.content.split('\n').collect();
        let origins = text_line_origins(text.anchor, text.font_size, lines.len());

        for (line, origin) in lines.iter().zip(origins) {
            let mut caret = origin.x;
            let mut prev = None;
            for ch in line.chars() {
                let gid = font.glyph_id(ch);
                if let Some(prev_id) = prev {
                    caret += scaled.kern(prev_id, gid);
                }
                let glyph = gid.with_scale_and_position(scale, point(caret, origin.y));
                caret += scaled.h_advance(gid);
                prev = Some(gid);

                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|gx, gy, coverage| {
                    blend_pixel(
                        pixmap,
                        left + gx as i32,
                        top + gy as i32,
                        [r, g, b],
                        coverage,
                    );
                });
            }
        }
    }
}

/// Source-over an opaque color with `coverage` onto premultiplied pixmap data
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, rgb: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }
    let idx = (y as usize * pixmap.width() as usize + x as usize) * 4;
    let data = pixmap.data_mut();
    let keep = 1.0 - coverage;
    for (channel, src) in rgb.iter().enumerate() {
        let dst = data[idx + channel] as f32;
        data[idx + channel] = (*src as f32 * coverage + dst * keep).round() as u8;
    }
    let dst_alpha = data[idx + 3] as f32;
    data[idx + 3] = (255.0 * coverage + dst_alpha * keep).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, ShapeColor};

    #[test]
    fn test_without_font_draws_nothing() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let text = TextShape {
            anchor: Point::new(2.0, 15.0),
            content: "hi".into(),
            color: ShapeColor::RED,
            font_size: 12.0,
        };
        let rasterizer = TextRasterizer::without_font();
        assert!(!rasterizer.has_font());
        rasterizer.draw(&mut pixmap, &text);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_font_data_is_error() {
        assert!(TextRasterizer::from_font_data(vec![1, 2, 3]).is_err());
    }

    fn system_font() -> Option<TextRasterizer> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .filter(|path| path.exists())
            .find_map(|path| TextRasterizer::from_file(path).ok())
    }

    /// Lowest row in `rows` holding any ink
    fn last_inked_row(pixmap: &Pixmap, rows: std::ops::Range<u32>) -> Option<u32> {
        rows.filter(|&y| {
            (0..pixmap.width()).any(|x| pixmap.pixel(x, y).is_some_and(|p| p.alpha() > 0))
        })
        .last()
    }

    #[test]
    fn test_draws_glyphs_one_row_per_line() {
        let Some(rasterizer) = system_font() else {
            // no usable font installed
            return;
        };
        assert!(rasterizer.has_font());

        let mut pixmap = Pixmap::new(200, 120).unwrap();
        let text = TextShape {
            anchor: Point::new(10.0, 40.0),
            content: "HH\nHH".into(),
            color: ShapeColor::RED,
            font_size: 30.0,
        };
        rasterizer.draw(&mut pixmap, &text);

        // 'H' sits on the baseline: ink ends just above y = 40, then y = 76
        let first = last_inked_row(&pixmap, 0..58).unwrap();
        let second = last_inked_row(&pixmap, 58..120).unwrap();
        assert!((37..=40).contains(&first), "first baseline row {first}");
        let advance = second as f32 - first as f32;
        assert!((advance - 36.0).abs() <= 2.0, "line advance {advance}");
        assert!(last_inked_row(&pixmap, 42..50).is_none());

        // stem of the first 'H' is solid red
        let solid = (0..pixmap.width())
            .filter_map(|x| pixmap.pixel(x, 30))
            .find(|p| p.alpha() == 255)
            .unwrap();
        let c = solid.demultiply();
        assert!(c.red() > 200 && c.green() < 60 && c.blue() < 60);
    }

    #[test]
    fn test_blend_full_coverage_replaces_pixel() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        blend_pixel(&mut pixmap, 1, 0, [10, 20, 30], 1.0);
        assert_eq!(&pixmap.data()[4..8], &[10, 20, 30, 255]);
        // Out of bounds is ignored
        blend_pixel(&mut pixmap, 5, 5, [10, 20, 30], 1.0);
        blend_pixel(&mut pixmap, -1, 0, [10, 20, 30], 1.0);
    }
}
