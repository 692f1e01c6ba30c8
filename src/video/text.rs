use crate::caption::AVG_GLYPH_WIDTH_FACTOR;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::foundation::math::{blend_px, mul_div255_u8};
use std::collections::HashMap;
use std::path::Path;

const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A parsed TTF/OTF font used to rasterize overlay text.
pub struct CaptionFont {
    font: fontdue::Font,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont").finish_non_exhaustive()
    }
}

impl CaptionFont {
    /// Parse a font from raw TTF/OTF bytes.
    pub fn from_bytes(bytes: &[u8]) -> StillreelResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| StillreelError::resource(format!("failed to parse caption font: {e}")))?;
        Ok(Self { font })
    }

    /// Load a font from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> StillreelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            StillreelError::resource(format!(
                "failed to read caption font '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Probe a handful of common system font locations.
    ///
    /// `None` when no usable font is found; rendering then falls back to
    /// block glyphs, so a missing font never fails a job.
    pub fn discover() -> Option<Self> {
        FONT_SEARCH_PATHS
            .iter()
            .find_map(|p| Self::from_file(p).ok())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    size_bits: u32,
}

struct Rasterized {
    metrics: fontdue::Metrics,
    bitmap: Vec<u8>,
}

/// Rasterizes caption lines into an RGBA canvas buffer.
///
/// With a font, glyphs come from `fontdue` (coverage-blended, cached per
/// char/size). Without one, each visible character becomes a filled block at
/// the same average-width metrics, keeping output deterministic on hosts with
/// no fonts installed. Line breaking never consults either path; wrapping is
/// done up front with the width heuristic.
pub(crate) struct TextPainter {
    font: Option<fontdue::Font>,
    glyph_cache: HashMap<GlyphKey, Rasterized>,
}

impl TextPainter {
    pub(crate) fn new(font: Option<CaptionFont>) -> Self {
        Self {
            font: font.map(|f| f.font),
            glyph_cache: HashMap::new(),
        }
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    pub(crate) fn draw_line(
        &mut self,
        buf: &mut [u8],
        canvas: Canvas,
        x: f32,
        y: f32,
        text: &str,
        size: f32,
        color: [u8; 4],
    ) {
        if self.font.is_some() {
            self.draw_glyph_line(buf, canvas, x, y, text, size, color);
        } else {
            draw_block_line(buf, canvas, x, y, text, size, color);
        }
    }

    fn draw_glyph_line(
        &mut self,
        buf: &mut [u8],
        canvas: Canvas,
        x: f32,
        y: f32,
        text: &str,
        size: f32,
        color: [u8; 4],
    ) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        let baseline = y + size * 0.8;
        let mut pen_x = x;

        for ch in text.chars() {
            let key = GlyphKey {
                ch,
                size_bits: size.to_bits(),
            };
            let glyph = self.glyph_cache.entry(key).or_insert_with(|| {
                let (metrics, bitmap) = font.rasterize(ch, size);
                Rasterized { metrics, bitmap }
            });

            let gx = (pen_x + glyph.metrics.xmin as f32).round() as i64;
            let gy = (baseline - glyph.metrics.height as f32 - glyph.metrics.ymin as f32).round()
                as i64;
            blend_coverage(buf, canvas, gx, gy, glyph, color);
            pen_x += glyph.metrics.advance_width;
        }
    }
}

fn blend_coverage(
    buf: &mut [u8],
    canvas: Canvas,
    gx: i64,
    gy: i64,
    glyph: &Rasterized,
    color: [u8; 4],
) {
    for row in 0..glyph.metrics.height {
        let py = gy + row as i64;
        if py < 0 || py >= i64::from(canvas.height) {
            continue;
        }
        for col in 0..glyph.metrics.width {
            let px = gx + col as i64;
            if px < 0 || px >= i64::from(canvas.width) {
                continue;
            }
            let coverage = glyph.bitmap[row * glyph.metrics.width + col];
            if coverage == 0 {
                continue;
            }
            let alpha = mul_div255_u8(coverage, color[3]);
            let idx = (py as usize * canvas.width as usize + px as usize) * 4;
            blend_px(buf, idx, [color[0], color[1], color[2], alpha]);
        }
    }
}

/// Fallback: one filled block per visible character at the heuristic advance.
fn draw_block_line(
    buf: &mut [u8],
    canvas: Canvas,
    x: f32,
    y: f32,
    text: &str,
    size: f32,
    color: [u8; 4],
) {
    let advance = size * AVG_GLYPH_WIDTH_FACTOR;
    let mut pen_x = x;

    for ch in text.chars() {
        if !ch.is_whitespace() {
            let x0 = (pen_x + advance * 0.12).round().max(0.0) as u32;
            let x1 = ((pen_x + advance * 0.88).round().max(0.0) as u32).min(canvas.width);
            let y0 = ((y + size * 0.18).round().max(0.0) as u32).min(canvas.height);
            let y1 = ((y + size * 0.82).round().max(0.0) as u32).min(canvas.height);
            for py in y0..y1 {
                for px in x0..x1.min(canvas.width) {
                    let idx = (py as usize * canvas.width as usize + px as usize) * 4;
                    blend_px(buf, idx, color);
                }
            }
        }
        pen_x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(canvas: Canvas) -> Vec<u8> {
        let mut buf = vec![0u8; canvas.frame_bytes()];
        for px in buf.chunks_exact_mut(4) {
            px[3] = 255;
        }
        buf
    }

    #[test]
    fn block_painter_marks_pixels_for_visible_chars() {
        let canvas = Canvas {
            width: 200,
            height: 60,
        };
        let mut buf = blank(canvas);
        let mut painter = TextPainter::new(None);
        painter.draw_line(&mut buf, canvas, 4.0, 4.0, "hi", 30.0, [255, 255, 255, 255]);
        assert!(buf.chunks_exact(4).any(|px| px[0] == 255));
    }

    #[test]
    fn block_painter_skips_whitespace_cells() {
        let canvas = Canvas {
            width: 200,
            height: 60,
        };
        let mut only_space = blank(canvas);
        let mut painter = TextPainter::new(None);
        painter.draw_line(
            &mut only_space,
            canvas,
            4.0,
            4.0,
            "   ",
            30.0,
            [255, 255, 255, 255],
        );
        assert_eq!(only_space, blank(canvas));
    }

    #[test]
    fn block_painter_is_deterministic() {
        let canvas = Canvas {
            width: 120,
            height: 50,
        };
        let mut a = blank(canvas);
        let mut b = blank(canvas);
        let mut painter = TextPainter::new(None);
        painter.draw_line(&mut a, canvas, 2.0, 2.0, "abc", 24.0, [200, 10, 10, 255]);
        painter.draw_line(&mut b, canvas, 2.0, 2.0, "abc", 24.0, [200, 10, 10, 255]);
        assert_eq!(a, b);
    }

    #[test]
    fn drawing_off_canvas_does_not_panic() {
        let canvas = Canvas {
            width: 40,
            height: 20,
        };
        let mut buf = blank(canvas);
        let mut painter = TextPainter::new(None);
        painter.draw_line(
            &mut buf,
            canvas,
            35.0,
            15.0,
            "overflowing text",
            30.0,
            [255, 255, 255, 255],
        );
    }

    #[test]
    fn bad_font_bytes_are_a_resource_error() {
        let err = CaptionFont::from_bytes(b"not a font").unwrap_err();
        assert!(err.to_string().contains("resource error:"));
    }
}
