//! Glyph bitmaps for report text.
//!
//! Uses the Spleen 12×24 bitmap font. Characters the font lacks are drawn as
//! an outlined box so missing glyphs are visible rather than silently skipped.

use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;

use crate::error::ReportError;

/// Width of one glyph cell in pixels at scale 1.
pub const GLYPH_WIDTH: usize = 12;

/// Height of one glyph cell in pixels at scale 1.
pub const GLYPH_HEIGHT: usize = 24;

/// Rasterized glyphs, keyed by character.
///
/// Each glyph is `GLYPH_WIDTH * GLYPH_HEIGHT` bytes, 1 = ink, 0 = paper.
pub struct GlyphCache {
    glyphs: HashMap<char, Vec<u8>>,
}

impl GlyphCache {
    /// Create an empty cache, checking that the embedded font parses.
    pub fn new() -> Result<Self, ReportError> {
        PSF2Font::new(FONT_12X24)
            .map_err(|e| ReportError::Render(format!("Failed to load font: {:?}", e)))?;
        Ok(Self {
            glyphs: HashMap::new(),
        })
    }

    /// Bitmap for `ch`, rasterized on first use.
    pub fn glyph(&mut self, ch: char) -> &[u8] {
        if !self.glyphs.contains_key(&ch) {
            let bitmap = self.rasterize(ch);
            self.glyphs.insert(ch, bitmap);
        }
        &self.glyphs[&ch]
    }

    fn rasterize(&self, ch: char) -> Vec<u8> {
        let mut glyph = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
        let utf8_bytes = ch.to_string();

        // Validated in new()
        let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
            draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
            return glyph;
        };

        match spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
            Some(spleen_glyph) => {
                for (row_y, row) in spleen_glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        let idx = row_y * GLYPH_WIDTH + col_x;
                        if col_x < GLYPH_WIDTH && idx < glyph.len() {
                            glyph[idx] = on as u8;
                        }
                    }
                }
            }
            None => draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT),
        }

        glyph
    }
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 1..width - 1 {
        glyph[4 * width + x] = 1;
        glyph[(height - 3) * width + x] = 1;
    }
    for y in 4..height - 2 {
        glyph[y * width + 1] = 1;
        glyph[y * width + width - 2] = 1;
    }
}
