//! # Raster Report Layout
//!
//! Lays a [`ReportDocument`] out top to bottom on a white RGB surface of fixed
//! width. The surface grows downward as content is added; its final height is
//! whatever the content needs.
//!
//! ```text
//! ├─ margin ─┼──────────── content width ────────────┼─ margin ─┤
//!            │         HVAC Service Report (×3)      │
//!            │             Date: 2026-10-19          │
//!            │ ══════════════════════════════════════│
//!            │ Client Information (×2)               │
//!            │ ▌Unit: Rooftop 1 (×2)                 │
//!            │   Area Served: ...                    │
//!            │   Maintenance Photos                  │
//!            │   ┌────────────┐  ┌────────────┐      │
//!            │   │  photo 1   │  │  photo 2   │      │
//! ```

use image::{RgbImage, imageops::FilterType};
use rayon::prelude::*;
use tracing::debug;

use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, GlyphCache};
use super::{Surface, SurfaceRenderer};
use crate::document::{ClientBlock, Field, Header, ImageBlock, ReportDocument, UnitSection};
use crate::encoder;
use crate::error::ReportError;
use crate::page::ReportConfig;

type Color = [u8; 3];

const WHITE: Color = [255, 255, 255];
const INK: Color = [31, 41, 55];
const MUTED: Color = [75, 85, 99];
const ACCENT: Color = [37, 99, 235];
const RULE: Color = [209, 213, 219];
const BAR: Color = [243, 244, 246];

const LINE_GAP: u32 = 6;
const BLOCK_GAP: u32 = 24;
const SECTION_GAP: u32 = 40;
const PHOTO_GAP: u32 = 16;
const ACCENT_WIDTH: u32 = 8;
const INDENT: u32 = 12;

/// Rows added each time the surface runs out of room.
const GROW_ROWS: u32 = 256;

/// The built-in renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRenderer {
    width: u32,
    page_height: u32,
    margin: u32,
}

impl RasterRenderer {
    /// Renderer producing surfaces `width` pixels wide with `margin` pixels
    /// of blank border. No photo is drawn taller than `page_height` minus
    /// both margins, so a photo always fits on one page.
    pub fn new(width: u32, page_height: u32, margin: u32) -> Self {
        Self {
            width,
            page_height,
            margin,
        }
    }

    /// Renderer matching the page size of `config`, so the surface needs no
    /// scaling before pagination.
    pub fn for_config(config: &ReportConfig) -> Self {
        Self::new(config.page_width_px(), config.page_height_px(), config.margin_px())
    }
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::for_config(&ReportConfig::A4)
    }
}

impl SurfaceRenderer for RasterRenderer {
    fn render(&self, doc: &ReportDocument) -> Result<Surface, ReportError> {
        let min_width = self.margin * 2 + INDENT * 2 + PHOTO_GAP + GLYPH_WIDTH as u32 * 6;
        if self.width < min_width {
            return Err(ReportError::Render(format!(
                "Surface width {} leaves no room for content (need at least {})",
                self.width, min_width
            )));
        }
        if self.page_height <= self.margin * 2 {
            return Err(ReportError::Render(format!(
                "Page height {} leaves no room inside {} px margins",
                self.page_height, self.margin
            )));
        }

        let max_photo_height = self.page_height - self.margin * 2;
        let mut canvas = Canvas::new(self.width, self.margin, max_photo_height)?;
        canvas.skip(self.margin);
        canvas.header(&doc.header);
        canvas.client(&doc.client);
        for section in &doc.sections {
            canvas.section(section)?;
        }
        canvas.footer(&doc.footer);
        canvas.skip(self.margin);

        let surface = canvas.finish()?;
        debug!(
            "Rendered {} section(s), {} photo(s) to {}x{} surface",
            doc.sections.len(),
            doc.image_count(),
            surface.width(),
            surface.height()
        );
        Ok(surface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Text styling for one paragraph.
#[derive(Debug, Clone, Copy)]
struct Style {
    scale: u32,
    color: Color,
    bold: bool,
    align: Align,
    indent: u32,
}

impl Style {
    const BODY: Style = Style {
        scale: 1,
        color: INK,
        bold: false,
        align: Align::Left,
        indent: INDENT,
    };

    fn scale(self, scale: u32) -> Self {
        Self { scale, ..self }
    }

    fn color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    fn centered(self) -> Self {
        Self {
            align: Align::Center,
            indent: 0,
            ..self
        }
    }

    fn indent(self, indent: u32) -> Self {
        Self { indent, ..self }
    }

    fn line_height(&self) -> u32 {
        GLYPH_HEIGHT as u32 * self.scale
    }

    fn char_width(&self) -> u32 {
        GLYPH_WIDTH as u32 * self.scale
    }
}

/// Growable RGB drawing surface with a vertical cursor.
struct Canvas {
    width: u32,
    margin: u32,
    max_photo_height: u32,
    buffer: Vec<u8>,
    height: u32,
    y: u32,
    glyphs: GlyphCache,
}

impl Canvas {
    fn new(width: u32, margin: u32, max_photo_height: u32) -> Result<Self, ReportError> {
        Ok(Self {
            width,
            margin,
            max_photo_height,
            buffer: Vec::new(),
            height: 0,
            y: 0,
            glyphs: GlyphCache::new()?,
        })
    }

    fn content_width(&self) -> u32 {
        self.width - self.margin * 2
    }

    /// Grow the buffer (white) so it holds at least `rows` rows.
    fn ensure_height(&mut self, rows: u32) {
        if rows > self.height {
            let new_height = rows.max(self.height + GROW_ROWS);
            self.buffer
                .resize(self.width as usize * new_height as usize * 3, WHITE[0]);
            self.height = new_height;
        }
    }

    fn skip(&mut self, rows: u32) {
        self.y += rows;
    }

    /// Fill a rectangle, clipped to the surface width.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.ensure_height(y + h);
        let x_end = (x + w).min(self.width);
        for row in y..y + h {
            let row_start = row as usize * self.width as usize;
            for col in x.min(x_end)..x_end {
                let idx = (row_start + col as usize) * 3;
                self.buffer[idx..idx + 3].copy_from_slice(&color);
            }
        }
    }

    /// Copy `img` with its top-left corner at (`x`, `y`), clipped to the width.
    fn blit(&mut self, img: &RgbImage, x: u32, y: u32) {
        self.ensure_height(y + img.height());
        let visible = img.width().min(self.width.saturating_sub(x)) as usize;
        if visible == 0 {
            return;
        }
        let src = img.as_raw();
        let src_stride = img.width() as usize * 3;
        for row in 0..img.height() as usize {
            let dst = ((y as usize + row) * self.width as usize + x as usize) * 3;
            let from = row * src_stride;
            self.buffer[dst..dst + visible * 3].copy_from_slice(&src[from..from + visible * 3]);
        }
    }

    /// Horizontal rule across the content width; advances the cursor.
    fn rule(&mut self, thickness: u32, color: Color) {
        let (x, y, w) = (self.margin, self.y, self.content_width());
        self.fill_rect(x, y, w, thickness, color);
        self.y += thickness;
    }

    /// Draw a single line of text with its top-left corner at (`x`, `y`).
    fn draw_line(&mut self, text: &str, x: u32, y: u32, style: Style) {
        let scale = style.scale;
        let mut pen_x = x;
        for ch in text.chars() {
            let glyph = self.glyphs.glyph(ch).to_vec();
            for (idx, &ink) in glyph.iter().enumerate() {
                if ink == 0 {
                    continue;
                }
                let gx = (idx % GLYPH_WIDTH) as u32;
                let gy = (idx / GLYPH_WIDTH) as u32;
                let px = pen_x + gx * scale;
                let py = y + gy * scale;
                self.fill_rect(px, py, scale, scale, style.color);
                if style.bold {
                    self.fill_rect(px + 1, py, scale, scale, style.color);
                }
            }
            pen_x += style.char_width();
        }
    }

    /// Word-wrapped text at the cursor; advances the cursor past it.
    fn paragraph(&mut self, text: &str, style: Style) {
        let available = self.content_width().saturating_sub(style.indent);
        let max_chars = (available / style.char_width()).max(1) as usize;

        for line in wrap(text, max_chars) {
            let line_width = line.chars().count() as u32 * style.char_width();
            let x = match style.align {
                Align::Left => self.margin + style.indent,
                Align::Center => self.margin + available.saturating_sub(line_width) / 2,
            };
            let y = self.y;
            self.draw_line(&line, x, y, style);
            self.y += style.line_height() + LINE_GAP;
        }
    }

    fn field(&mut self, field: &Field, style: Style) {
        self.paragraph(&format!("{}: {}", field.label, field.value), style);
    }

    fn header(&mut self, header: &Header) {
        self.paragraph(&header.title, Style::BODY.scale(3).bold().centered());
        self.skip(8);
        self.paragraph(&header.date_line(), Style::BODY.color(MUTED).centered());
        self.skip(16);
        self.rule(3, RULE);
        self.skip(SECTION_GAP);
    }

    fn client(&mut self, client: &ClientBlock) {
        self.paragraph(&client.heading, Style::BODY.scale(2).bold().indent(0));
        self.rule(1, RULE);
        self.skip(12);
        for field in &client.fields {
            self.field(field, Style::BODY.indent(0));
        }
        self.skip(SECTION_GAP);
    }

    fn section(&mut self, section: &UnitSection) -> Result<(), ReportError> {
        self.section_heading(&section.heading);
        self.skip(16);

        for field in &section.fields {
            self.field(field, Style::BODY);
        }

        if let Some(filters) = &section.filters {
            self.skip(BLOCK_GAP / 2);
            self.paragraph(&filters.heading, Style::BODY.bold());
            for item in &filters.items {
                self.paragraph(&format!("- {}", item), Style::BODY.indent(INDENT * 3));
            }
        }

        if let Some(photos) = &section.photos {
            self.skip(BLOCK_GAP);
            self.paragraph(&photos.heading, Style::BODY.scale(2).color(MUTED).bold());
            self.skip(8);
            self.photo_grid(&photos.images)?;
        }

        self.skip(SECTION_GAP);
        Ok(())
    }

    /// Shaded bar with an accent stripe on the left, heading text inside.
    fn section_heading(&mut self, heading: &str) {
        let style = Style::BODY.scale(2).color(ACCENT).bold();
        let text_x = self.margin + ACCENT_WIDTH + INDENT;
        let available = self.content_width() - ACCENT_WIDTH - INDENT * 2;
        let lines = wrap(heading, (available / style.char_width()).max(1) as usize);

        let text_height = lines.len() as u32 * (style.line_height() + LINE_GAP) - LINE_GAP;
        let bar_height = text_height + INDENT * 2;
        let (x, y, w) = (self.margin, self.y, self.content_width());
        self.fill_rect(x, y, w, bar_height, BAR);
        self.fill_rect(x, y, ACCENT_WIDTH, bar_height, ACCENT);

        let mut line_y = y + INDENT;
        for line in &lines {
            self.draw_line(line, text_x, line_y, style);
            line_y += style.line_height() + LINE_GAP;
        }
        self.y += bar_height;
    }

    /// Photos two per row, each scaled to fit its column and one page.
    fn photo_grid(&mut self, images: &[ImageBlock]) -> Result<(), ReportError> {
        let column_width = (self.content_width() - INDENT * 2 - PHOTO_GAP) / 2;
        let max_height = self.max_photo_height;

        let thumbnails = images
            .par_iter()
            .map(|block| {
                load_photo(block, column_width, max_height)
                    .map_err(|e| ReportError::Render(format!("{}: {}", block.caption, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for row in thumbnails.chunks(2) {
            let row_height = row.iter().map(|t| t.height()).max().unwrap_or(0);
            for (column, thumbnail) in row.iter().enumerate() {
                let x = self.margin + INDENT + column as u32 * (column_width + PHOTO_GAP);
                let y = self.y;
                self.blit(thumbnail, x, y);
            }
            self.y += row_height + PHOTO_GAP;
        }
        Ok(())
    }

    fn footer(&mut self, lines: &[String]) {
        self.rule(2, RULE);
        self.skip(16);
        for line in lines {
            self.paragraph(line, Style::BODY.color(MUTED).centered());
        }
    }

    /// Cut the buffer at the cursor and hand it over as an image.
    fn finish(mut self) -> Result<Surface, ReportError> {
        let height = self.y;
        self.ensure_height(height);
        self.buffer
            .truncate(self.width as usize * height as usize * 3);
        RgbImage::from_raw(self.width, height, self.buffer)
            .ok_or_else(|| ReportError::Render("Surface buffer size mismatch".to_string()))
    }
}

/// Decode a photo and scale it to the largest size within
/// `max_width`×`max_height` that keeps its aspect ratio.
fn load_photo(block: &ImageBlock, max_width: u32, max_height: u32) -> Result<RgbImage, String> {
    let bytes = encoder::decode(&block.data).map_err(|e| e.to_string())?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;
    if img.width() == 0 || img.height() == 0 {
        return Err("Image has no pixels".to_string());
    }

    Ok(img.resize(max_width, max_height, FilterType::Triangle).to_rgb8())
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a line
/// are split. Always returns at least one line.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
