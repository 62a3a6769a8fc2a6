//! Bitmap layout and drawing for the preview page.
//!
//! Text is set in fixed 8×8 glyph cells from `font8x8`, scaled per block role
//! (name, headings, body). Layout runs once when the view is rendered; drawing
//! replays the resulting display list onto an RGBA buffer.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeContent;
use crate::render::RenderError;

const GLYPH_CELL: u32 = 8;

const INK_DARK: [u8; 3] = [31, 41, 55];
const INK_MUTED: [u8; 3] = [75, 85, 99];
const INK_BODY: [u8; 3] = [55, 65, 81];
const CHIP_FILL: [u8; 3] = [243, 244, 246];

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Page width in pixels.
    pub width_px: u32,
    /// Padding on every side (the preview's `p-8`).
    pub padding_px: u32,
    /// Pages taller than this are rejected at layout time.
    pub max_height_px: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            width_px: 800,
            padding_px: 32,
            max_height_px: 16_384,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextStyle {
    scale: u32,
    bold: bool,
    color: [u8; 3],
    /// Vertical space after each line.
    leading: u32,
}

impl TextStyle {
    const NAME: TextStyle = TextStyle {
        scale: 4,
        bold: true,
        color: INK_DARK,
        leading: 8,
    };
    const TITLE: TextStyle = TextStyle {
        scale: 3,
        bold: false,
        color: INK_MUTED,
        leading: 16,
    };
    const CONTACT: TextStyle = TextStyle {
        scale: 2,
        bold: false,
        color: INK_MUTED,
        leading: 24,
    };
    const HEADING: TextStyle = TextStyle {
        scale: 3,
        bold: true,
        color: INK_DARK,
        leading: 8,
    };
    const BODY: TextStyle = TextStyle {
        scale: 2,
        bold: false,
        color: INK_BODY,
        leading: 6,
    };

    fn char_width(&self) -> u32 {
        GLYPH_CELL * self.scale
    }

    fn line_height(&self) -> u32 {
        GLYPH_CELL * self.scale
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DrawOp {
    Text {
        x: u32,
        y: u32,
        style: TextStyle,
        text: String,
    },
    Fill {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: [u8; 3],
    },
}

/// A fully laid-out page, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    pub width: u32,
    pub height: u32,
    background: [u8; 3],
    ops: Vec<DrawOp>,
}

impl RasterPage {
    /// Number of text lines on the page.
    #[cfg(test)]
    fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { .. }))
            .count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap to at most `max_chars` cells per line. Words longer than a
/// whole line are split hard. Blank input yields no lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        let space = usize::from(current_len > 0);
        if current_len > 0 && current_len + space + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

struct PageBuilder<'a> {
    config: &'a RasterConfig,
    cursor_y: u32,
    ops: Vec<DrawOp>,
}

impl<'a> PageBuilder<'a> {
    fn content_width(&self) -> u32 {
        self.config.width_px - 2 * self.config.padding_px
    }

    fn lines(&mut self, text: &str, style: TextStyle, indent: u32) {
        let max_chars = ((self.content_width() - indent) / style.char_width()) as usize;
        for line in wrap_text(text, max_chars) {
            self.ops.push(DrawOp::Text {
                x: self.config.padding_px + indent,
                y: self.cursor_y,
                style,
                text: line,
            });
            self.cursor_y += style.line_height() + style.leading;
        }
    }

    fn gap(&mut self, px: u32) {
        self.cursor_y += px;
    }

    fn heading(&mut self, text: &str) {
        self.lines(text, TextStyle::HEADING, 0);
    }

    /// One bullet row per entry; empty entries still occupy a row, as an empty `<li>` does.
    fn bullet_list(&mut self, entries: &[String]) {
        let style = TextStyle::BODY;
        let marker = style.scale * 3;
        let indent = style.char_width() * 2;
        for entry in entries {
            self.ops.push(DrawOp::Fill {
                x: self.config.padding_px + style.scale * 2,
                y: self.cursor_y + (style.line_height() - marker) / 2,
                w: marker,
                h: marker,
                color: style.color,
            });
            let before = self.cursor_y;
            self.lines(entry, style, indent);
            if self.cursor_y == before {
                self.cursor_y += style.line_height() + style.leading;
            }
            self.gap(4);
        }
    }

    /// Skills flow left to right as chips, wrapping when the row is full.
    fn chips(&mut self, skills: &[String]) {
        let style = TextStyle::BODY;
        let pad_x = 12;
        let pad_y = 4;
        let spacing = 8;
        let chip_height = style.line_height() + 2 * pad_y;
        let left = self.config.padding_px;
        let right = left + self.content_width();
        let max_chars = ((self.content_width() - 2 * pad_x) / style.char_width()) as usize;

        let mut x = left;
        let mut placed_in_row = false;
        for skill in skills {
            let label: String = skill.chars().take(max_chars).collect();
            let chip_width = label.chars().count() as u32 * style.char_width() + 2 * pad_x;
            if placed_in_row && x + chip_width > right {
                self.cursor_y += chip_height + spacing;
                x = left;
            }
            self.ops.push(DrawOp::Fill {
                x,
                y: self.cursor_y,
                w: chip_width,
                h: chip_height,
                color: CHIP_FILL,
            });
            self.ops.push(DrawOp::Text {
                x: x + pad_x,
                y: self.cursor_y + pad_y,
                style,
                text: label,
            });
            x += chip_width + spacing;
            placed_in_row = true;
        }
        if placed_in_row {
            self.cursor_y += chip_height;
        }
    }
}

/// Lays the resume out in preview order: name, title, contact row, then the
/// Summary, Experience, Education and Skills sections.
pub fn layout_page(
    content: &ResumeContent,
    background: [u8; 3],
    config: &RasterConfig,
) -> Result<RasterPage, RenderError> {
    let widest_cell = TextStyle::NAME.char_width() * 2;
    if config.width_px < 2 * config.padding_px + widest_cell {
        return Err(RenderError::Layout(format!(
            "page width {}px cannot fit {}px padding",
            config.width_px, config.padding_px
        )));
    }

    let mut page = PageBuilder {
        config,
        cursor_y: config.padding_px,
        ops: Vec::new(),
    };

    page.lines(&content.name, TextStyle::NAME, 0);
    page.lines(&content.title, TextStyle::TITLE, 0);
    page.lines(
        &format!("{}    {}", content.email, content.phone),
        TextStyle::CONTACT,
        0,
    );

    page.heading("Summary");
    page.lines(&content.summary, TextStyle::BODY, 0);
    page.gap(24);

    page.heading("Experience");
    page.bullet_list(&content.experience);
    page.gap(20);

    page.heading("Education");
    page.bullet_list(&content.education);
    page.gap(20);

    page.heading("Skills");
    page.chips(&content.skills);

    let height = page.cursor_y + config.padding_px;
    if height > config.max_height_px {
        return Err(RenderError::Layout(format!(
            "page height {height}px exceeds the {}px limit",
            config.max_height_px
        )));
    }

    Ok(RasterPage {
        width: config.width_px,
        height,
        background,
        ops: page.ops,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing
// ────────────────────────────────────────────────────────────────────────────

/// Replays the display list onto a fresh RGBA buffer.
pub fn draw_page(page: &RasterPage) -> Result<RgbaImage, RenderError> {
    if page.width == 0 || page.height == 0 {
        return Err(RenderError::Raster("empty page".to_string()));
    }
    let [r, g, b] = page.background;
    let mut img = RgbaImage::from_pixel(page.width, page.height, Rgba([r, g, b, 255]));

    for op in &page.ops {
        match op {
            DrawOp::Fill { x, y, w, h, color } => fill_rect(&mut img, *x, *y, *w, *h, *color),
            DrawOp::Text { x, y, style, text } => draw_text(&mut img, *x, *y, *style, text),
        }
    }
    Ok(img)
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    let [r, g, b] = color;
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, Rgba([r, g, b, 255]));
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(img: &mut RgbaImage, x: u32, y: u32, style: TextStyle, text: &str) {
    let cell = style.char_width();
    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * cell;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_CELL {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * style.scale;
                let py = y + row as u32 * style.scale;
                // Bold is a one-pixel horizontal overstrike.
                let w = style.scale + u32::from(style.bold);
                fill_rect(img, px, py, w, style.scale, style.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    // ── wrap_text ───────────────────────────────────────────────────────────

    #[test]
    fn test_wrap_empty_returns_no_lines() {
        assert!(wrap_text("", 10).is_empty());
        assert!(wrap_text("   \n ", 10).is_empty());
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_text("Rust and Go", 20), vec!["Rust and Go"]);
    }

    #[test]
    fn test_wrap_breaks_at_word_boundaries() {
        assert_eq!(
            wrap_text("alpha beta gamma delta", 11),
            vec!["alpha beta", "gamma delta"]
        );
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        assert_eq!(
            wrap_text("ab abcdefghij", 4),
            vec!["ab", "abcd", "efgh", "ij"]
        );
    }

    // ── layout ──────────────────────────────────────────────────────────────

    #[test]
    fn test_layout_seed_content() {
        let page = layout_page(&ResumeContent::default(), WHITE, &RasterConfig::default()).unwrap();
        assert_eq!(page.width, 800);
        assert!(page.height > 400);
        // name, title, contact, 4 headings, summary, 4 entries, 5 chips at minimum
        assert!(page.line_count() >= 17);
    }

    #[test]
    fn test_layout_grows_with_entries() {
        let config = RasterConfig::default();
        let mut content = ResumeContent::default();
        let short = layout_page(&content, WHITE, &config).unwrap();
        content.append_experience();
        content.set_experience_at(2, "Intern at Small Shop (2015)").unwrap();
        let taller = layout_page(&content, WHITE, &config).unwrap();
        assert!(taller.height > short.height);
    }

    #[test]
    fn test_layout_rejects_narrow_page() {
        let config = RasterConfig {
            width_px: 64,
            ..RasterConfig::default()
        };
        let err = layout_page(&ResumeContent::default(), WHITE, &config).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
    }

    #[test]
    fn test_layout_rejects_oversized_page() {
        let config = RasterConfig {
            max_height_px: 200,
            ..RasterConfig::default()
        };
        assert!(layout_page(&ResumeContent::default(), WHITE, &config).is_err());
    }

    // ── drawing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_draw_page_uses_background_and_ink() {
        let mint = [0xe8, 0xf3, 0xf1];
        let page = layout_page(&ResumeContent::default(), mint, &RasterConfig::default()).unwrap();
        let img = draw_page(&page).unwrap();
        assert_eq!((img.width(), img.height()), (page.width, page.height));
        assert_eq!(img.get_pixel(0, 0).0, [0xe8, 0xf3, 0xf1, 255]);
        let inked = img
            .pixels()
            .filter(|p| p.0[..3] == INK_DARK[..])
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_glyph_falls_back_for_unknown_chars() {
        assert_eq!(glyph('\u{1F600}'), glyph('?'));
        assert_ne!(glyph('A'), [0; 8]);
    }
}
