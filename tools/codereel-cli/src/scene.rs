//! A scene element that replays source text as a typing animation.
//!
//! Rendering is deliberately crude: each printable character becomes a
//! filled block in a monospace cell grid, small punctuation becomes a
//! low block, whitespace stays empty. The result reads as code without
//! any font rasterization or syntax coloring.

use std::sync::atomic::{AtomicUsize, Ordering};

use codereel_capture_engine::{RasterRequest, SceneElement};
use codereel_common::CodereelResult;
use codereel_media_model::{Bitmap, Rect};

const EDITOR_BG: [u8; 4] = [40, 44, 52, 255];
const CHROME_BG: [u8; 4] = [33, 37, 43, 255];
const TEXT_BLOCK: [u8; 4] = [171, 178, 191, 255];
const GUTTER_BLOCK: [u8; 4] = [92, 99, 112, 255];
const CARET: [u8; 4] = [97, 175, 239, 255];
const DOT_CLOSE: [u8; 4] = [224, 108, 117, 255];
const DOT_MINIMIZE: [u8; 4] = [229, 192, 123, 255];
const DOT_MAXIMIZE: [u8; 4] = [152, 195, 121, 255];

const CHROME_HEIGHT: u32 = 36;
const PADDING: i64 = 16;
const TAB_CELLS: usize = 4;

/// Display preferences lifted from persisted settings.
pub struct SceneOptions {
    pub window_title: String,
    pub file_name: String,
    pub hide_file_name: bool,
    pub hide_line_numbers: bool,
    pub font_size: u32,
}

/// An editor window whose content is a growing prefix of `text`.
///
/// The visible-character count is the only moving part. The capture
/// clock rasterizes concurrently with the host advancing it, so the
/// count lives in an atomic and `rasterize` takes `&self`.
pub struct TypingScene {
    rect: Rect,
    text: Vec<char>,
    visible: AtomicUsize,
    options: SceneOptions,
}

impl TypingScene {
    pub fn new(width: u32, height: u32, text: &str, options: SceneOptions) -> Self {
        Self {
            rect: Rect::sized(f64::from(width), f64::from(height)),
            text: text.chars().collect(),
            visible: AtomicUsize::new(0),
            options,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.len()
    }

    /// Reveal the first `count` characters on the next rasterization.
    pub fn set_visible(&self, count: usize) {
        self.visible.store(count.min(self.text.len()), Ordering::SeqCst);
    }

    fn cell_width(&self) -> i64 {
        i64::from((self.options.font_size * 3 / 5).max(3))
    }

    fn glyph_height(&self) -> i64 {
        i64::from(self.options.font_size.max(4))
    }

    fn line_height(&self) -> i64 {
        self.glyph_height() * 3 / 2
    }

    fn title(&self) -> Option<&str> {
        if !self.options.window_title.is_empty() {
            Some(&self.options.window_title)
        } else if self.options.hide_file_name {
            None
        } else {
            Some(&self.options.file_name)
        }
    }

    fn draw_chrome(&self, bitmap: &mut Bitmap, width: u32) {
        bitmap.fill_rect(0, 0, width, CHROME_HEIGHT, CHROME_BG);

        let dot_y = i64::from(CHROME_HEIGHT - 12) / 2;
        for (index, color) in [DOT_CLOSE, DOT_MINIMIZE, DOT_MAXIMIZE].into_iter().enumerate() {
            bitmap.fill_rect(12 + index as i64 * 20, dot_y, 12, 12, color);
        }

        if let Some(title) = self.title() {
            let y = i64::from(CHROME_HEIGHT - 8) / 2;
            draw_block_run(bitmap, title, 80, y, 6, 8, TEXT_BLOCK);
        }
    }

    fn draw_body(&self, bitmap: &mut Bitmap, height: u32) {
        let visible = self.visible.load(Ordering::SeqCst).min(self.text.len());
        let cell_w = self.cell_width();
        let glyph_h = self.glyph_height();
        let line_h = self.line_height();

        let gutter_cells = if self.options.hide_line_numbers { 0 } else { 4 };
        let text_x = PADDING + gutter_cells as i64 * cell_w;
        let top = i64::from(CHROME_HEIGHT) + PADDING;

        let mut line: i64 = 0;
        let mut col: usize = 0;
        let mut gutter_drawn_through: i64 = -1;

        for &ch in &self.text[..visible] {
            let y = top + line * line_h;
            if y >= i64::from(height) {
                break;
            }
            if gutter_cells > 0 && line > gutter_drawn_through {
                let label = format!("{:>3}", line + 1);
                draw_block_run(bitmap, &label, PADDING, y, cell_w, glyph_h, GUTTER_BLOCK);
                gutter_drawn_through = line;
            }
            match ch {
                '\n' => {
                    line += 1;
                    col = 0;
                }
                '\t' => col += TAB_CELLS,
                _ => {
                    draw_glyph_block(
                        bitmap,
                        text_x + col as i64 * cell_w,
                        y,
                        ch,
                        cell_w,
                        glyph_h,
                        TEXT_BLOCK,
                    );
                    col += 1;
                }
            }
        }

        let caret_y = top + line * line_h;
        if caret_y < i64::from(height) {
            if gutter_cells > 0 && line > gutter_drawn_through {
                let label = format!("{:>3}", line + 1);
                draw_block_run(bitmap, &label, PADDING, caret_y, cell_w, glyph_h, GUTTER_BLOCK);
            }
            bitmap.fill_rect(
                text_x + col as i64 * cell_w,
                caret_y,
                2,
                glyph_h as u32,
                CARET,
            );
        }
    }
}

#[async_trait::async_trait]
impl SceneElement for TypingScene {
    fn is_mounted(&self) -> bool {
        true
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    async fn rasterize(&self, request: &RasterRequest) -> CodereelResult<Bitmap> {
        let mut bitmap = Bitmap::new(request.width, request.height);
        bitmap.fill(request.background.unwrap_or(EDITOR_BG));
        self.draw_chrome(&mut bitmap, request.width);
        self.draw_body(&mut bitmap, request.height);
        Ok(bitmap)
    }
}

/// Draw a one-line run of characters as blocks starting at (x, y).
fn draw_block_run(
    bitmap: &mut Bitmap,
    text: &str,
    x: i64,
    y: i64,
    cell_w: i64,
    glyph_h: i64,
    color: [u8; 4],
) {
    for (index, ch) in text.chars().enumerate() {
        draw_glyph_block(bitmap, x + index as i64 * cell_w, y, ch, cell_w, glyph_h, color);
    }
}

fn draw_glyph_block(
    bitmap: &mut Bitmap,
    x: i64,
    y: i64,
    ch: char,
    cell_w: i64,
    glyph_h: i64,
    color: [u8; 4],
) {
    if ch.is_whitespace() {
        return;
    }
    let w = (cell_w - 1).max(1) as u32;
    if matches!(ch, '.' | ',' | '\'' | '"' | '`' | ';' | ':' | '_') {
        let low_h = (glyph_h / 3).max(1) as u32;
        bitmap.fill_rect(x, y + glyph_h - i64::from(low_h), w, low_h, color);
    } else {
        bitmap.fill_rect(x, y, w, glyph_h as u32, color);
    }
}
