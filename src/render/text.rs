//! Text pages: plain `.txt` files and text extracted from word-processor documents.

use super::{LineLayout, LinePager, truncate_chars};
use crate::error::ConversionError;
use docmerge_types::{PageContent, Size};

const LAYOUT: LineLayout = LineLayout {
    page_size: Size::LETTER_PORTRAIT,
    left_margin: 50.0,
    top: 750.0,
    bottom: 50.0,
    line_height: 15.0,
};
const FONT_SIZE: f32 = 12.0;
const MAX_LINE_CHARS: usize = 100;

/// Renders UTF-8 text one line per slot. Blank lines keep their slot; long
/// lines are cut, never wrapped.
pub fn render_plain_text(bytes: &[u8]) -> Result<PageContent, ConversionError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut pager = LinePager::new(LAYOUT);
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        pager.line(truncate_chars(line, MAX_LINE_CHARS), FONT_SIZE);
    }
    Ok(pager.finish())
}

/// Renders extracted document text. Lines are trimmed, and lines that are
/// empty after trimming are dropped without taking a slot.
pub fn render_extracted_text(text: &str) -> PageContent {
    let mut pager = LinePager::new(LAYOUT);
    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        pager.line(truncate_chars(line, MAX_LINE_CHARS), FONT_SIZE);
    }
    pager.finish()
}
