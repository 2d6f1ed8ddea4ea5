// src/render/mod.rs
//! Per-format page renderers.
//!
//! Every renderer turns the bytes of one source document into pages that are
//! owned by the caller. Synthesized pages come back as a `PageContent`;
//! existing PDFs come back as a parsed document whose pages are imported
//! verbatim.

pub mod image;
pub mod passthrough;
pub mod table;
pub mod text;

use crate::document::Format;
use crate::error::ConversionError;
use docmerge_source::{DocxTextExtractor, WorkbookTableReader};
use docmerge_traits::{TableReader, TextExtractor};
use docmerge_types::{Color, Drawable, PageContent, PageDescriptor, Size, TextRun};
use std::sync::Arc;

pub use self::image::ImagePolicy;

/// The pages produced for one source document.
#[derive(Debug)]
pub enum Rendered {
    Pages(PageContent),
    Pdf(lopdf::Document),
}

/// The set of renderers plus the collaborators they depend on.
#[derive(Debug, Clone)]
pub struct Renderers {
    text_extractor: Arc<dyn TextExtractor>,
    table_reader: Arc<dyn TableReader>,
    image_policy: ImagePolicy,
}

impl Default for Renderers {
    fn default() -> Self {
        Self {
            text_extractor: Arc::new(DocxTextExtractor::new()),
            table_reader: Arc::new(WorkbookTableReader::new()),
            image_policy: ImagePolicy::default(),
        }
    }
}

impl Renderers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.text_extractor = extractor;
        self
    }

    pub fn with_table_reader(mut self, reader: Arc<dyn TableReader>) -> Self {
        self.table_reader = reader;
        self
    }

    pub fn with_image_policy(mut self, policy: ImagePolicy) -> Self {
        self.image_policy = policy;
        self
    }

    /// Renders one document with the renderer matching `format`.
    pub fn render(&self, format: Format, name: &str, bytes: &[u8]) -> Result<Rendered, ConversionError> {
        let rendered = match format {
            Format::Text => Rendered::Pages(text::render_plain_text(bytes)?),
            Format::WordDocument => {
                let extracted = self.text_extractor.extract_text(bytes)?;
                Rendered::Pages(text::render_extracted_text(&extracted))
            }
            Format::Image => Rendered::Pages(image::render_image(bytes, &self.image_policy)?),
            Format::Spreadsheet => {
                let table = self.table_reader.read_first_table(bytes)?;
                Rendered::Pages(table::render_spreadsheet(&table))
            }
            Format::Csv => Rendered::Pages(table::render_csv(name, bytes)?),
            Format::Pdf => Rendered::Pdf(passthrough::load_pdf(bytes)?),
        };
        Ok(rendered)
    }
}

/// Vertical geometry for line-by-line layouts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineLayout {
    pub page_size: Size,
    pub left_margin: f32,
    /// Baseline of the first line on a page.
    pub top: f32,
    /// A new page starts once the baseline would fall below this.
    pub bottom: f32,
    pub line_height: f32,
}

/// Places lines top to bottom, opening a fresh page of the same size when
/// the baseline drops below the bottom margin.
pub(crate) struct LinePager {
    layout: LineLayout,
    y: f32,
    content: PageContent,
}

impl LinePager {
    pub fn new(layout: LineLayout) -> Self {
        let mut content = PageContent::new();
        content.push(PageDescriptor::new(layout.page_size));
        Self {
            layout,
            y: layout.top,
            content,
        }
    }

    /// Draws `text` on the current line and advances one line slot. Empty
    /// text still takes up its slot.
    pub fn line(&mut self, text: String, font_size: f32) {
        if self.y < self.layout.bottom {
            self.content.push(PageDescriptor::new(self.layout.page_size));
            self.y = self.layout.top;
        }
        self.draw(text, font_size);
        self.y -= self.layout.line_height;
    }

    /// Draws a heading at the current position and moves down by `gap`
    /// instead of the regular line height.
    pub fn heading(&mut self, text: String, font_size: f32, gap: f32) {
        self.draw(text, font_size);
        self.y -= gap;
    }

    fn draw(&mut self, text: String, font_size: f32) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            text,
            x: self.layout.left_margin,
            y: self.y,
            font_size,
            color: Color::BLACK,
        };
        if let Some(page) = self.content.last_mut() {
            page.push(Drawable::Text(run));
        }
    }

    pub fn finish(self) -> PageContent {
        self.content
    }
}

/// The first `max_chars` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: LineLayout = LineLayout {
        page_size: Size::LETTER_PORTRAIT,
        left_margin: 50.0,
        top: 750.0,
        bottom: 50.0,
        line_height: 15.0,
    };

    #[test]
    fn pager_breaks_after_bottom_margin() {
        let mut pager = LinePager::new(LAYOUT);
        for i in 0..48 {
            pager.line(format!("line {}", i), 12.0);
        }
        let content = pager.finish();

        assert_eq!(content.len(), 2);
        assert_eq!(content.pages()[0].text_runs().count(), 47);
        let first_on_second = content.pages()[1].text_runs().next().unwrap();
        assert_eq!(first_on_second.text, "line 47");
        assert_eq!(first_on_second.y, 750.0);
    }

    #[test]
    fn empty_lines_consume_slots_without_drawing() {
        let mut pager = LinePager::new(LAYOUT);
        pager.line("a".into(), 12.0);
        pager.line(String::new(), 12.0);
        pager.line("b".into(), 12.0);
        let content = pager.finish();

        let runs: Vec<_> = content.pages()[0].text_runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].y, 720.0);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
