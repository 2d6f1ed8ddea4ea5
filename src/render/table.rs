//! Tabular pages for workbooks and CSV files.
//!
//! Rows are written as plain text lines with cells joined by `" | "`; there
//! is no column alignment.

use super::{LineLayout, LinePager, truncate_chars};
use crate::error::ConversionError;
use docmerge_traits::Table;
use docmerge_types::{PageContent, Size};
use itertools::Itertools;

const LAYOUT: LineLayout = LineLayout {
    page_size: Size::LETTER_LANDSCAPE,
    left_margin: 50.0,
    top: 560.0,
    bottom: 50.0,
    line_height: 15.0,
};
const TITLE_FONT_SIZE: f32 = 14.0;
const TITLE_GAP: f32 = 30.0;
const ROW_FONT_SIZE: f32 = 10.0;
const MAX_ROW_CHARS: usize = 120;
const CELL_SEPARATOR: &str = " | ";

/// Renders the first sheet of a workbook under a `Sheet: <name>` title.
pub fn render_spreadsheet(table: &Table) -> PageContent {
    render_rows(format!("Sheet: {}", table.name), table.rows.iter())
}

/// Renders a CSV file under a `File: <name>` title.
///
/// Every line is one row split on each literal comma. Quoted fields are not
/// recognised, so a comma inside quotes still splits the cell.
pub fn render_csv(name: &str, bytes: &[u8]) -> Result<PageContent, ConversionError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rows: Vec<Vec<&str>> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).split(',').collect())
        .collect();
    Ok(render_rows(format!("File: {}", name), rows.iter()))
}

fn render_rows<'a, R, C>(title: String, rows: R) -> PageContent
where
    R: Iterator<Item = &'a Vec<C>>,
    C: AsRef<str> + 'a,
{
    let mut pager = LinePager::new(LAYOUT);
    pager.heading(title, TITLE_FONT_SIZE, TITLE_GAP);
    for row in rows {
        let line = row.iter().map(AsRef::as_ref).join(CELL_SEPARATOR);
        pager.line(truncate_chars(&line, MAX_ROW_CHARS), ROW_FONT_SIZE);
    }
    pager.finish()
}
