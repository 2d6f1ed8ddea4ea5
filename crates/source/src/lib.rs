//! Readers for the office formats the converter accepts.
//!
//! ## Available Readers
//!
//! - [`DocxTextExtractor`]: raw paragraph text from a `.docx` package
//! - [`WorkbookTableReader`]: first sheet of an `.xlsx`/`.xls` workbook
//!
//! Both implement the collaborator traits from `docmerge-traits`, so the
//! renderers only ever see plain strings and rows of cells.

mod docx;
mod workbook;

pub use docx::DocxTextExtractor;
pub use workbook::WorkbookTableReader;
