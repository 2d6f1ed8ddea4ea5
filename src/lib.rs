//! Ordered multi-format conversion and merge into a single PDF.
//!
//! A batch is an ordered list of named byte buffers. Each item is detected by
//! its file extension, rendered to pages (text, images, spreadsheets, CSV) or
//! imported verbatim (PDF), and appended to one output document in
//! submission order. Unsupported items are skipped and broken ones are
//! recorded as failures; neither aborts the batch.
//!
//! ```no_run
//! use docmerge::ConverterBuilder;
//!
//! let converter = ConverterBuilder::new().build();
//! let result = converter.convert(vec![
//!     ("notes.txt", std::fs::read("notes.txt")?),
//!     ("scan.png", std::fs::read("scan.png")?),
//! ])?;
//! std::fs::write("merged.pdf", result.pdf())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod settings;

pub use document::{DocumentKind, Format, SourceDocument};
pub use error::{ConversionError, PipelineError, SUPPORTED_FORMATS};
pub use pipeline::{
    BatchAssembler, BatchConverter, BatchLimits, BatchResult, ConverterBuilder, ItemOutcome, ItemReport,
};
pub use render::{ImagePolicy, Renderers};
pub use settings::Settings;

/// Converts a batch with the default renderers and limits.
pub fn convert_batch<I, N>(inputs: I) -> Result<BatchResult, PipelineError>
where
    I: IntoIterator<Item = (N, Vec<u8>)>,
    N: Into<String>,
{
    BatchConverter::default().convert(inputs)
}
