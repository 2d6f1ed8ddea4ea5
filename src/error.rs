// src/error.rs
use crate::pipeline::report::ItemReport;
use docmerge_pdf_composer::ComposerError;
use docmerge_traits::SourceError;
use thiserror::Error;

/// Comma-separated list of the accepted extensions, for user-facing messages.
pub const SUPPORTED_FORMATS: &str = "txt, jpg, jpeg, png, gif, webp, docx, xlsx, xls, csv, pdf";

/// Hard failures of a batch. Per-item problems never surface here; they are
/// recorded in the batch report instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No files uploaded")]
    EmptyBatch,

    #[error("Too many files: {count} submitted, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    #[error("File '{name}' is {size} bytes, exceeding the {max} byte limit")]
    FileTooLarge { name: String, size: u64, max: u64 },

    #[error("No valid files could be converted. Supported formats: {}", SUPPORTED_FORMATS)]
    NoValidFiles { items: Vec<ItemReport> },

    #[error("Failed to assemble output PDF: {0}")]
    Compose(#[from] ComposerError),

    #[error("Staging failed: {0}")]
    Staging(#[from] docmerge_resource::StagingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Why a single item could not be converted. The `Display` text is the
/// reason recorded for the item.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("text is not valid UTF-8: {0}")]
    TextDecode(#[from] std::str::Utf8Error),

    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("malformed PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("encrypted PDFs are not supported")]
    EncryptedPdf,

    #[error("could not read staged content: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not stage item: {0}")]
    Staging(#[from] docmerge_resource::StagingError),

    #[error("could not add pages to output: {0}")]
    Compose(#[from] ComposerError),
}
