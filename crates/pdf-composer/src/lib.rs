//! PDF composition for the batch converter, built on lopdf:
//! - Writing synthesized pages (text runs, JPEG images) into a document
//! - Deep object copying with cycle detection for importing existing pages
//! - An append-only output document that is serialized exactly once

mod error;
mod merge;
mod output;
mod page_writer;

pub use error::ComposerError;
pub use merge::merge_documents;
pub use output::OutputDocument;
pub use page_writer::to_win_ansi;
