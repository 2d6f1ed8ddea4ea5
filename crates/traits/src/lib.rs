pub mod source;

pub use source::{SourceError, Table, TableReader, TextExtractor};
