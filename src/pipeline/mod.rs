//! Batch conversion.
//!
//! - [`ConverterBuilder`] / [`BatchConverter`]: the entry point. Validates the
//!   batch against [`BatchLimits`], optionally stages each item, and drives
//!   the assembler.
//! - [`BatchAssembler`]: owns the output document for one batch and turns
//!   each source document into pages, a skip, or a recorded failure.
//! - [`BatchResult`]: the merged PDF plus per-item outcomes.

mod assembler;
mod builder;
pub mod limits;
pub mod report;

pub use assembler::BatchAssembler;
pub use builder::{BatchConverter, ConverterBuilder};
pub use limits::BatchLimits;
pub use report::{BatchResult, BatchSummary, ItemOutcome, ItemReport};
