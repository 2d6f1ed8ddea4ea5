//! Staging storage for batch items.
//!
//! Items can be written to a staging directory when they are received and
//! read back when their turn comes. Each staged file is owned by a
//! [`StagedFile`] handle and removed when that handle is dropped, so a batch
//! never holds more than its in-flight items on disk. Files orphaned by a
//! crash are collected by [`StagingArea::sweep`]; [`sweep_dir`] applies the
//! same age rule to any other directory, such as the one merged output goes to.

mod staging;

pub use staging::{StagedFile, StagingArea, StagingError, sweep_dir};
