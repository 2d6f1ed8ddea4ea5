//! What happened to each item of a batch.

use itertools::Itertools;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Converted,
    /// Unsupported extension. Not an error.
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub ordinal: usize,
    pub name: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
    /// Pages contributed to the output; zero unless converted.
    pub pages: usize,
}

impl ItemReport {
    pub fn converted(ordinal: usize, name: impl Into<String>, pages: usize) -> Self {
        Self { ordinal, name: name.into(), outcome: ItemOutcome::Converted, pages }
    }

    pub fn skipped(ordinal: usize, name: impl Into<String>) -> Self {
        Self { ordinal, name: name.into(), outcome: ItemOutcome::Skipped, pages: 0 }
    }

    pub fn failed(ordinal: usize, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: name.into(),
            outcome: ItemOutcome::Failed { reason: reason.into() },
            pages: 0,
        }
    }

    pub fn is_converted(&self) -> bool {
        self.outcome == ItemOutcome::Converted
    }
}

/// A successfully merged batch. Items are listed in submission order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(skip)]
    pdf: Vec<u8>,
    total_pages: usize,
    items: Vec<ItemReport>,
}

impl BatchResult {
    pub(crate) fn new(pdf: Vec<u8>, total_pages: usize, items: Vec<ItemReport>) -> Self {
        Self { pdf, total_pages, items }
    }

    pub fn pdf(&self) -> &[u8] {
        &self.pdf
    }

    pub fn into_pdf(self) -> Vec<u8> {
        self.pdf
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    pub fn converted(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| item.is_converted())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| item.outcome == ItemOutcome::Skipped)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
    }

    /// Comma-joined names of every submitted item.
    pub fn original_names(&self) -> String {
        self.items.iter().map(|item| item.name.as_str()).join(", ")
    }

    /// The upload-response shaped summary, for an output saved as `file_name`.
    pub fn summary<'a>(&'a self, file_name: &'a str) -> BatchSummary<'a> {
        BatchSummary {
            success: true,
            file_name,
            original_name: self.original_names(),
            file_count: self.items.len(),
            total_pages: self.total_pages,
            items: &self.items,
        }
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} page(s) from {} of {} file(s)",
            self.total_pages,
            self.converted().count(),
            self.items.len()
        )?;
        let skipped = self.skipped().count();
        if skipped > 0 {
            write!(f, ", {} skipped", skipped)?;
        }
        let failed = self.failed().count();
        if failed > 0 {
            write!(f, ", {} failed", failed)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary<'a> {
    pub success: bool,
    pub file_name: &'a str,
    pub original_name: String,
    pub file_count: usize,
    pub total_pages: usize,
    pub items: &'a [ItemReport],
}
