// src/pipeline/assembler.rs
use super::report::{BatchResult, ItemReport};
use crate::document::{DocumentKind, Format, SourceDocument};
use crate::error::{ConversionError, PipelineError};
use crate::render::{Rendered, Renderers};
use docmerge_pdf_composer::OutputDocument;
use log::{error, info, warn};

/// Merges the documents of one batch, in the order they are processed, into
/// a single PDF.
///
/// The assembler starts empty and creates its output document when the first
/// item is processed. `finish` consumes it, so an assembler serves exactly
/// one batch: it either yields the serialized PDF or, when no item produced
/// a page, [`PipelineError::NoValidFiles`].
pub struct BatchAssembler<'r> {
    renderers: &'r Renderers,
    output: Option<OutputDocument>,
    items: Vec<ItemReport>,
}

impl<'r> BatchAssembler<'r> {
    pub fn new(renderers: &'r Renderers) -> Self {
        Self {
            renderers,
            output: None,
            items: Vec::new(),
        }
    }

    /// Pages accumulated so far.
    pub fn page_count(&self) -> usize {
        self.output.as_ref().map_or(0, OutputDocument::page_count)
    }

    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    /// Converts one document and appends its pages. Skips and failures are
    /// recorded, never returned. The document is dropped before this returns,
    /// which releases any staged file behind it.
    pub fn process(&mut self, document: SourceDocument, total: usize) {
        let ordinal = document.ordinal();
        info!("Processing file {}/{}: {}", ordinal + 1, total, document.name());

        let output = self.output.get_or_insert_with(OutputDocument::new);
        let report = match document.kind() {
            DocumentKind::Unsupported { extension } => {
                warn!(
                    "Skipping unsupported file '{}' (extension '{}')",
                    document.name(),
                    extension
                );
                ItemReport::skipped(ordinal, document.name())
            }
            DocumentKind::Supported(format) => {
                match convert_into(self.renderers, *format, &document, output) {
                    Ok(pages) => {
                        info!("Converted '{}' as {} ({} page(s))", document.name(), format, pages);
                        ItemReport::converted(ordinal, document.name(), pages)
                    }
                    Err(e) => {
                        error!("Error converting file '{}': {}", document.name(), e);
                        ItemReport::failed(ordinal, document.name(), e.to_string())
                    }
                }
            }
        };
        self.items.push(report);
    }

    /// Records an item that failed before it could be processed, such as
    /// when staging it was impossible.
    pub fn record_failure(&mut self, ordinal: usize, name: &str, reason: &ConversionError) {
        error!("Error converting file '{}': {}", name, reason);
        self.output.get_or_insert_with(OutputDocument::new);
        self.items.push(ItemReport::failed(ordinal, name, reason.to_string()));
    }

    /// Serializes the merged document, or fails the whole batch when no
    /// item contributed a page.
    pub fn finish(self) -> Result<BatchResult, PipelineError> {
        match self.output {
            Some(output) if !output.is_empty() => {
                let total_pages = output.page_count();
                let pdf = output.finish()?;
                info!(
                    "Merged {} page(s) from {} file(s) into {} bytes",
                    total_pages,
                    self.items.len(),
                    pdf.len()
                );
                Ok(BatchResult::new(pdf, total_pages, self.items))
            }
            _ => {
                error!("No valid files could be converted in a batch of {}", self.items.len());
                Err(PipelineError::NoValidFiles { items: self.items })
            }
        }
    }
}

/// Renders `document` and moves its pages into `output`. On error nothing
/// has been appended.
fn convert_into(
    renderers: &Renderers,
    format: Format,
    document: &SourceDocument,
    output: &mut OutputDocument,
) -> Result<usize, ConversionError> {
    let bytes = document.content().bytes()?;
    let rendered = renderers.render(format, document.name(), &bytes)?;
    let pages = match rendered {
        Rendered::Pages(content) => output.append_pages(content.pages())?.len(),
        Rendered::Pdf(doc) => output.append_document(doc)?,
    };
    Ok(pages)
}
