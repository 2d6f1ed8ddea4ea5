// src/pipeline/builder.rs
use super::assembler::BatchAssembler;
use super::limits::BatchLimits;
use super::report::BatchResult;
use crate::document::SourceDocument;
use crate::error::{ConversionError, PipelineError};
use crate::render::Renderers;
use crate::settings::Settings;
use docmerge_resource::StagingArea;
use itertools::Itertools;
use log::info;
use std::path::Path;

/// A builder for creating a `BatchConverter`.
#[derive(Default)]
pub struct ConverterBuilder {
    renderers: Renderers,
    limits: BatchLimits,
    staging: Option<StagingArea>,
}

impl ConverterBuilder {
    /// Creates a builder with the stock renderers, default limits and no staging.
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies the limits and image policy from loaded settings.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.limits = settings.limits;
        self.renderers = self.renderers.with_image_policy(settings.image.clone());
        self
    }

    pub fn with_renderers(mut self, renderers: Renderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Writes every item to `dir` just before it is converted, and deletes
    /// it right after.
    pub fn with_staging_dir<P: AsRef<Path>>(mut self, dir: P) -> Result<Self, PipelineError> {
        self.staging = Some(StagingArea::new(dir)?);
        Ok(self)
    }

    pub fn build(self) -> BatchConverter {
        BatchConverter {
            renderers: self.renderers,
            limits: self.limits,
            staging: self.staging,
        }
    }
}

/// Converts ordered batches of named byte buffers into one merged PDF each.
///
/// A converter holds no per-batch state; every call gets its own assembler
/// and output document.
pub struct BatchConverter {
    renderers: Renderers,
    limits: BatchLimits,
    staging: Option<StagingArea>,
}

impl Default for BatchConverter {
    fn default() -> Self {
        ConverterBuilder::new().build()
    }
}

impl BatchConverter {
    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Converts `(name, bytes)` pairs, in the given order, into one PDF.
    ///
    /// The whole batch is rejected up front when it is empty, has too many
    /// items, or contains an oversized item. After that, problems with single
    /// items are recorded in the result and never abort the batch.
    pub fn convert<I, N>(&self, inputs: I) -> Result<BatchResult, PipelineError>
    where
        I: IntoIterator<Item = (N, Vec<u8>)>,
        N: Into<String>,
    {
        let inputs: Vec<(String, Vec<u8>)> = inputs
            .into_iter()
            .map(|(name, bytes)| (name.into(), bytes))
            .collect();
        self.limits
            .check(inputs.iter().map(|(name, bytes)| (name.as_str(), bytes.len() as u64)))?;

        let total = inputs.len();
        log_received_order(inputs.iter().map(|(name, _)| name.as_str()));

        let mut assembler = BatchAssembler::new(&self.renderers);
        for (ordinal, (name, bytes)) in inputs.into_iter().enumerate() {
            match self.prepare(ordinal, name.clone(), bytes) {
                Ok(document) => assembler.process(document, total),
                Err(e) => assembler.record_failure(ordinal, &name, &e),
            }
        }
        assembler.finish()
    }

    /// Converts documents that were already prepared by the caller. They are
    /// processed in ascending ordinal order.
    pub fn convert_documents(&self, documents: Vec<SourceDocument>) -> Result<BatchResult, PipelineError> {
        self.limits
            .check(documents.iter().map(|doc| (doc.name(), doc.size())))?;

        let documents: Vec<_> = documents.into_iter().sorted_by_key(SourceDocument::ordinal).collect();
        let total = documents.len();
        log_received_order(documents.iter().map(SourceDocument::name));

        let mut assembler = BatchAssembler::new(&self.renderers);
        for document in documents {
            assembler.process(document, total);
        }
        assembler.finish()
    }

    fn prepare(&self, ordinal: usize, name: String, bytes: Vec<u8>) -> Result<SourceDocument, ConversionError> {
        match &self.staging {
            Some(area) => {
                let staged = area.stage(&name, &bytes)?;
                Ok(SourceDocument::staged(ordinal, name, staged))
            }
            None => Ok(SourceDocument::new(ordinal, name, bytes)),
        }
    }
}

fn log_received_order<'a>(names: impl Iterator<Item = &'a str>) {
    info!("Files received in order:");
    for (index, name) in names.enumerate() {
        info!("  {}. {}", index + 1, name);
    }
}
