pub mod fixtures;
pub mod pdf_assertions;

use docmerge::{BatchResult, ConverterBuilder, PipelineError};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a merged PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of one page, numbered from 1
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Convert a batch with the stock converter
pub fn convert(inputs: Vec<(&str, Vec<u8>)>) -> Result<BatchResult, PipelineError> {
    ConverterBuilder::new().build().convert(inputs)
}

/// Convert a batch and parse the merged output
pub fn convert_to_pdf(
    inputs: Vec<(&str, Vec<u8>)>,
) -> Result<(BatchResult, GeneratedPdf), Box<dyn std::error::Error>> {
    let result = convert(inputs)?;
    let pdf = GeneratedPdf::from_bytes(result.pdf().to_vec())?;
    Ok((result, pdf))
}
