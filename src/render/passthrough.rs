//! Existing PDF files, imported page for page.

use crate::error::ConversionError;
use lopdf::Document;

/// Parses a PDF so its pages can be imported unchanged. Encrypted files are
/// rejected because their streams cannot be copied without the key.
pub fn load_pdf(bytes: &[u8]) -> Result<Document, ConversionError> {
    let doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        return Err(ConversionError::EncryptedPdf);
    }
    log::debug!("Loaded PDF {} with {} page(s)", doc.version, doc.get_pages().len());
    Ok(doc)
}
