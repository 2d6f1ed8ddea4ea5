//! Raw text extraction from `.docx` packages.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml`. Only
//! run text is kept. Each paragraph is followed by a blank line, matching the
//! usual "raw text" rendering of Word documents.

use docmerge_traits::{SourceError, TextExtractor};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Default, Clone, Copy)]
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(bytes: &[u8]) -> Result<String, SourceError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| SourceError::Archive(e.to_string()))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|_| SourceError::MissingPart(DOCUMENT_PART.to_string()))?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }
}

impl TextExtractor for DocxTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, SourceError> {
        let xml = Self::read_document_part(bytes)?;
        let text = paragraphs_to_text(&xml)?;
        log::debug!("Extracted {} characters from {}", text.len(), DOCUMENT_PART);
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "docx"
    }
}

/// Walks the WordprocessingML body and concatenates run text.
///
/// `w:tab` and `w:br` only count inside a run; the same element names appear
/// in paragraph properties as tab-stop and break definitions.
fn paragraphs_to_text(xml: &str) -> Result<String, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => text.push_str(PARAGRAPH_SEPARATOR),
                b"tab" if run_depth > 0 => text.push('\t'),
                b"br" | b"cr" if run_depth > 0 => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => text.push_str(PARAGRAPH_SEPARATOR),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| SourceError::Malformed(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::Malformed(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
