//! Source documents and format detection.

use docmerge_resource::StagedFile;
use std::borrow::Cow;
use std::fmt;
use std::io;

/// The formats the converter knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Text,
    Image,
    WordDocument,
    Spreadsheet,
    Csv,
    Pdf,
}

impl Format {
    /// Maps a lowercase extension (without the dot) to a format.
    pub fn from_extension(extension: &str) -> Option<Format> {
        match extension {
            "txt" => Some(Format::Text),
            "jpg" | "jpeg" | "png" | "gif" | "webp" => Some(Format::Image),
            "docx" => Some(Format::WordDocument),
            "xlsx" | "xls" => Some(Format::Spreadsheet),
            "csv" => Some(Format::Csv),
            "pdf" => Some(Format::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Text => "text",
            Format::Image => "image",
            Format::WordDocument => "word document",
            Format::Spreadsheet => "spreadsheet",
            Format::Csv => "csv",
            Format::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// The detected type of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Supported(Format),
    /// Anything else. Carries the lowercase extension (possibly empty).
    Unsupported { extension: String },
}

impl DocumentKind {
    /// Detects the kind from the lowercase extension of `name`. The content is
    /// never inspected.
    pub fn from_name(name: &str) -> DocumentKind {
        let extension = extension_of(name);
        match Format::from_extension(&extension) {
            Some(format) => DocumentKind::Supported(format),
            None => DocumentKind::Unsupported { extension },
        }
    }
}

/// The lowercase extension of the last path component, without the dot.
/// Dotfiles such as `.txt` have no extension.
fn extension_of(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Where a document's bytes live until it is processed.
#[derive(Debug)]
pub enum SourceContent {
    Memory(Vec<u8>),
    Staged(StagedFile),
}

impl SourceContent {
    pub fn bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            SourceContent::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            SourceContent::Staged(file) => file.read().map(Cow::Owned),
        }
    }
}

/// One item of a batch. Its ordinal is fixed at submission time.
#[derive(Debug)]
pub struct SourceDocument {
    ordinal: usize,
    name: String,
    kind: DocumentKind,
    content: SourceContent,
    size: u64,
}

impl SourceDocument {
    pub fn new(ordinal: usize, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::with_content(ordinal, name.into(), SourceContent::Memory(bytes), size)
    }

    pub fn staged(ordinal: usize, name: impl Into<String>, file: StagedFile) -> Self {
        let size = file.len();
        Self::with_content(ordinal, name.into(), SourceContent::Staged(file), size)
    }

    fn with_content(ordinal: usize, name: String, content: SourceContent, size: u64) -> Self {
        let kind = DocumentKind::from_name(&name);
        Self {
            ordinal,
            name,
            kind,
            content,
            size,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    pub fn content(&self) -> &SourceContent {
        &self.content
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
