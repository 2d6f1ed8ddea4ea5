//! The append-only document that a batch accumulates into.

use crate::merge::{append_kids, merge_documents};
use crate::page_writer::write_page;
use crate::ComposerError;
use docmerge_types::PageDescriptor;
use lopdf::{Document, Object, ObjectId, StringFormat, dictionary};

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = "docmerge";

/// A PDF under construction. Pages can only be appended; `finish` consumes
/// the document, so it is serialized exactly once.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_count: usize,
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0i64,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self { doc, pages_id, font_id, page_count: 0 }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    /// Writes a synthesized page after the current last page.
    pub fn append_page(&mut self, page: &PageDescriptor) -> Result<ObjectId, ComposerError> {
        let mut ids = self.append_pages(std::slice::from_ref(page))?;
        ids.pop()
            .ok_or_else(|| ComposerError::Other("page was not written".to_string()))
    }

    /// Writes synthesized pages in order. The page tree is only touched once
    /// every page has been written, so a failure adds no pages at all.
    pub fn append_pages(&mut self, pages: &[PageDescriptor]) -> Result<Vec<ObjectId>, ComposerError> {
        let page_ids = self.atomically(|this| {
            let mut page_ids = Vec::with_capacity(pages.len());
            for page in pages {
                let mut page_dict = write_page(&mut this.doc, page, this.font_id)?;
                page_dict.set("Parent", Object::Reference(this.pages_id));
                page_ids.push(this.doc.add_object(page_dict));
            }
            append_kids(&mut this.doc, this.pages_id, page_ids.clone())?;
            Ok(page_ids)
        })?;
        self.page_count += page_ids.len();
        Ok(page_ids)
    }

    /// Imports every page of an existing document, in order. Returns the
    /// number of pages added.
    pub fn append_document(&mut self, source: Document) -> Result<usize, ComposerError> {
        let added = self.atomically(|this| merge_documents(&mut this.doc, source))?;
        self.page_count += added;
        Ok(added)
    }

    /// Runs `op` and, if it fails, drops every object it allocated.
    ///
    /// Object ids are handed out in increasing order, so everything above
    /// the mark was created by `op`. The page tree is only updated as the
    /// last step of each append, so it never refers to a dropped object.
    fn atomically<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, ComposerError>,
    ) -> Result<T, ComposerError> {
        let mark = self.doc.max_id;
        let result = op(self);
        if result.is_err() {
            self.rollback_to(mark);
        }
        result
    }

    fn rollback_to(&mut self, mark: u32) {
        let before = self.doc.objects.len();
        self.doc.objects.retain(|&(number, _), _| number <= mark);
        self.doc.max_id = mark;
        log::debug!(
            "Released {} objects of a failed append",
            before - self.doc.objects.len()
        );
    }

    /// Number of objects the document holds, the page tree and shared font included.
    pub fn object_count(&self) -> usize {
        self.doc.objects.len()
    }

    /// Serializes the document.
    pub fn finish(mut self) -> Result<Vec<u8>, ComposerError> {
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::String(PRODUCER.as_bytes().to_vec(), StringFormat::Literal),
        });
        self.doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        log::debug!(
            "Serialized {} pages into {} bytes",
            self.page_count,
            buffer.len()
        );
        Ok(buffer)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
