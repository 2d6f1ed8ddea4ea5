//! Importing the pages of an existing document into another one.

use crate::ComposerError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes that may be inherited from an ancestor `Pages` node.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];
const MAX_TREE_DEPTH: usize = 64;

/// Tracks the state of copying objects from one document into another.
struct ObjectCopier<'a> {
    source_doc: &'a Document,
    target_doc: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source_doc: &'a Document, target_doc: &'a mut Document) -> Self {
        Self { source_doc, target_doc, id_map: HashMap::new() }
    }

    /// Allocates a placeholder in the target for `source_id` without copying it yet.
    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);
        new_id
    }

    /// Deep copies an object and everything it references. Each source object
    /// is copied once; the placeholder is registered before recursing so that
    /// reference cycles (Page -> Annot -> Page) terminate.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, ComposerError> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        let new_id = self.reserve(source_id);
        // A reference to a missing object is the null object; the slot stays Null.
        let Some(obj) = self.source_doc.objects.get(&source_id).cloned() else {
            log::debug!("Dangling reference {:?} imported as null", source_id);
            return Ok(new_id);
        };
        let new_obj = self.remap_references(obj)?;
        self.fill(new_id, new_obj)?;
        Ok(new_id)
    }

    /// Copies a page into its reserved slot. The page is detached from the
    /// source page tree: inherited attributes are materialised on the page
    /// itself and `Parent` is dropped so the source tree is not dragged along.
    fn copy_page(&mut self, source_id: ObjectId, target_id: ObjectId) -> Result<(), ComposerError> {
        let mut page = self.source_doc.get_object(source_id)?.as_dict()?.clone();
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source_doc, &page, key) {
                page.set(key, value);
            }
        }
        page.remove(b"Parent");

        let new_obj = self.remap_references(Object::Dictionary(page))?;
        self.fill(target_id, new_obj)
    }

    fn fill(&mut self, target_id: ObjectId, obj: Object) -> Result<(), ComposerError> {
        match self.target_doc.objects.get_mut(&target_id) {
            Some(slot) => {
                *slot = obj;
                Ok(())
            }
            None => Err(lopdf::Error::ObjectNotFound(target_id).into()),
        }
    }

    /// Replaces every `Object::Reference` with the id of its copy in the target.
    fn remap_references(&mut self, obj: Object) -> Result<Object, ComposerError> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => {
                let new_arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(new_arr))
            }
            Object::Dictionary(mut dict) => {
                self.remap_dictionary(&mut dict)?;
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                self.remap_dictionary(&mut stream.dict)?;
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }

    fn remap_dictionary(&mut self, dict: &mut Dictionary) -> Result<(), ComposerError> {
        for (_, value) in dict.iter_mut() {
            *value = self.remap_references(value.clone())?;
        }
        Ok(())
    }
}

/// Looks `key` up on the ancestors of `page`, nearest first.
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_object(parent?).and_then(Object::as_dict).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Appends every page of `source`, in page order, to the page tree of `target`.
///
/// Pages are deep-copied together with everything they reference (content
/// streams, fonts, images, annotations) under fresh object ids. Returns the
/// number of pages appended.
///
/// **Note:** document-level structures of `source` (outlines, named
/// destinations, AcroForm) are not carried over.
pub fn merge_documents(target: &mut Document, source: Document) -> Result<usize, ComposerError> {
    // BTreeMap keyed by page number, so iteration is already in page order.
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }

    let pages_id = target_pages_id(target)?;
    let mut copier = ObjectCopier::new(&source, target);

    // Reserve every page first so cross-page references resolve to the
    // imported pages rather than to raw copies.
    let reserved: Vec<(ObjectId, ObjectId)> = source_pages
        .iter()
        .map(|&page_id| (page_id, copier.reserve(page_id)))
        .collect();
    for &(source_id, target_id) in &reserved {
        copier.copy_page(source_id, target_id)?;
    }

    let new_page_ids: Vec<ObjectId> = reserved.into_iter().map(|(_, target_id)| target_id).collect();
    for &page_id in &new_page_ids {
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let appended = new_page_ids.len();
    append_kids(target, pages_id, new_page_ids)?;
    Ok(appended)
}

pub(crate) fn target_pages_id(doc: &Document) -> Result<ObjectId, ComposerError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let root_dict = doc.get_object(root_id)?.as_dict()?;
    Ok(root_dict.get(b"Pages")?.as_reference()?)
}

/// Appends page references to the `Kids` of the root `Pages` node and bumps `Count`.
pub(crate) fn append_kids(
    doc: &mut Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
) -> Result<(), ComposerError> {
    let pages_dict = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let original_count = pages_dict.get(b"Count")?.as_i64()?;
    let added = page_ids.len() as i64;

    kids.extend(page_ids.into_iter().map(Object::Reference));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", original_count + added);
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::create_dummy_pdf;
    use super::*;

    fn page_text(doc: &Document, page_number: u32) -> String {
        let page_id = *doc.get_pages().get(&page_number).unwrap();
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).to_string()
    }

    #[test]
    fn test_merge_documents_append() {
        let mut target_doc = create_dummy_pdf(2, "Target Page");
        let source_doc = create_dummy_pdf(3, "Source Page");

        let appended = merge_documents(&mut target_doc, source_doc).unwrap();

        assert_eq!(appended, 3);
        assert_eq!(target_doc.get_pages().len(), 5);
        assert!(page_text(&target_doc, 2).contains("Target Page 2"));
        assert!(page_text(&target_doc, 3).contains("Source Page 1"));
        assert!(page_text(&target_doc, 5).contains("Source Page 3"));
    }

    #[test]
    fn test_inherited_media_box_is_materialised() {
        let mut target_doc = create_dummy_pdf(1, "Target Page");
        let source_doc = create_dummy_pdf(1, "Source Page");

        merge_documents(&mut target_doc, source_doc).unwrap();

        let pages = target_doc.get_pages();
        let imported = target_doc.get_object(pages[&2]).unwrap().as_dict().unwrap();
        let media_box = imported.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 595);

        let parent = imported.get(b"Parent").unwrap().as_reference().unwrap();
        assert_eq!(parent, target_pages_id(&target_doc).unwrap());
    }

    #[test]
    fn test_dangling_reference_becomes_null() {
        let mut target_doc = create_dummy_pdf(1, "Target Page");
        let mut source_doc = create_dummy_pdf(1, "Source Page");
        let page_id = source_doc.get_pages()[&1];
        source_doc
            .get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Annots", vec![Object::Reference((9999, 0))]);

        assert_eq!(merge_documents(&mut target_doc, source_doc).unwrap(), 1);

        let imported_id = target_doc.get_pages()[&2];
        let imported = target_doc.get_object(imported_id).unwrap().as_dict().unwrap();
        let annot = imported.get(b"Annots").unwrap().as_array().unwrap()[0]
            .as_reference()
            .unwrap();
        assert!(matches!(target_doc.get_object(annot).unwrap(), Object::Null));
        assert!(page_text(&target_doc, 2).contains("Source Page 1"));
    }

    #[test]
    fn test_merge_empty_source_is_noop() {
        let mut target_doc = create_dummy_pdf(2, "Target Page");
        let source_doc = create_dummy_pdf(0, "Nothing");

        assert_eq!(merge_documents(&mut target_doc, source_doc).unwrap(), 0);
        assert_eq!(target_doc.get_pages().len(), 2);
    }

    #[test]
    fn test_shared_resources_copied_once() {
        let mut target_doc = create_dummy_pdf(1, "Target Page");
        let source_doc = create_dummy_pdf(3, "Source Page");

        merge_documents(&mut target_doc, source_doc).unwrap();

        let pages = target_doc.get_pages();
        let resources: Vec<ObjectId> = (2..=4)
            .map(|n| {
                target_doc
                    .get_object(pages[&n])
                    .unwrap()
                    .as_dict()
                    .unwrap()
                    .get(b"Resources")
                    .unwrap()
                    .as_reference()
                    .unwrap()
            })
            .collect();
        assert!(resources.windows(2).all(|w| w[0] == w[1]));
    }
}
