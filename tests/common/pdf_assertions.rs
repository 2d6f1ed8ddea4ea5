use lopdf::Document as LopdfDocument;

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// MediaBox of every page, in page order. Inherited boxes are resolved.
#[allow(dead_code)]
pub fn media_boxes(doc: &LopdfDocument) -> Vec<[f32; 4]> {
    doc.get_pages()
        .values()
        .filter_map(|page_id| media_box(doc, *page_id))
        .collect()
}

fn media_box(doc: &LopdfDocument, mut node_id: lopdf::ObjectId) -> Option<[f32; 4]> {
    for _ in 0..32 {
        let dict = doc.get_dictionary(node_id).ok()?;
        if let Ok(array) = dict.get(b"MediaBox").and_then(|obj| obj.as_array()) {
            let values: Vec<f32> = array.iter().filter_map(|v| v.as_float().ok()).collect();
            return values.try_into().ok();
        }
        node_id = dict.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
    }
    None
}

/// Number of image XObjects referenced by a page, numbered from 1
#[allow(dead_code)]
pub fn image_count(doc: &LopdfDocument, page: u32) -> usize {
    let Some(page_id) = doc.get_pages().get(&page).copied() else {
        return 0;
    };
    let Some(resources) = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Resources"))
        .ok()
        .and_then(|res| match res.as_reference() {
            Ok(id) => doc.get_dictionary(id).ok(),
            Err(_) => res.as_dict().ok(),
        })
    else {
        return 0;
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return 0;
    };
    let xobjects = match xobjects.as_reference() {
        Ok(id) => doc.get_dictionary(id).ok(),
        Err(_) => xobjects.as_dict().ok(),
    };
    xobjects.map_or(0, |dict| {
        dict.iter()
            .filter_map(|(_, value)| value.as_reference().ok())
            .filter_map(|id| doc.get_object(id).ok())
            .filter_map(|obj| obj.as_stream().ok())
            .filter(|stream| {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false)
            })
            .count()
    })
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that a page, numbered from 1, contains specific text
#[macro_export]
macro_rules! assert_page_contains_text {
    ($pdf:expr, $page:expr, $text:expr) => {
        let extracted = $pdf.page_text($page);
        assert!(
            extracted.contains($text),
            "Page {} should contain '{}', but its text was:\n{}",
            $page,
            $text,
            extracted
        );
    };
}
