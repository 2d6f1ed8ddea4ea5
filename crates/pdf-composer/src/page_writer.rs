//! Turns a `PageDescriptor` into lopdf objects: one content stream, the page
//! resources, and one image XObject per placed image.

use crate::ComposerError;
use docmerge_types::{Drawable, ImagePlacement, PageDescriptor, TextRun};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

pub(crate) const FONT_RESOURCE_NAME: &str = "F1";

/// Writes the page's objects into `doc` and returns the page dictionary,
/// ready to be added with a `Parent` of the caller's choosing.
pub(crate) fn write_page(
    doc: &mut Document,
    page: &PageDescriptor,
    font_id: ObjectId,
) -> Result<Dictionary, ComposerError> {
    let mut ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for (index, element) in page.elements.iter().enumerate() {
        match element {
            Drawable::Text(run) => draw_text(&mut ops, run),
            Drawable::Image(image) => {
                let name = format!("Im{}", index);
                let image_id = doc.add_object(image_xobject(image));
                xobjects.set(name.as_bytes(), Object::Reference(image_id));
                draw_image(&mut ops, &name, image);
            }
        }
    }

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let mut resources = dictionary! {
        "Font" => dictionary! { FONT_RESOURCE_NAME => font_id },
    };
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }

    Ok(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), page.size.width.into(), page.size.height.into()],
        "Contents" => content_id,
        "Resources" => resources,
    })
}

fn draw_text(ops: &mut Vec<Operation>, run: &TextRun) {
    let [r, g, b] = run.color.to_unit_rgb();
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(FONT_RESOURCE_NAME.as_bytes().to_vec()), run.font_size.into()],
    ));
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    ops.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(to_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn draw_image(ops: &mut Vec<Operation>, name: &str, image: &ImagePlacement) {
    let rect = image.rect;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            rect.width.into(),
            0.into(),
            0.into(),
            rect.height.into(),
            rect.x.into(),
            rect.y.into(),
        ],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

fn image_xobject(image: &ImagePlacement) -> Stream {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.pixel_width as i64,
        "Height" => image.pixel_height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    // Already JPEG; a second Flate pass would only cost time.
    Stream::new(dict, image.jpeg.clone()).with_compression(false)
}

/// Encodes text for the standard Helvetica face with `WinAnsiEncoding`.
/// Characters the encoding has no code for become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(|c| win_ansi_code(c).unwrap_or(b'?')).collect()
}

/// Windows-1252 code for `c`. It matches Latin-1 except in 0x80..=0x9F,
/// where it carries typographic punctuation instead of C1 controls.
fn win_ansi_code(c: char) -> Option<u8> {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match c {
        '\u{20AC}' => 0x80, // euro
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // ellipsis
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91, // curly quotes
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_replaces_unencodable_characters() {
        assert_eq!(to_win_ansi("café"), b"caf\xe9".to_vec());
        assert_eq!(to_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn win_ansi_uses_windows_1252_punctuation() {
        assert_eq!(to_win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(to_win_ansi("“q”"), vec![0x93, b'q', 0x94]);
        assert_eq!(to_win_ansi("‘a’"), vec![0x91, b'a', 0x92]);
        assert_eq!(to_win_ansi("a – b — c"), b"a \x96 b \x97 c".to_vec());
        assert_eq!(to_win_ansi("…•™"), vec![0x85, 0x95, 0x99]);
    }

    #[test]
    fn win_ansi_rejects_c1_controls() {
        // U+0080..U+009F have no glyph; their bytes mean something else in 1252.
        assert_eq!(to_win_ansi("\u{0080}\u{0093}"), b"??".to_vec());
    }
}
