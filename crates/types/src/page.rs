//! The page model produced by renderers and consumed by the composer.
//!
//! Coordinates follow PDF user space: the origin is the bottom-left corner of
//! the page and `y` grows upwards. A `TextRun`'s `y` is its baseline.

use crate::{Color, Rect, Size};

/// A single line of text drawn with the standard Helvetica face.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: Color,
}

/// A JPEG-encoded raster placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// Baseline JPEG bytes, embedded as-is with `DCTDecode`.
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Target rectangle on the page, in points.
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Text(TextRun),
    Image(ImagePlacement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    pub size: Size,
    pub elements: Vec<Drawable>,
}

impl PageDescriptor {
    pub fn new(size: Size) -> Self {
        Self { size, elements: Vec::new() }
    }

    pub fn push(&mut self, element: Drawable) {
        self.elements.push(element);
    }

    /// Text of every run on the page, in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|el| match el {
            Drawable::Text(run) => Some(run),
            Drawable::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImagePlacement> {
        self.elements.iter().filter_map(|el| match el {
            Drawable::Image(image) => Some(image),
            Drawable::Text(_) => None,
        })
    }
}

/// The ordered pages rendered for one source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pages: Vec<PageDescriptor>,
}

impl PageContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: PageDescriptor) {
        self.pages.push(page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn last_mut(&mut self) -> Option<&mut PageDescriptor> {
        self.pages.last_mut()
    }
}

impl From<Vec<PageDescriptor>> for PageContent {
    fn from(pages: Vec<PageDescriptor>) -> Self {
        Self { pages }
    }
}
