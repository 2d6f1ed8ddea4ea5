pub mod color;
pub mod geometry;
pub mod page;

pub use color::Color;
pub use geometry::{Rect, Size};
pub use page::{Drawable, ImagePlacement, PageContent, PageDescriptor, TextRun};
