#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Page and element dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// US Letter, portrait.
    pub const LETTER_PORTRAIT: Size = Size { width: 612.0, height: 792.0 };
    /// US Letter, landscape. Used for tabular output.
    pub const LETTER_LANDSCAPE: Size = Size { width: 792.0, height: 612.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Shrinks this size by `margin` on every side.
    pub fn inset(&self, margin: f32) -> Size {
        Size {
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    /// Scales `self` uniformly so it fits inside `bounds`, preserving the aspect ratio.
    pub fn fit_within(&self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Size::zero();
        }
        let scale = (bounds.width / self.width).min(bounds.height / self.height);
        Size {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}
