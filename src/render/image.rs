//! Raster images: one centred portrait page per image.

use crate::error::ConversionError;
use ::image::codecs::jpeg::JpegEncoder;
use ::image::imageops::FilterType;
use ::image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use docmerge_types::{Drawable, ImagePlacement, PageContent, PageDescriptor, Rect, Size};
use serde::Deserialize;
use std::io::Cursor;

const MIB: u64 = 1024 * 1024;

/// Re-encoding parameters for one input size band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EncodeTarget {
    /// Wider images are downscaled to this width; narrower ones are kept.
    pub max_width: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SizeTier {
    /// The tier applies to inputs strictly larger than this many bytes.
    pub above_bytes: u64,
    pub target: EncodeTarget,
}

/// How images are shrunk, re-encoded and placed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
    /// Checked from the largest threshold down.
    pub tiers: Vec<SizeTier>,
    /// Used when no tier matches.
    pub base: EncodeTarget,
    /// Blank border kept on every side of the page, in points.
    pub margin: f32,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                SizeTier {
                    above_bytes: 5 * MIB,
                    target: EncodeTarget { max_width: 1200, quality: 70 },
                },
                SizeTier {
                    above_bytes: 2 * MIB,
                    target: EncodeTarget { max_width: 1600, quality: 80 },
                },
            ],
            base: EncodeTarget { max_width: 2000, quality: 90 },
            margin: 40.0,
        }
    }
}

impl ImagePolicy {
    pub fn target_for(&self, input_bytes: u64) -> EncodeTarget {
        let mut tiers = self.tiers.clone();
        tiers.sort_by(|a, b| b.above_bytes.cmp(&a.above_bytes));
        tiers
            .into_iter()
            .find(|tier| input_bytes > tier.above_bytes)
            .map(|tier| tier.target)
            .unwrap_or(self.base)
    }
}

/// Decodes, orients, shrinks and re-encodes an image, then fits it centred
/// on a single letter-size portrait page. Landscape images stay on a
/// portrait page and simply come out smaller.
pub fn render_image(bytes: &[u8], policy: &ImagePolicy) -> Result<PageContent, ConversionError> {
    let target = policy.target_for(bytes.len() as u64);

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let img = shrink_to_width(img, target.max_width);
    let rgb = flatten_onto_white(img);

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, target.quality.clamp(1, 100)).encode_image(&rgb)?;
    log::debug!(
        "Re-encoded {} byte image as {}x{} JPEG (q{}, {} bytes)",
        bytes.len(),
        rgb.width(),
        rgb.height(),
        target.quality,
        jpeg.len()
    );

    let page_size = Size::LETTER_PORTRAIT;
    let placed = Size::new(rgb.width() as f32, rgb.height() as f32)
        .fit_within(page_size.inset(policy.margin));
    let rect = Rect::new(
        (page_size.width - placed.width) / 2.0,
        (page_size.height - placed.height) / 2.0,
        placed.width,
        placed.height,
    );

    let mut page = PageDescriptor::new(page_size);
    page.push(Drawable::Image(ImagePlacement {
        jpeg,
        pixel_width: rgb.width(),
        pixel_height: rgb.height(),
        rect,
    }));
    Ok(PageContent::from(vec![page]))
}

fn shrink_to_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if max_width == 0 || img.width() <= max_width {
        return img;
    }
    let height = (img.height() as u64 * max_width as u64 / img.width() as u64).max(1) as u32;
    img.resize_exact(max_width, height, FilterType::Triangle)
}

/// JPEG has no alpha channel; transparent areas become white rather than black.
fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
