//! Colour → single-channel grayscale conversion.
//!
//! Channels are weighted with the ITU-R BT.601 luma coefficients,
//! `L = (299 R + 587 G + 114 B) / 1000`, rounded to nearest. This is the
//! mapping classic imaging tools use for an "L" conversion. Alpha is
//! dropped; pdfium renders pages onto an opaque white background.

use image::{DynamicImage, GrayImage, Luma};

/// Convert a rendered page to an 8-bit single-channel image.
pub fn desaturate(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

/// BT.601 luma of one pixel.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    // Weights sum to 1000, so the result never exceeds 255.
    ((l + 500) / 1000) as u8
}
