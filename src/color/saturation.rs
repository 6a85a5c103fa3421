//! Saturation adjustment module
//!
//! Scales color saturation in HSV space: each pixel is converted to HSV, the
//! S component is multiplied by the gain and clamped to 1.0, then converted
//! back to RGB. The conversion runs per pixel in float, so `saturation = 1.0`
//! is the identity up to ±1 of rounding and `saturation = 0.0` produces a
//! fully desaturated image.

use image::{Rgb, RgbImage};

use super::colorspace::{hsv_to_rgb, rgb_to_hsv};

/// Scale the saturation of every pixel by `saturation`
///
/// The gain is applied in HSV space and the result clamped to full
/// saturation; no wraparound occurs for large gains.
pub fn adjust(image: &RgbImage, saturation: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel.0[0], pixel.0[1], pixel.0[2]);
        let scaled = (s * saturation).min(1.0);
        let (r, g, b) = hsv_to_rgb(h, scaled, v);
        out.put_pixel(x, y, Rgb([r, g, b]));
    }

    out
}

// ============================================================
// Tests
// ============================================================
