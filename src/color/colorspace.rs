//! Colorspace conversion module
//!
//! Converts between RGB, grayscale, and HSV representations.
//!
//! # Representations
//!
//! - Grayscale uses ITU-R BT.601 luminance weights.
//! - The per-pixel conversions [`rgb_to_hsv`] / [`hsv_to_rgb`] work in float
//!   (H in degrees 0-360, S and V in 0.0-1.0) and are exact inverses up to
//!   the final 8-bit rounding, so a round trip stays within ±1 per channel.
//! - The image-level conversions [`to_hsv`] / [`to_rgb`] pack HSV into three
//!   8-bit channels with H stored as degrees/2 (0..=179), S and V scaled to
//!   0..=255. The hue channel therefore quantizes to 2-degree steps.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Calculate BT.601 luminance, rounded to the nearest integer
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round() as u8
}

/// Convert an RGB image to grayscale using BT.601 luminance
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let y_val = luminance(pixel.0[0], pixel.0[1], pixel.0[2]);
        gray.put_pixel(x, y, Luma([y_val]));
    }

    gray
}

/// Convert RGB to HSV
///
/// Returns (hue in degrees 0-360, saturation 0.0-1.0, value 0.0-1.0).
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let v = max;
    let d = max - min;
    let s = if max == 0.0 { 0.0 } else { d / max };

    let h = if d == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (((gf - bf) / d) % 6.0)
    } else if max == gf {
        60.0 * (((bf - rf) / d) + 2.0)
    } else {
        60.0 * (((rf - gf) / d) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    (h, s, v)
}

/// Convert HSV back to RGB
///
/// Inverse of [`rgb_to_hsv`] up to the final 8-bit rounding. Hue wraps at
/// 360 degrees; saturation and value are expected in 0.0-1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (rf, gf, bf) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = v - c;
    let to_u8 = |f: f32| -> u8 { ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8 };
    (to_u8(rf), to_u8(gf), to_u8(bf))
}

/// Convert an RGB image to an 8-bit HSV image
///
/// Channel 0 holds H as degrees/2 (0..=179), channels 1 and 2 hold S and V
/// scaled to 0..=255.
pub fn to_hsv(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut hsv = RgbImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel.0[0], pixel.0[1], pixel.0[2]);
        let h8 = ((h / 2.0).round() as u32 % 180) as u8;
        let s8 = (s * 255.0).round() as u8;
        let v8 = (v * 255.0).round() as u8;
        hsv.put_pixel(x, y, Rgb([h8, s8, v8]));
    }

    hsv
}

/// Convert an 8-bit HSV image (as produced by [`to_hsv`]) back to RGB
pub fn to_rgb(hsv: &RgbImage) -> RgbImage {
    let (width, height) = hsv.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in hsv.enumerate_pixels() {
        let h = pixel.0[0] as f32 * 2.0;
        let s = pixel.0[1] as f32 / 255.0;
        let v = pixel.0[2] as f32 / 255.0;
        let (r, g, b) = hsv_to_rgb(h, s, v);
        rgb.put_pixel(x, y, Rgb([r, g, b]));
    }

    rgb
}

// ============================================================
// Tests
// ============================================================
