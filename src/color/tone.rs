//! Tone adjustment module
//!
//! Linear contrast and brightness correction:
//! `out = clamp(round(alpha * in + beta), 0, 255)` applied per channel.
//!
//! `alpha = 1.0, beta = 0` is the identity.

use image::{Rgb, RgbImage};

/// Apply linear contrast (`alpha`) and brightness (`beta`) correction
///
/// Elementwise with no neighborhood dependency. Negative intermediate values
/// clamp to 0, values above 255 clamp to 255.
pub fn adjust(image: &RgbImage, alpha: f32, beta: i32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = RgbImage::new(width, height);

    let map = |v: u8| -> u8 {
        (alpha * v as f32 + beta as f32).round().clamp(0.0, 255.0) as u8
    };

    for (x, y, pixel) in image.enumerate_pixels() {
        out.put_pixel(x, y, Rgb([map(pixel.0[0]), map(pixel.0[1]), map(pixel.0[2])]));
    }

    out
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([128, 64, 200]));
        image.put_pixel(3, 3, Rgb([0, 255, 17]));

        let out = adjust(&image, 1.0, 0);
        assert_eq!(out, image);
    }

    #[test]
    fn test_contrast_gain() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 50, 10]));
        let out = adjust(&image, 2.0, 0);

        let p = out.get_pixel(0, 0);
        assert_eq!(p.0, [200, 100, 20]);
    }

    #[test]
    fn test_brightness_offset() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));

        let brighter = adjust(&image, 1.0, 30);
        assert_eq!(brighter.get_pixel(0, 0).0, [130, 130, 130]);

        let darker = adjust(&image, 1.0, -30);
        assert_eq!(darker.get_pixel(0, 0).0, [70, 70, 70]);
    }

    #[test]
    fn test_clamping() {
        let image = RgbImage::from_pixel(2, 2, Rgb([200, 10, 128]));

        let high = adjust(&image, 2.0, 50);
        assert_eq!(high.get_pixel(0, 0).0[0], 255);

        let low = adjust(&image, 1.0, -50);
        assert_eq!(low.get_pixel(0, 0).0[1], 0);
    }

    #[test]
    fn test_rounding() {
        // 1.5 * 3 = 4.5 rounds to 5
        let image = RgbImage::from_pixel(1, 1, Rgb([3, 3, 3]));
        let out = adjust(&image, 1.5, 0);
        assert_eq!(out.get_pixel(0, 0).0[0], 5);
    }

    #[test]
    fn test_zero_alpha_flattens() {
        let image = RgbImage::from_pixel(2, 2, Rgb([10, 100, 250]));
        let out = adjust(&image, 0.0, 42);
        assert_eq!(out.get_pixel(1, 1).0, [42, 42, 42]);
    }
}
