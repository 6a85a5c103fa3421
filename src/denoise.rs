//! Noise suppression module
//!
//! Non-local-means smoothing for sensor and compression noise. Each output
//! pixel is a weighted average of pixels in a search window around it, where
//! the weight of a candidate depends on how similar its surrounding patch is
//! to the patch around the pixel being filtered. Uniform regions average
//! freely while patches that straddle an edge disagree and get near-zero
//! weight, which is what preserves edges.
//!
//! # Contract
//!
//! - `strength = 0` is the identity and bypasses the filter entirely
//! - higher strength monotonically increases smoothing
//! - output dimensions always equal input dimensions
//!
//! The outer loop is parallelized by output row with rayon; every row is
//! computed independently from the read-only input, so the result is
//! bit-identical to a sequential run.

use image::RgbImage;
use rayon::prelude::*;

// ============================================================
// Constants
// ============================================================

/// Side of the patch compared around each pixel
pub const TEMPLATE_WINDOW: u32 = 7;

/// Side of the window searched for similar patches
pub const SEARCH_WINDOW: u32 = 21;

const TEMPLATE_RADIUS: i64 = (TEMPLATE_WINDOW as i64 - 1) / 2;
const SEARCH_RADIUS: i64 = (SEARCH_WINDOW as i64 - 1) / 2;

// ============================================================
// Filter
// ============================================================

/// Suppress noise with non-local-means filtering of the given `strength`
///
/// `strength` acts as the filtering parameter `h` for luminance and color
/// alike; 0 returns an untouched copy of the input.
pub fn denoise(image: &RgbImage, strength: u32) -> RgbImage {
    if strength == 0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let w = width as i64;
    let h = height as i64;
    let src = image.as_raw();
    let h2 = (strength as f32 * strength as f32).max(1.0);

    // Mean squared patch difference across all three channels.
    let patch_distance = |px: i64, py: i64, qx: i64, qy: i64| -> f32 {
        let mut sum = 0.0f32;
        for dy in -TEMPLATE_RADIUS..=TEMPLATE_RADIUS {
            for dx in -TEMPLATE_RADIUS..=TEMPLATE_RADIUS {
                let a = pixel_index(w, h, px + dx, py + dy);
                let b = pixel_index(w, h, qx + dx, qy + dy);
                for c in 0..3 {
                    let d = src[a + c] as f32 - src[b + c] as f32;
                    sum += d * d;
                }
            }
        }
        sum / (TEMPLATE_WINDOW * TEMPLATE_WINDOW * 3) as f32
    };

    let mut out = RgbImage::new(width, height);
    let row_len = (width * 3) as usize;

    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(row, out_row)| {
            let py = row as i64;
            for px in 0..w {
                let mut acc = [0.0f32; 3];
                let mut weight_sum = 0.0f32;

                for qy in py - SEARCH_RADIUS..=py + SEARCH_RADIUS {
                    for qx in px - SEARCH_RADIUS..=px + SEARCH_RADIUS {
                        let d2 = patch_distance(px, py, qx, qy);
                        let weight = (-d2 / h2).exp();
                        let q = pixel_index(w, h, qx, qy);
                        for c in 0..3 {
                            acc[c] += weight * src[q + c] as f32;
                        }
                        weight_sum += weight;
                    }
                }

                let base = (px * 3) as usize;
                for c in 0..3 {
                    out_row[base + c] = (acc[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}

/// Byte index of the pixel at (x, y), with coordinates clamped to the image
fn pixel_index(w: i64, h: i64, x: i64, y: i64) -> usize {
    let cx = x.clamp(0, w - 1);
    let cy = y.clamp(0, h - 1);
    ((cy * w + cx) * 3) as usize
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Mean absolute deviation from the image mean, per channel 0
    fn roughness(image: &RgbImage) -> f64 {
        let values: Vec<f64> = image.pixels().map(|p| p.0[0] as f64).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
    }

    /// Deterministic speckled image around mid-gray
    fn speckled(width: u32, height: u32) -> RgbImage {
        let mut image = RgbImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let n = ((x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17))) % 13) as i32 - 6;
            let v = (128 + 4 * n).clamp(0, 255) as u8;
            *pixel = Rgb([v, v, v]);
        }
        image
    }

    #[test]
    fn test_zero_strength_is_identity() {
        let image = speckled(16, 16);
        let out = denoise(&image, 0);
        assert_eq!(out, image);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        // All candidate pixels are identical, so any weighting returns the
        // same value.
        let image = RgbImage::from_pixel(12, 12, Rgb([93, 150, 201]));
        let out = denoise(&image, 10);
        assert_eq!(out, image);
    }

    #[test]
    fn test_dimensions_preserved() {
        let image = speckled(9, 14);
        assert_eq!(denoise(&image, 5).dimensions(), (9, 14));
    }

    #[test]
    fn test_stronger_filter_smooths_more() {
        let image = speckled(24, 24);

        let mild = denoise(&image, 2);
        let strong = denoise(&image, 50);

        let r_input = roughness(&image);
        let r_mild = roughness(&mild);
        let r_strong = roughness(&strong);

        assert!(r_strong < r_input, "strong filtering should smooth");
        assert!(r_strong <= r_mild, "more strength should not roughen");
    }

    #[test]
    fn test_edge_preserved_better_than_box_blur() {
        // Hard black/white edge: NLM keeps both sides close to their
        // original values because cross-edge patches are dissimilar.
        let mut image = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        for y in 0..20 {
            for x in 10..20 {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }

        let out = denoise(&image, 10);
        assert!(out.get_pixel(2, 10).0[0] < 30);
        assert!(out.get_pixel(17, 10).0[0] > 225);
    }

    #[test]
    fn test_output_is_valid_for_tiny_images() {
        // Smaller than the search window on both axes.
        let image = speckled(5, 3);
        let out = denoise(&image, 8);
        assert_eq!(out.dimensions(), (5, 3));
    }
}
