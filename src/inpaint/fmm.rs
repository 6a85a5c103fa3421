//! Fast-marching inpainting
//!
//! # Algorithm
//!
//! 1. Pixels are classified as known (outside the mask), inside (masked), or
//!    band (known pixels on the mask boundary, the initial marching front)
//! 2. The front marches inward in order of arrival time T, solving the
//!    Eikonal equation |∇T| = 1 one pixel at a time
//! 3. When the front reaches a masked pixel it is reconstructed as a
//!    weighted average of the known pixels inside the neighborhood radius,
//!    weighted by isophote alignment (∇T direction), geometric distance, and
//!    level-set proximity
//!
//! Each masked pixel enters the front exactly once, so the march terminates
//! after at most one heap operation per pixel of mask area.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use image::{GrayImage, RgbImage};

use super::types::{InpaintError, Result};

// ============================================================
// Constants
// ============================================================

/// Arrival time assigned to pixels the front has not reached
const FAR: f32 = 1.0e6;

/// Below this isophote alignment the direction weight is considered
/// numerically zero and replaced by a small floor so weights never vanish
const DIR_EPSILON: f32 = 0.01;

const DIR_FLOOR: f32 = 1.0e-6;

// ============================================================
// Types
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelState {
    /// Value is trusted (original, or already reconstructed)
    Known,
    /// On the marching front, arrival time fixed
    Band,
    /// Masked, not yet reached
    Inside,
}

/// Front entry ordered by arrival time (earliest first)
#[derive(Debug, Clone, Copy)]
struct FrontPixel {
    t: f32,
    x: i64,
    y: i64,
}

impl PartialEq for FrontPixel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontPixel {}

impl PartialOrd for FrontPixel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontPixel {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest arrival time first
        other.t.total_cmp(&self.t)
    }
}

/// Per-pixel marching state
struct Grid {
    width: i64,
    height: i64,
    t: Vec<f32>,
    state: Vec<PixelState>,
}

impl Grid {
    fn idx(&self, x: i64, y: i64) -> usize {
        (y * self.width + x) as usize
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Arrival time is usable at known and band pixels
    fn reached(&self, x: i64, y: i64) -> bool {
        self.in_bounds(x, y) && self.state[self.idx(x, y)] != PixelState::Inside
    }

    fn t_at(&self, x: i64, y: i64) -> f32 {
        self.t[self.idx(x, y)]
    }
}

// ============================================================
// Inpainter
// ============================================================

/// Masked-region reconstruction processor
pub struct Inpainter;

impl Inpainter {
    /// Reconstruct every masked pixel of `image`
    ///
    /// `mask` must have the same dimensions as `image`; pixels where the mask
    /// is 0 pass through unchanged, every other pixel is reconstructed from a
    /// neighborhood of `radius` pixels. If the mask covers the whole image
    /// there is no intact content to propagate and the input is returned
    /// unchanged.
    pub fn inpaint(image: &RgbImage, mask: &GrayImage, radius: u32) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        let (mask_width, mask_height) = mask.dimensions();
        if (width, height) != (mask_width, mask_height) {
            return Err(InpaintError::DimensionMismatch {
                image_width: width,
                image_height: height,
                mask_width,
                mask_height,
            });
        }
        if radius == 0 {
            return Err(InpaintError::InvalidRadius(radius));
        }

        let mut out = image.clone();
        let w = width as i64;
        let h = height as i64;
        let n = (w * h) as usize;

        let mut grid = Grid {
            width: w,
            height: h,
            t: vec![0.0; n],
            state: vec![PixelState::Known; n],
        };

        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel.0[0] != 0 {
                let i = grid.idx(x as i64, y as i64);
                grid.state[i] = PixelState::Inside;
                grid.t[i] = FAR;
            }
        }

        let mut front = Self::initial_front(&mut grid);

        while let Some(FrontPixel { x, y, .. }) = front.pop() {
            let i = grid.idx(x, y);
            grid.state[i] = PixelState::Known;

            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if !grid.in_bounds(nx, ny) {
                    continue;
                }
                let ni = grid.idx(nx, ny);
                if grid.state[ni] != PixelState::Inside {
                    continue;
                }

                let t = Self::arrival_time(&grid, nx, ny);
                grid.t[ni] = t;
                Self::reconstruct_pixel(&grid, &mut out, nx, ny, radius as i64);
                grid.state[ni] = PixelState::Band;
                front.push(FrontPixel { t, x: nx, y: ny });
            }
        }

        Ok(out)
    }

    /// Seed the front with every known pixel bordering the mask
    fn initial_front(grid: &mut Grid) -> BinaryHeap<FrontPixel> {
        let mut front = BinaryHeap::new();

        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.state[grid.idx(x, y)] != PixelState::Known {
                    continue;
                }
                let borders_mask = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .into_iter()
                    .any(|(nx, ny)| {
                        grid.in_bounds(nx, ny)
                            && grid.state[grid.idx(nx, ny)] == PixelState::Inside
                    });
                if borders_mask {
                    let i = grid.idx(x, y);
                    grid.state[i] = PixelState::Band;
                    front.push(FrontPixel { t: 0.0, x, y });
                }
            }
        }

        front
    }

    /// Arrival time at (x, y): smallest Eikonal solution over the four
    /// horizontal/vertical neighbor pairs
    fn arrival_time(grid: &Grid, x: i64, y: i64) -> f32 {
        let horizontal = [(x - 1, y), (x + 1, y)];
        let vertical = [(x, y - 1), (x, y + 1)];

        let mut best = FAR;
        for (hx, hy) in horizontal {
            for (vx, vy) in vertical {
                best = best.min(Self::solve_eikonal(grid, hx, hy, vx, vy));
            }
        }
        best
    }

    /// Solve |∇T| = 1 from one horizontal and one vertical neighbor
    fn solve_eikonal(grid: &Grid, x1: i64, y1: i64, x2: i64, y2: i64) -> f32 {
        let known1 = grid.reached(x1, y1);
        let known2 = grid.reached(x2, y2);

        match (known1, known2) {
            (true, true) => {
                let t1 = grid.t_at(x1, y1);
                let t2 = grid.t_at(x2, y2);
                let disc = 2.0 - (t1 - t2) * (t1 - t2);
                if disc > 0.0 {
                    let r = disc.sqrt();
                    let mut s = (t1 + t2 - r) / 2.0;
                    if s >= t1 && s >= t2 {
                        return s;
                    }
                    s += r;
                    if s >= t1 && s >= t2 {
                        return s;
                    }
                }
                // Fronts too far apart for a joint solution; march from the
                // nearer one alone.
                t1.min(t2) + 1.0
            }
            (true, false) => grid.t_at(x1, y1) + 1.0,
            (false, true) => grid.t_at(x2, y2) + 1.0,
            (false, false) => FAR,
        }
    }

    /// Gradient of the arrival-time field at (x, y), one-sided at the front
    fn time_gradient(grid: &Grid, x: i64, y: i64) -> (f32, f32) {
        let t0 = grid.t_at(x, y);

        let axis = |prev: (i64, i64), next: (i64, i64)| -> f32 {
            let has_prev = grid.reached(prev.0, prev.1);
            let has_next = grid.reached(next.0, next.1);
            match (has_prev, has_next) {
                (true, true) => (grid.t_at(next.0, next.1) - grid.t_at(prev.0, prev.1)) / 2.0,
                (false, true) => grid.t_at(next.0, next.1) - t0,
                (true, false) => t0 - grid.t_at(prev.0, prev.1),
                (false, false) => 0.0,
            }
        };

        (
            axis((x - 1, y), (x + 1, y)),
            axis((x, y - 1), (x, y + 1)),
        )
    }

    /// Weighted average of the known pixels within `radius` of (x, y)
    fn reconstruct_pixel(grid: &Grid, out: &mut RgbImage, x: i64, y: i64, radius: i64) {
        let grad = Self::time_gradient(grid, x, y);
        let t0 = grid.t_at(x, y);

        let mut acc = [0.0f32; 3];
        let mut weight_sum = 0.0f32;

        for ny in y - radius..=y + radius {
            for nx in x - radius..=x + radius {
                if !grid.reached(nx, ny) {
                    continue;
                }
                let rx = (x - nx) as f32;
                let ry = (y - ny) as f32;
                let len2 = rx * rx + ry * ry;
                if len2 == 0.0 || len2 > (radius * radius) as f32 {
                    continue;
                }
                let len = len2.sqrt();

                let mut dir = (rx * grad.0 + ry * grad.1) / len;
                if dir.abs() <= DIR_EPSILON {
                    dir = DIR_FLOOR;
                }
                let dst = 1.0 / (len2 * len);
                let lev = 1.0 / (1.0 + (grid.t_at(nx, ny) - t0).abs());
                let weight = (dir * dst * lev).abs();

                let sample = out.get_pixel(nx as u32, ny as u32);
                for c in 0..3 {
                    acc[c] += weight * sample.0[c] as f32;
                }
                weight_sum += weight;
            }
        }

        // The pixel that pulled this one onto the front is 4-adjacent and
        // known, so the neighborhood is never empty.
        if weight_sum > 0.0 {
            let pixel = out.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                pixel.0[c] = (acc[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Mask marking a rectangle as damaged
    fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut mask = GrayImage::from_pixel(width, height, Luma([0]));
        for y in y0..y1 {
            for x in x0..x1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn test_dimension_mismatch() {
        let image = RgbImage::new(10, 10);
        let mask = GrayImage::new(8, 10);

        let result = Inpainter::inpaint(&image, &mask, 3);
        assert!(matches!(
            result,
            Err(InpaintError::DimensionMismatch {
                image_width: 10,
                mask_width: 8,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let image = RgbImage::new(4, 4);
        let mask = GrayImage::new(4, 4);
        assert!(matches!(
            Inpainter::inpaint(&image, &mask, 0),
            Err(InpaintError::InvalidRadius(0))
        ));
    }

    #[test]
    fn test_empty_mask_is_identity() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([40, 90, 160]));
        image.put_pixel(5, 2, Rgb([255, 0, 0]));
        let mask = GrayImage::from_pixel(8, 8, Luma([0]));

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_unmasked_pixels_pass_through_exactly() {
        let mut image = RgbImage::new(12, 12);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 20) as u8, (y * 20) as u8, 77]);
        }
        let mask = rect_mask(12, 12, 4, 4, 8, 8);

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        for (x, y, pixel) in out.enumerate_pixels() {
            if mask.get_pixel(x, y).0[0] == 0 {
                assert_eq!(pixel, image.get_pixel(x, y), "pixel ({}, {}) changed", x, y);
            }
        }
    }

    #[test]
    fn test_masked_pixels_filled_from_surroundings() {
        // White block on black: reconstruction must blend from the black
        // neighborhood, not reproduce white.
        let mut image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        for y in 4..7 {
            for x in 4..7 {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let mask = rect_mask(10, 10, 3, 3, 8, 8);

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        for y in 3..8 {
            for x in 3..8 {
                let p = out.get_pixel(x, y);
                assert!(
                    p.0[0] < 255,
                    "masked pixel ({}, {}) still white: {:?}",
                    x,
                    y,
                    p
                );
                // Surroundings are black, so the fill should be dark.
                assert!(p.0[0] < 64, "fill at ({}, {}) too bright: {:?}", x, y, p);
            }
        }
    }

    #[test]
    fn test_flat_region_fills_with_flat_color() {
        let image = RgbImage::from_pixel(16, 16, Rgb([120, 80, 60]));
        let mask = rect_mask(16, 16, 6, 6, 10, 10);

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        for pixel in out.pixels() {
            for c in 0..3 {
                let expected = [120u8, 80, 60][c];
                assert!(
                    (pixel.0[c] as i32 - expected as i32).abs() <= 1,
                    "expected near {:?}, got {:?}",
                    [120, 80, 60],
                    pixel
                );
            }
        }
    }

    #[test]
    fn test_gradient_roughly_continued() {
        // Horizontal ramp with a masked strip; the fill should stay between
        // the values flanking the strip.
        let mut image = RgbImage::new(20, 10);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            let v = (x * 12) as u8;
            *pixel = Rgb([v, v, v]);
        }
        let mask = rect_mask(20, 10, 8, 0, 12, 10);

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        let left = image.get_pixel(7, 5).0[0] as i32;
        let right = image.get_pixel(12, 5).0[0] as i32;
        for y in 0..10 {
            for x in 8..12 {
                let v = out.get_pixel(x, y).0[0] as i32;
                assert!(
                    v >= left - 24 && v <= right + 24,
                    "fill at ({}, {}) = {} escapes ramp range [{}, {}]",
                    x,
                    y,
                    v,
                    left,
                    right
                );
            }
        }
    }

    #[test]
    fn test_fully_masked_image_returned_unchanged() {
        let image = RgbImage::from_pixel(6, 6, Rgb([10, 20, 30]));
        let mask = GrayImage::from_pixel(6, 6, Luma([255]));

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_mask_touching_border() {
        let image = RgbImage::from_pixel(8, 8, Rgb([200, 200, 200]));
        let mask = rect_mask(8, 8, 0, 0, 3, 3);

        let out = Inpainter::inpaint(&image, &mask, 3).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        for y in 0..3 {
            for x in 0..3 {
                let p = out.get_pixel(x, y);
                assert!((p.0[0] as i32 - 200).abs() <= 1);
            }
        }
    }
}
