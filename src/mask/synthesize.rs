//! Damage mask synthesis
//!
//! # Algorithm
//!
//! 1. Convert the source image to grayscale (BT.601)
//! 2. Binary-threshold: a pixel is damaged if its gray value >= threshold
//! 3. Dilate once with a square structuring element of side `kernel_size`
//!
//! The mask is 255 where content must be reconstructed and 0 elsewhere, and
//! always matches the source dimensions.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

use crate::color;

use super::types::{MaskError, Result};

// ============================================================
// Constants
// ============================================================

/// Smallest accepted structuring-element side
pub const MIN_KERNEL_SIZE: u32 = 3;

/// Largest accepted structuring-element side (radius must fit in u8)
pub const MAX_KERNEL_SIZE: u32 = 255;

/// Default damage intensity threshold
const DEFAULT_THRESHOLD: u8 = 180;

/// Default structuring-element side
const DEFAULT_KERNEL_SIZE: u32 = 5;

// ============================================================
// Options
// ============================================================

/// Options for damage mask synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOptions {
    /// Grayscale intensity at and above which a pixel counts as damaged
    pub threshold: u8,

    /// Side of the square dilation structuring element; odd, in 3..=255
    pub kernel_size: u32,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }
}

impl MaskOptions {
    /// Create a builder
    pub fn builder() -> MaskOptionsBuilder {
        MaskOptionsBuilder::default()
    }

    /// Check that the options are usable
    ///
    /// Out-of-range values are rejected, never rounded to the nearest legal
    /// value.
    pub fn validate(&self) -> Result<()> {
        if self.kernel_size < MIN_KERNEL_SIZE
            || self.kernel_size > MAX_KERNEL_SIZE
            || self.kernel_size % 2 == 0
        {
            return Err(MaskError::InvalidKernelSize(self.kernel_size));
        }
        Ok(())
    }
}

/// Builder for MaskOptions
#[derive(Debug, Default)]
pub struct MaskOptionsBuilder {
    options: MaskOptions,
}

impl MaskOptionsBuilder {
    /// Set the damage threshold
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set the structuring-element side
    #[must_use]
    pub fn kernel_size(mut self, kernel_size: u32) -> Self {
        self.options.kernel_size = kernel_size;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> MaskOptions {
        self.options
    }
}

// ============================================================
// Synthesizer
// ============================================================

/// Damage mask processor
pub struct DamageMaskSynthesizer;

impl DamageMaskSynthesizer {
    /// Synthesize a binary damage mask for `image`
    pub fn synthesize(image: &RgbImage, options: &MaskOptions) -> Result<GrayImage> {
        options.validate()?;

        let gray = color::to_grayscale(image);
        let binary = Self::threshold_binary(&gray, options.threshold);

        // Chebyshev ball of this radius is the kernel_size x kernel_size
        // square structuring element.
        let radius = ((options.kernel_size - 1) / 2) as u8;
        Ok(dilate(&binary, Norm::LInf, radius))
    }

    /// Binary threshold: 255 where the gray value >= `threshold`, else 0
    pub fn threshold_binary(gray: &GrayImage, threshold: u8) -> GrayImage {
        let (width, height) = gray.dimensions();
        let mut binary = GrayImage::new(width, height);

        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = if pixel.0[0] >= threshold { 255 } else { 0 };
            binary.put_pixel(x, y, Luma([value]));
        }

        binary
    }

    /// Fraction of mask pixels marked as damaged (0.0-1.0)
    pub fn coverage(mask: &GrayImage) -> f64 {
        let total = mask.width() as u64 * mask.height() as u64;
        if total == 0 {
            return 0.0;
        }
        let marked = mask.pixels().filter(|p| p.0[0] != 0).count() as u64;
        marked as f64 / total as f64
    }
}

// ============================================================
// Tests
// ============================================================
