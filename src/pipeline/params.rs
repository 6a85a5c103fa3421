//! Restoration parameter set
//!
//! One immutable `RestorationParams` drives one pipeline run. Values are
//! validated up front and out-of-range values are rejected with the name of
//! the offending field, never silently clamped or rounded.

use serde::{Deserialize, Serialize};

use crate::mask::{MaskError, MaskOptions};

use super::types::{RestoreError, Result};

// ============================================================
// Constants - defaults matching a mildly damaged print
// ============================================================

/// Default dilation structuring-element side
pub const DEFAULT_KERNEL_SIZE: u32 = 5;

/// Default damage intensity threshold
pub const DEFAULT_THRESHOLD: u8 = 180;

/// Default contrast gain
pub const DEFAULT_ALPHA: f32 = 1.4;

/// Default brightness offset
pub const DEFAULT_BETA: i32 = 20;

/// Default saturation gain
pub const DEFAULT_SATURATION: f32 = 1.8;

/// Default denoising strength
pub const DEFAULT_DENOISE_STRENGTH: u32 = 15;

/// Default geometry scale applied before filtering
pub const DEFAULT_RESIZE_FACTOR: f32 = 1.0;

/// Default presentation scale applied after restoration
pub const DEFAULT_DISPLAY_SCALE: f32 = 1.0;

// ============================================================
// Parameter set
// ============================================================

/// Parameters for one restoration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorationParams {
    /// Side of the square dilation structuring element; odd, in 3..=255
    pub kernel_size: u32,

    /// Grayscale intensity at and above which a pixel counts as damaged
    pub threshold: u8,

    /// Contrast gain; must be finite and >= 0
    pub alpha: f32,

    /// Brightness offset, signed
    pub beta: i32,

    /// Saturation gain; must be finite and >= 0
    pub saturation: f32,

    /// Non-local-means filtering strength; 0 disables denoising
    pub denoise_strength: u32,

    /// Uniform geometry scale applied to the source; must be finite and > 0
    pub resize_factor: f32,

    /// Uniform scale of the presentation copy; must be finite and > 0
    pub display_scale: f32,
}

impl Default for RestorationParams {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            threshold: DEFAULT_THRESHOLD,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            saturation: DEFAULT_SATURATION,
            denoise_strength: DEFAULT_DENOISE_STRENGTH,
            resize_factor: DEFAULT_RESIZE_FACTOR,
            display_scale: DEFAULT_DISPLAY_SCALE,
        }
    }
}

impl RestorationParams {
    /// Create a builder
    pub fn builder() -> RestorationParamsBuilder {
        RestorationParamsBuilder::default()
    }

    /// Parameters that leave tone, color, and noise untouched
    ///
    /// Only clearly blown-out pixels are masked and reconstructed.
    pub fn reconstruction_only() -> Self {
        Self {
            alpha: 1.0,
            beta: 0,
            saturation: 1.0,
            denoise_strength: 0,
            threshold: 250,
            kernel_size: 3,
            ..Default::default()
        }
    }

    /// Conservative correction for lightly damaged photographs
    pub fn gentle() -> Self {
        Self {
            alpha: 1.1,
            beta: 5,
            saturation: 1.2,
            denoise_strength: 5,
            threshold: 220,
            kernel_size: 3,
            ..Default::default()
        }
    }

    /// Strong correction for heavily damaged or faded photographs
    pub fn aggressive() -> Self {
        Self {
            alpha: 1.6,
            beta: 30,
            saturation: 2.0,
            denoise_strength: 30,
            threshold: 160,
            kernel_size: 9,
            ..Default::default()
        }
    }

    /// Mask synthesis options derived from this parameter set
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            threshold: self.threshold,
            kernel_size: self.kernel_size,
        }
    }

    /// Check every field, failing fast on the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        if let Err(MaskError::InvalidKernelSize(size)) = self.mask_options().validate() {
            return Err(RestoreError::InvalidParameter {
                field: "kernel_size",
                reason: format!("must be an odd integer in 3..=255, got {}", size),
            });
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(RestoreError::InvalidParameter {
                field: "alpha",
                reason: format!("must be a finite value >= 0, got {}", self.alpha),
            });
        }
        if !self.saturation.is_finite() || self.saturation < 0.0 {
            return Err(RestoreError::InvalidParameter {
                field: "saturation",
                reason: format!("must be a finite value >= 0, got {}", self.saturation),
            });
        }
        if !self.resize_factor.is_finite() || self.resize_factor <= 0.0 {
            return Err(RestoreError::InvalidParameter {
                field: "resize_factor",
                reason: format!("must be a finite value > 0, got {}", self.resize_factor),
            });
        }
        if !self.display_scale.is_finite() || self.display_scale <= 0.0 {
            return Err(RestoreError::InvalidParameter {
                field: "display_scale",
                reason: format!("must be a finite value > 0, got {}", self.display_scale),
            });
        }
        Ok(())
    }
}

/// Builder for RestorationParams
#[derive(Debug, Default)]
pub struct RestorationParamsBuilder {
    params: RestorationParams,
}

impl RestorationParamsBuilder {
    /// Set the structuring-element side
    #[must_use]
    pub fn kernel_size(mut self, kernel_size: u32) -> Self {
        self.params.kernel_size = kernel_size;
        self
    }

    /// Set the damage threshold
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.params.threshold = threshold;
        self
    }

    /// Set the contrast gain
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.params.alpha = alpha;
        self
    }

    /// Set the brightness offset
    #[must_use]
    pub fn beta(mut self, beta: i32) -> Self {
        self.params.beta = beta;
        self
    }

    /// Set the saturation gain
    #[must_use]
    pub fn saturation(mut self, saturation: f32) -> Self {
        self.params.saturation = saturation;
        self
    }

    /// Set the denoising strength
    #[must_use]
    pub fn denoise_strength(mut self, strength: u32) -> Self {
        self.params.denoise_strength = strength;
        self
    }

    /// Set the geometry scale
    #[must_use]
    pub fn resize_factor(mut self, factor: f32) -> Self {
        self.params.resize_factor = factor;
        self
    }

    /// Set the presentation scale
    #[must_use]
    pub fn display_scale(mut self, scale: f32) -> Self {
        self.params.display_scale = scale;
        self
    }

    /// Build the parameter set (validation happens at pipeline construction)
    #[must_use]
    pub fn build(self) -> RestorationParams {
        self.params
    }
}

// ============================================================
// Tests
// ============================================================
