//! Common types for the pipeline module

use image::{GrayImage, RgbImage};
use thiserror::Error;

use crate::inpaint::InpaintError;
use crate::mask::{DamageMaskSynthesizer, MaskError};

/// Pipeline error types
#[derive(Debug, Error)]
pub enum RestoreError {
    /// An out-of-range or malformed parameter; names the offending field
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },

    /// Reconstruction failure, e.g. a mask/image size mismatch
    #[error(transparent)]
    Inpaint(#[from] InpaintError),

    /// Unreadable or unsupported source image (surfaced by the I/O layer)
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MaskError> for RestoreError {
    fn from(err: MaskError) -> Self {
        // The only mask failure is a bad kernel; report it as the parameter
        // it came from so callers see a single taxonomy.
        match err {
            MaskError::InvalidKernelSize(size) => RestoreError::InvalidParameter {
                field: "kernel_size",
                reason: format!("must be an odd integer in 3..=255, got {}", size),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, RestoreError>;

/// Result of one restoration run
#[derive(Debug, Clone)]
pub struct RestoreOutput {
    /// The restored image at working resolution
    pub restored: RgbImage,

    /// The damage mask that was applied (already resized to the working
    /// resolution), exposed for diagnostics
    pub mask: GrayImage,

    /// Presentation copy of `restored`, scaled by `display_scale`
    pub display: RgbImage,
}

impl RestoreOutput {
    /// Fraction of pixels that were reconstructed (0.0-1.0)
    pub fn mask_coverage(&self) -> f64 {
        DamageMaskSynthesizer::coverage(&self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_mask_error_becomes_invalid_parameter() {
        let err: RestoreError = MaskError::InvalidKernelSize(6).into();
        match err {
            RestoreError::InvalidParameter { field, reason } => {
                assert_eq!(field, "kernel_size");
                assert!(reason.contains("6"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mask_coverage() {
        let mut mask = GrayImage::from_pixel(4, 4, Luma([0]));
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(1, 0, Luma([255]));

        let output = RestoreOutput {
            restored: RgbImage::new(4, 4),
            mask,
            display: RgbImage::new(4, 4),
        };
        assert!((output.mask_coverage() - 2.0 / 16.0).abs() < 1e-9);
    }
}
