//! Common types for the inpaint module

use thiserror::Error;

/// Inpainting error types
#[derive(Debug, Error)]
pub enum InpaintError {
    #[error(
        "mask dimensions {mask_width}x{mask_height} do not match image dimensions {image_width}x{image_height}"
    )]
    DimensionMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("inpaint radius must be at least 1, got {0}")]
    InvalidRadius(u32),
}

pub type Result<T> = std::result::Result<T, InpaintError>;
