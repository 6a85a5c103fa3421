//! Common types for the mask module

use thiserror::Error;

/// Mask synthesis error types
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("kernel size must be an odd integer in 3..=255, got {0}")]
    InvalidKernelSize(u32),
}

pub type Result<T> = std::result::Result<T, MaskError>;
