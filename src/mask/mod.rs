//! Damage mask synthesis module
//!
//! Derives a binary damage mask from a source photograph: bright defects
//! (scratches, tears, chemical spots) are isolated by intensity thresholding
//! and grown by one morphological dilation so reconstruction covers their
//! halo as well.
//!
//! # Example
//!
//! ```rust,no_run
//! use restauro::{DamageMaskSynthesizer, MaskOptions};
//! use image::RgbImage;
//!
//! let photo = image::open("damaged.jpg").unwrap().to_rgb8();
//! let options = MaskOptions::builder().threshold(180).kernel_size(5).build();
//! let mask = DamageMaskSynthesizer::synthesize(&photo, &options).unwrap();
//! ```

mod synthesize;
mod types;

// Re-export public API
pub use synthesize::{DamageMaskSynthesizer, MaskOptions, MaskOptionsBuilder};
pub use types::{MaskError, Result};
