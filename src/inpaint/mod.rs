//! Inpainting module for damaged-region reconstruction
//!
//! Fills masked pixels with plausible content propagated inward from the
//! surrounding intact image, in the style of Telea's fast-marching method:
//! pixels are reconstructed in order of distance from the mask boundary, each
//! as a weighted average of nearby already-known pixels with propagation
//! favored along isophote directions.
//!
//! # Example
//!
//! ```rust,no_run
//! use restauro::Inpainter;
//!
//! let photo = image::open("filtered.png").unwrap().to_rgb8();
//! let mask = image::open("mask.png").unwrap().to_luma8();
//! let restored = Inpainter::inpaint(&photo, &mask, 3).unwrap();
//! ```

mod fmm;
mod types;

// Re-export public API
pub use fmm::Inpainter;
pub use types::{InpaintError, Result};
