//! Color module for colorspace conversion and tonal adjustment
//!
//! Provides the color-domain building blocks of the restoration pipeline:
//!
//! # Features
//!
//! - **Colorspace conversion** ([`colorspace`]) - RGB to grayscale and RGB/HSV
//! - **Tone adjustment** ([`tone`]) - Linear contrast and brightness correction
//! - **Saturation adjustment** ([`saturation`]) - HSV saturation scaling
//!
//! All operations are pure: they take an image by reference and return a new
//! image, leaving the input untouched.

pub mod colorspace;
pub mod saturation;
pub mod tone;

// Re-export public API
pub use colorspace::{hsv_to_rgb, luminance, rgb_to_hsv, to_grayscale, to_hsv, to_rgb};
