//! restauro - Automatic restoration of damaged photographs
//!
//! Locates defective regions of a photograph by intensity thresholding,
//! corrects tone, color, and noise, and reconstructs the damaged regions by
//! fast-marching inpainting.
//!
//! # Features
//!
//! - **Damage masking** ([`mask`]) - Threshold + dilation damage detection
//! - **Color correction** ([`color`]) - Tone, saturation, and colorspace tools
//! - **Denoising** ([`denoise`]) - Edge-preserving non-local-means filtering
//! - **Inpainting** ([`inpaint`]) - Fast-marching damaged-region reconstruction
//! - **Pipeline** ([`pipeline`]) - Fixed-order orchestration of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use restauro::{RestorationParams, RestorationPipeline};
//!
//! let photo = image::open("damaged.jpg").unwrap().to_rgb8();
//! let pipeline = RestorationPipeline::new(RestorationParams::default()).unwrap();
//! let output = pipeline.restore(&photo).unwrap();
//! output.restored.save("restored.jpg").unwrap();
//! ```

pub mod cli;
pub mod color;
pub mod config;
pub mod denoise;
pub mod inpaint;
pub mod mask;
pub mod pipeline;
pub mod progress;

// Re-export public API
pub use cli::{Cli, Commands, RestoreArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use denoise::{denoise, SEARCH_WINDOW, TEMPLATE_WINDOW};
pub use inpaint::{InpaintError, Inpainter};
pub use mask::{DamageMaskSynthesizer, MaskError, MaskOptions, MaskOptionsBuilder};
pub use pipeline::{
    load_source, ProgressSink, RestorationParams, RestorationParamsBuilder, RestorationPipeline,
    RestoreError, RestoreOutput, INPAINT_RADIUS,
};
pub use progress::{build_progress_bar, OutputMode, ProgressTracker, RestorationStage};

/// Process exit codes used by the CLI
pub mod exit_codes {
    /// Successful run
    pub const SUCCESS: i32 = 0;
    /// Unspecified failure
    pub const GENERAL_ERROR: i32 = 1;
    /// Input path missing or no images found
    pub const INPUT_NOT_FOUND: i32 = 2;
    /// Parameter set rejected by validation
    pub const INVALID_PARAMETER: i32 = 3;
}
