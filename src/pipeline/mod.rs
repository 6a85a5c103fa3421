//! Restoration pipeline module
//!
//! Orchestrates one restoration run as a pure function of (source image,
//! parameter set):
//!
//! 1. Synthesize the damage mask from the source
//! 2. Resize the source by `resize_factor`
//! 3. Apply contrast/brightness correction
//! 4. Apply saturation correction
//! 5. Suppress noise
//! 6. Reconstruct masked regions by inpainting
//! 7. Produce a display-scaled presentation copy
//!
//! The mask is synthesized against the original source and, when the
//! geometry changed in step 2, resized with nearest-neighbor resampling to
//! the working resolution before inpainting so it stays strictly binary.
//!
//! There is no state between runs; a parameter change is a fresh call with a
//! new parameter set.
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

mod params;
mod types;

use std::path::Path;
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use tracing::debug;

use crate::color::{saturation, tone};
use crate::denoise::denoise;
use crate::inpaint::Inpainter;
use crate::mask::DamageMaskSynthesizer;
use crate::progress::RestorationStage;

// Re-export public API
pub use params::{
    RestorationParams, RestorationParamsBuilder, DEFAULT_ALPHA, DEFAULT_BETA,
    DEFAULT_DENOISE_STRENGTH, DEFAULT_DISPLAY_SCALE, DEFAULT_KERNEL_SIZE, DEFAULT_RESIZE_FACTOR,
    DEFAULT_SATURATION, DEFAULT_THRESHOLD,
};
pub use types::{RestoreError, RestoreOutput, Result};

/// Neighborhood radius used for inpainting
pub const INPAINT_RADIUS: u32 = 3;

// ============================================================
// Progress reporting
// ============================================================

/// Observer for stage-level progress of a restoration run
pub trait ProgressSink {
    /// Called when a stage begins
    fn on_stage_start(&self, _stage: RestorationStage) {}

    /// Called when a stage finished, with its wall-clock duration
    fn on_stage_complete(&self, _stage: RestorationStage, _elapsed_ms: f64) {}
}

/// Sink that ignores all progress events
struct SilentProgress;

impl ProgressSink for SilentProgress {}

// ============================================================
// Pipeline
// ============================================================

/// Fixed-order restoration pipeline
///
/// Holds a validated parameter set; `restore` may be called any number of
/// times on different images.
pub struct RestorationPipeline {
    params: RestorationParams,
}

impl RestorationPipeline {
    /// Create a pipeline, rejecting malformed parameters up front
    pub fn new(params: RestorationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The validated parameter set driving this pipeline
    pub fn params(&self) -> &RestorationParams {
        &self.params
    }

    /// Restore one image
    pub fn restore(&self, source: &RgbImage) -> Result<RestoreOutput> {
        self.restore_with_progress(source, &SilentProgress)
    }

    /// Restore one image, reporting stage progress to `sink`
    pub fn restore_with_progress(
        &self,
        source: &RgbImage,
        sink: &dyn ProgressSink,
    ) -> Result<RestoreOutput> {
        let p = &self.params;

        let mask = self.run_stage(sink, RestorationStage::Masking, || {
            DamageMaskSynthesizer::synthesize(source, &p.mask_options())
        })?;

        let resized = self.run_stage(sink, RestorationStage::Resizing, || {
            resize_rgb(source, p.resize_factor)
        });

        let toned = self.run_stage(sink, RestorationStage::ToneCorrecting, || {
            tone::adjust(&resized, p.alpha, p.beta)
        });

        let saturated = self.run_stage(sink, RestorationStage::Saturating, || {
            saturation::adjust(&toned, p.saturation)
        });

        let filtered = self.run_stage(sink, RestorationStage::Denoising, || {
            denoise(&saturated, p.denoise_strength)
        });

        // The mask tracks the source geometry; bring it to the working
        // resolution before reconstruction.
        let mask = if mask.dimensions() == filtered.dimensions() {
            mask
        } else {
            resize_mask(&mask, filtered.dimensions())
        };

        let restored = self.run_stage(sink, RestorationStage::Inpainting, || {
            Inpainter::inpaint(&filtered, &mask, INPAINT_RADIUS)
        })?;

        let display = self.run_stage(sink, RestorationStage::Scaling, || {
            resize_rgb(&restored, p.display_scale)
        });

        Ok(RestoreOutput {
            restored,
            mask,
            display,
        })
    }

    fn run_stage<T>(
        &self,
        sink: &dyn ProgressSink,
        stage: RestorationStage,
        f: impl FnOnce() -> T,
    ) -> T {
        sink.on_stage_start(stage);
        let start = Instant::now();
        let result = f();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(stage = stage.name(), elapsed_ms, "stage finished");
        sink.on_stage_complete(stage, elapsed_ms);
        result
    }
}

// ============================================================
// Helpers
// ============================================================

/// Load a source image from disk as RGB
///
/// Decode lives at the I/O boundary; the pipeline itself only sees in-memory
/// images.
pub fn load_source(path: &Path) -> Result<RgbImage> {
    if !path.exists() {
        return Err(RestoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file: {}", path.display()),
        )));
    }
    let img = image::open(path).map_err(|e| RestoreError::DecodeFailure(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Scale both dimensions of an RGB image by `factor` (bilinear)
///
/// A factor of exactly 1.0 is a copy. Dimensions never drop below 1 pixel.
fn resize_rgb(image: &RgbImage, factor: f32) -> RgbImage {
    if factor == 1.0 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    let new_width = ((width as f32 * factor).round() as u32).max(1);
    let new_height = ((height as f32 * factor).round() as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

/// Resize a binary mask to `dimensions` with nearest-neighbor resampling
fn resize_mask(mask: &GrayImage, dimensions: (u32, u32)) -> GrayImage {
    imageops::resize(mask, dimensions.0, dimensions.1, FilterType::Nearest)
}

// ============================================================
// Tests
// ============================================================
