//! Progress tracking module for restoration runs.
//!
//! Provides structured progress tracking and display for the CLI: the
//! pipeline reports which stage it is in, and batch runs report per-file
//! progress and a final summary.

use std::fmt;
use std::time::Instant;

/// Stages of a restoration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestorationStage {
    /// Preparing the run
    #[default]
    Initializing,
    /// Synthesizing the damage mask
    Masking,
    /// Resampling the source image
    Resizing,
    /// Applying contrast/brightness correction
    ToneCorrecting,
    /// Scaling color saturation
    Saturating,
    /// Suppressing noise
    Denoising,
    /// Reconstructing masked regions
    Inpainting,
    /// Producing the display-scaled preview
    Scaling,
    /// Done
    Completed,
}

impl RestorationStage {
    /// Get the English name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            RestorationStage::Initializing => "Initializing",
            RestorationStage::Masking => "Masking",
            RestorationStage::Resizing => "Resizing",
            RestorationStage::ToneCorrecting => "ToneCorrecting",
            RestorationStage::Saturating => "Saturating",
            RestorationStage::Denoising => "Denoising",
            RestorationStage::Inpainting => "Inpainting",
            RestorationStage::Scaling => "Scaling",
            RestorationStage::Completed => "Completed",
        }
    }

    /// Get the Spanish description of the stage
    pub fn description_es(&self) -> &'static str {
        match self {
            RestorationStage::Initializing => "inicializando",
            RestorationStage::Masking => "generando máscara",
            RestorationStage::Resizing => "redimensionando",
            RestorationStage::ToneCorrecting => "ajustando contraste y brillo",
            RestorationStage::Saturating => "ajustando saturación",
            RestorationStage::Denoising => "reduciendo ruido",
            RestorationStage::Inpainting => "restaurando regiones dañadas",
            RestorationStage::Scaling => "escalando para visualización",
            RestorationStage::Completed => "completado",
        }
    }
}

impl fmt::Display for RestorationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description_es())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (per-file lines only)
    #[default]
    Normal,
    /// Verbose output (stage-level progress)
    Verbose,
    /// Very verbose (stage timings)
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// Progress bar width in characters
const PROGRESS_BAR_WIDTH: usize = 40;

/// Build a progress bar string
pub fn build_progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = (percent as usize * PROGRESS_BAR_WIDTH) / 100;
    let empty = PROGRESS_BAR_WIDTH - filled;
    format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
}

/// Progress tracker for batch restoration
#[derive(Debug)]
pub struct ProgressTracker {
    /// Current file number (1-based)
    pub current_file: usize,
    /// Total number of files
    pub total_files: usize,
    /// Current filename
    pub current_filename: String,
    /// Current restoration stage
    pub current_stage: RestorationStage,
    /// Start time of the current file
    start_time: Instant,
    /// Output mode
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(1, OutputMode::Normal)
    }
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(total_files: usize, output_mode: OutputMode) -> Self {
        Self {
            current_file: 0,
            total_files,
            current_filename: String::new(),
            current_stage: RestorationStage::Initializing,
            start_time: Instant::now(),
            output_mode,
        }
    }

    /// Start processing a new file
    pub fn start_file(&mut self, file_number: usize, filename: &str) {
        self.current_file = file_number;
        self.current_filename = filename.to_string();
        self.current_stage = RestorationStage::Initializing;
        self.start_time = Instant::now();

        if self.output_mode.should_show(OutputMode::Normal) {
            let percent = if self.total_files == 0 {
                100
            } else {
                ((file_number.saturating_sub(1)) * 100 / self.total_files) as u8
            };
            println!(
                "{} [{}/{}] {}",
                build_progress_bar(percent),
                self.current_file,
                self.total_files,
                self.current_filename
            );
        }
    }

    /// Set the current restoration stage
    pub fn set_stage(&mut self, stage: RestorationStage) {
        self.current_stage = stage;

        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("    {}", stage);
        }
    }

    /// Mark the current file as complete
    pub fn complete_file(&mut self) {
        self.current_stage = RestorationStage::Completed;

        if self.output_mode.should_show(OutputMode::Normal) {
            let elapsed = self.start_time.elapsed();
            println!("    Completed in {:.2}s", elapsed.as_secs_f64());
        }
    }

    /// Get elapsed time in seconds for the current file
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print final summary
    pub fn print_summary(
        total_files: usize,
        ok_count: usize,
        skip_count: usize,
        error_count: usize,
    ) {
        println!();
        println!("{}", "=".repeat(80));
        println!("Restoration Summary");
        println!("{}", "=".repeat(80));
        println!("  Total files:  {}", total_files);
        println!("  Succeeded:    {}", ok_count);
        println!("  Skipped:      {}", skip_count);
        println!("  Errors:       {}", error_count);
        println!("{}", "=".repeat(80));
        println!();
    }
}
