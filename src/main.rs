//! restauro - Automatic restoration of damaged photographs
//!
//! CLI entry point

use std::cell::RefCell;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use image::codecs::jpeg::JpegEncoder;
use serde::Serialize;

use restauro::{
    exit_codes,
    // CLI
    Cli, CliOverrides, Commands, RestoreArgs,
    // Config
    Config,
    // Pipeline
    ProgressSink, RestorationParams, RestorationPipeline, RestoreError, RestoreOutput,
    // Progress tracking
    OutputMode, ProgressTracker, RestorationStage,
    INPAINT_RADIUS,
};

/// Input file extensions treated as images
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Restore(args) => {
            init_tracing(args.verbose, args.quiet);
            run_restore(&args)
        }
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

// ============ Progress Sink Implementation ============

/// Forwards pipeline stage events to the batch progress tracker
struct TrackerSink<'a> {
    tracker: RefCell<&'a mut ProgressTracker>,
    mode: OutputMode,
}

impl ProgressSink for TrackerSink<'_> {
    fn on_stage_start(&self, stage: RestorationStage) {
        self.tracker.borrow_mut().set_stage(stage);
    }

    fn on_stage_complete(&self, stage: RestorationStage, elapsed_ms: f64) {
        if self.mode.should_show(OutputMode::VeryVerbose) {
            println!("      {} took {:.1}ms", stage.name(), elapsed_ms);
        }
    }
}

// ============ Run Report ============

#[derive(Debug, Serialize)]
struct FileReport {
    input: PathBuf,
    output: Option<PathBuf>,
    status: String,
    elapsed_seconds: f64,
    mask_coverage: f64,
}

#[derive(Debug, Serialize)]
struct RunReport {
    version: String,
    params: RestorationParams,
    total_files: usize,
    succeeded: usize,
    skipped: usize,
    failed: usize,
    total_seconds: f64,
    files: Vec<FileReport>,
}

// ============ Restore Command ============

fn run_restore(args: &RestoreArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let image_files = collect_image_files(&args.input)?;
    if image_files.is_empty() {
        eprintln!("Error: No image files found in input path");
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // Load config file if specified, otherwise search the standard locations
    let file_config = match &args.config {
        Some(config_path) => Config::load_from_path(config_path)
            .with_context(|| format!("failed to load config file {}", config_path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    // Merge config file with CLI arguments (CLI takes precedence)
    let config = file_config.merge_with_cli(&create_cli_overrides(args));

    let pipeline = match RestorationPipeline::new(config.params.clone()) {
        Ok(pipeline) => pipeline,
        Err(e @ RestoreError::InvalidParameter { .. }) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::INVALID_PARAMETER);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    if args.dry_run {
        print_execution_plan(args, &image_files, &config);
        return Ok(());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create output directory {}", args.output.display()))?;
    let mask_dir = mask_output_dir(args, &config);
    if let Some(dir) = &mask_dir {
        std::fs::create_dir_all(dir)?;
    }
    if let Some(dir) = &args.preview_out {
        std::fs::create_dir_all(dir)?;
    }

    let output_mode = if args.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(args.verbose)
    };
    let mut tracker = ProgressTracker::new(image_files.len(), output_mode);

    let mut ok_count = 0usize;
    let mut skip_count = 0usize;
    let mut error_count = 0usize;
    let mut file_reports = Vec::with_capacity(image_files.len());

    for (idx, image_path) in image_files.iter().enumerate() {
        let output_path = restored_output_path(&args.output, image_path);

        if args.skip_existing && output_path.exists() {
            if output_mode.should_show(OutputMode::Normal) {
                println!(
                    "[{}/{}] Skipping (exists): {}",
                    idx + 1,
                    image_files.len(),
                    image_path.display()
                );
            }
            skip_count += 1;
            file_reports.push(FileReport {
                input: image_path.clone(),
                output: Some(output_path),
                status: "skipped".to_string(),
                elapsed_seconds: 0.0,
                mask_coverage: 0.0,
            });
            continue;
        }

        let filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracker.start_file(idx + 1, &filename);

        match restore_file(&pipeline, image_path, output_mode, &mut tracker) {
            Ok(output) => {
                let save_result = save_outputs(args, &config, &mask_dir, image_path, &output);
                match save_result {
                    Ok(()) => {
                        ok_count += 1;
                        tracker.complete_file();
                        file_reports.push(FileReport {
                            input: image_path.clone(),
                            output: Some(output_path),
                            status: "ok".to_string(),
                            elapsed_seconds: tracker.elapsed_secs(),
                            mask_coverage: output.mask_coverage(),
                        });
                    }
                    Err(e) => {
                        eprintln!("Error saving {}: {:#}", image_path.display(), e);
                        error_count += 1;
                        file_reports.push(FileReport {
                            input: image_path.clone(),
                            output: None,
                            status: format!("error: {:#}", e),
                            elapsed_seconds: tracker.elapsed_secs(),
                            mask_coverage: 0.0,
                        });
                    }
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", image_path.display(), e);
                error_count += 1;
                file_reports.push(FileReport {
                    input: image_path.clone(),
                    output: None,
                    status: format!("error: {}", e),
                    elapsed_seconds: tracker.elapsed_secs(),
                    mask_coverage: 0.0,
                });
            }
        }
    }

    let elapsed = start_time.elapsed();

    if !args.quiet {
        ProgressTracker::print_summary(image_files.len(), ok_count, skip_count, error_count);
        println!("Total time: {:.2}s", elapsed.as_secs_f64());
    }

    if let Some(report_path) = &args.report {
        let report = RunReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            params: pipeline.params().clone(),
            total_files: image_files.len(),
            succeeded: ok_count,
            skipped: skip_count,
            failed: error_count,
            total_seconds: elapsed.as_secs_f64(),
            files: file_reports,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("failed to write report to {}", report_path.display()))?;
    }

    if error_count > 0 {
        anyhow::bail!("{} file(s) failed to restore", error_count);
    }

    Ok(())
}

/// Run the pipeline on one file
fn restore_file(
    pipeline: &RestorationPipeline,
    image_path: &Path,
    mode: OutputMode,
    tracker: &mut ProgressTracker,
) -> Result<RestoreOutput, RestoreError> {
    let source = restauro::load_source(image_path)?;
    let sink = TrackerSink {
        tracker: RefCell::new(tracker),
        mode,
    };
    pipeline.restore_with_progress(&source, &sink)
}

/// Persist the restored image, and the mask/preview when requested
fn save_outputs(
    args: &RestoreArgs,
    config: &Config,
    mask_dir: &Option<PathBuf>,
    image_path: &Path,
    output: &RestoreOutput,
) -> anyhow::Result<()> {
    let restored_path = restored_output_path(&args.output, image_path);
    save_jpeg(&output.restored, &restored_path, config.jpeg_quality)?;

    if let Some(dir) = mask_dir {
        let mask_path = sibling_path(dir, image_path, "_mask", "png");
        output
            .mask
            .save(&mask_path)
            .with_context(|| format!("failed to write mask {}", mask_path.display()))?;
    }

    if let Some(dir) = &args.preview_out {
        let preview_path = sibling_path(dir, image_path, "_preview", "jpg");
        save_jpeg(&output.display, &preview_path, config.jpeg_quality)?;
    }

    Ok(())
}

/// Encode an RGB image as JPEG at the configured quality
fn save_jpeg(image: &image::RgbImage, path: &Path, quality: u8) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        .with_context(|| format!("failed to encode {}", path.display()))?;
    Ok(())
}

// ============ Helper Functions ============

/// Create CLI overrides from RestoreArgs
///
/// Flags the user did not type stay `None`, so config file values survive.
fn create_cli_overrides(args: &RestoreArgs) -> CliOverrides {
    CliOverrides {
        kernel_size: args.kernel_size,
        threshold: args.threshold,
        alpha: args.alpha,
        beta: args.beta,
        saturation: args.saturation,
        denoise_strength: args.denoise_strength,
        resize_factor: args.resize_factor,
        display_scale: args.display_scale,
        jpeg_quality: args.jpeg_quality,
        save_mask: (args.save_mask || args.mask_out.is_some()).then_some(true),
    }
}

/// Where to write damage masks, if anywhere
fn mask_output_dir(args: &RestoreArgs, config: &Config) -> Option<PathBuf> {
    if let Some(dir) = &args.mask_out {
        Some(dir.clone())
    } else if config.save_mask {
        Some(args.output.clone())
    } else {
        None
    }
}

/// Output path for the restored version of `input`
fn restored_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    sibling_path(output_dir, input, "_restored", "jpg")
}

/// `<dir>/<input stem><suffix>.<extension>`
fn sibling_path(dir: &Path, input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{}{}.{}", stem, suffix, extension))
}

/// Collect image files from input path (file or directory)
fn collect_image_files(input: &PathBuf) -> anyhow::Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    if input.is_file() {
        if has_image_extension(input) {
            image_files.push(input.clone());
        }
    } else if input.is_dir() {
        for entry in std::fs::read_dir(input)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && has_image_extension(&path) {
                image_files.push(path);
            }
        }
        image_files.sort();
    }

    Ok(image_files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Print execution plan for dry-run mode
fn print_execution_plan(args: &RestoreArgs, image_files: &[PathBuf], config: &Config) {
    let p = &config.params;

    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Files to restore: {}", image_files.len());
    println!();
    println!("Pipeline Configuration:");
    println!(
        "  1. Damage Mask (threshold: {}, kernel: {}x{})",
        p.threshold, p.kernel_size, p.kernel_size
    );
    println!("  2. Resize (factor: {})", p.resize_factor);
    println!(
        "  3. Tone Correction (alpha: {}, beta: {})",
        p.alpha, p.beta
    );
    println!("  4. Saturation (gain: {})", p.saturation);
    if p.denoise_strength > 0 {
        println!("  5. Denoise (strength: {})", p.denoise_strength);
    } else {
        println!("  5. Denoise: DISABLED");
    }
    println!("  6. Inpainting (radius: {})", INPAINT_RADIUS);
    println!("  7. Display Scale (factor: {})", p.display_scale);
    println!();
    println!("Processing Options:");
    println!(
        "  Threads: {}",
        args.threads.unwrap_or_else(num_cpus::get)
    );
    println!("  JPEG quality: {}", config.jpeg_quality);
    println!(
        "  Save masks: {}",
        if args.save_mask || args.mask_out.is_some() || config.save_mask {
            "YES"
        } else {
            "NO"
        }
    );
    println!(
        "  Save previews: {}",
        if args.preview_out.is_some() { "YES" } else { "NO" }
    );
    println!(
        "  Skip existing: {}",
        if args.skip_existing { "YES" } else { "NO" }
    );
    println!();
    println!("Files:");
    for (i, file) in image_files.iter().enumerate() {
        println!("  {}. {}", i + 1, file.display());
    }
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("restauro v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    // Memory info (Linux)
    if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
        if let Some(line) = meminfo.lines().find(|l| l.starts_with("MemTotal:")) {
            if let Some(kb) = line.split_whitespace().nth(1) {
                if let Ok(kb_val) = kb.parse::<u64>() {
                    println!("  Memory: {:.1} GB", kb_val as f64 / 1_048_576.0);
                }
            }
        }
    }

    println!();
    println!("Supported Input Formats:");
    println!("  {}", IMAGE_EXTENSIONS.join(", "));

    println!();
    println!("Config File Locations:");
    println!("  Local: ./{}", Config::LOCAL_FILE);
    if let Some(user) = Config::user_config_path() {
        println!("  User:  {}", user.display());
    }

    Ok(())
}
