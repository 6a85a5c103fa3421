//! Command-line interface definitions
//!
//! Parameter flags are optional on purpose: only flags the user actually
//! typed are turned into [`crate::CliOverrides`], so values from a config
//! file survive for everything left unspecified.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Automatic restoration of damaged photographs
#[derive(Debug, Parser)]
#[command(name = "restauro", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Restore one image or every image in a directory
    Restore(RestoreArgs),

    /// Show version, system, and configuration information
    Info,
}

/// Arguments for the restore command
#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Input image file or directory of images
    pub input: PathBuf,

    /// Output directory for restored images
    #[arg(short, long, default_value = "restored")]
    pub output: PathBuf,

    /// Load restoration defaults from a specific TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Grayscale intensity at and above which a pixel counts as damaged (0-255)
    #[arg(short = 't', long)]
    pub threshold: Option<u8>,

    /// Side of the square dilation kernel; odd, at least 3
    #[arg(short = 'k', long)]
    pub kernel_size: Option<u32>,

    /// Contrast gain
    #[arg(long)]
    pub alpha: Option<f32>,

    /// Brightness offset (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub beta: Option<i32>,

    /// Saturation gain
    #[arg(short = 's', long)]
    pub saturation: Option<f32>,

    /// Denoising strength; 0 disables denoising
    #[arg(short = 'd', long)]
    pub denoise_strength: Option<u32>,

    /// Uniform scale applied to the source before filtering
    #[arg(long)]
    pub resize_factor: Option<f32>,

    /// Uniform scale of the display preview
    #[arg(long)]
    pub display_scale: Option<f32>,

    /// JPEG quality for restored output (1-100)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Write the applied damage mask next to each restored image
    #[arg(long)]
    pub save_mask: bool,

    /// Directory for damage masks (implies --save-mask)
    #[arg(long, value_name = "DIR")]
    pub mask_out: Option<PathBuf>,

    /// Directory for display-scaled previews
    #[arg(long, value_name = "DIR")]
    pub preview_out: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Skip inputs whose restored output already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Print the execution plan without processing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Number of worker threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Increase output verbosity (-v: stages, -vv: stage timings)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_asserts() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_restore_defaults() {
        let cli = Cli::parse_from(["restauro", "restore", "foto.jpg"]);
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.input, PathBuf::from("foto.jpg"));
                assert_eq!(args.output, PathBuf::from("restored"));
                assert_eq!(args.threshold, None);
                assert_eq!(args.kernel_size, None);
                assert!(!args.save_mask);
                assert!(!args.dry_run);
                assert_eq!(args.verbose, 0);
            }
            _ => panic!("expected restore command"),
        }
    }

    #[test]
    fn test_parse_restore_flags() {
        let cli = Cli::parse_from([
            "restauro",
            "restore",
            "fotos/",
            "-o",
            "out",
            "-t",
            "200",
            "-k",
            "7",
            "--alpha",
            "1.3",
            "--beta",
            "-15",
            "--save-mask",
            "-vv",
        ]);
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.output, PathBuf::from("out"));
                assert_eq!(args.threshold, Some(200));
                assert_eq!(args.kernel_size, Some(7));
                assert_eq!(args.alpha, Some(1.3));
                assert_eq!(args.beta, Some(-15));
                assert!(args.save_mask);
                assert_eq!(args.verbose, 2);
            }
            _ => panic!("expected restore command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["restauro", "restore", "foto.jpg", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_info() {
        let cli = Cli::parse_from(["restauro", "info"]);
        assert!(matches!(cli.command, Commands::Info));
    }
}
