//! Configuration file support
//!
//! Restoration defaults can live in a TOML file so batch runs don't need a
//! wall of flags. Lookup order: `./restauro.toml`, then
//! `<user config dir>/restauro/config.toml`. Command-line flags always win
//! over file values; file values win over built-in defaults.
//!
//! ```toml
//! save_mask = true
//! jpeg_quality = 92
//!
//! [params]
//! threshold = 190
//! kernel_size = 7
//! alpha = 1.2
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::RestorationParams;

/// Default JPEG encoding quality for restored output
const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Persistent restoration defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Restoration parameters
    pub params: RestorationParams,

    /// Write the applied damage mask next to each restored image
    pub save_mask: bool,

    /// Quality used when encoding JPEG output
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: RestorationParams::default(),
            save_mask: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Parameter values set explicitly on the command line
///
/// Only `Some` fields override the config file, so file values survive for
/// everything the user did not type.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub kernel_size: Option<u32>,
    pub threshold: Option<u8>,
    pub alpha: Option<f32>,
    pub beta: Option<i32>,
    pub saturation: Option<f32>,
    pub denoise_strength: Option<u32>,
    pub resize_factor: Option<f32>,
    pub display_scale: Option<f32>,
    pub jpeg_quality: Option<u8>,
    pub save_mask: Option<bool>,
}

impl CliOverrides {
    /// Create an empty override set
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Local config file name
    pub const LOCAL_FILE: &'static str = "restauro.toml";

    /// User-level config file path, if a config directory exists
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("restauro").join("config.toml"))
    }

    /// Load configuration from the standard locations
    ///
    /// Missing files are not an error; the built-in defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        let local = Path::new(Self::LOCAL_FILE);
        if local.exists() {
            return Self::load_from_path(local);
        }
        if let Some(user) = Self::user_config_path() {
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Merge command-line overrides on top of this configuration
    pub fn merge_with_cli(&self, overrides: &CliOverrides) -> Config {
        let mut merged = self.clone();

        if let Some(v) = overrides.kernel_size {
            merged.params.kernel_size = v;
        }
        if let Some(v) = overrides.threshold {
            merged.params.threshold = v;
        }
        if let Some(v) = overrides.alpha {
            merged.params.alpha = v;
        }
        if let Some(v) = overrides.beta {
            merged.params.beta = v;
        }
        if let Some(v) = overrides.saturation {
            merged.params.saturation = v;
        }
        if let Some(v) = overrides.denoise_strength {
            merged.params.denoise_strength = v;
        }
        if let Some(v) = overrides.resize_factor {
            merged.params.resize_factor = v;
        }
        if let Some(v) = overrides.display_scale {
            merged.params.display_scale = v;
        }
        if let Some(v) = overrides.jpeg_quality {
            merged.jpeg_quality = v;
        }
        if let Some(v) = overrides.save_mask {
            merged.save_mask = v;
        }

        merged
    }

    /// Serialize for run reports and dry-run output
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================================
// Tests
// ============================================================
