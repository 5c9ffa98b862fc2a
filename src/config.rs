//! Tool configuration.
//!
//! Handles loading, validating, and merging `bizcard.toml`. Stock defaults
//! are overridden by whatever the user file specifies; the file is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! compression = "default"   # fast | default | best
//! size_policy = "advisory"  # advisory | enforce
//! max_shrink_attempts = 6   # enforce only
//!
//! [processing]
//! max_concurrent = 4        # omit for auto = CPU cores
//!
//! [export]
//! output_dir = "."
//! ```
//!
//! Profiles (avatar 720×720, logo 300×300) are fixed and not configurable.
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [images]
//! size_policy = "enforce"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EncodeOptions, OutputFormat, PngCompression, SizePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "bizcard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// PNG encoding and byte-budget handling.
    pub images: ImagesConfig,
    /// Parallel normalization settings.
    pub processing: ProcessingConfig,
    /// Where exported files go.
    pub export: ExportConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_concurrent == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_concurrent must be at least 1".into(),
            ));
        }
        if self.export.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            format: OutputFormat::Png,
            compression: self.images.compression,
            size_policy: self.images.size_policy,
            max_shrink_attempts: self.images.max_shrink_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Deflate effort for PNG output.
    pub compression: PngCompression,
    /// `advisory` keeps the first encode; `enforce` shrinks until under budget.
    pub size_policy: SizePolicy,
    /// Re-render attempts before giving up under `enforce`.
    pub max_shrink_attempts: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        let opts = EncodeOptions::default();
        Self {
            compression: opts.compression,
            size_policy: opts.size_policy,
            max_shrink_attempts: opts.max_shrink_attempts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of images normalized at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_concurrent: Option<usize>,
}

/// How many images a `normalize` run decodes at the same time.
///
/// `max_concurrent` can only lower the count below the number of cores.
pub fn effective_concurrency(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_concurrent.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory that receives `.vcf` files and normalized images.
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(Config::default())?)
}

/// Lay a user `bizcard.toml` over the stock defaults.
///
/// Sections such as `[images]` merge key by key, so a file naming only
/// `size_policy` keeps the default `compression`. Scalars from the user file win.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// A missing file yields the stock defaults; an invalid one is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `bizcard.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bizcard configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Image normalization
# ---------------------------------------------------------------------------
[images]
# PNG deflate effort: "fast", "default" or "best".
compression = "default"

# What to do when a PNG comes out larger than the profile's byte budget
# (avatar 512000 bytes, logo 204800 bytes):
#   "advisory" - keep it; only the 720x720 / 300x300 bounds apply.
#   "enforce"  - re-render at smaller dimensions until it fits.
size_policy = "advisory"

# With size_policy = "enforce", how many smaller renders to try before failing.
max_shrink_attempts = 6

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum images normalized at once.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_concurrent = 4

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Directory receiving .vcf files and normalized images.
output_dir = "."
"##
}
