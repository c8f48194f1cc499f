//! Server configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! merged over the stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! media_root = "media"                  # Source images, addressed by identifier
//! cache_root = "cache"                  # Derived images, one file per request path
//! base_url = "http://127.0.0.1:5000/"   # Prefix of every info.json @id
//!
//! [encoding]
//! jpeg_quality = 75                     # JPEG (and PDF) quality, 1-100
//!
//! [tiles]
//! width = 512                           # Advertised tile width
//! scale_factors = [1, 2, 4, 8, 16]      # Advertised tile scale factors
//!
//! [processing]
//! max_processes = 4                     # Max parallel renders (omit for auto = CPU cores)
//!
//! [logging]
//! level = "info"                        # trace, debug, info, warn, error
//! format = "pretty"                     # pretty or json
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use crate::info::InfoSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory holding source images.
    pub media_root: PathBuf,
    /// Directory holding derived images. Created if missing.
    pub cache_root: PathBuf,
    /// Public URL prefix for `@id` in info documents.
    pub base_url: String,
    pub encoding: EncodingConfig,
    pub tiles: TilesConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("media"),
            cache_root: PathBuf::from("cache"),
            base_url: "http://127.0.0.1:5000/".to_string(),
            encoding: EncodingConfig::default(),
            tiles: TilesConfig::default(),
            processing: ProcessingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.tiles.width == 0 {
            return Err(ConfigError::Validation(
                "tiles.width must be non-zero".into(),
            ));
        }
        if self.tiles.scale_factors.is_empty() {
            return Err(ConfigError::Validation(
                "tiles.scale_factors must not be empty".into(),
            ));
        }
        if self.tiles.scale_factors.contains(&0) {
            return Err(ConfigError::Validation(
                "tiles.scale_factors values must be non-zero".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.encoding.jpeg_quality)
    }

    /// Settings for info documents.
    pub fn info_settings(&self) -> InfoSettings {
        InfoSettings {
            base_url: self.base_url.clone(),
            tile_width: self.tiles.width,
            scale_factors: self.tiles.scale_factors.clone(),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// Quality for JPEG output and the JPEG stream inside PDF output.
    pub jpeg_quality: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

/// Tile grid advertised in info documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilesConfig {
    pub width: u32,
    pub scale_factors: Vec<u32>,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            width: 512,
            scale_factors: vec![1, 2, 4, 8, 16],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Log output settings. The CLI's `-v` and `--json-logs` flags override
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ServerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// A missing file yields the stock defaults. A file that exists but does not
/// parse, names unknown keys, or fails validation is an error.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# iiify Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory holding source images. A request's identifier is a file name
# directly inside this directory.
media_root = "media"

# Directory holding derived images, one file per distinct request path,
# named by the SHA-256 of the path. Created if missing. Never pruned.
cache_root = "cache"

# Public URL prefix for the "@id" of info documents. The identifier is
# appended verbatim, so keep the trailing slash.
base_url = "http://127.0.0.1:5000/"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# Quality for JPEG output, and for the JPEG stream inside PDF output (1-100).
jpeg_quality = 75

# ---------------------------------------------------------------------------
# Tiles advertised in info documents
# ---------------------------------------------------------------------------
[tiles]
width = 512
scale_factors = [1, 2, 4, 8, 16]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_processes = 4

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# trace, debug, info, warn, error. RUST_LOG takes precedence when set.
level = "info"
# "pretty" for humans, "json" for log shippers. Logs go to stderr.
format = "pretty"
"##
}
