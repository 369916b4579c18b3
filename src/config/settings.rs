//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::kicad::symlib::{DEFAULT_GENERATOR, DEFAULT_VERSION};

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// KLC checker settings.
    #[serde(default)]
    pub klc: KlcConfig,

    /// Layout settings.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Generated library header settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let version = &self.output.library_version;
        if version.len() != 8 || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid library version '{version}'. Must be a yyyymmdd date (e.g. 20241209)"
                ),
            });
        }

        if self.output.generator.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Generator name must not be empty".to_string(),
            });
        }

        if self.klc.python.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "KLC python interpreter must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// KLC checker configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KlcConfig {
    /// Path to `check_symbol.py`. When unset, `KICAD_KLC_CHECKER` or the
    /// bundled `kicad-library-utils` checkout is used.
    #[serde(default)]
    pub checker_path: Option<PathBuf>,

    /// Python interpreter used to run the checker.
    /// Default: "python3"
    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for KlcConfig {
    fn default() -> Self {
        Self {
            checker_path: None,
            python: default_python(),
        }
    }
}

fn default_python() -> String {
    "python3".to_string()
}

/// Layout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Sort each side by functional pin name before placement.
    #[serde(default = "default_true")]
    pub sort_pins: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sort_pins: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Header written into generated libraries.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File format version (`yyyymmdd`).
    #[serde(default = "default_library_version")]
    pub library_version: String,

    /// Generator name.
    #[serde(default = "default_generator")]
    pub generator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            library_version: default_library_version(),
            generator: default_generator(),
        }
    }
}

fn default_library_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_generator() -> String {
    DEFAULT_GENERATOR.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
