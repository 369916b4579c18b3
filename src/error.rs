//! Error types for kicad-symbol-utils.
//!
//! Each layer has its own error enum; [`ToolError`] is the command-level
//! taxonomy the binary turns into messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::kicad::KicadError;
use crate::klc::KlcError;
use crate::symbol::report::ReportError;
use crate::symbol::DefinitionError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors surfaced by the commands.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The requested symbol is not in the library.
    #[error("symbol '{symbol}' not found in {library}")]
    SymbolNotFound {
        /// Requested symbol name.
        symbol: String,
        /// Library path.
        library: String,
    },

    /// The symbol exists but has no pins.
    #[error("no pins found for symbol '{symbol}'")]
    NoPins {
        /// Symbol name.
        symbol: String,
    },

    /// The generation input is malformed.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The KLC checker could not be run.
    #[error(transparent)]
    Checker(#[from] KlcError),

    /// The library could not be read or written.
    #[error(transparent)]
    Library(#[from] KicadError),

    /// The pin table could not be rendered.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// JSON output could not be produced.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An output file could not be written.
    #[error("failed to write {path}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
