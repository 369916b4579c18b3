//! KiCad Library Convention (KLC) checking.
//!
//! The rule engine lives in `check_symbol.py` from `kicad-library-utils`.
//! This module only runs it: [`SymbolChecker`] is the seam, [`KlcChecker`]
//! the subprocess implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Environment variable overriding the checker script location.
pub const CHECKER_ENV: &str = "KICAD_KLC_CHECKER";

/// Checker location used when nothing is configured.
pub const DEFAULT_CHECKER_PATH: &str = "kicad-library-utils/klc-check/check_symbol.py";

/// Errors that prevent a check from running at all.
///
/// A check that runs and reports violations is not an error; see
/// [`CheckReport::passed`].
#[derive(Debug, Error)]
pub enum KlcError {
    /// The checker script does not exist.
    #[error("KLC checker not found at {path}")]
    CheckerNotFound {
        /// Where the checker was expected.
        path: PathBuf,
    },

    /// The interpreter could not be started.
    #[error("failed to run KLC checker with '{program}'")]
    Spawn {
        /// Interpreter that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result of a completed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Exit status of the checker; `None` if it was killed by a signal.
    pub status: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

impl CheckReport {
    /// Returns true if the checker exited with status 0.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

/// Something that can check a symbol library against the KLC.
pub trait SymbolChecker {
    /// Checks `library`, optionally restricted to one symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the checker cannot be run.
    fn check(&self, library: &Path, symbol: Option<&str>) -> Result<CheckReport, KlcError>;
}

/// Runs `check_symbol.py` through a Python interpreter.
#[derive(Debug, Clone)]
pub struct KlcChecker {
    python: String,
    script: PathBuf,
}

impl KlcChecker {
    /// Creates a checker for the given interpreter and script.
    pub fn new(python: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }

    /// Resolves the script path: explicit path, then [`CHECKER_ENV`], then
    /// [`DEFAULT_CHECKER_PATH`].
    #[must_use]
    pub fn resolve_script(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(
            || {
                std::env::var_os(CHECKER_ENV)
                    .map_or_else(|| PathBuf::from(DEFAULT_CHECKER_PATH), PathBuf::from)
            },
            Path::to_path_buf,
        )
    }

    /// Returns the checker script path.
    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    fn command(&self, library: &Path, symbol: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.arg(&self.script).arg(library);
        if let Some(symbol) = symbol {
            cmd.arg("-c").arg(symbol);
        }
        cmd
    }
}

impl SymbolChecker for KlcChecker {
    fn check(&self, library: &Path, symbol: Option<&str>) -> Result<CheckReport, KlcError> {
        if !self.script.is_file() {
            return Err(KlcError::CheckerNotFound {
                path: self.script.clone(),
            });
        }

        tracing::info!(
            checker = %self.script.display(),
            library = %library.display(),
            symbol = symbol.unwrap_or("<all>"),
            "Running KLC checker"
        );

        let output = self
            .command(library, symbol)
            .output()
            .map_err(|e| KlcError::Spawn {
                program: self.python.clone(),
                source: e,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let report = CheckReport {
            status: output.status.code(),
            output: text,
        };
        tracing::debug!(status = ?report.status, "KLC checker finished");
        Ok(report)
    }
}
