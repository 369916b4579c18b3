//! Error types for KiCad file operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for KiCad operations.
pub type KicadResult<T> = Result<T, KicadError>;

/// Errors that can occur during KiCad file operations.
#[derive(Debug, Error)]
pub enum KicadError {
    /// Failed to open or read the file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The s-expression text could not be tokenised.
    #[error("Syntax error at byte {offset}: {message}")]
    Syntax {
        /// Byte offset where the error occurred.
        offset: usize,
        /// Description of what's wrong.
        message: String,
    },

    /// The s-expression tree does not have the expected shape.
    #[error("Invalid {node}: {message}")]
    InvalidStructure {
        /// Node being decoded (e.g. `pin`, `property`).
        node: String,
        /// Description of what's wrong.
        message: String,
    },

    /// Wrong file type (e.g. a footprint opened as a symbol library).
    #[error("Wrong file type: expected {expected}, got {actual}")]
    WrongFileType {
        /// Expected root node.
        expected: String,
        /// Actual root node found.
        actual: String,
    },
}

impl KicadError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a syntax error.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Creates a structural error.
    pub fn invalid_structure(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Creates a wrong file type error.
    pub fn wrong_file_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::WrongFileType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
