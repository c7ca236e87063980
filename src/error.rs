//! Error types for loading and writing tables.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a normalization run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Error reading or creating a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the candidate encodings decoded the input cleanly.
    #[error("Failed to decode '{path}' with any of: {}", .attempted.join(", "))]
    Undecodable {
        path: PathBuf,
        attempted: Vec<&'static str>,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row.
    #[error("Input has no header row")]
    NoHeader,

    /// A data row carries more fields than the header declares.
    #[error("Row {row} has {found} field(s) but the header declares {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// The config file exists but is not a usable JSON object.
    #[error("Invalid config file '{path}': {message}")]
    Config { path: PathBuf, message: String },
}

impl NormalizeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NormalizeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;
