//! Batch import error types

use serde::Serialize;
use thiserror::Error;

/// Job-level failures. Each one ends the job.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Pre-flight: input folder or output folder is unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Pre-flight: nothing in the folder matches the image allow-list
    #[error("No image files found in {0}")]
    NoEligibleFiles(String),

    /// The aggregate save failed after every file was converted
    #[error("Failed to save library {path}: {reason}")]
    SaveFailed { path: String, reason: String },
}

impl From<ImportError> for String {
    fn from(err: ImportError) -> Self {
        err.to_string()
    }
}

/// A single input that could not be converted. The job keeps going.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Failed to load {filename}: {description}")]
pub struct ItemFailure {
    pub filename: String,
    pub description: String,
}
