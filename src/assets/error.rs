//! Asset store and library file error types

use std::io;
use thiserror::Error;

/// Errors raised while loading resources or reading/writing library files
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PSD parse error: {0}")]
    Psd(String),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Name already in use: {0}")]
    DuplicateName(String),

    #[error("Unknown resource handle")]
    UnknownHandle,

    #[error("Invalid library file: {0}")]
    InvalidLibrary(String),
}

impl From<AssetError> for String {
    fn from(err: AssetError) -> Self {
        err.to_string()
    }
}
