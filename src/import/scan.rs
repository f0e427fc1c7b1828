//! Eligible input discovery for a batch import.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted as batch inputs (compared lowercase)
pub const IMAGE_EXTENSIONS: [&str; 14] = [
    "png", "jpg", "jpeg", "tif", "tiff", "bmp", "psd", "exr", "hdr", "tga", "gif", "dds", "jp2",
    "webp",
];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid directory {path:?}: {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },
}

/// Whether a file name ends with an allow-listed `.ext` suffix.
///
/// Matched on the lowercase name, so a bare dotfile such as `.png` counts.
pub fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// List the eligible image files directly inside `directory`.
///
/// Subdirectories are never entered. Names come back in directory-listing order.
pub fn scan(directory: &Path) -> Result<Vec<String>, ScanError> {
    let invalid = |reason: String| ScanError::InvalidDirectory {
        path: directory.to_path_buf(),
        reason,
    };

    if !directory.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }

    let entries = std::fs::read_dir(directory).map_err(|e| invalid(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", directory, e);
                continue;
            }
        };

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!("Skipping non UTF-8 file name in {:?}", directory);
            continue;
        };

        if !is_supported_image(&name) {
            continue;
        }

        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }

        files.push(name);
    }

    tracing::debug!("Found {} image files in {:?}", files.len(), directory);
    Ok(files)
}
