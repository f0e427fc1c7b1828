//! Brush library (.brushlib) file format
//!
//! A library is a ZIP archive containing:
//! - mimetype: "application/x-brush-library" (stored, not compressed)
//! - library.json: images, brushes and asset metadata
//! - previews/*.png: one preview per image

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::error::AssetError;
use super::store::AssetSession;
use super::types::{BrushResource, ImageResource};
use crate::app_meta::{APP_NAME, LIBRARY_MIMETYPE};
use crate::import::naming::{allocate, sanitize_name};

pub const LIBRARY_FORMAT_VERSION: u32 = 1;
const MANIFEST_ENTRY: &str = "library.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryManifest {
    format_version: u32,
    generator: String,
    images: Vec<ImageResource>,
    brushes: Vec<BrushResource>,
}

/// Write every image and brush of `session` to `path`.
///
/// The archive is assembled next to the target and renamed into place, so an
/// existing library is left untouched when writing fails.
pub fn write_library(session: &AssetSession, path: &Path) -> Result<(), AssetError> {
    let temp_path = temp_path_for(path);
    let result = write_archive(session, &temp_path).and_then(|()| {
        std::fs::rename(&temp_path, path)?;
        Ok(())
    });

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result?;

    tracing::info!(
        "Saved brush library: {} images, {} brushes -> {:?}",
        session.images().len(),
        session.brushes().len(),
        path
    );
    Ok(())
}

fn write_archive(session: &AssetSession, path: &Path) -> Result<(), AssetError> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);

    // mimetype MUST be first and stored
    let options_stored = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);
    zip.start_file("mimetype", options_stored)?;
    zip.write_all(LIBRARY_MIMETYPE.as_bytes())?;

    let options_deflate = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut images = Vec::with_capacity(session.images().len());
    let mut used_entries: HashSet<String> = HashSet::new();
    let mut wrote_preview_dir = false;

    for image in session.images() {
        let mut entry = image.clone();
        entry.preview_path = None;

        if let Some(png_bytes) = image.preview_png.as_deref() {
            if !wrote_preview_dir {
                zip.add_directory("previews", options_deflate)?;
                wrote_preview_dir = true;
            }
            let stem = allocate(&sanitize_name(&image.name), &used_entries);
            used_entries.insert(stem.clone());

            let preview_path = format!("previews/{}.png", stem);
            zip.start_file(preview_path.as_str(), options_deflate)?;
            zip.write_all(png_bytes)?;
            entry.preview_path = Some(preview_path);
        }

        images.push(entry);
    }

    let manifest = LibraryManifest {
        format_version: LIBRARY_FORMAT_VERSION,
        generator: APP_NAME.to_string(),
        images,
        brushes: session.brushes().to_vec(),
    };
    zip.start_file(MANIFEST_ENTRY, options_deflate)?;
    zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;

    zip.finish()?;
    Ok(())
}

/// Load a library file back into a session
pub fn read_library(path: &Path) -> Result<AssetSession, AssetError> {
    tracing::info!("Opening brush library: {:?}", path);

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut mimetype = String::new();
    match archive.by_name("mimetype") {
        Ok(mut entry) => {
            entry.read_to_string(&mut mimetype)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(AssetError::InvalidLibrary("missing mimetype".to_string()))
        }
        Err(e) => return Err(e.into()),
    }
    if mimetype.trim() != LIBRARY_MIMETYPE {
        return Err(AssetError::InvalidLibrary(format!(
            "unexpected mimetype '{}'",
            mimetype.trim()
        )));
    }

    let manifest: LibraryManifest = {
        let entry = archive.by_name(MANIFEST_ENTRY).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => {
                AssetError::InvalidLibrary(format!("missing {}", MANIFEST_ENTRY))
            }
            other => other.into(),
        })?;
        serde_json::from_reader(entry)?
    };

    if manifest.format_version > LIBRARY_FORMAT_VERSION {
        return Err(AssetError::InvalidLibrary(format!(
            "format version {} is newer than supported version {}",
            manifest.format_version, LIBRARY_FORMAT_VERSION
        )));
    }

    let mut images = manifest.images;
    for image in &mut images {
        let Some(preview_path) = image.preview_path.as_deref() else {
            continue;
        };
        match archive.by_name(preview_path) {
            Ok(mut entry) => {
                let mut png_bytes = Vec::new();
                entry.read_to_end(&mut png_bytes)?;
                image.preview_png = Some(png_bytes);
            }
            Err(e) => {
                tracing::warn!("Missing preview {} for '{}': {}", preview_path, image.name, e);
            }
        }
    }

    tracing::info!(
        "Loaded brush library: {} images, {} brushes",
        images.len(),
        manifest.brushes.len()
    );

    Ok(AssetSession::from_parts(images, manifest.brushes))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "library".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
