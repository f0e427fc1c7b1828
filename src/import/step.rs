//! One input file in, one brush asset record out.

use std::collections::HashSet;
use std::path::Path;

use super::error::ItemFailure;
use super::naming::allocate;
use crate::assets::{AssetError, AssetHandle, BrushHandle, ImageHandle, ResourceStore};
use crate::config::ImportSettings;

/// An image and the brush derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushRecord {
    pub source_file: String,
    pub image: ImageHandle,
    pub image_name: String,
    pub brush: BrushHandle,
    pub brush_name: String,
}

/// Convert `file_path` into an image resource plus a derived brush.
///
/// The brush is named from `proposed_base_name + "_Brush"`, made unique against
/// `reserved_names`. Inserting the returned name into the reserved set is the
/// caller's job. Any error is reported as an [`ItemFailure`] for this file only.
pub fn convert_one<S: ResourceStore + ?Sized>(
    store: &mut S,
    file_path: &Path,
    proposed_base_name: &str,
    reserved_names: &HashSet<String>,
    settings: &ImportSettings,
) -> Result<BrushRecord, ItemFailure> {
    let filename = file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string());

    try_convert(
        store,
        file_path,
        &filename,
        proposed_base_name,
        reserved_names,
        settings,
    )
    .map_err(|err| ItemFailure {
        filename,
        description: err.to_string(),
    })
}

fn try_convert<S: ResourceStore + ?Sized>(
    store: &mut S,
    file_path: &Path,
    filename: &str,
    proposed_base_name: &str,
    reserved_names: &HashSet<String>,
    settings: &ImportSettings,
) -> Result<BrushRecord, AssetError> {
    let stem = file_stem(filename);
    let image = store.load_image(file_path, &stem)?;
    let image_name = store
        .image_name(image)
        .ok_or(AssetError::UnknownHandle)?
        .to_string();

    let brush_name = allocate(&format!("{}_Brush", proposed_base_name), reserved_names);
    let brush = store.create_derived_brush(&brush_name, image, &settings.brush)?;

    store.mark_as_asset(AssetHandle::Brush(brush), &settings.author)?;
    store.mark_as_asset(AssetHandle::Image(image), &settings.author)?;

    tracing::debug!("Created brush '{}' from {}", brush_name, filename);

    Ok(BrushRecord {
        source_file: filename.to_string(),
        image,
        image_name,
        brush,
        brush_name,
    })
}

/// File name without its final extension
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string())
}
