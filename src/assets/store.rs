//! In-memory asset namespace and the traits the import job talks to.

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use psd::Psd;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use super::error::AssetError;
use super::library;
use super::types::{
    AssetHandle, AssetMetadata, BrushHandle, BrushParams, BrushResource, ImageHandle,
    ImageResource,
};
use crate::import::naming::allocate;

pub const DEFAULT_PREVIEW_SIZE: u32 = 128;

/// Image and brush backend used while converting files.
///
/// Every call may fail on its own; callers treat each failure as scoped to the
/// file being converted.
pub trait ResourceStore {
    /// Names of every brush currently in the namespace
    fn brush_names(&self) -> HashSet<String>;

    /// Decode the image at `path` and register it under `name`, or under the
    /// next free variant of `name` if it is taken.
    fn load_image(&mut self, path: &Path, name: &str) -> Result<ImageHandle, AssetError>;

    fn image_name(&self, image: ImageHandle) -> Option<&str>;

    /// Create a brush whose texture slot maps `image`
    fn create_derived_brush(
        &mut self,
        name: &str,
        image: ImageHandle,
        params: &BrushParams,
    ) -> Result<BrushHandle, AssetError>;

    fn mark_as_asset(&mut self, handle: AssetHandle, author: &str) -> Result<(), AssetError>;
}

/// Whole-library persistence. There is no partial save primitive.
pub trait LibraryPersistence {
    fn save_all(&mut self, target: &Path) -> Result<(), AssetError>;
}

/// A store that can also persist itself
pub trait AssetHost: ResourceStore + LibraryPersistence {}

impl<T: ResourceStore + LibraryPersistence> AssetHost for T {}

/// The working set of images and brushes for one library
#[derive(Debug)]
pub struct AssetSession {
    images: Vec<ImageResource>,
    brushes: Vec<BrushResource>,
    preview_size: u32,
}

impl Default for AssetSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSession {
    pub fn new() -> Self {
        Self::with_preview_size(DEFAULT_PREVIEW_SIZE)
    }

    pub fn with_preview_size(preview_size: u32) -> Self {
        Self {
            images: Vec::new(),
            brushes: Vec::new(),
            preview_size: preview_size.max(1),
        }
    }

    pub(crate) fn from_parts(images: Vec<ImageResource>, brushes: Vec<BrushResource>) -> Self {
        Self {
            images,
            brushes,
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }

    /// Open an existing library file as the working session
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        library::read_library(path)
    }

    pub fn set_preview_size(&mut self, preview_size: u32) {
        self.preview_size = preview_size.max(1);
    }

    pub fn images(&self) -> &[ImageResource] {
        &self.images
    }

    pub fn brushes(&self) -> &[BrushResource] {
        &self.brushes
    }

    pub fn image(&self, name: &str) -> Option<&ImageResource> {
        self.images.iter().find(|image| image.name == name)
    }

    pub fn brush(&self, name: &str) -> Option<&BrushResource> {
        self.brushes.iter().find(|brush| brush.name == name)
    }

    pub fn asset_brush_count(&self) -> usize {
        self.brushes.iter().filter(|brush| brush.is_asset()).count()
    }

    fn image_names(&self) -> HashSet<String> {
        self.images.iter().map(|image| image.name.clone()).collect()
    }
}

impl ResourceStore for AssetSession {
    fn brush_names(&self) -> HashSet<String> {
        self.brushes.iter().map(|brush| brush.name.clone()).collect()
    }

    fn load_image(&mut self, path: &Path, name: &str) -> Result<ImageHandle, AssetError> {
        let bytes = std::fs::read(path)?;
        let decoded = decode_image(path, &bytes)?;
        let preview_png = encode_preview(&decoded, self.preview_size)?;
        let content_hash = hex::encode(Sha256::digest(&bytes));

        let name = allocate(name, &self.image_names());
        tracing::debug!(
            "Loaded image '{}' ({}x{}) from {:?}",
            name,
            decoded.width(),
            decoded.height(),
            path
        );

        self.images.push(ImageResource {
            name,
            source_path: path.to_string_lossy().to_string(),
            width: decoded.width(),
            height: decoded.height(),
            content_hash,
            preview_path: None,
            preview_png: Some(preview_png),
            asset: None,
        });
        Ok(ImageHandle(self.images.len() - 1))
    }

    fn image_name(&self, image: ImageHandle) -> Option<&str> {
        self.images.get(image.0).map(|image| image.name.as_str())
    }

    fn create_derived_brush(
        &mut self,
        name: &str,
        image: ImageHandle,
        params: &BrushParams,
    ) -> Result<BrushHandle, AssetError> {
        let image_name = self
            .image_name(image)
            .ok_or(AssetError::UnknownHandle)?
            .to_string();

        if self.brushes.iter().any(|brush| brush.name == name) {
            return Err(AssetError::DuplicateName(name.to_string()));
        }

        self.brushes.push(BrushResource {
            name: name.to_string(),
            texture_name: format!("{}_Texture", image_name),
            image: image_name,
            params: params.clone(),
            asset: None,
        });
        Ok(BrushHandle(self.brushes.len() - 1))
    }

    fn mark_as_asset(&mut self, handle: AssetHandle, author: &str) -> Result<(), AssetError> {
        let metadata = AssetMetadata {
            author: author.to_string(),
        };
        let slot = match handle {
            AssetHandle::Image(ImageHandle(idx)) => {
                &mut self.images.get_mut(idx).ok_or(AssetError::UnknownHandle)?.asset
            }
            AssetHandle::Brush(BrushHandle(idx)) => {
                &mut self.brushes.get_mut(idx).ok_or(AssetError::UnknownHandle)?.asset
            }
        };
        *slot = Some(metadata);
        Ok(())
    }
}

impl LibraryPersistence for AssetSession {
    fn save_all(&mut self, target: &Path) -> Result<(), AssetError> {
        library::write_library(self, target)
    }
}

fn decode_image(path: &Path, bytes: &[u8]) -> Result<DynamicImage, AssetError> {
    let is_psd = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("psd"));

    if is_psd {
        check_psd_layout(bytes)?;
        let psd = Psd::from_bytes(bytes).map_err(|e| AssetError::Psd(e.to_string()))?;
        let rgba = RgbaImage::from_raw(psd.width(), psd.height(), psd.rgba())
            .ok_or_else(|| AssetError::Psd("composite size does not match header".to_string()))?;
        return Ok(DynamicImage::ImageRgba8(rgba));
    }

    // Prefer the magic bytes; formats without a signature (TGA) fall back to the extension
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }
    Ok(reader.decode()?)
}

const PSD_HEADER_LEN: usize = 26;

fn read_be_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let raw = bytes.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_be_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Bounds-check the PSD sections before handing the bytes to the parser,
/// which indexes without checking.
fn check_psd_layout(bytes: &[u8]) -> Result<(), AssetError> {
    let invalid = |reason: &str| AssetError::Psd(reason.to_string());

    if bytes.len() < PSD_HEADER_LEN || &bytes[..4] != b"8BPS" {
        return Err(invalid("missing PSD header"));
    }
    if read_be_u16(bytes, 4) != Some(1) {
        return Err(invalid("unsupported PSD version"));
    }

    let channels = read_be_u16(bytes, 12).unwrap_or(0) as usize;
    let height = read_be_u32(bytes, 14).unwrap_or(0) as usize;
    let width = read_be_u32(bytes, 18).unwrap_or(0) as usize;
    let depth = read_be_u16(bytes, 22).unwrap_or(0) as usize;
    if channels == 0 || width == 0 || height == 0 || depth == 0 {
        return Err(invalid("empty PSD image"));
    }

    // color mode data, image resources, layer and mask info
    let mut offset = PSD_HEADER_LEN;
    for section in ["color mode data", "image resources", "layer and mask info"] {
        let len = read_be_u32(bytes, offset)
            .ok_or_else(|| AssetError::Psd(format!("truncated {} section", section)))?;
        offset = offset
            .checked_add(4 + len as usize)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| AssetError::Psd(format!("truncated {} section", section)))?;
    }

    let compression =
        read_be_u16(bytes, offset).ok_or_else(|| invalid("missing image data"))?;
    let data_len = bytes.len() - offset - 2;
    let row_bytes = (width * depth + 7) / 8;
    let needed = match compression {
        0 => channels * height * row_bytes,
        1 => channels * height * 2,
        _ => 0,
    };
    if data_len < needed {
        return Err(invalid("truncated image data"));
    }
    Ok(())
}

fn encode_preview(image: &DynamicImage, size: u32) -> Result<Vec<u8>, AssetError> {
    let preview = if image.width() > size || image.height() > size {
        image.thumbnail(size, size)
    } else {
        image.clone()
    };

    let mut png_data = Cursor::new(Vec::new());
    preview.to_rgba8().write_to(&mut png_data, ImageFormat::Png)?;
    Ok(png_data.into_inner())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{write_corrupt, write_image, TempDir};

    #[test]
    fn load_image_names_after_stem_and_avoids_collisions() {
        let dir = TempDir::new("store_load");
        let a_png = write_image(dir.path(), "a.png", 8, 8);
        let a_bmp = write_image(dir.path(), "a.bmp", 8, 8);

        let mut session = AssetSession::new();
        let first = session.load_image(&a_png, "a").unwrap();
        let second = session.load_image(&a_bmp, "a").unwrap();

        assert_eq!(session.image_name(first), Some("a"));
        assert_eq!(session.image_name(second), Some("a_1"));
    }

    #[test]
    fn load_image_records_dimensions_hash_and_preview() {
        let dir = TempDir::new("store_meta");
        let path = write_image(dir.path(), "wide.png", 400, 100);

        let mut session = AssetSession::with_preview_size(64);
        session.load_image(&path, "wide").unwrap();

        let image = session.image("wide").unwrap();
        assert_eq!((image.width, image.height), (400, 100));
        assert_eq!(image.content_hash.len(), 64);

        let preview = image::load_from_memory(image.preview_png.as_ref().unwrap()).unwrap();
        assert_eq!(preview.width(), 64);
        assert_eq!(preview.height(), 16);
    }

    /// Minimal 8-bit RGB PSD: no layers, raw composite planes
    fn psd_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"8BPS");
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 6]);
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&8u16.to_be_bytes());
        bytes.extend_from_slice(&3u16.to_be_bytes());
        // color mode data, image resources
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        // layer and mask info: empty layer info (count 0), empty global mask
        bytes.extend_from_slice(&10u32.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&0i16.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        // raw image data, one plane per channel
        bytes.extend_from_slice(&0u16.to_be_bytes());
        for value in [200u8, 100, 50] {
            bytes.extend(std::iter::repeat(value).take((width * height) as usize));
        }
        bytes
    }

    #[test]
    fn psd_composite_is_decoded() {
        let dir = TempDir::new("store_psd");
        let path = dir.path().join("layered.psd");
        std::fs::write(&path, psd_bytes(6, 4)).unwrap();

        let mut session = AssetSession::new();
        session.load_image(&path, "layered").unwrap();

        let image = session.image("layered").unwrap();
        assert_eq!((image.width, image.height), (6, 4));
        assert!(image.preview_png.is_some());
    }

    #[test]
    fn truncated_psd_is_a_psd_error() {
        let dir = TempDir::new("store_psd_truncated");
        let bytes = psd_bytes(6, 4);
        let mut session = AssetSession::new();

        for cut in [10, PSD_HEADER_LEN + 2, bytes.len() - 5] {
            let path = dir.path().join(format!("cut_{}.psd", cut));
            std::fs::write(&path, &bytes[..cut]).unwrap();
            assert!(matches!(
                session.load_image(&path, "cut"),
                Err(AssetError::Psd(_))
            ));
        }
        assert!(session.images().is_empty());
    }

    #[test]
    fn tga_without_signature_loads_by_extension() {
        let dir = TempDir::new("store_tga");
        let path = write_image(dir.path(), "grain.tga", 12, 10);

        let mut session = AssetSession::new();
        session.load_image(&path, "grain").unwrap();

        let image = session.image("grain").unwrap();
        assert_eq!((image.width, image.height), (12, 10));
    }

    #[test]
    fn jp2_is_not_decodable() {
        let dir = TempDir::new("store_jp2");
        let path = dir.path().join("scan.jp2");
        let mut bytes = vec![0, 0, 0, 0x0c, b'j', b'P', b' ', b' ', 0x0d, 0x0a, 0x87, 0x0a];
        bytes.extend_from_slice(&[0u8; 64]);
        std::fs::write(&path, bytes).unwrap();

        let mut session = AssetSession::new();
        assert!(session.load_image(&path, "scan").is_err());
        assert!(session.images().is_empty());
    }

    #[test]
    fn load_image_rejects_corrupt_data() {
        let dir = TempDir::new("store_corrupt");
        let path = write_corrupt(dir.path(), "broken.png");

        let mut session = AssetSession::new();
        assert!(session.load_image(&path, "broken").is_err());
        assert!(session.images().is_empty());
    }

    #[test]
    fn derived_brush_references_image_through_texture() {
        let dir = TempDir::new("store_brush");
        let path = write_image(dir.path(), "tip.png", 4, 4);

        let mut session = AssetSession::new();
        let image = session.load_image(&path, "tip").unwrap();
        session
            .create_derived_brush("tip_Brush", image, &BrushParams::default())
            .unwrap();

        let brush = session.brush("tip_Brush").unwrap();
        assert_eq!(brush.image, "tip");
        assert_eq!(brush.texture_name, "tip_Texture");
        assert!(!brush.is_asset());
    }

    #[test]
    fn duplicate_brush_name_is_an_error() {
        let dir = TempDir::new("store_dup");
        let path = write_image(dir.path(), "tip.png", 4, 4);

        let mut session = AssetSession::new();
        let image = session.load_image(&path, "tip").unwrap();
        let params = BrushParams::default();
        session.create_derived_brush("tip_Brush", image, &params).unwrap();

        let err = session
            .create_derived_brush("tip_Brush", image, &params)
            .unwrap_err();
        assert!(matches!(err, AssetError::DuplicateName(name) if name == "tip_Brush"));
    }

    #[test]
    fn mark_as_asset_stamps_author() {
        let dir = TempDir::new("store_mark");
        let path = write_image(dir.path(), "tip.png", 4, 4);

        let mut session = AssetSession::new();
        let image = session.load_image(&path, "tip").unwrap();
        let brush = session
            .create_derived_brush("tip_Brush", image, &BrushParams::default())
            .unwrap();
        session.mark_as_asset(brush.into(), "Tester").unwrap();

        assert_eq!(session.asset_brush_count(), 1);
        assert_eq!(
            session.brush("tip_Brush").unwrap().asset.as_ref().unwrap().author,
            "Tester"
        );
        assert!(!session.image("tip").unwrap().is_asset());
        assert!(matches!(
            session.mark_as_asset(AssetHandle::Image(ImageHandle(9)), "Tester"),
            Err(AssetError::UnknownHandle)
        ));
    }
}
