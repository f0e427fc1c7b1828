//! Resource types held by an asset session and written to library files.

use serde::{Deserialize, Serialize};

/// Brush falloff curve presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FalloffCurve {
    Smooth,
    Sphere,
    Root,
    Sharp,
    Linear,
    /// Flat falloff: full strength across the whole tip
    #[default]
    Constant,
}

/// How a brush texture is projected onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextureMapMode {
    /// Planar projection aligned with the view
    #[default]
    ViewPlane,
    Tiled,
    Area,
    Random,
    Stencil,
}

/// Paint parameters applied to every derived brush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushParams {
    pub falloff: FalloffCurve,
    pub map_mode: TextureMapMode,
    /// Tip radius in pixels
    pub radius: u32,
    /// 0.0 - 1.0
    pub strength: f32,
    /// Dab spacing as a percentage of the tip diameter
    pub spacing: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            falloff: FalloffCurve::Constant,
            map_mode: TextureMapMode::ViewPlane,
            radius: 50,
            strength: 1.0,
            spacing: 10.0,
        }
    }
}

/// Metadata carried by resources that are marked as reusable assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub author: String,
}

/// An image loaded from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResource {
    pub name: String,
    pub source_path: String,
    pub width: u32,
    pub height: u32,
    /// SHA-256 of the source file bytes
    pub content_hash: String,
    /// Archive entry of the preview inside a saved library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_path: Option<String>,
    #[serde(skip)]
    pub preview_png: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetMetadata>,
}

impl ImageResource {
    pub fn is_asset(&self) -> bool {
        self.asset.is_some()
    }
}

/// A paint brush whose texture slot maps an image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushResource {
    pub name: String,
    /// Name of the image this brush textures with
    pub image: String,
    pub texture_name: String,
    pub params: BrushParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetMetadata>,
}

impl BrushResource {
    pub fn is_asset(&self) -> bool {
        self.asset.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushHandle(pub(crate) usize);

/// Any resource that can be marked as an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetHandle {
    Image(ImageHandle),
    Brush(BrushHandle),
}

impl From<ImageHandle> for AssetHandle {
    fn from(handle: ImageHandle) -> Self {
        AssetHandle::Image(handle)
    }
}

impl From<BrushHandle> for AssetHandle {
    fn from(handle: BrushHandle) -> Self {
        AssetHandle::Brush(handle)
    }
}
