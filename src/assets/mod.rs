//! Asset backend: images, derived brushes and the library file they persist to.

pub mod error;
pub mod library;
pub mod store;
pub mod types;

pub use error::AssetError;
pub use library::{read_library, write_library, LIBRARY_FORMAT_VERSION};
pub use store::{
    AssetHost, AssetSession, LibraryPersistence, ResourceStore, DEFAULT_PREVIEW_SIZE,
};
pub use types::{
    AssetHandle, AssetMetadata, BrushHandle, BrushParams, BrushResource, FalloffCurve,
    ImageHandle, ImageResource, TextureMapMode,
};
