//! Application identity and on-disk naming constants.

pub const APP_NAME: &str = "Brush Batch";
pub const APP_CONFIG_DIR_NAME: &str = "brushbatch";
pub const APP_STORAGE_PREFIX: &str = "brushbatch";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Extension every saved library file carries.
pub const LIBRARY_EXTENSION: &str = "brushlib";
/// Stored (uncompressed) first entry of a library archive.
pub const LIBRARY_MIMETYPE: &str = "application/x-brush-library";

/// Author tag stamped on every generated asset.
pub const DEFAULT_AUTHOR: &str = "Batch Image Import";
