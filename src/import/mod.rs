//! Batch image import
//!
//! Turns a flat folder of images into brush assets, one file per tick:
//! - `scan`: pick eligible files by extension
//! - `step`: convert one file into an image + brush record
//! - `job`: the tick-driven state machine that ends in one aggregate save

pub mod error;
pub mod job;
pub mod naming;
pub mod progress;
pub mod scan;
pub mod step;
pub mod summary;

pub use error::{ImportError, ItemFailure};
pub use job::{
    normalize_library_path, BatchImportJob, JobPhase, JobRequest, JobState, TickKind, TimerId,
};
pub use naming::{allocate, sanitize_name};
pub use progress::{NullProgress, ProgressEvent, ProgressSink, RecordingProgress};
pub use scan::{is_supported_image, scan, ScanError, IMAGE_EXTENSIONS};
pub use step::{convert_one, BrushRecord};
pub use summary::{ImportOutcome, ImportSummary};
