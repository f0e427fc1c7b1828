//! Brush Batch - turn a folder of images into a single brush asset library
//!
//! This is the library crate behind the `brushbatch` command line shell.

pub mod app_meta;
pub mod assets;
pub mod commands;
pub mod config;
pub mod import;

#[cfg(test)]
pub(crate) mod test_utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. Output goes to stderr so it never mixes with the report.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brushbatch=info,brushbatch_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("{} initializing...", app_meta::APP_NAME);
}
