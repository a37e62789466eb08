//! Storage setup and initialization

use anyhow::{Context, Result};
use dropzone_core::Config;
use dropzone_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the upload directory backend; the directory is created here, once, at startup.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(path = %config.upload_dir.display(), "Initializing upload storage...");
    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .context("Failed to prepare upload directory")?;
    Ok(Arc::new(storage))
}
