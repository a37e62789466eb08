//! Storage abstraction trait
//!
//! This module defines the Storage trait that the upload pipeline writes through.

use async_trait::async_trait;
use dropzone_core::{StoredFile, UploadError};
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare storage directory: {0}")]
    DirectoryCreateFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DirectoryCreateFailed(msg) => UploadError::DirectoryCreateFailed(msg),
            StorageError::Unavailable(msg) => UploadError::DirectoryCreateFailed(msg),
            StorageError::WriteFailed(msg) | StorageError::InvalidKey(msg) => {
                UploadError::WriteFailed(msg)
            }
        }
    }
}

/// Storage abstraction trait
///
/// Files are addressed by their storage key (the sanitized base filename). Writes are
/// last-write-wins: concurrent stores under the same key are not coordinated.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Make sure the storage location exists and is writable. Idempotent.
    async fn ensure_ready(&self) -> StorageResult<()>;

    /// Copy the content at `source` into storage under `key`, replacing any existing file.
    async fn store_file(&self, key: &str, source: &Path) -> StorageResult<StoredFile>;

    /// Probe the storage location as it is right now, bypassing any cached readiness.
    async fn check(&self) -> StorageResult<()>;

    /// Root directory of the storage location
    fn root(&self) -> &Path;
}
