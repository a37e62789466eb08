use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use dropzone_core::StoredFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// The directory is created when the storage is constructed. Afterwards a ready flag
/// skips the filesystem check; if the directory disappears the next failed write
/// clears the flag, recreates it and retries once. [`Storage::check`] always goes to
/// the filesystem and clears the flag when the directory is gone.
pub struct LocalStorage {
    base_path: PathBuf,
    ready: AtomicBool,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Upload directory (e.g., "uploads"); missing parents are created
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let storage = LocalStorage {
            base_path: base_path.into(),
            ready: AtomicBool::new(false),
        };
        storage.ensure_ready().await?;
        Ok(storage)
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys are flat base filenames; anything that could address another directory is
    /// rejected.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key == "."
            || storage_key == ".."
            || storage_key.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' is not a plain filename",
                storage_key.escape_debug()
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    async fn create_dir(&self) -> StorageResult<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o755);

        builder.create(&self.base_path).await.map_err(|e| {
            StorageError::DirectoryCreateFailed(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        tracing::info!(path = %self.base_path.display(), "Upload directory ready");
        Ok(())
    }

    async fn write_copy(source: &Path, dest: &Path) -> std::io::Result<u64> {
        let mut reader = fs::File::open(source).await?;
        let mut file = fs::File::create(dest).await?;
        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(bytes_copied)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn ensure_ready(&self) -> StorageResult<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        self.create_dir().await?;
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn store_file(&self, key: &str, source: &Path) -> StorageResult<StoredFile> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        self.ensure_ready().await?;

        let size = match Self::write_copy(source, &path).await {
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::NotFound && source.exists() => {
                // Directory was removed after startup
                tracing::warn!(
                    path = %self.base_path.display(),
                    "Upload directory missing, recreating"
                );
                self.ready.store(false, Ordering::Release);
                self.ensure_ready().await?;
                Self::write_copy(source, &path).await.map_err(|e| {
                    StorageError::WriteFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(StoredFile {
            filename: key.to_string(),
            path,
            size_bytes: size,
            stored_at: Utc::now(),
        })
    }

    async fn check(&self) -> StorageResult<()> {
        let result = match fs::metadata(&self.base_path).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::Unavailable(format!(
                "{} is not a directory",
                self.base_path.display()
            ))),
            Err(e) => Err(StorageError::Unavailable(format!(
                "{}: {}",
                self.base_path.display(),
                e
            ))),
        };

        // Let the next upload recreate the directory
        if result.is_err() {
            self.ready.store(false, Ordering::Release);
        }
        result
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}
