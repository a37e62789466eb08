//! Upload pipeline.
//!
//! `handle` runs the steps in order and returns at the first failure:
//! transport, presence, type whitelist, size, storage readiness, persist. Nothing is written unless
//! every check before it passed.

use dropzone_core::{
    filename, StoredFile, TransportError, UploadError, UploadRequest, ValidationPolicy,
};
use dropzone_storage::Storage;
use std::sync::Arc;

/// Successful upload: where to send the client next.
#[derive(Debug, Clone)]
pub struct UploadRedirect {
    pub location: String,
    pub stored: StoredFile,
}

#[derive(Clone)]
pub struct UploadService {
    policy: Arc<ValidationPolicy>,
    storage: Arc<dyn Storage>,
    analysis_path: String,
}

impl UploadService {
    pub fn new(
        policy: Arc<ValidationPolicy>,
        storage: Arc<dyn Storage>,
        analysis_path: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            storage,
            analysis_path: analysis_path.into(),
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Location of the analysis step for an uploaded file.
    ///
    /// Carries the original client filename, not the sanitized storage key.
    pub fn redirect_location(&self, original_filename: &str) -> String {
        let separator = if self.analysis_path.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}file={}",
            self.analysis_path,
            separator,
            urlencoding::encode(original_filename)
        )
    }

    pub async fn handle(&self, request: UploadRequest) -> Result<UploadRedirect, UploadError> {
        match request.transport_error {
            // The body limit is never below the size limit, so hitting it means the
            // file is over the size limit too
            Some(TransportError::IniSize) => {
                return Err(UploadError::TooLarge {
                    size: request.declared_size,
                    max: self.policy.max_size_bytes(),
                });
            }
            Some(err) => return Err(UploadError::Transport(err)),
            None => {}
        }
        let source = request
            .temp_path()
            .ok_or(UploadError::Transport(TransportError::NoFile))?;

        self.policy.validate_type(
            &request.original_filename,
            &request.declared_content_type,
            &request.head,
        )?;

        self.policy.validate_size(request.declared_size)?;

        self.storage.ensure_ready().await?;

        let key = filename::basename(&request.original_filename);
        let stored = self.storage.store_file(key, source).await?;

        tracing::info!(
            original_filename = %request.original_filename,
            stored_as = %stored.filename,
            size_bytes = stored.size_bytes,
            "Upload stored"
        );

        Ok(UploadRedirect {
            location: self.redirect_location(&request.original_filename),
            stored,
        })
    }
}
