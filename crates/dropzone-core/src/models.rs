//! Upload domain models.

use crate::error::TransportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Number of leading bytes kept in memory for content sniffing.
pub const SNIFF_HEAD_LEN: usize = 8 * 1024;

/// One multipart submission, as received.
///
/// Everything except the spool is client-reported and untrusted. The spool is deleted
/// when the request is dropped.
#[derive(Debug)]
pub struct UploadRequest {
    pub original_filename: String,
    pub temp_storage: Option<NamedTempFile>,
    pub declared_size: u64,
    /// Empty when the client sent no content type for the part
    pub declared_content_type: String,
    pub transport_error: Option<TransportError>,
    /// First [`SNIFF_HEAD_LEN`] bytes of the content
    pub head: Vec<u8>,
}

impl UploadRequest {
    /// A fully received file part.
    pub fn received(
        original_filename: impl Into<String>,
        declared_content_type: impl Into<String>,
        temp_storage: NamedTempFile,
        declared_size: u64,
        head: Vec<u8>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            temp_storage: Some(temp_storage),
            declared_size,
            declared_content_type: declared_content_type.into(),
            transport_error: None,
            head,
        }
    }

    /// A submission that failed before a usable file part was received.
    pub fn failed(error: TransportError) -> Self {
        Self {
            original_filename: String::new(),
            temp_storage: None,
            declared_size: 0,
            declared_content_type: String::new(),
            transport_error: Some(error),
            head: Vec::new(),
        }
    }

    /// Same as [`UploadRequest::failed`] but keeps the filename for logging.
    pub fn failed_with_name(original_filename: impl Into<String>, error: TransportError) -> Self {
        Self {
            original_filename: original_filename.into(),
            ..Self::failed(error)
        }
    }

    /// A file part cut off after `received_bytes` had arrived.
    pub fn interrupted(
        original_filename: impl Into<String>,
        error: TransportError,
        received_bytes: u64,
    ) -> Self {
        Self {
            declared_size: received_bytes,
            ..Self::failed_with_name(original_filename, error)
        }
    }

    pub fn temp_path(&self) -> Option<&Path> {
        self.temp_storage.as_ref().map(|f| f.path())
    }
}

/// A file at rest in the upload directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Sanitized base filename, also the storage key
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub stored_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_failed_request_has_no_spool() {
        let request = UploadRequest::failed(TransportError::NoFile);
        assert!(request.temp_path().is_none());
        assert_eq!(request.transport_error, Some(TransportError::NoFile));
        assert!(request.original_filename.is_empty());
    }

    #[test]
    fn test_spool_removed_on_drop() {
        let mut spool = NamedTempFile::new().unwrap();
        spool.write_all(b"a,b\n1,2\n").unwrap();
        let request = UploadRequest::received("data.csv", "text/csv", spool, 8, b"a,b\n1,2\n".to_vec());
        let path = request.temp_path().unwrap().to_path_buf();
        assert!(path.exists());
        drop(request);
        assert!(!path.exists());
    }

    #[test]
    fn test_stored_file_serializes() {
        let stored = StoredFile {
            filename: "data.csv".to_string(),
            path: PathBuf::from("uploads/data.csv"),
            size_bytes: 500,
            stored_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["filename"], "data.csv");
        assert_eq!(json["size_bytes"], 500);
    }
}
