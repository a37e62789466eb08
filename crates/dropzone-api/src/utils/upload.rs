//! Multipart extraction for the upload form.
//!
//! The `file` part is spooled to a temporary file chunk by chunk, so the request never
//! holds the whole upload in memory. Every transport problem is folded into the returned
//! [`UploadRequest`] instead of an early HTTP rejection; the upload service decides what
//! the client sees.

use crate::constants::FILE_FIELD;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use dropzone_core::models::SNIFF_HEAD_LEN;
use dropzone_core::{TransportError, UploadRequest};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Map a multipart stream failure to a transport error code.
///
/// A 413 means the request body limit was hit; the upload service reports that as an
/// oversized file.
fn transport_error(err: &MultipartError) -> TransportError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TransportError::IniSize
    } else {
        TransportError::Partial
    }
}

fn create_spool(temp_dir: Option<&Path>) -> std::io::Result<NamedTempFile> {
    match temp_dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
}

async fn spool_field(mut field: Field<'_>, temp_dir: Option<&Path>) -> UploadRequest {
    let filename = field.file_name().unwrap_or_default().to_string();
    // Browsers send an empty part when no file was chosen
    if filename.is_empty() {
        return UploadRequest::failed(TransportError::NoFile);
    }
    let content_type = field.content_type().unwrap_or_default().to_string();

    let spool = match create_spool(temp_dir) {
        Ok(spool) => spool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create upload spool file");
            return UploadRequest::failed_with_name(filename, TransportError::NoTmpDir);
        }
    };
    let mut file = match spool.reopen() {
        Ok(file) => tokio::fs::File::from_std(file),
        Err(e) => {
            tracing::error!(error = %e, "Failed to open upload spool file");
            return UploadRequest::failed_with_name(filename, TransportError::NoTmpDir);
        }
    };

    let mut size: u64 = 0;
    let mut head = Vec::with_capacity(SNIFF_HEAD_LEN);

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if head.len() < SNIFF_HEAD_LEN {
                    let take = (SNIFF_HEAD_LEN - head.len()).min(chunk.len());
                    head.extend_from_slice(&chunk[..take]);
                }
                size += chunk.len() as u64;
                if let Err(e) = file.write_all(&chunk).await {
                    tracing::error!(error = %e, "Failed to write upload chunk to spool");
                    return UploadRequest::failed_with_name(filename, TransportError::CantWrite);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, received_bytes = size, "Upload stream interrupted");
                return UploadRequest::interrupted(filename, transport_error(&e), size);
            }
        }
    }

    if let Err(e) = file.flush().await {
        tracing::error!(error = %e, "Failed to flush upload spool");
        return UploadRequest::failed_with_name(filename, TransportError::CantWrite);
    }

    UploadRequest::received(filename, content_type, spool, size, head)
}

/// Read the submission into an [`UploadRequest`].
///
/// Only the first field named `file` is used; further `file` fields are ignored.
pub async fn extract_upload_request(
    multipart: Result<Multipart, MultipartRejection>,
    temp_dir: Option<&Path>,
) -> UploadRequest {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(rejection = %rejection, "Request is not a multipart upload");
            return UploadRequest::failed(TransportError::NoFile);
        }
    };

    let mut request: Option<UploadRequest> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read multipart field");
                let error = transport_error(&e);
                return match request {
                    Some(received) => UploadRequest::interrupted(
                        received.original_filename,
                        error,
                        received.declared_size,
                    ),
                    None => UploadRequest::failed(error),
                };
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if request.is_some() {
            tracing::warn!("Ignoring additional file field; only one file per upload");
            continue;
        }

        let received = spool_field(field, temp_dir).await;
        if received.transport_error.is_some() {
            return received;
        }
        request = Some(received);
    }

    request.unwrap_or_else(|| UploadRequest::failed(TransportError::NoFile))
}
