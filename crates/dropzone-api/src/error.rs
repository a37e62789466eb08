//! HTTP error response conversion
//!
//! Upload failures are answered with `200 OK` and an HTML body: either the message alone
//! (the page stops) or the message followed by the form. How each error renders and at
//! which level it is logged comes from [`ErrorMetadata`].

use crate::pages;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use dropzone_core::{ErrorMetadata, LogLevel, UploadError, ValidationPolicy};

fn log_error(error: &UploadError, original_filename: &str) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(
                error = %error,
                error_type,
                error_code,
                original_filename,
                "Upload rejected"
            );
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %error,
                error_type,
                error_code,
                original_filename,
                "Upload rejected"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type,
                error_code,
                original_filename,
                "Upload failed"
            );
        }
    }
}

/// Converts an upload failure into the page the client sees.
pub fn upload_error_response(
    error: UploadError,
    original_filename: &str,
    policy: &ValidationPolicy,
) -> Response {
    log_error(&error, original_filename);

    let message = error.client_message();
    let body = if error.halts_render() {
        pages::halted_page(&message)
    } else {
        pages::inline_error_page(
            &message,
            &policy.accept_attribute(),
            &policy.accepted_label(),
        )
    };

    (StatusCode::OK, Html(body)).into_response()
}

/// The file was stored but the redirect could not be expressed as a header.
///
/// Answered with an explicit 500 instead of a success page without a redirect.
#[derive(Debug)]
pub struct InvalidRedirect {
    pub location: String,
}

impl IntoResponse for InvalidRedirect {
    fn into_response(self) -> Response {
        tracing::error!(
            location = %self.location.escape_debug(),
            "Redirect location is not a valid header value"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::halted_page(
                "The file was uploaded but the analysis page could not be opened.",
            )),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropzone_core::TransportError;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn test_invalid_type_halts() {
        let policy = ValidationPolicy::default();
        let err = UploadError::InvalidType {
            extension: "txt".to_string(),
            content_type: "text/plain".to_string(),
            accepted: policy.accepted_label(),
        };
        let response = upload_error_response(err, "data.txt", &policy);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert_eq!(body, "Error: Please select a valid CSV file.");
    }

    #[tokio::test]
    async fn test_transport_error_renders_form() {
        let policy = ValidationPolicy::default();
        let err = UploadError::Transport(TransportError::NoFile);
        let response = upload_error_response(err, "", &policy);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Error: no file was uploaded (code 4)"));
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn test_write_failure_hides_details() {
        let policy = ValidationPolicy::default();
        let err =
            UploadError::WriteFailed("/srv/uploads/data.csv: permission denied".to_string());
        let body = body_text(upload_error_response(err, "data.csv", &policy)).await;
        assert!(body.contains("There was a problem uploading your file. Please try again."));
        assert!(!body.contains("/srv/uploads"));
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn test_invalid_redirect_is_server_error() {
        let response = InvalidRedirect {
            location: "bad\nlocation".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
