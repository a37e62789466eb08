use crate::error::{upload_error_response, InvalidRedirect};
use crate::pages;
use crate::state::AppState;
use crate::utils::upload::extract_upload_request;
use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderValue, Response, StatusCode},
    response::{Html, IntoResponse},
};
use std::sync::Arc;

/// Render the upload form
pub async fn upload_form(State(state): State<Arc<AppState>>) -> Html<String> {
    let policy = state.uploads.policy();
    Html(pages::upload_page(
        &policy.accept_attribute(),
        &policy.accepted_label(),
    ))
}

/// Receive one file and redirect to the analysis page, or render the failure.
///
/// Failures answer `200 OK` with the message; a stored file answers `302 Found` with an
/// empty body.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response<Body> {
    let request =
        extract_upload_request(multipart, state.config.upload_temp_dir.as_deref()).await;
    let original_filename = request.original_filename.clone();

    let redirect = match state.uploads.handle(request).await {
        Ok(redirect) => redirect,
        Err(e) => {
            return upload_error_response(e, &original_filename, state.uploads.policy());
        }
    };

    let location = match HeaderValue::from_str(&redirect.location) {
        Ok(value) => value,
        Err(_) => {
            return InvalidRedirect {
                location: redirect.location,
            }
            .into_response();
        }
    };

    tracing::debug!(location = %redirect.location, "Redirecting to analysis");

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
