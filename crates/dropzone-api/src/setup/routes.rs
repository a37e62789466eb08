//! Route configuration and setup.

use crate::constants::{HEALTH_LIVE_ROUTE, HEALTH_READY_ROUTE, UPLOAD_ROUTE};
use crate::handlers::{health, upload};
use crate::middleware::{
    request_id_middleware, security_headers_middleware, SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, response::Redirect, routing::get, Router};
use dropzone_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    // The body limit sits above the upload size limit so oversized files still reach
    // the size check and get its message.
    let body_limit = usize::try_from(config.request_body_limit_bytes).unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(|| async { Redirect::to(UPLOAD_ROUTE) }))
        .route(
            UPLOAD_ROUTE,
            get(upload::upload_form).post(upload::upload_file),
        )
        .route(HEALTH_LIVE_ROUTE, get(health::liveness_check))
        .route(HEALTH_READY_ROUTE, get(health::readiness_check))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state)
}
