//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use dropzone_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let policy = &config.policy;
    let max_upload_mb = policy.max_size_bytes() / 1024 / 1024;
    tracing::info!(
        max_upload_mb,
        accepted_types = %policy.accept_attribute(),
        content_sniffing = policy.content_sniffing(),
        upload_dir = %config.upload_dir.display(),
        analysis_path = %config.analysis_path,
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Upload server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// `axum::serve` then stops accepting connections and lets uploads in flight finish
/// streaming and storing before the process exits. Panics if a signal handler cannot
/// be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Stopped accepting uploads, draining in-flight requests");
}
