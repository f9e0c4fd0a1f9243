pub mod config;
pub mod downloader;
pub mod server;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use config::ServerConfig;
use downloader::{tools, MediaExtractor, YtDlpCommand, YtDlpExtractor};
use server::AppState;

/// Start the server and block until Ctrl-C
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory {}",
                config.download_dir.display()
            )
        })?;

    let command = YtDlpCommand::locate(&config.extractor);
    let tool = tools::probe(&command).await;
    match &tool.version {
        Some(version) => info!(path = %tool.path, %version, "yt-dlp available"),
        None => warn!(
            path = %tool.path,
            "yt-dlp did not start; every info/download request will fail until it is installed"
        ),
    }

    let extractor = YtDlpExtractor::new(command, config.download_dir.clone())
        .with_audio_quality(config.extractor.audio_quality.clone());
    info!(extractor = extractor.name(), "extraction client ready");
    let state = AppState::new(Arc::new(extractor), config.download_dir.clone());
    let app = server::router(state, &config.static_dir);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!(
        download_dir = %config.download_dir.display(),
        "Listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
