// HTTP + WebSocket surface

pub mod error;
pub mod handlers;
pub mod hub;
pub mod relay;
pub mod requests;
pub mod ws;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::downloader::MediaExtractor;

pub use error::ApiError;
pub use hub::{ConnectionHub, ConnectionId, ServerEvent};
pub use relay::ProgressRelay;

/// Process-wide service state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn MediaExtractor>,
    pub hub: ConnectionHub,
    pub download_dir: PathBuf,
}

impl AppState {
    pub fn new(extractor: Arc<dyn MediaExtractor>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            hub: ConnectionHub::new(),
            download_dir: download_dir.into(),
        }
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/info", post(handlers::video_info))
        .route("/api/download", post(handlers::start_download))
        .route("/download/{filename}", get(handlers::serve_file))
        .route("/ws", get(ws::ws_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
