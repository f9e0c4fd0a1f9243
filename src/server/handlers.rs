use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::Path as FsPath;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::error::ApiError;
use super::relay::ProgressRelay;
use super::requests::{DownloadBody, InfoBody};
use super::AppState;
use crate::downloader::VideoMetadata;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub filename: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn video_info(
    State(state): State<AppState>,
    payload: Result<Json<InfoBody>, JsonRejection>,
) -> Result<Json<VideoMetadata>, ApiError> {
    let Json(body) = payload?;
    let url = body.validate()?;

    let metadata = state.extractor.fetch_metadata(&url).await?;
    Ok(Json(metadata))
}

pub async fn start_download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let Json(body) = payload?;
    let (request, connection) = body.validate()?;

    match connection {
        Some(id) if !state.hub.is_connected(id) => {
            debug!(connection = %id, "download requested for a closed connection")
        }
        None => debug!("download requested without a connection id, progress disabled"),
        _ => {}
    }

    // Runs detached from the request; a client disconnect does not abort it
    let relay = ProgressRelay::new(state.hub.clone(), connection);
    let extractor = state.extractor.clone();
    let task = tokio::spawn(async move { extractor.download(&request, &relay).await });
    let filename = task
        .await
        .map_err(|e| ApiError::Upstream(format!("Download task failed: {}", e)))??;

    Ok(Json(DownloadResponse {
        success: true,
        filename,
    }))
}

pub async fn serve_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    if !is_plain_file_name(&filename) {
        return Err(ApiError::NotFound);
    }

    let path = state.download_dir.join(&filename);
    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        debug!(path = %path.display(), "cannot open download: {}", e);
        ApiError::NotFound
    })?;
    let metadata = file.metadata().await.map_err(|_| ApiError::NotFound)?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound);
    }

    let disposition = HeaderValue::from_str(&build_content_disposition(&filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static(content_type_for_filename(&filename))),
        (CONTENT_DISPOSITION, disposition),
        (CONTENT_LENGTH, HeaderValue::from(metadata.len())),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// A bare file name inside the download directory, nothing that walks out of it
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn content_type_for_filename(filename: &str) -> &'static str {
    let extension = FsPath::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "wav" => "audio/wav",
        "ogg" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// `attachment` with an ASCII fallback name plus the exact UTF-8 name
fn build_content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback.trim(),
        urlencoding::encode(filename)
    )
}
