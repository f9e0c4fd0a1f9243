use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::downloader::ExtractionError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors visible to the browser, each with its own status code
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty URL or an undecodable body; extraction never runs
    #[error("{0}")]
    Validation(String),

    /// Anything yt-dlp reported, passed through unchanged
    #[error("{0}")]
    Upstream(String),

    #[error("file not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
