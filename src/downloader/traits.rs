// Extraction client trait definitions

use async_trait::async_trait;

use super::errors::ExtractionError;
use super::models::{DownloadRequest, VideoMetadata};

/// Receives progress callbacks while a download is running.
///
/// Called zero or more times from inside `MediaExtractor::download`, once per
/// progress report of the underlying tool.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, downloaded: u64, total: Option<u64>);
}

/// Sink that discards every update
#[cfg(test)]
pub struct NoProgress;

#[cfg(test)]
impl ProgressSink for NoProgress {
    fn on_progress(&self, _downloaded: u64, _total: Option<u64>) {}
}

/// Trait for extraction client implementations
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Query metadata and formats without downloading
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractionError>;

    /// Download into the shared output directory, returning the saved file name
    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressSink,
    ) -> Result<String, ExtractionError>;
}
