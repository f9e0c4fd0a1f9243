// yt-dlp backed extraction client
//
// yt-dlp runs as a child process. Metadata comes from `--dump-single-json`;
// downloads stream machine-readable progress lines on stdout and finish by
// printing the final path after all post-processing.

mod info;
mod progress;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

use super::diagnostics::diagnose_error;
use super::errors::ExtractionError;
use super::formatting::{file_name_of, rewrite_extension};
use super::models::{DownloadKind, DownloadRequest, VideoMetadata, MERGE_OUTPUT_FORMAT};
use super::tools::YtDlpCommand;
use super::traits::{MediaExtractor, ProgressSink};

pub use info::parse_metadata;
pub use progress::{parse_progress_line, ProgressLine, PROGRESS_TEMPLATE};

/// Output template relative to the download directory
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub struct YtDlpExtractor {
    command: YtDlpCommand,
    output_dir: PathBuf,
    audio_quality: String,
}

impl YtDlpExtractor {
    pub fn new(command: YtDlpCommand, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            output_dir: output_dir.into(),
            audio_quality: "192K".to_string(),
        }
    }

    pub fn with_audio_quality(mut self, quality: impl Into<String>) -> Self {
        self.audio_quality = quality.into();
        self
    }

    fn metadata_args(url: &str) -> Vec<String> {
        vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--".to_string(),
            url.to_string(),
        ]
    }

    fn download_args(&self, request: &DownloadRequest) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--newline".to_string(),
            // --print implies --quiet; keep the progress lines anyway
            "--progress".to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "-o".to_string(),
            self.output_dir
                .join(OUTPUT_TEMPLATE)
                .to_string_lossy()
                .into_owned(),
        ];

        if let Some(format) = &request.format {
            args.push("-f".to_string());
            args.push(format.clone());
        }

        match request.kind {
            DownloadKind::Video => {
                args.push("--merge-output-format".to_string());
                args.push(MERGE_OUTPUT_FORMAT.to_string());
            }
            DownloadKind::Audio => {
                args.extend([
                    "-x".to_string(),
                    "--audio-format".to_string(),
                    request.audio_codec().to_string(),
                    "--audio-quality".to_string(),
                    self.audio_quality.clone(),
                ]);
            }
        }

        args.push("--".to_string());
        args.push(request.url.clone());
        args
    }

    /// Run yt-dlp, forwarding every `downloading` progress line to `progress`.
    ///
    /// Returns the last non-progress stdout line, which is the path printed
    /// by `--print after_move:filepath`.
    async fn run_with_progress(
        &self,
        args: Vec<String>,
        progress: &dyn ProgressSink,
    ) -> Result<Option<String>, ExtractionError> {
        debug!(command = %self.command.describe(&args), "starting yt-dlp download");

        let mut child = self.command.command().args(&args).spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExtractionError::ExecutionError("Failed to capture stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExtractionError::ExecutionError("Failed to capture stderr".to_string()))?;

        // Drain stderr concurrently so a chatty child can't block on a full pipe
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stderr.read_to_end(&mut buf).await {
                debug!("Failed to read yt-dlp stderr: {}", e);
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

        let mut reported_path = None;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| ExtractionError::ExecutionError(format!("Failed to read stdout: {}", e)))?
        {
            if let Some(update) = parse_progress_line(&line) {
                if update.downloading {
                    progress.on_progress(update.downloaded, update.total);
                }
                continue;
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                reported_path = Some(trimmed.to_string());
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ExtractionError::ExecutionError(format!("Process error: {}", e)))?;
        let stderr_output = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(ExtractionError::from_stderr(&stderr_output, status.code()));
        }

        Ok(reported_path)
    }
}

/// File extension yt-dlp produces for an `--audio-format` value
fn audio_extension(codec: &str) -> Option<&str> {
    match codec {
        "best" => None,
        "aac" | "alac" => Some("m4a"),
        "vorbis" => Some("ogg"),
        other => Some(other),
    }
}

/// Name reported to the browser for a finished download
pub fn saved_file_name(reported_path: &str, request: &DownloadRequest) -> Option<String> {
    let name = file_name_of(reported_path)?;
    match request.kind {
        DownloadKind::Video => Some(name),
        DownloadKind::Audio => match audio_extension(request.audio_codec()) {
            Some(ext) => Some(rewrite_extension(&name, ext)),
            None => Some(name),
        },
    }
}

fn log_failure(operation: &str, url: &str, err: &ExtractionError) {
    match diagnose_error(&err.to_string()) {
        Some(reason) => warn!(
            operation,
            url,
            reason = reason.description(),
            transient = reason.is_transient(),
            "yt-dlp failed: {}",
            err
        ),
        None => warn!(operation, url, "yt-dlp failed: {}", err),
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractionError> {
        let args = Self::metadata_args(url);
        debug!(command = %self.command.describe(&args), "fetching metadata");

        let output = self.command.command().args(&args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = ExtractionError::from_stderr(&stderr, output.status.code());
            log_failure("info", url, &err);
            return Err(err);
        }

        let metadata = parse_metadata(&output.stdout)?;
        info!(
            url,
            title = %metadata.title,
            formats = metadata.formats.len(),
            "metadata fetched"
        );
        Ok(metadata)
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressSink,
    ) -> Result<String, ExtractionError> {
        info!(
            url = %request.url,
            format = request.format.as_deref().unwrap_or("default"),
            kind = ?request.kind,
            "download started"
        );

        let args = self.download_args(request);
        let reported = match self.run_with_progress(args, progress).await {
            Ok(reported) => reported,
            Err(err) => {
                log_failure("download", &request.url, &err);
                return Err(err);
            }
        };

        let file_name = reported
            .as_deref()
            .and_then(|path| saved_file_name(path, request))
            .ok_or_else(|| {
                ExtractionError::Upstream("yt-dlp did not report an output file".to_string())
            })?;

        info!(url = %request.url, file = %file_name, "download finished");
        Ok(file_name)
    }
}
