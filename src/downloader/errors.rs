// Error types for the extraction client

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// yt-dlp (or the python interpreter hosting it) could not be started
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Process plumbing failed (pipes, wait, join)
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// yt-dlp itself reported a failure; the text is passed through untouched
    #[error("{0}")]
    Upstream(String),

    /// Failed to parse yt-dlp JSON output
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ExtractionError {
    /// Build an upstream error from captured stderr.
    ///
    /// Keeps only the `ERROR:` lines when yt-dlp printed any, so warnings
    /// don't leak into the message shown to the user.
    pub fn from_stderr(stderr: &str, status: Option<i32>) -> Self {
        let error_lines: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("ERROR:"))
            .collect();

        if !error_lines.is_empty() {
            return Self::Upstream(error_lines.join("\n"));
        }

        let trimmed = stderr.trim();
        if !trimmed.is_empty() {
            return Self::Upstream(trimmed.to_string());
        }

        match status {
            Some(code) => Self::Upstream(format!("yt-dlp exited with status {}", code)),
            None => Self::Upstream("yt-dlp was terminated by a signal".to_string()),
        }
    }
}

// Convert from io::Error when spawning the tool
impl From<std::io::Error> for ExtractionError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound(e.to_string())
        } else {
            Self::ExecutionError(e.to_string())
        }
    }
}
