// Server and extractor configuration
//
// Defaults match the original deployment (0.0.0.0:5000, ./downloads); every
// value can be overridden from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_AUDIO_QUALITY: &str = "192K";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// How to run yt-dlp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Explicit yt-dlp binary; discovered from common paths when unset
    pub ytdlp_path: Option<String>,
    /// Python interpreter to run `-m yt_dlp` with (e.g. a venv python)
    pub python: Option<String>,
    /// `--audio-quality` for audio-only downloads
    pub audio_quality: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            python: None,
            audio_quality: DEFAULT_AUDIO_QUALITY.to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_python(mut self, python: Option<String>) -> Self {
        self.python = python;
        self
    }

    pub fn with_audio_quality(mut self, quality: impl Into<String>) -> Self {
        self.audio_quality = quality.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Shared output directory for every download
    pub download_dir: PathBuf,
    /// Assets served under `/static`
    pub static_dir: PathBuf,
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            extractor: ExtractorConfig::default(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ServerConfig {
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    /// Read `BIND_ADDR`, `DOWNLOAD_DIR`, `STATIC_DIR`, `YTDLP_PATH`,
    /// `YTDLP_PYTHON` and `AUDIO_QUALITY` on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).and_then(non_empty);
        let mut config = Self::default();

        if let Some(addr) = get("BIND_ADDR") {
            let parsed = addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: addr.clone(),
                reason: e.to_string(),
            })?;
            config = config.with_bind_addr(parsed);
        }
        if let Some(dir) = get("DOWNLOAD_DIR") {
            config = config.with_download_dir(dir);
        }
        if let Some(dir) = get("STATIC_DIR") {
            config = config.with_static_dir(dir);
        }

        let mut extractor = ExtractorConfig::default()
            .with_ytdlp_path(get("YTDLP_PATH"))
            .with_python(get("YTDLP_PYTHON"));
        if let Some(quality) = get("AUDIO_QUALITY") {
            extractor = extractor.with_audio_quality(quality);
        }

        Ok(config.with_extractor(extractor))
    }
}
