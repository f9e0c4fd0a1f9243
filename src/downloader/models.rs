// Common data models for the extraction client

use serde::{Deserialize, Serialize, Serializer};

/// Default codec for audio-only downloads
pub const DEFAULT_AUDIO_CODEC: &str = "mp3";

/// Container used when yt-dlp merges separate video and audio streams
pub const MERGE_OUTPUT_FORMAT: &str = "mp4";

/// Video information returned by `/api/info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub uploader: String,
    pub duration: String,
    pub views: String,
    pub upload_date: String,
    pub thumbnail: String,
    pub formats: Vec<FormatDescriptor>,
}

/// One selectable encoding/container variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatDescriptor {
    pub id: String,
    pub resolution: String,
    pub ext: String,
    pub vcodec: String,
    pub acodec: String,
    pub fps: FrameRate,
    pub size: String,
    pub note: String,
}

/// Frame rate as shown to the browser: a whole number, or `-` when unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    Known(u32),
    Unknown,
}

impl FrameRate {
    /// Truncates like the format cards expect; 0 or missing means unknown.
    pub fn from_fps(fps: Option<f64>) -> Self {
        match fps {
            Some(value) if value > 0.0 => Self::Known(value as u32),
            _ => Self::Unknown,
        }
    }
}

impl Serialize for FrameRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(fps) => serializer.serialize_u32(*fps),
            Self::Unknown => serializer.serialize_str("-"),
        }
    }
}

/// What the user wants out of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    /// Video with audio, merged into a single container
    #[default]
    Video,
    /// Audio only, transcoded to the requested codec
    Audio,
}

/// A validated download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// yt-dlp format selector; `None` lets yt-dlp pick its default
    pub format: Option<String>,
    pub kind: DownloadKind,
    pub codec: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
            kind: DownloadKind::Video,
            codec: None,
        }
    }

    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.format = format.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn with_kind(mut self, kind: DownloadKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_codec(mut self, codec: Option<String>) -> Self {
        self.codec = codec.filter(|c| !c.trim().is_empty());
        self
    }

    /// Codec used for audio extraction
    pub fn audio_codec(&self) -> &str {
        self.codec.as_deref().unwrap_or(DEFAULT_AUDIO_CODEC)
    }
}

/// One progress update sent to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub downloaded: u64,
    /// 0 when the size is unknown
    pub total: u64,
    pub percent: f64,
}

impl ProgressEvent {
    pub fn new(downloaded: u64, total: Option<u64>) -> Self {
        let total = total.unwrap_or(0);
        let percent = if total > 0 {
            downloaded as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            downloaded,
            total,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_with_known_total() {
        let event = ProgressEvent::new(512, Some(1024));
        assert_eq!(event.total, 1024);
        assert!((event.percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_is_zero_without_total() {
        assert_eq!(ProgressEvent::new(4096, None).percent, 0.0);
        assert_eq!(ProgressEvent::new(4096, Some(0)).percent, 0.0);
        assert_eq!(ProgressEvent::new(4096, None).total, 0);
    }

    #[test]
    fn test_percent_stays_in_range() {
        let totals = [1u64, 7, 1000, 1 << 20, u32::MAX as u64, u64::MAX / 2];
        for total in totals {
            for downloaded in [0, total / 3, total / 2, total] {
                let p = ProgressEvent::new(downloaded, Some(total)).percent;
                assert!((0.0..=100.0).contains(&p), "{} / {} -> {}", downloaded, total, p);
            }
        }
    }

    #[test]
    fn test_frame_rate_serialization() {
        assert_eq!(serde_json::to_string(&FrameRate::from_fps(Some(29.97))).unwrap(), "29");
        assert_eq!(serde_json::to_string(&FrameRate::from_fps(None)).unwrap(), "\"-\"");
        assert_eq!(serde_json::to_string(&FrameRate::from_fps(Some(0.0))).unwrap(), "\"-\"");
        assert_eq!(FrameRate::from_fps(Some(0.5)), FrameRate::Known(0));
    }

    #[test]
    fn test_download_kind_wire_names() {
        let kind: DownloadKind = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(kind, DownloadKind::Audio);
        assert!(serde_json::from_str::<DownloadKind>("\"gif\"").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = DownloadRequest::new("https://example.com/v")
            .with_format(Some("  ".to_string()))
            .with_codec(None);
        assert_eq!(request.format, None);
        assert_eq!(request.audio_codec(), "mp3");
    }
}
