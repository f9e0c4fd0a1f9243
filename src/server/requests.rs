// Request bodies and their validation
//
// Bodies are decoded leniently (every field optional) and then validated
// into domain types, so a missing `url` gets the same 400 as an empty one.

use serde::Deserialize;

use super::error::ApiError;
use super::hub::ConnectionId;
use crate::downloader::{DownloadKind, DownloadRequest};

#[derive(Debug, Default, Deserialize)]
pub struct InfoBody {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<DownloadKind>,
    #[serde(default)]
    pub codec: Option<String>,
    /// Connection id received in the WebSocket `connect` frame
    #[serde(default)]
    pub sid: Option<String>,
}

fn required_url(url: Option<String>) -> Result<String, ApiError> {
    let url = url.unwrap_or_default();
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("URL must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

impl InfoBody {
    pub fn validate(self) -> Result<String, ApiError> {
        required_url(self.url)
    }
}

impl DownloadBody {
    /// Returns the download request and the connection that should see progress
    pub fn validate(self) -> Result<(DownloadRequest, Option<ConnectionId>), ApiError> {
        let url = required_url(self.url)?;
        let connection = self.sid.as_deref().and_then(ConnectionId::parse);

        let request = DownloadRequest::new(url)
            .with_format(self.format)
            .with_kind(self.kind.unwrap_or_default())
            .with_codec(self.codec);

        Ok((request, connection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download(json: &str) -> Result<(DownloadRequest, Option<ConnectionId>), ApiError> {
        serde_json::from_str::<DownloadBody>(json).unwrap().validate()
    }

    #[test]
    fn test_info_url_is_trimmed() {
        let body: InfoBody = serde_json::from_str(r#"{"url": "  https://youtu.be/x \n"}"#).unwrap();
        assert_eq!(body.validate().unwrap(), "https://youtu.be/x");
    }

    #[test]
    fn test_missing_or_blank_url_is_rejected() {
        for json in [r#"{}"#, r#"{"url": ""}"#, r#"{"url": "   "}"#, r#"{"url": null}"#] {
            let body: InfoBody = serde_json::from_str(json).unwrap();
            assert!(matches!(body.validate(), Err(ApiError::Validation(_))), "{}", json);
        }
        assert!(download(r#"{"format": "18"}"#).is_err());
    }

    #[test]
    fn test_full_audio_request() {
        let (request, sid) = download(
            r#"{"url": "https://youtu.be/x", "format": "bestaudio", "type": "audio",
                "codec": "mp3", "sid": "6f1c2c8e-7c55-4d1e-9a43-0a5b7f0e2d11"}"#,
        )
        .unwrap();

        assert_eq!(request.kind, DownloadKind::Audio);
        assert_eq!(request.format.as_deref(), Some("bestaudio"));
        assert_eq!(request.audio_codec(), "mp3");
        assert!(sid.is_some());
    }

    #[test]
    fn test_defaults_and_null_codec() {
        let (request, sid) = download(r#"{"url": "u", "codec": null}"#).unwrap();
        assert_eq!(request.kind, DownloadKind::Video);
        assert_eq!(request.format, None);
        assert_eq!(request.codec, None);
        assert_eq!(sid, None);
    }

    #[test]
    fn test_unknown_type_fails_to_decode() {
        assert!(serde_json::from_str::<DownloadBody>(r#"{"url": "u", "type": "gif"}"#).is_err());
    }
}
