// Failure diagnostics - classifies yt-dlp error text for the server log
//
// The message returned to the browser is always yt-dlp's own text; the
// classification only adds a searchable `reason` field to the log line.

/// Why an extraction or download most likely failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The site doesn't have an extractor, or the input isn't a URL
    UnsupportedUrl,

    /// The selected format id doesn't exist for this video
    FormatUnavailable,

    /// ffmpeg missing or the audio conversion failed
    PostProcessing,

    /// DRM-protected or paid content
    DrmProtected,

    /// Age-gated content requiring login
    AgeRestricted,

    /// Private video requiring authorization
    PrivateVideo,

    /// Deleted or otherwise unavailable
    VideoUnavailable,

    /// Geographic restriction
    GeoBlocked,

    /// 429 or similar throttling
    RateLimited,

    /// HTTP 403 from the media host
    Http403Forbidden,

    /// Connection timed out or was refused
    NetworkTimeout,
}

impl FailureReason {
    /// Check if a later retry could succeed without user action
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Http403Forbidden | Self::NetworkTimeout
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl => "Unsupported URL",
            Self::FormatUnavailable => "Requested format not available",
            Self::PostProcessing => "Post-processing (ffmpeg) failed",
            Self::DrmProtected => "DRM-protected content",
            Self::AgeRestricted => "Age-restricted content",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::NetworkTimeout => "Network timeout",
        }
    }
}

/// Analyze error text and return the most specific matching reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = error.to_lowercase();
    let has = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    if has(&["unsupported url", "is not a valid url"]) {
        return Some(FailureReason::UnsupportedUrl);
    }

    if has(&["requested format is not available", "format is not available"]) {
        return Some(FailureReason::FormatUnavailable);
    }

    if has(&["ffmpeg", "ffprobe", "postprocessing", "audio conversion failed"]) {
        return Some(FailureReason::PostProcessing);
    }

    if has(&["drm", "widevine", "requires purchase", "rental"]) {
        return Some(FailureReason::DrmProtected);
    }

    if has(&["age-restricted", "sign in to confirm your age"]) {
        return Some(FailureReason::AgeRestricted);
    }

    if has(&["private video", "video is private"]) {
        return Some(FailureReason::PrivateVideo);
    }

    if has(&[
        "video unavailable",
        "video is unavailable",
        "video has been removed",
        "http error 404",
    ]) {
        return Some(FailureReason::VideoUnavailable);
    }

    if has(&["not available in your country", "geo restricted", "geo-restricted"]) {
        return Some(FailureReason::GeoBlocked);
    }

    if has(&["429", "too many requests", "rate limit"]) {
        return Some(FailureReason::RateLimited);
    }

    if has(&["403", "forbidden"]) {
        return Some(FailureReason::Http403Forbidden);
    }

    if has(&["timed out", "timeout", "connection refused", "network is unreachable"]) {
        return Some(FailureReason::NetworkTimeout);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_url_detection() {
        let error = "ERROR: Unsupported URL: https://example.com/page";
        assert_eq!(diagnose_error(error), Some(FailureReason::UnsupportedUrl));
    }

    #[test]
    fn test_format_detection() {
        let error = "ERROR: [youtube] abc: Requested format is not available. Use --list-formats";
        assert_eq!(diagnose_error(error), Some(FailureReason::FormatUnavailable));
    }

    #[test]
    fn test_ffmpeg_detection() {
        let error = "ERROR: Postprocessing: ffprobe and ffmpeg not found";
        assert_eq!(diagnose_error(error), Some(FailureReason::PostProcessing));
    }

    #[test]
    fn test_unavailable_detection() {
        let error = "ERROR: [youtube] abc: Video unavailable";
        assert_eq!(diagnose_error(error), Some(FailureReason::VideoUnavailable));
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "Sign in to confirm your age";
        assert_eq!(diagnose_error(error), Some(FailureReason::AgeRestricted));
    }

    #[test]
    fn test_rate_limit_detection() {
        let error = "ERROR: unable to download video data: HTTP Error 429: Too Many Requests";
        assert_eq!(diagnose_error(error), Some(FailureReason::RateLimited));
    }

    #[test]
    fn test_403_detection() {
        let error = "ERROR: unable to download video data: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), Some(FailureReason::Http403Forbidden));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "ERROR: Unable to download webpage: The read operation timed out";
        assert_eq!(diagnose_error(error), Some(FailureReason::NetworkTimeout));
    }

    #[test]
    fn test_unrecognized_text() {
        assert_eq!(diagnose_error("something odd happened"), None);
        assert_eq!(diagnose_error(""), None);
    }

    #[test]
    fn test_transient_reasons() {
        assert!(FailureReason::RateLimited.is_transient());
        assert!(FailureReason::NetworkTimeout.is_transient());
        assert!(!FailureReason::PrivateVideo.is_transient());
        assert!(!FailureReason::UnsupportedUrl.is_transient());
    }
}
