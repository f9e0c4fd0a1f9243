// yt-dlp `--dump-single-json` parsing
//
// Only the fields the browser needs are deserialized; everything is optional
// because extractors differ wildly in what they fill in.

use serde::Deserialize;

use crate::downloader::errors::ExtractionError;
use crate::downloader::formatting::{format_duration, group_thousands, human_bytes};
use crate::downloader::models::{FormatDescriptor, FrameRate, VideoMetadata};

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    duration_string: Option<String>,
    view_count: Option<u64>,
    upload_date: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    ext: Option<String>,
    width: Option<u64>,
    height: Option<u64>,
    fps: Option<f64>,
    vcodec: Option<String>,
    acodec: Option<String>,
    video_ext: Option<String>,
    audio_ext: Option<String>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
    asr: Option<f64>,
    tbr: Option<f64>,
}

impl RawFormat {
    fn has_no_streams(&self) -> bool {
        self.vcodec.as_deref() == Some("none") && self.acodec.as_deref() == Some("none")
    }

    fn size(&self) -> Option<f64> {
        self.filesize
            .filter(|s| *s > 0.0)
            .or(self.filesize_approx)
            .filter(|s| *s > 0.0)
    }

    /// Composite note: stream flags, sample rate, bitrate
    fn note(&self) -> String {
        let video_ext = self.video_ext.as_deref();
        let audio_ext = self.audio_ext.as_deref();
        let mut notes = Vec::new();

        if video_ext != Some("none") && audio_ext == Some("none") {
            notes.push("Video Only".to_string());
        }
        if video_ext == Some("none") && audio_ext != Some("none") {
            notes.push("Audio Only".to_string());
        }
        if let Some(asr) = self.asr.filter(|a| *a > 0.0) {
            notes.push(format!("{:.0}kHz", asr / 1000.0));
        }
        if let Some(tbr) = self.tbr.filter(|t| *t > 0.0) {
            notes.push(format!("{}kbps", tbr as u64));
        }

        if notes.is_empty() {
            "-".to_string()
        } else {
            notes.join(", ")
        }
    }

    fn into_descriptor(self) -> FormatDescriptor {
        let note = self.note();
        let size = self.size().map(human_bytes).unwrap_or_else(|| "~".to_string());

        FormatDescriptor {
            resolution: format!("{}x{}", self.width.unwrap_or(0), self.height.unwrap_or(0)),
            ext: self.ext.unwrap_or_else(|| "mp4".to_string()),
            vcodec: codec_label(self.vcodec.as_deref()),
            acodec: codec_label(self.acodec.as_deref()),
            fps: FrameRate::from_fps(self.fps),
            size,
            note,
            id: self.format_id,
        }
    }
}

/// `avc1.640028` -> `avc1`, `none` -> `-`, missing -> `N/A`
fn codec_label(codec: Option<&str>) -> String {
    match codec {
        Some("none") => "-".to_string(),
        Some(codec) => codec.split('.').next().unwrap_or(codec).to_string(),
        None => "N/A".to_string(),
    }
}

/// Parse yt-dlp JSON output into the browser-facing metadata
pub fn parse_metadata(stdout: &[u8]) -> Result<VideoMetadata, ExtractionError> {
    let raw: RawInfo = serde_json::from_slice(stdout)
        .map_err(|e| ExtractionError::ParseError(format!("Invalid JSON: {}", e)))?;

    let duration = raw
        .duration_string
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format_duration(raw.duration.unwrap_or(0.0)));

    let formats = raw
        .formats
        .into_iter()
        .filter(|f| !f.has_no_streams())
        .map(RawFormat::into_descriptor)
        .collect();

    Ok(VideoMetadata {
        title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
        uploader: raw.uploader.unwrap_or_else(|| "Unknown".to_string()),
        duration,
        views: group_thousands(raw.view_count.unwrap_or(0)),
        upload_date: raw.upload_date.unwrap_or_default(),
        thumbnail: raw.thumbnail.unwrap_or_default(),
        formats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "abc123",
        "title": "Big Buck Bunny",
        "uploader": "Blender",
        "duration": 596,
        "duration_string": "9:56",
        "view_count": 1234567,
        "upload_date": "20080410",
        "thumbnail": "https://i.ytimg.com/vi/abc123/hq.jpg",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none",
             "video_ext": "none", "audio_ext": "none"},
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2",
             "video_ext": "none", "audio_ext": "m4a", "asr": 44100, "tbr": 129.478,
             "filesize": 9653174},
            {"format_id": "137", "ext": "mp4", "width": 1920, "height": 1080, "fps": 24,
             "vcodec": "avc1.640028", "acodec": "none", "video_ext": "mp4", "audio_ext": "none",
             "tbr": 4351.2, "filesize_approx": 324000000},
            {"format_id": "18", "ext": "mp4", "width": 640, "height": 360, "fps": 24,
             "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "video_ext": "mp4", "audio_ext": "none"}
        ]
    }"#;

    fn sample() -> VideoMetadata {
        parse_metadata(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_storyboards_are_filtered_out() {
        let info = sample();
        let ids: Vec<&str> = info.formats.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["140", "137", "18"]);
        assert!(info
            .formats
            .iter()
            .all(|f| f.vcodec != "-" || f.acodec != "-"));
    }

    #[test]
    fn test_header_fields() {
        let info = sample();
        assert_eq!(info.title, "Big Buck Bunny");
        assert_eq!(info.uploader, "Blender");
        assert_eq!(info.duration, "9:56");
        assert_eq!(info.views, "1,234,567");
        assert_eq!(info.upload_date, "20080410");
        assert_eq!(info.thumbnail, "https://i.ytimg.com/vi/abc123/hq.jpg");
    }

    #[test]
    fn test_audio_format_descriptor() {
        let info = sample();
        let audio = &info.formats[0];
        assert_eq!(audio.resolution, "0x0");
        assert_eq!(audio.vcodec, "-");
        assert_eq!(audio.acodec, "mp4a");
        assert_eq!(audio.fps, FrameRate::Unknown);
        assert_eq!(audio.size, "9.2MB");
        assert_eq!(audio.note, "Audio Only, 44kHz, 129kbps");
    }

    #[test]
    fn test_video_format_descriptor() {
        let info = sample();
        let video = &info.formats[1];
        assert_eq!(video.resolution, "1920x1080");
        assert_eq!(video.vcodec, "avc1");
        assert_eq!(video.fps, FrameRate::Known(24));
        assert_eq!(video.size, "309.0MB");
        assert_eq!(video.note, "Video Only, 4351kbps");
    }

    #[test]
    fn test_unknown_size_and_quirky_ext_flags() {
        let info = sample();
        let muxed = &info.formats[2];
        assert_eq!(muxed.size, "~");
        // audio_ext says "none" even though the stream carries audio
        assert_eq!(muxed.note, "Video Only");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let info = parse_metadata(
            br#"{"title": "t", "duration": 3725, "formats": [{"format_id": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(info.uploader, "Unknown");
        assert_eq!(info.duration, "1:02:05");
        assert_eq!(info.views, "0");
        let f = &info.formats[0];
        assert_eq!(f.ext, "mp4");
        assert_eq!(f.vcodec, "N/A");
        assert_eq!(f.note, "-");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_metadata(b"not json"),
            Err(ExtractionError::ParseError(_))
        ));
    }
}
