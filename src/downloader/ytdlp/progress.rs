// yt-dlp progress line parsing
//
// Instead of scraping the human-readable `[download]  12.5% of ...` lines we
// ask yt-dlp for a fixed template with raw byte counts. Missing values are
// printed as `NA`.

use regex::Regex;

/// Passed to `--progress-template`; one line per progress hook call
pub const PROGRESS_TEMPLATE: &str = "download:[progress] %(progress.status)s \
%(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s";

/// One parsed progress line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressLine {
    pub downloading: bool,
    pub downloaded: u64,
    pub total: Option<u64>,
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64)
}

/// Parse a line printed through `PROGRESS_TEMPLATE`.
///
/// Returns `None` for any other output line.
pub fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"^\[progress\]\s+(\w+)\s+(\S+)\s+(\S+)\s+(\S+)\s*$"
        ).unwrap();
    }

    let caps = PROGRESS_RE.captures(line.trim())?;
    let status = caps.get(1)?.as_str();
    let downloaded = parse_count(caps.get(2)?.as_str()).unwrap_or(0);
    let total = parse_count(caps.get(3)?.as_str())
        .filter(|t| *t > 0)
        .or_else(|| caps.get(4).and_then(|m| parse_count(m.as_str())));

    Some(ProgressLine {
        downloading: status == "downloading",
        downloaded,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_total() {
        let line = parse_progress_line("[progress] downloading 1048576 10485760 NA").unwrap();
        assert!(line.downloading);
        assert_eq!(line.downloaded, 1_048_576);
        assert_eq!(line.total, Some(10_485_760));
    }

    #[test]
    fn test_estimate_used_when_total_missing() {
        let line =
            parse_progress_line("[progress] downloading 2048 NA 360234567.8").unwrap();
        assert_eq!(line.total, Some(360_234_567));
    }

    #[test]
    fn test_unknown_total() {
        let line = parse_progress_line("[progress] downloading 2048 NA NA").unwrap();
        assert_eq!(line.total, None);
    }

    #[test]
    fn test_finished_status_is_not_downloading() {
        let line = parse_progress_line("[progress] finished 10485760 10485760 NA").unwrap();
        assert!(!line.downloading);
    }

    #[test]
    fn test_other_lines_are_ignored() {
        assert_eq!(parse_progress_line("downloads/Video.mp4"), None);
        assert_eq!(
            parse_progress_line("[download]  12.5% of ~ 310.04MiB at 374.36KiB/s"),
            None
        );
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn test_template_mentions_every_field() {
        for field in ["status", "downloaded_bytes", "total_bytes", "total_bytes_estimate"] {
            assert!(PROGRESS_TEMPLATE.contains(field));
        }
    }
}
