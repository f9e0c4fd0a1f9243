// Human-readable rendering helpers shared by the extraction client

use std::path::Path;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render a byte count with one decimal in binary units.
///
/// `human_bytes(1536.0) == "1.5KB"`, anything `<= 0` is `"0B"`.
pub fn human_bytes(bytes: f64) -> String {
    if bytes.is_nan() || bytes <= 0.0 {
        return "0B".to_string();
    }

    let mut value = bytes;
    for unit in SIZE_UNITS {
        if value < 1024.0 {
            return format!("{:.1}{}", value, unit);
        }
        value /= 1024.0;
    }

    format!("{:.1}PB", value)
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Same shape yt-dlp uses for `duration_string`: `H:MM:SS` or `M:SS`
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds > 0.0 { seconds as u64 } else { 0 };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Replace the extension of a file name, adding one if it had none.
///
/// Audio extraction changes the container after yt-dlp has already decided
/// on the file name, so the name reported to the browser is rewritten here.
pub fn rewrite_extension(file_name: &str, ext: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    format!("{}.{}", stem, ext)
}

/// Base name of a path reported by yt-dlp
pub fn file_name_of(path: &str) -> Option<String> {
    Path::new(path.trim())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
