// Downloader module - extraction client abstraction over yt-dlp

pub mod diagnostics;
pub mod errors;
pub mod formatting;
pub mod models;
pub mod tools;
pub mod traits;
pub mod ytdlp;

pub use errors::ExtractionError;
pub use formatting::human_bytes;
pub use models::{
    DownloadKind, DownloadRequest, FormatDescriptor, FrameRate, ProgressEvent, VideoMetadata,
};
pub use tools::YtDlpCommand;
pub use traits::{MediaExtractor, ProgressSink};
pub use ytdlp::YtDlpExtractor;
