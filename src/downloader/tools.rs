// yt-dlp discovery and version probing

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::ExtractorConfig;

/// How yt-dlp gets started: a native binary or `python -m yt_dlp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpCommand {
    program: String,
    prefix_args: Vec<String>,
}

impl YtDlpCommand {
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            program: path.into(),
            prefix_args: Vec::new(),
        }
    }

    pub fn python(interpreter: impl Into<String>) -> Self {
        Self {
            program: interpreter.into(),
            prefix_args: vec!["-m".to_string(), "yt_dlp".to_string()],
        }
    }

    /// Resolve from config: explicit python interpreter, explicit binary,
    /// then the usual install locations.
    pub fn locate(config: &ExtractorConfig) -> Self {
        if let Some(python) = &config.python {
            return Self::python(python.clone());
        }
        if let Some(path) = &config.ytdlp_path {
            return Self::binary(path.clone());
        }
        Self::binary(find_ytdlp())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Fresh command with the module prefix applied and stdio piped
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Shell-like rendering for logs
    pub fn describe(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.prefix_args.iter().map(String::as_str))
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// Find yt-dlp executable in common paths
fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
        "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac, pip --user installs
        "/usr/bin/yt-dlp",          // Distro packages
    ];

    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join("yt-dlp");
            if candidate.is_file() {
                return candidate.to_string_lossy().into_owned();
            }
        }
    }

    // Last resort: let the OS resolve it at spawn time
    "yt-dlp".to_string()
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub path: String,
    pub version: Option<String>,
    pub is_available: bool,
}

/// Run `--version` to check that the tool actually starts
pub async fn probe(cmd: &YtDlpCommand) -> ToolInfo {
    let output = cmd.command().arg("--version").output().await;

    let version = match output {
        Ok(out) if out.status.success() => {
            let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
            Some(text).filter(|v| !v.is_empty())
        }
        _ => None,
    };

    ToolInfo {
        path: cmd.program().to_string(),
        is_available: version.is_some(),
        version,
    }
}
