//! Pre-flight checks run once at startup.
//!
//! Missing tools are reported up front with an install hint, so the user does
//! not discover them only after pasting a URL.

use crate::audio::converter::TRANSCODER;
use crate::audio::downloader::DOWNLOADER;
use crate::cli::Output;
use crate::error::{DownloaderError, Result};
use crate::process::{Invocation, ToolRunner};
use std::path::Path;
use tracing::debug;

/// An external tool and the flag that makes it print its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub version_flag: &'static str,
}

/// Tools the session shells out to. ffmpeg only knows the single-dash flag.
pub const REQUIRED_TOOLS: [ToolSpec; 2] = [
    ToolSpec {
        name: DOWNLOADER,
        version_flag: "--version",
    },
    ToolSpec {
        name: TRANSCODER,
        version_flag: "-version",
    },
];

/// Check every required tool and warn about any that are unusable.
///
/// Never fails: the session still starts and each step reports its own error.
/// Returns the names of the tools that failed.
pub async fn warn_missing_tools(runner: &dyn ToolRunner, dir: &Path) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for tool in REQUIRED_TOOLS {
        match check_tool(runner, tool, dir).await {
            Ok(version) => debug!("{}: {}", tool.name, version),
            Err(e) => {
                debug!("Preflight failed for {}: {}", tool.name, e);
                Output::warning(&e.to_string());
                Output::kv("hint", install_hint(tool.name));
                missing.push(tool.name);
            }
        }
    }
    missing
}

/// Run `tool` with its version flag and return the first line it printed.
pub async fn check_tool(runner: &dyn ToolRunner, tool: ToolSpec, dir: &Path) -> Result<String> {
    let invocation = Invocation::new(tool.name, dir).arg(tool.version_flag);
    let output = runner.run(&invocation).await?;
    if !output.success {
        return Err(DownloaderError::ToolFailed {
            tool: tool.name.to_string(),
            code: output.code,
        });
    }
    Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
}

/// Install instructions for `tool` on the current platform.
pub fn install_hint(tool: &str) -> &'static str {
    let termux = std::env::var_os("TERMUX_VERSION").is_some();
    match (tool, termux) {
        (DOWNLOADER, true) => "Install with: pkg install python && pip install yt-dlp",
        (TRANSCODER, true) => "Install with: pkg install ffmpeg",
        (DOWNLOADER, false) if cfg!(target_os = "macos") => "Install with: brew install yt-dlp",
        (TRANSCODER, false) if cfg!(target_os = "macos") => "Install with: brew install ffmpeg",
        (DOWNLOADER, false) if cfg!(target_os = "linux") => "Install with: pip install yt-dlp",
        (TRANSCODER, false) if cfg!(target_os = "linux") => "Install with: sudo apt install ffmpeg",
        (DOWNLOADER, _) => "Install from: https://github.com/yt-dlp/yt-dlp",
        (TRANSCODER, _) => "Install from: https://ffmpeg.org/download.html",
        _ => "Check the documentation for installation instructions",
    }
}
