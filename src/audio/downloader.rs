//! Video download via yt-dlp, and locating the file it produced.

use crate::error::{DownloaderError, Result};
use crate::process::{Invocation, ToolRunner};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, instrument};

/// Program used for downloading.
pub const DOWNLOADER: &str = "yt-dlp";

/// Extensions treated as downloaded videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv"];

/// Build the yt-dlp invocation: best single combined format, optional cookie
/// file, URL last. Output is echoed so the user sees yt-dlp's progress.
pub fn download_invocation(url: &str, cookies_file: Option<&Path>, dir: &Path) -> Invocation {
    let mut invocation = Invocation::new(DOWNLOADER, dir)
        .streaming()
        .arg("-f")
        .arg("b");

    if let Some(cookies) = cookies_file {
        invocation = invocation.arg("--cookies").arg(cookies);
    }

    invocation.arg(url)
}

/// Download `url` into `dir`.
///
/// Returns the destination yt-dlp reported, if it reported one. A non-zero
/// exit surfaces as [`DownloaderError::ToolFailed`].
#[instrument(skip(runner, cookies_file, dir))]
pub async fn download(
    runner: &dyn ToolRunner,
    url: &str,
    cookies_file: Option<&Path>,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    info!("Downloading {}", url);

    let output = runner
        .run(&download_invocation(url, cookies_file, dir))
        .await?
        .check(DOWNLOADER)?;

    let reported = reported_destination(&output.stdout);
    debug!("yt-dlp reported destination: {:?}", reported);
    Ok(reported)
}

/// Extract a file path from one line of yt-dlp output.
fn parse_destination_line(line: &str) -> Option<&str> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("[download] Destination:") {
        let path = rest.trim();
        return (!path.is_empty()).then_some(path);
    }

    if let Some(rest) = line.strip_prefix("[Merger] Merging formats into \"") {
        let path = rest.trim_end_matches('"');
        return (!path.is_empty()).then_some(path);
    }

    if let Some(rest) = line.strip_prefix("[download] ") {
        let path = rest
            .strip_suffix(" has already been downloaded and merged")
            .or_else(|| rest.strip_suffix(" has already been downloaded"))?;
        return (!path.is_empty()).then_some(path);
    }

    None
}

/// The last destination yt-dlp mentioned in its output.
pub fn reported_destination(stdout: &str) -> Option<PathBuf> {
    stdout
        .split(['\n', '\r'])
        .filter_map(parse_destination_line)
        .last()
        .map(PathBuf::from)
}

/// Whether `path` carries one of the [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Find the most recently created video file directly inside `dir`.
///
/// Falls back to modification time on filesystems without creation times.
/// Ties go to whichever entry the directory listing yields last.
pub fn find_latest_video(dir: &Path) -> Result<PathBuf> {
    let mut best: Option<(PathBuf, SystemTime)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !is_video_file(&path) {
            continue;
        }

        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(stamp) = meta.created().or_else(|_| meta.modified()) else {
            continue;
        };

        if best.as_ref().is_none_or(|(_, t)| stamp >= *t) {
            best = Some((path, stamp));
        }
    }

    best.map(|(p, _)| p)
        .ok_or_else(|| DownloaderError::NoVideoFound(dir.to_path_buf()))
}

/// Decide which file the last download produced.
///
/// Prefers the destination yt-dlp reported (relative paths are taken against
/// `dir`); when none was reported or it is gone, picks the newest video.
pub fn locate_download(dir: &Path, reported: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = reported {
        let resolved = dir.join(path);
        if resolved.is_file() {
            return Ok(resolved);
        }
        debug!(
            "Reported destination {} not found, scanning directory",
            resolved.display()
        );
    }

    find_latest_video(dir)
}
