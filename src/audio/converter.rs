//! Audio conversion via ffmpeg.

use crate::config::absolutize;
use crate::error::Result;
use crate::process::{Invocation, ToolRunner};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Program used for transcoding.
pub const TRANSCODER: &str = "ffmpeg";

/// Sample rate shared by both outputs (Audio-CD rate).
const SAMPLE_RATE: &str = "44100";

/// Stereo.
const CHANNELS: &str = "2";

/// Target audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3 at 320 kbps.
    Mp3,
    /// 16-bit PCM WAV, ready for burning to an audio CD.
    Wav,
}

impl AudioFormat {
    /// Map the menu choice (`1` or `2`) to a format.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(AudioFormat::Mp3),
            "2" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// Codec arguments placed between the input and output paths.
    fn codec_args(self) -> &'static [&'static str] {
        match self {
            AudioFormat::Mp3 => &["-acodec", "libmp3lame", "-ab", "320k"],
            AudioFormat::Wav => &["-acodec", "pcm_s16le"],
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "MP3"),
            AudioFormat::Wav => write!(f, "WAV"),
        }
    }
}

/// Output path: the input with its extension swapped for the format's.
pub fn output_path(media: &Path, format: AudioFormat) -> PathBuf {
    media.with_extension(format.extension())
}

/// Build the ffmpeg invocation for `media` -> `format`.
///
/// Runs in the media file's directory, with input and output given as
/// absolute paths so they do not resolve twice against that directory. `-y`
/// overwrites an earlier conversion of the same file instead of waiting on
/// ffmpeg's interactive question.
pub fn conversion_invocation(media: &Path, format: AudioFormat) -> Invocation {
    let media = absolutize(media);
    let dir = media
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("/"));

    let mut invocation = Invocation::new(TRANSCODER, dir)
        .arg("-y")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(&media)
        .arg("-vn");

    for arg in format.codec_args() {
        invocation = invocation.arg(*arg);
    }

    invocation
        .arg("-ar")
        .arg(SAMPLE_RATE)
        .arg("-ac")
        .arg(CHANNELS)
        .arg(output_path(&media, format))
}

/// Convert `media` to `format`, returning the path of the new audio file.
///
/// A non-zero ffmpeg exit surfaces as [`DownloaderError::ToolFailed`]. Any
/// partial output ffmpeg left behind is not removed.
///
/// [`DownloaderError::ToolFailed`]: crate::error::DownloaderError::ToolFailed
#[instrument(skip(runner), fields(media = %media.display()))]
pub async fn convert(runner: &dyn ToolRunner, media: &Path, format: AudioFormat) -> Result<PathBuf> {
    let invocation = conversion_invocation(media, format);
    let output = runner.run(&invocation).await?;

    if !output.success && !output.stderr.trim().is_empty() {
        warn!("ffmpeg: {}", output.stderr.trim());
    }
    output.check(TRANSCODER)?;

    let target = output_path(&absolutize(media), format);
    info!("Converted to {}", target.display());
    Ok(target)
}
