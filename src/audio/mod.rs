//! Downloading videos and turning them into audio files.
//!
//! Both steps shell out: `yt-dlp` fetches the video, `ffmpeg` transcodes it.

pub mod converter;
pub mod downloader;

pub use converter::{convert, AudioFormat};
pub use downloader::{download, find_latest_video, locate_download};
