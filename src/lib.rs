//! ytdownloader - download a video and convert it to audio
//!
//! An interactive terminal tool: paste a URL, let `yt-dlp` fetch the video,
//! then have `ffmpeg` turn it into a 320 kbps MP3 or a CD-quality WAV.
//!
//! # Architecture
//!
//! - `config` - runtime settings and the persisted cookie-file setting
//! - `process` - external tool invocation behind the `ToolRunner` trait
//! - `audio` - the downloader and converter steps
//! - `cli` - argument parsing, prompts, console output and the session loop
//!
//! # Example
//!
//! ```rust,no_run
//! use ytdownloader::audio::{self, AudioFormat};
//! use ytdownloader::process::SystemRunner;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runner = SystemRunner::default();
//!     let dir = Path::new("/tmp/videos");
//!
//!     let reported = audio::download(&runner, "https://youtu.be/dQw4w9WgXcQ", None, dir).await?;
//!     let video = audio::locate_download(dir, reported.as_deref())?;
//!     let mp3 = audio::convert(&runner, &video, AudioFormat::Mp3).await?;
//!     println!("Created {}", mp3.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod process;

pub use error::{DownloaderError, Result};
