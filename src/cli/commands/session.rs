//! Interactive download + convert loop.

use crate::audio::{self, AudioFormat};
use crate::cli::preflight::install_hint;
use crate::cli::prompt::is_yes;
use crate::cli::{Output, Prompter};
use crate::config::absolutize;
use crate::error::{DownloaderError, Result};
use crate::process::ToolRunner;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const URL_PROMPT: &str = "Enter video URL (or 'q' to exit):";
pub const FORMAT_PROMPT: &str = "Choose 1 or 2:";
pub const CONTINUE_PROMPT: &str = "Would you like to download another video? (y/n):";

/// Typed at the URL prompt to leave.
const QUIT: &str = "q";

/// How a single download cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The video was downloaded and converted to this audio file.
    Converted(PathBuf),
    DownloadFailed,
    NoVideoFound,
    InvalidSelection,
    ConversionFailed,
    /// Input ended before the format was chosen.
    InputClosed,
}

/// State shared by every cycle of one interactive session.
pub struct DownloadSession<'a> {
    runner: &'a dyn ToolRunner,
    download_dir: PathBuf,
    cookies_file: Option<PathBuf>,
}

impl<'a> DownloadSession<'a> {
    pub fn new(
        runner: &'a dyn ToolRunner,
        download_dir: impl Into<PathBuf>,
        cookies_file: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            download_dir: absolutize(&download_dir.into()),
            cookies_file,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Prompt for URLs until the user quits, declines to continue, or input ends.
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<()> {
        loop {
            let Some(url) = prompter.ask(URL_PROMPT)? else {
                break;
            };

            if url.is_empty() {
                continue;
            }
            if url.eq_ignore_ascii_case(QUIT) {
                break;
            }

            let outcome = self.process(&url, prompter).await?;
            debug!("Cycle finished: {:?}", outcome);
            if outcome == CycleOutcome::InputClosed {
                break;
            }

            let another = prompter.ask(CONTINUE_PROMPT)?.unwrap_or_default();
            if !is_yes(&another) {
                break;
            }
        }

        Output::info("Goodbye!");
        Ok(())
    }

    /// Download one URL and, if the user picks a format, convert it.
    ///
    /// Tool failures and bad input are reported here and folded into the
    /// outcome; only console I/O errors propagate.
    pub async fn process(&self, url: &str, prompter: &mut dyn Prompter) -> Result<CycleOutcome> {
        let reported = match audio::download(
            self.runner,
            url,
            self.cookies_file.as_deref(),
            &self.download_dir,
        )
        .await
        {
            Ok(reported) => reported,
            Err(e) => {
                warn!("Download failed: {}", e);
                Output::error("Error downloading video.");
                if let DownloaderError::ToolNotFound(tool) = &e {
                    Output::kv("hint", install_hint(tool));
                }
                return Ok(CycleOutcome::DownloadFailed);
            }
        };

        Output::success("Video downloaded successfully.");

        let video = match audio::locate_download(&self.download_dir, reported.as_deref()) {
            Ok(video) => video,
            Err(e) => {
                debug!("Locating download failed: {}", e);
                Output::warning("No video file found.");
                return Ok(CycleOutcome::NoVideoFound);
            }
        };

        let video_name = video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| video.display().to_string());
        Output::info(&format!("Found video: {}", video_name));

        println!("\nIn which format do you want to convert the video?");
        Output::menu_item("1", "MP3");
        Output::menu_item("2", "Audio-CD Format (WAV)");

        let Some(choice) = prompter.ask(FORMAT_PROMPT)? else {
            return Ok(CycleOutcome::InputClosed);
        };

        let Some(format) = AudioFormat::from_choice(&choice) else {
            Output::error("Invalid selection.");
            return Ok(CycleOutcome::InvalidSelection);
        };

        let spinner = Output::spinner(&format!("Converting to {}...", format));
        let converted = audio::convert(self.runner, &video, format).await;
        spinner.finish_and_clear();

        match converted {
            Ok(audio_file) => {
                Output::success("Conversion completed!");
                Output::kv("The audio file was created", &audio_file.display().to_string());
                if format == AudioFormat::Wav {
                    Output::info(
                        "You can now burn this file with your preferred CD burning program.",
                    );
                }
                Ok(CycleOutcome::Converted(audio_file))
            }
            Err(e) => {
                warn!("Conversion failed: {}", e);
                Output::error("Conversion error.");
                Ok(CycleOutcome::ConversionFailed)
            }
        }
    }
}
