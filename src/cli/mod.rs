//! CLI module for ytdownloader.

pub mod commands;
mod output;
pub mod preflight;
pub mod prompt;

pub use output::Output;
pub use prompt::{Prompter, StdinPrompter};

use crate::config::Overrides;
use clap::Parser;

/// ytdownloader - download a video and turn it into MP3 or Audio-CD WAV
///
/// Runs interactively: asks for a URL, downloads it with yt-dlp, then converts
/// the result with ffmpeg. Enter 'q' at the URL prompt to quit.
#[derive(Parser, Debug)]
#[command(name = "ytdownloader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, env = "YTDOWNLOADER_CONFIG")]
    pub config: Option<String>,

    /// Directory downloads are saved to
    #[arg(short, long, env = "YTDOWNLOADER_DOWNLOAD_DIR")]
    pub download_dir: Option<String>,

    /// Give up on yt-dlp/ffmpeg after this many seconds (0 = never)
    #[arg(short, long, env = "YTDOWNLOADER_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Settings overrides requested on the command line or environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            download_dir: self.download_dir.clone(),
            config: self.config.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["ytdownloader"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.download_dir.is_none());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::try_parse_from([
            "ytdownloader",
            "-vv",
            "--download-dir",
            "/media/videos",
            "--timeout",
            "600",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(cli.verbose, 2);
        assert_eq!(overrides.download_dir.as_deref(), Some("/media/videos"));
        assert_eq!(overrides.timeout_secs, Some(600));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
