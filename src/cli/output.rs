//! Console formatting for the interactive session.
//!
//! Status lines share one layout (`>> message`) and differ only in colour and
//! stream: warnings and errors go to stderr so piped stdout stays clean.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const MARKER: &str = ">>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn marker(self) -> StyledObject<&'static str> {
        let marker = style(MARKER).bold();
        match self {
            Tone::Info => marker.cyan(),
            Tone::Success => marker.green(),
            Tone::Warning => marker.yellow(),
            Tone::Error => marker.red(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tone::Warning | Tone::Error)
    }
}

fn status_line(tone: Tone, msg: &str) -> String {
    format!("{} {}", tone.marker(), msg)
}

fn kv_line(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

fn menu_line(key: &str, label: &str) -> String {
    format!("  {} {}", style(format!("{key}:")).cyan().bold(), label)
}

fn emit(tone: Tone, msg: &str) {
    let line = status_line(tone, msg);
    if tone.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Styled console output.
pub struct Output;

impl Output {
    pub fn info(msg: &str) {
        emit(Tone::Info, msg);
    }

    pub fn success(msg: &str) {
        emit(Tone::Success, msg);
    }

    pub fn warning(msg: &str) {
        emit(Tone::Warning, msg);
    }

    pub fn error(msg: &str) {
        emit(Tone::Error, msg);
    }

    /// Underlined section title preceded by a blank line.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Indented `key: value` detail line.
    pub fn kv(key: &str, value: &str) {
        println!("{}", kv_line(key, value));
    }

    /// One choice of a numbered menu, e.g. `1: MP3`.
    pub fn menu_item(key: &str, label: &str) {
        println!("{}", menu_line(key, label));
    }

    /// Spinner with elapsed time, ticking until `finish_and_clear`.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(spinner_style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    #[test]
    fn test_status_lines_share_layout() {
        for tone in [Tone::Info, Tone::Success, Tone::Warning, Tone::Error] {
            let line = status_line(tone, "No video file found.");
            assert_eq!(strip_ansi_codes(&line), ">> No video file found.");
        }
    }

    #[test]
    fn test_only_problems_go_to_stderr() {
        assert!(!Tone::Info.to_stderr());
        assert!(!Tone::Success.to_stderr());
        assert!(Tone::Warning.to_stderr());
        assert!(Tone::Error.to_stderr());
    }

    #[test]
    fn test_detail_and_menu_lines() {
        assert_eq!(
            strip_ansi_codes(&kv_line("hint", "Install with: pkg install ffmpeg")),
            "  hint: Install with: pkg install ffmpeg"
        );
        assert_eq!(strip_ansi_codes(&menu_line("2", "Audio-CD Format (WAV)")), "  2: Audio-CD Format (WAV)");
    }
}
