//! Error types for ytdownloader.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for download and conversion operations.
#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error at line {line}: {message}")]
    ConfigParse { line: usize, message: String },

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("{tool} exited with status {}", describe_code(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("{tool} did not finish within {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("No video file found in {}", .0.display())]
    NoVideoFound(PathBuf),

    #[error("The specified file does not exist: {}", .0.display())]
    CookieFileMissing(PathBuf),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Result type alias for ytdownloader operations.
pub type Result<T> = std::result::Result<T, DownloaderError>;
