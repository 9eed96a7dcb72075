//! Runtime settings: where downloads land, where the config file lives, and
//! how long external tools may run.

use crate::error::{DownloaderError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Download directory, relative to the home directory.
pub const DOWNLOAD_SUBDIR: &str = "storage/downloads/videodownloader";

/// Configuration file, relative to the home directory.
pub const CONFIG_SUBPATH: &str = ".config/ytdownloader/config.ini";

/// Optional overrides collected from the command line or environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub download_dir: Option<String>,
    pub config: Option<String>,
    /// Seconds; `Some(0)` means no limit.
    pub timeout_secs: Option<u64>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory the downloader writes into and the scan looks at.
    pub download_dir: PathBuf,
    /// Path of the persisted key/value configuration file.
    pub config_path: PathBuf,
    /// Upper bound for a single external tool run. `None` waits forever.
    pub tool_timeout: Option<Duration>,
}

impl Settings {
    /// Resolve settings against the current user's home directory.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let home = dirs::home_dir().ok_or(DownloaderError::NoHomeDir)?;
        Ok(Self::resolve_with_home(&home, overrides))
    }

    /// Resolve settings against an explicit home directory.
    pub fn resolve_with_home(home: &Path, overrides: &Overrides) -> Self {
        let download_dir = match &overrides.download_dir {
            Some(dir) => Self::expand_path(dir),
            None => home.join(DOWNLOAD_SUBDIR),
        };

        let config_path = match &overrides.config {
            Some(path) => Self::expand_path(path),
            None => home.join(CONFIG_SUBPATH),
        };

        let tool_timeout = overrides
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            download_dir,
            config_path,
            tool_timeout,
        }
    }

    /// Expand shell variables in paths (e.g., ~) and anchor relative paths
    /// at the current directory.
    ///
    /// External tools run with their own working directory, so a relative
    /// path would resolve differently for them than for this process.
    pub fn expand_path(path: &str) -> PathBuf {
        absolutize(Path::new(&*shellexpand::tilde(path)))
    }

    /// Create the download directory (and parents) if it is missing.
    pub fn ensure_download_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.download_dir)?;
        Ok(())
    }
}

/// Make `path` absolute against the current directory without touching the
/// filesystem. Paths that cannot be resolved are returned unchanged.
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_live_under_home() {
        let home = Path::new("/home/alice");
        let settings = Settings::resolve_with_home(home, &Overrides::default());

        assert_eq!(
            settings.download_dir,
            PathBuf::from("/home/alice/storage/downloads/videodownloader")
        );
        assert_eq!(
            settings.config_path,
            PathBuf::from("/home/alice/.config/ytdownloader/config.ini")
        );
        assert_eq!(settings.tool_timeout, None);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = Overrides {
            download_dir: Some("/srv/media".to_string()),
            config: Some("/etc/ytdownloader.ini".to_string()),
            timeout_secs: Some(90),
        };
        let settings = Settings::resolve_with_home(Path::new("/home/alice"), &overrides);

        assert_eq!(settings.download_dir, PathBuf::from("/srv/media"));
        assert_eq!(settings.config_path, PathBuf::from("/etc/ytdownloader.ini"));
        assert_eq!(settings.tool_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_relative_overrides_become_absolute() {
        let overrides = Overrides {
            download_dir: Some("videos".to_string()),
            config: Some("./dl/config.ini".to_string()),
            timeout_secs: None,
        };
        let settings = Settings::resolve_with_home(Path::new("/home/alice"), &overrides);
        let cwd = std::env::current_dir().unwrap();

        assert!(settings.download_dir.is_absolute());
        assert_eq!(settings.download_dir, cwd.join("videos"));
        assert!(settings.config_path.is_absolute());
        assert!(settings.config_path.ends_with("dl/config.ini"));
    }

    #[test]
    fn test_expand_path_keeps_absolute_paths() {
        assert_eq!(
            Settings::expand_path("/srv/media"),
            PathBuf::from("/srv/media")
        );
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let settings = Settings::resolve_with_home(Path::new("/home/alice"), &overrides);
        assert_eq!(settings.tool_timeout, None);
    }

    #[test]
    fn test_ensure_download_dir_creates_parents() {
        let home = tempfile::tempdir().unwrap();
        let settings = Settings::resolve_with_home(home.path(), &Overrides::default());

        settings.ensure_download_dir().unwrap();
        assert!(settings.download_dir.is_dir());
    }
}
