//! Cookie setup prompt.
//!
//! Shows the configured cookie file and lets the user point it somewhere else.
//! One attempt per run: a path that does not exist is reported and ignored.

use crate::cli::prompt::is_yes;
use crate::cli::{Output, Prompter};
use crate::config::{absolutize, Config, ConfigStore, Settings};
use crate::error::{DownloaderError, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CHANGE_PROMPT: &str = "Do you want to change the path to the cookies file? (y/n):";
pub const PATH_PROMPT: &str = "Enter the full path to cookies.txt:";

/// Load the configuration, falling back to an empty one.
///
/// A missing directory, unreadable file or parse error is reported on the
/// console and never stops the session.
pub fn load_config(store: &ConfigStore) -> Config {
    match store.load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Config load failed: {}", e);
            Output::error(&format!(
                "Could not load {}: {}",
                store.path().display(),
                e
            ));
            Config::default()
        }
    }
}

/// Run the cookie setup prompt.
///
/// Returns the cookie file to hand to the downloader, if one is configured.
/// Only console I/O errors propagate; config write failures are reported and
/// leave `config` unchanged.
pub fn run_cookie_setup(
    store: &ConfigStore,
    config: &mut Config,
    prompter: &mut dyn Prompter,
) -> Result<Option<PathBuf>> {
    Output::header("For YouTube with cookie support");
    Output::kv(
        "Current cookies file",
        config.cookies_file().unwrap_or("Not configured"),
    );

    let change = prompter.ask(CHANGE_PROMPT)?.unwrap_or_default();
    if is_yes(&change) {
        if let Some(raw) = prompter.ask(PATH_PROMPT)? {
            let candidate = Settings::expand_path(raw.trim());
            match update_cookies_file(store, config, &candidate) {
                Ok(()) => Output::success("Cookies path updated successfully!"),
                Err(DownloaderError::CookieFileMissing(_)) => {
                    Output::error("Error: The specified file does not exist!")
                }
                Err(e) => Output::error(&format!("Could not save configuration: {}", e)),
            }
        }
    }

    // The downloader runs in the download directory, not ours
    Ok(config.cookies_file().map(|p| absolutize(Path::new(p))))
}

/// Point the configuration at `path` and persist it.
///
/// Relative paths are anchored at the current directory before the check,
/// since the downloader later runs in the download directory. Fails with
/// [`DownloaderError::CookieFileMissing`] if `path` does not exist. `config`
/// is only modified once the file has been written.
pub fn update_cookies_file(store: &ConfigStore, config: &mut Config, path: &Path) -> Result<()> {
    let path = absolutize(path);
    if !path.exists() {
        return Err(DownloaderError::CookieFileMissing(path.to_path_buf()));
    }

    let mut updated = config.clone();
    updated.set_cookies_file(&path.to_string_lossy());
    store.save(&updated)?;
    *config = updated;

    info!("Cookie file set to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::testing::ScriptedPrompter;

    fn store_in(dir: &Path) -> (ConfigStore, Config) {
        let store = ConfigStore::new(dir.join("ytdownloader").join("config.ini"));
        let config = store.load().unwrap();
        (store, config)
    }

    #[test]
    fn test_existing_path_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let cookies = dir.path().join("cookies.txt");
        std::fs::write(&cookies, "# Netscape HTTP Cookie File\n").unwrap();
        let (store, mut config) = store_in(dir.path());

        let cookies_str = cookies.to_string_lossy().to_string();
        let mut prompter = ScriptedPrompter::new(&["y", cookies_str.as_str()]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        assert_eq!(result, Some(cookies.clone()));
        assert_eq!(
            store.load().unwrap().cookies_file(),
            Some(cookies_str.as_str())
        );
    }

    #[test]
    fn test_missing_path_leaves_config_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());
        let before = std::fs::read_to_string(store.path()).unwrap();

        let missing = dir.path().join("nope.txt").to_string_lossy().to_string();
        let mut prompter = ScriptedPrompter::new(&["Y", missing.as_str()]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        assert_eq!(result, None);
        assert_eq!(config.cookies_file(), None);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_declining_keeps_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());
        config.set_cookies_file("/sdcard/cookies.txt");

        let mut prompter = ScriptedPrompter::new(&["n"]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        assert_eq!(result, Some(PathBuf::from("/sdcard/cookies.txt")));
        assert!(!prompter.was_asked(PATH_PROMPT));
    }

    #[test]
    fn test_closed_input_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());

        let mut prompter = ScriptedPrompter::new(&[]);
        assert_eq!(run_cookie_setup(&store, &mut config, &mut prompter).unwrap(), None);
    }

    #[test]
    fn test_relative_path_is_stored_absolute() {
        // Tests run from the package root
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());

        let mut prompter = ScriptedPrompter::new(&["y", "Cargo.toml"]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        let expected = std::env::current_dir().unwrap().join("Cargo.toml");
        let expected_str = expected.to_string_lossy().to_string();
        assert_eq!(result, Some(expected));
        assert_eq!(
            store.load().unwrap().cookies_file(),
            Some(expected_str.as_str())
        );
    }

    #[test]
    fn test_relative_path_from_config_file_is_anchored() {
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());
        config.set_cookies_file("cookies/yt.txt");

        let mut prompter = ScriptedPrompter::new(&["n"]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        assert_eq!(
            result,
            Some(std::env::current_dir().unwrap().join("cookies/yt.txt"))
        );
    }

    #[test]
    fn test_failed_save_keeps_config() {
        let dir = tempfile::tempdir().unwrap();
        let cookies = dir.path().join("cookies.txt");
        std::fs::write(&cookies, "").unwrap();
        // Parent of the config file is a regular file, so it cannot be created
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = ConfigStore::new(blocker.join("config.ini"));
        let mut config = Config::default();

        let err = update_cookies_file(&store, &mut config, &cookies).unwrap_err();

        assert!(matches!(err, DownloaderError::Io(_)));
        assert_eq!(config.cookies_file(), None);
    }

    #[test]
    fn test_failed_save_is_reported_not_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let cookies = dir.path().join("cookies.txt");
        std::fs::write(&cookies, "").unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = ConfigStore::new(blocker.join("config.ini"));
        let mut config = Config::default();

        let cookies_str = cookies.to_string_lossy().to_string();
        let mut prompter = ScriptedPrompter::new(&["y", cookies_str.as_str()]);
        let result = run_cookie_setup(&store, &mut config, &mut prompter).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn test_unreadable_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let config = load_config(&ConfigStore::new(blocker.join("config.ini")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "cookies_file = /outside/any/section\n").unwrap();

        let config = load_config(&ConfigStore::new(&path));
        assert_eq!(config, Config::default());
        assert_eq!(config.cookies_file(), None);
    }

    #[test]
    fn test_update_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (store, mut config) = store_in(dir.path());

        let err = update_cookies_file(&store, &mut config, &dir.path().join("x.txt")).unwrap_err();
        assert!(matches!(err, DownloaderError::CookieFileMissing(_)));
    }
}
