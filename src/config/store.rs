//! Persisted key/value configuration (`config.ini`).
//!
//! The file uses a section-based `key = value` layout:
//!
//! ```text
//! [DEFAULT]
//! cookies_file = /sdcard/cookies.txt
//!
//! ```
//!
//! Sections and keys the program does not know about are kept and written back
//! unchanged, so hand-edited files survive a save.

use crate::error::{DownloaderError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Section holding the program's settings.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Key for the browser-exported cookie file handed to the downloader.
pub const COOKIES_KEY: &str = "cookies_file";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// In-memory configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    sections: Vec<Section>,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            sections: Vec::new(),
        };
        config.set(DEFAULT_SECTION, COOKIES_KEY, "");
        config
    }
}

impl Config {
    /// Parse configuration text.
    ///
    /// Keys are case-insensitive and stored lower-case. Both `=` and `:` act as
    /// delimiters, `#` and `;` start comment lines, and an indented line
    /// continues the previous value.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self {
            sections: Vec::new(),
        };
        let mut current: Option<usize> = None;
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Continuation of a multi-line value
            if raw.starts_with([' ', '\t']) {
                if let (Some(section), Some(key)) = (current, last_key.as_ref()) {
                    if let Some(entry) = config.sections[section]
                        .entries
                        .iter_mut()
                        .find(|(k, _)| k == key)
                    {
                        entry.1.push('\n');
                        entry.1.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                current = Some(config.section_index_or_insert(name.trim()));
                last_key = None;
                continue;
            }

            let section = current.ok_or_else(|| DownloaderError::ConfigParse {
                line: line_no,
                message: "key outside of any [section]".to_string(),
            })?;

            let (key, value) = split_entry(trimmed).ok_or_else(|| DownloaderError::ConfigParse {
                line: line_no,
                message: format!("expected `key = value`, found `{trimmed}`"),
            })?;

            let key = key.to_lowercase();
            let name = config.sections[section].name.clone();
            config.set(&name, &key, value);
            last_key = Some(key);
        }

        Ok(config)
    }

    /// Render the document in the same layout the parser reads.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in &section.entries {
                out.push_str(&format!("{} = {}\n", key, value.replace('\n', "\n\t")));
            }
            out.push('\n');
        }
        out
    }

    /// Look up a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let idx = self.section_index_or_insert(section);
        let key = key.to_lowercase();
        let entries = &mut self.sections[idx].entries;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => entries.push((key, value.to_string())),
        }
    }

    /// Configured cookie file, or `None` when unset or empty.
    pub fn cookies_file(&self) -> Option<&str> {
        self.get(DEFAULT_SECTION, COOKIES_KEY)
            .filter(|value| !value.is_empty())
    }

    /// Record a new cookie file path.
    pub fn set_cookies_file(&mut self, path: &str) {
        self.set(DEFAULT_SECTION, COOKIES_KEY, path);
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            return idx;
        }
        self.sections.push(Section {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.sections.len() - 1
    }
}

/// Split `key = value` or `key: value` on the first delimiter.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

/// Loads and saves the configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolved location of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the configuration, creating a default file on first run.
    pub fn load(&self) -> Result<Config> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if self.path.exists() {
            debug!("Reading config from {}", self.path.display());
            let content = std::fs::read_to_string(&self.path)?;
            Config::parse(&content)
        } else {
            info!("Creating default config at {}", self.path.display());
            let config = Config::default();
            self.save(&config)?;
            Ok(config)
        }
    }

    /// Overwrite the configuration file with `config`.
    ///
    /// Writes a sibling temp file first and renames it into place, so an
    /// interrupted save leaves the previous file intact.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                DownloaderError::Config(format!("not a file path: {}", self.path.display()))
            })?
            .to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        std::fs::write(&tmp_path, config.to_ini_string())?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ytdownloader").join("config.ini");
        let store = ConfigStore::new(&path);

        let config = store.load().unwrap();

        assert!(path.exists());
        assert_eq!(config.get(DEFAULT_SECTION, COOKIES_KEY), Some(""));
        assert_eq!(config.cookies_file(), None);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[DEFAULT]\ncookies_file = \n\n"
        );

        let again = store.load().unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_load_then_save_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let on_disk = "[DEFAULT]\ncookies_file = /sdcard/Download/cookies.txt\n\n";
        std::fs::write(&path, on_disk).unwrap();

        let store = ConfigStore::new(&path);
        let config = store.load().unwrap();
        store.save(&config).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);
        assert_eq!(
            store.load().unwrap().cookies_file(),
            Some("/sdcard/Download/cookies.txt")
        );
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let store = ConfigStore::new(&path);

        let mut config = Config::default();
        config.set_cookies_file("/tmp/c.txt");
        store.save(&config).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("config.ini")]);
    }

    #[test]
    fn test_parse_preserves_unknown_sections() {
        let text = "[DEFAULT]\ncookies_file = \nextra: value\n\n[other]\nName = Thing\n";
        let config = Config::parse(text).unwrap();

        assert_eq!(config.get(DEFAULT_SECTION, "extra"), Some("value"));
        assert_eq!(config.get("other", "name"), Some("Thing"));
        assert_eq!(
            config.to_ini_string(),
            "[DEFAULT]\ncookies_file = \nextra = value\n\n[other]\nname = Thing\n\n"
        );
    }

    #[test]
    fn test_parse_skips_comments_and_lowercases_keys() {
        let text = "# exported by hand\n[DEFAULT]\n; old value below\nCOOKIES_FILE=/a/b.txt\n";
        let config = Config::parse(text).unwrap();
        assert_eq!(config.cookies_file(), Some("/a/b.txt"));
    }

    #[test]
    fn test_parse_continuation_lines() {
        let text = "[DEFAULT]\nnotes = first\n\tsecond\ncookies_file = \n";
        let config = Config::parse(text).unwrap();

        assert_eq!(config.get(DEFAULT_SECTION, "notes"), Some("first\nsecond"));
        assert_eq!(Config::parse(&config.to_ini_string()).unwrap(), config);
    }

    #[test]
    fn test_parse_rejects_key_without_section() {
        let err = Config::parse("cookies_file = /x\n").unwrap_err();
        assert!(matches!(err, DownloaderError::ConfigParse { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_line_without_delimiter() {
        let err = Config::parse("[DEFAULT]\njust some words\n").unwrap_err();
        assert!(matches!(err, DownloaderError::ConfigParse { line: 2, .. }));
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let mut config = Config::default();
        config.set_cookies_file("/one");
        config.set_cookies_file("/two");

        assert_eq!(config.cookies_file(), Some("/two"));
        assert_eq!(config.to_ini_string(), "[DEFAULT]\ncookies_file = /two\n\n");
    }
}
