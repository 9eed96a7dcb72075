//! Configuration module for ytdownloader.
//!
//! Handles runtime settings (paths, timeouts) and the persisted cookie setting.

mod settings;
mod store;

pub use settings::{absolutize, Overrides, Settings, CONFIG_SUBPATH, DOWNLOAD_SUBDIR};
pub use store::{Config, ConfigStore, COOKIES_KEY, DEFAULT_SECTION};
