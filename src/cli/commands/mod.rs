//! CLI command implementations.

mod cookies;
mod session;

pub use cookies::{load_config, run_cookie_setup, update_cookies_file};
pub use session::{CycleOutcome, DownloadSession};
