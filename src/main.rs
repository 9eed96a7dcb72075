//! ytdownloader CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ytdownloader::cli::{commands, preflight, Cli, Output, StdinPrompter};
use ytdownloader::config::{ConfigStore, Settings};
use ytdownloader::process::SystemRunner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ytdownloader={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = Settings::resolve(&cli.overrides())?;
    settings.ensure_download_dir()?;

    println!("\n=== Video downloader and converter ===");
    let runner = SystemRunner::new(settings.tool_timeout);
    preflight::warn_missing_tools(&runner, &settings.download_dir).await;

    // Config problems are reported, never fatal
    let store = ConfigStore::new(&settings.config_path);
    let mut config = commands::load_config(&store);

    let mut prompter = StdinPrompter;
    let cookies_file = commands::run_cookie_setup(&store, &mut config, &mut prompter)?;

    let session = commands::DownloadSession::new(&runner, &settings.download_dir, cookies_file);
    Output::kv("Saving downloads to", &session.download_dir().display().to_string());

    session.run(&mut prompter).await?;

    Ok(())
}
