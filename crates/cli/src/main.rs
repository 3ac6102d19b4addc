//! sitemap-sync entry point.
//!
//! Loads configuration, runs one synchronization pass, prints the summary and
//! optionally runs the post-run validation command.
//! Logging goes to stderr so the summary on stdout stays machine-readable.

use anyhow::Result;
use sitemap_sync_client::{ContentClient, ContentConfig};
use sitemap_sync_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod error;
mod run;
mod summary;
mod validate;

use error::RunError;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().map_err(RunError::from)?;
    init_tracing(config.log_json);
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    tracing::info!(site = %config.site_url, output = %config.output_dir.display(), "starting sitemap sync");

    let client = ContentClient::new(ContentConfig::from_app_config(&config))
        .map_err(|e| RunError::ClientInit(e.to_string()))?;
    let today = chrono::Utc::now().date_naive();

    let report = run::run(&config, &client, today).await?;
    summary::print(&report, config.log_json)?;

    match config.validation_step() {
        Some(command) => validate::run_validation(command).await?,
        None if config.skip_validation => tracing::info!("post-run validation skipped"),
        None => {}
    }

    Ok(())
}
