//! Command-line surface and the authenticate → fetch → export pipeline.

pub mod errors;
pub mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::auth::DeviceFlowAuthenticator;
use crate::config::ExporterConfig;
use crate::error::ExporterError;
use crate::export::{self, ExportOutcome};
use crate::fetch::RepoFetcher;
use crate::util::sleep::{Sleeper, TokioSleeper};

/// GitHub Repo Exporter (OAuth)
#[derive(Parser, Debug)]
#[command(
    name = "repo-exporter",
    version,
    about = "Export every repository your GitHub account can see to CSV"
)]
pub struct Cli {
    /// Output filename
    #[arg(short, long, default_value = "repos.csv")]
    pub output: PathBuf,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Run the whole pipeline with real timers.
pub async fn run(cli: &Cli, config: ExporterConfig) -> Result<ExportOutcome, ExporterError> {
    run_with(cli, config, Arc::new(TokioSleeper)).await
}

/// Run the whole pipeline, sleeping between token polls with `sleeper`.
///
/// Stages run strictly one after another; the token and the collection are
/// handed from one stage to the next.
pub async fn run_with(
    cli: &Cli,
    config: ExporterConfig,
    sleeper: Arc<dyn Sleeper>,
) -> Result<ExportOutcome, ExporterError> {
    // 1. Interactive login
    let authenticator = DeviceFlowAuthenticator::from_config(&config)
        .with_sleeper(sleeper)
        .with_event_sink(progress::auth_printer(config.open_browser));
    let token = authenticator.authenticate().await?;

    // 2. Fetch data
    progress::fetch_started();
    let fetcher =
        RepoFetcher::from_config(&config).with_event_sink(progress::fetch_printer());
    let repos = fetcher.fetch_all(token).await?;

    // 3. Save to CSV
    let outcome = export::export(&repos, &cli.output)?;
    progress::export_finished(&outcome);
    Ok(outcome)
}
