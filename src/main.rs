//! repo-exporter binary entry point.

use repo_exporter::cli::errors::format_error_help;
use repo_exporter::cli::{self, Cli};
use repo_exporter::config::ExporterConfig;
use repo_exporter::error::ExporterError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match ExporterConfig::from_env() {
        Ok(config) => cli::run(&cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        fail(&e);
    }
}

fn fail(err: &ExporterError) -> ! {
    eprintln!("\n❌ {}", format_error_help(err));
    std::process::exit(err.exit_code());
}
