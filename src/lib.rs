//! Repo Exporter
//!
//! Signs a user in to GitHub with the OAuth device-authorization grant, walks
//! the paginated repository listing to completion and writes a flattened CSV
//! projection of every repository the account can see.
//!
//! # Quick Start
//!
//! ```no_run
//! use repo_exporter::prelude::*;
//!
//! # async fn example() -> repo_exporter::error::Result<()> {
//! let config = ExporterConfig::from_env()?;
//! let token = DeviceFlowAuthenticator::from_config(&config).authenticate().await?;
//! let repos = RepoFetcher::from_config(&config).fetch_all(token).await?;
//! let outcome = repo_exporter::export::export(&repos, "repos.csv")?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod prelude;
pub mod types;
pub mod util;
