//! Convenience re-exports for common use.

pub use crate::auth::{BearerToken, DeviceCodeSession, DeviceFlowAuthenticator};
pub use crate::config::ExporterConfig;
pub use crate::error::{ExporterError, Result};
pub use crate::export::{ExportOutcome, ExportRow};
pub use crate::fetch::RepoFetcher;
pub use crate::types::{RepositoryCollection, RepositoryRecord};
