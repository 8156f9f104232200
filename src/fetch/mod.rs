//! Paged retrieval of every repository visible to the token.

pub mod transport;

pub use transport::{HttpListingTransport, ListingTransport, PageResponse, RetryingTransport};

use std::sync::Arc;

use crate::auth::BearerToken;
use crate::config::ExporterConfig;
use crate::error::ExporterError;
use crate::types::{RepositoryCollection, RepositoryRecord};
use crate::util::retry::RetryPolicy;

/// Items requested per page; the largest page the listing API allows.
pub const PAGE_SIZE: u32 = 100;

/// Progress notifications emitted while paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    PageFetched { page: u32, records: usize },
    Completed { total: usize },
}

/// Callback receiving [`FetchEvent`]s.
pub type FetchEventSink = Arc<dyn Fn(FetchEvent) + Send + Sync>;

/// Walks the repository listing page by page until an empty page comes back.
///
/// # Example
/// ```no_run
/// use repo_exporter::auth::BearerToken;
/// use repo_exporter::fetch::RepoFetcher;
///
/// # async fn example() -> repo_exporter::error::Result<()> {
/// let fetcher = RepoFetcher::http("https://api.github.com/user/repos");
/// let repos = fetcher.fetch_all(BearerToken::new("gho_abc")).await?;
/// println!("{} repositories", repos.len());
/// # Ok(())
/// # }
/// ```
pub struct RepoFetcher<T = RetryingTransport<HttpListingTransport>> {
    transport: T,
    repos_url: String,
    event_sink: Option<FetchEventSink>,
}

impl RepoFetcher {
    /// Fetcher over HTTP with the default retry policy.
    pub fn http(repos_url: impl Into<String>) -> Self {
        Self::new(
            RetryingTransport::new(HttpListingTransport::new(), RetryPolicy::default()),
            repos_url,
        )
    }

    pub fn from_config(config: &ExporterConfig) -> Self {
        Self::new(
            RetryingTransport::new(HttpListingTransport::new(), config.retry_policy.clone()),
            config.repos_url.clone(),
        )
    }
}

impl<T: ListingTransport> RepoFetcher<T> {
    pub fn new(transport: T, repos_url: impl Into<String>) -> Self {
        Self {
            transport,
            repos_url: repos_url.into(),
            event_sink: None,
        }
    }

    pub fn with_event_sink(mut self, sink: FetchEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Fetch every page, in order, until one comes back empty.
    ///
    /// Any non-200 answer aborts the walk with [`ExporterError::Fetch`].
    pub async fn fetch_all(
        &self,
        token: BearerToken,
    ) -> Result<RepositoryCollection, ExporterError> {
        let mut repos = RepositoryCollection::new();
        let mut page: u32 = 1;

        loop {
            let records = self.fetch_page(&token, page).await?;
            if records.is_empty() {
                break;
            }
            tracing::debug!(page, records = records.len(), "Fetched repository page");
            self.emit(FetchEvent::PageFetched {
                page,
                records: records.len(),
            });
            repos.extend(records);
            page += 1;
        }

        tracing::info!(
            total = repos.len(),
            pages = page - 1,
            "Repository listing complete"
        );
        self.emit(FetchEvent::Completed { total: repos.len() });
        Ok(repos)
    }

    /// Fetch a single page (1-based).
    pub async fn fetch_page(
        &self,
        token: &BearerToken,
        page: u32,
    ) -> Result<Vec<RepositoryRecord>, ExporterError> {
        let query = [
            ("per_page", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
            ("type", "all".to_string()),
        ];
        let resp = self
            .transport
            .get_page(&self.repos_url, &query, token)
            .await?;
        if resp.status != 200 {
            tracing::debug!(
                page,
                status = resp.status,
                body = %resp.body,
                "Listing request failed"
            );
            return Err(ExporterError::Fetch {
                status: resp.status,
            });
        }
        Ok(serde_json::from_str(&resp.body)?)
    }

    fn emit(&self, event: FetchEvent) {
        if let Some(sink) = &self.event_sink {
            sink(event);
        }
    }
}
