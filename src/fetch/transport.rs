//! Transports for the repository listing endpoint.

use async_trait::async_trait;

use crate::auth::BearerToken;
use crate::error::ExporterError;
use crate::util::retry::RetryPolicy;

const LISTING_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repo-exporter/", env!("CARGO_PKG_VERSION"));

/// Raw answer to one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// Capability the fetcher needs: GET one page with the bearer token.
///
/// Implementations return `Ok` for every HTTP answer, whatever its status.
/// `Err` is reserved for requests that never got an answer.
#[async_trait]
pub trait ListingTransport: Send + Sync {
    async fn get_page(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &BearerToken,
    ) -> Result<PageResponse, ExporterError>;
}

/// [`ListingTransport`] over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpListingTransport {
    client: reqwest::Client,
}

impl HttpListingTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingTransport for HttpListingTransport {
    async fn get_page(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &BearerToken,
    ) -> Result<PageResponse, ExporterError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", token.authorization_header())
            .header("Accept", LISTING_ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(PageResponse { status, body })
    }
}

/// Wraps a transport and retries transport failures with back-off.
///
/// HTTP answers, including error statuses, pass through untouched.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: ListingTransport> ListingTransport for RetryingTransport<T> {
    async fn get_page(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &BearerToken,
    ) -> Result<PageResponse, ExporterError> {
        self.policy
            .execute(|| self.inner.get_page(url, query, token))
            .await
    }
}
