//! Configuration (code > env > `.env` file).

use std::time::Duration;

use crate::error::ExporterError;
use crate::util::retry::RetryPolicy;

pub const DEFAULT_SCOPE: &str = "repo";
pub const DEFAULT_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_REPOS_URL: &str = "https://api.github.com/user/repos";

const ENV_CLIENT_ID: &str = "REPO_EXPORTER_CLIENT_ID";
const ENV_SCOPE: &str = "REPO_EXPORTER_SCOPE";
const ENV_DEVICE_CODE_URL: &str = "REPO_EXPORTER_DEVICE_CODE_URL";
const ENV_ACCESS_TOKEN_URL: &str = "REPO_EXPORTER_ACCESS_TOKEN_URL";
const ENV_REPOS_URL: &str = "REPO_EXPORTER_REPOS_URL";
const ENV_NO_BROWSER: &str = "REPO_EXPORTER_NO_BROWSER";
const ENV_MAX_POLL_INTERVAL: &str = "REPO_EXPORTER_MAX_POLL_INTERVAL_SECS";

/// Static settings threaded into every pipeline stage at construction.
///
/// # Example
/// ```
/// use repo_exporter::config::ExporterConfig;
///
/// let config = ExporterConfig::new("Iv1.0123456789abcdef")
///     .with_repos_url("http://localhost:8080/user/repos")
///     .with_open_browser(false);
/// assert_eq!(config.scope, "repo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    /// OAuth application client identifier.
    pub client_id: String,
    pub scope: String,
    pub device_code_url: String,
    pub access_token_url: String,
    /// Paged repository listing endpoint.
    pub repos_url: String,
    pub open_browser: bool,
    /// Cap for the poll interval grown by `slow_down`. Unbounded when `None`.
    pub max_poll_interval: Option<Duration>,
    /// Retry policy for transport failures while paging.
    pub retry_policy: RetryPolicy,
}

impl ExporterConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            repos_url: DEFAULT_REPOS_URL.to_string(),
            open_browser: true,
            max_poll_interval: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ExporterError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ExporterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let client_id = var(ENV_CLIENT_ID).ok_or_else(|| {
            ExporterError::Configuration(format!("{ENV_CLIENT_ID} is not set"))
        })?;
        let mut config = Self::new(client_id);

        if let Some(scope) = var(ENV_SCOPE) {
            config.scope = scope;
        }
        if let Some(url) = var(ENV_DEVICE_CODE_URL) {
            config.device_code_url = url;
        }
        if let Some(url) = var(ENV_ACCESS_TOKEN_URL) {
            config.access_token_url = url;
        }
        if let Some(url) = var(ENV_REPOS_URL) {
            config.repos_url = url;
        }
        if let Some(flag) = var(ENV_NO_BROWSER) {
            config.open_browser = !parse_flag(&flag);
        }
        if let Some(secs) = var(ENV_MAX_POLL_INTERVAL) {
            let secs: u64 = secs.parse().map_err(|_| {
                ExporterError::Configuration(format!(
                    "{ENV_MAX_POLL_INTERVAL} must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            config.max_poll_interval = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub fn with_repos_url(mut self, url: impl Into<String>) -> Self {
        self.repos_url = url.into();
        self
    }

    pub fn with_open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    pub fn with_max_poll_interval(mut self, cap: Option<Duration>) -> Self {
        self.max_poll_interval = cap;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn client_id_is_required() {
        let err = ExporterConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(matches!(err, ExporterError::Configuration(msg) if msg.contains(ENV_CLIENT_ID)));
    }

    #[test]
    fn blank_client_id_is_rejected() {
        let result = ExporterConfig::from_vars(lookup(&[(ENV_CLIENT_ID, "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_apply_when_only_client_id_is_set() {
        let config = ExporterConfig::from_vars(lookup(&[(ENV_CLIENT_ID, "abc")])).unwrap();
        assert_eq!(config, ExporterConfig::new("abc"));
        assert_eq!(config.repos_url, DEFAULT_REPOS_URL);
        assert!(config.open_browser);
        assert!(config.max_poll_interval.is_none());
    }

    #[test]
    fn env_overrides_every_endpoint() {
        let config = ExporterConfig::from_vars(lookup(&[
            (ENV_CLIENT_ID, "abc"),
            (ENV_SCOPE, "public_repo"),
            (ENV_DEVICE_CODE_URL, "http://ghe/login/device/code"),
            (ENV_ACCESS_TOKEN_URL, "http://ghe/login/oauth/access_token"),
            (ENV_REPOS_URL, "http://ghe/api/v3/user/repos"),
            (ENV_NO_BROWSER, "true"),
            (ENV_MAX_POLL_INTERVAL, "60"),
        ]))
        .unwrap();

        assert_eq!(config.scope, "public_repo");
        assert_eq!(config.device_code_url, "http://ghe/login/device/code");
        assert_eq!(config.access_token_url, "http://ghe/login/oauth/access_token");
        assert_eq!(config.repos_url, "http://ghe/api/v3/user/repos");
        assert!(!config.open_browser);
        assert_eq!(config.max_poll_interval, Some(Duration::from_secs(60)));
    }

    #[test]
    fn invalid_poll_cap_is_a_configuration_error() {
        let result = ExporterConfig::from_vars(lookup(&[
            (ENV_CLIENT_ID, "abc"),
            (ENV_MAX_POLL_INTERVAL, "soon"),
        ]));
        assert!(matches!(result, Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn no_browser_flag_accepts_common_spellings() {
        assert!(parse_flag("1"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
    }
}
