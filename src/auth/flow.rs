//! Device-authorization grant driver.
//!
//! # Flow
//!
//! 1. [`DeviceFlowAuthenticator::initiate`] requests a device and user code.
//! 2. [`DeviceFlowAuthenticator::present_to_user`] shows the code and opens
//!    the verification page in the browser.
//! 3. [`DeviceFlowAuthenticator::poll`] sleeps one interval before every token
//!    request until the provider issues a token or ends the session.
//!
//! ```text
//! INIT -> AWAITING_AUTHORIZATION (pending | slow_down loop) -> SUCCESS | EXPIRED | FAILED
//! ```

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use super::device_code::{
    DeviceCodePoll, DeviceCodeSession, DeviceErrorCode, DEFAULT_INTERVAL_SECS,
};
use super::error::AuthError;
use super::token::BearerToken;
use crate::config::{
    ExporterConfig, DEFAULT_ACCESS_TOKEN_URL, DEFAULT_DEVICE_CODE_URL, DEFAULT_SCOPE,
};
use crate::util::sleep::{Sleeper, TokioSleeper};

const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Progress notifications emitted while the flow runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The user must visit `verification_uri` and enter `user_code`.
    VerificationRequired {
        verification_uri: String,
        user_code: String,
    },
    Pending,
    SlowDown { interval_secs: u64 },
    Authorized,
}

/// Callback receiving [`AuthEvent`]s.
pub type AuthEventSink = Arc<dyn Fn(AuthEvent) + Send + Sync>;

/// Runs the OAuth device-authorization grant against one provider.
///
/// # Example
/// ```no_run
/// use repo_exporter::auth::DeviceFlowAuthenticator;
///
/// # async fn example() -> Result<(), repo_exporter::auth::AuthError> {
/// let auth = DeviceFlowAuthenticator::new("Iv1.0123456789abcdef").with_scope("repo");
/// let token = auth.authenticate().await?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceFlowAuthenticator {
    client: reqwest::Client,
    client_id: String,
    scope: String,
    device_code_url: String,
    access_token_url: String,
    open_browser: bool,
    max_poll_interval: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
    event_sink: Option<AuthEventSink>,
}

impl DeviceFlowAuthenticator {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            open_browser: true,
            max_poll_interval: None,
            sleeper: Arc::new(TokioSleeper),
            event_sink: None,
        }
    }

    pub fn from_config(config: &ExporterConfig) -> Self {
        Self::new(config.client_id.clone())
            .with_scope(config.scope.clone())
            .with_device_code_url(config.device_code_url.clone())
            .with_access_token_url(config.access_token_url.clone())
            .with_open_browser(config.open_browser)
            .with_max_poll_interval(config.max_poll_interval)
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

    pub fn with_open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    /// Upper bound for the interval grown by `slow_down`; `None` leaves it unbounded.
    pub fn with_max_poll_interval(mut self, cap: Option<Duration>) -> Self {
        self.max_poll_interval = cap;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_event_sink(mut self, sink: AuthEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Run the whole flow: initiate, present, poll.
    pub async fn authenticate(&self) -> Result<BearerToken, AuthError> {
        let session = self.initiate().await?;
        self.present_to_user(&session);
        self.poll(session).await
    }

    /// Request a device code and user code from the authorization endpoint.
    pub async fn initiate(&self) -> Result<DeviceCodeSession, AuthError> {
        let resp = self
            .client
            .post(&self.device_code_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if status != StatusCode::OK {
            return Err(AuthError::Initialization {
                status: status.as_u16(),
                body,
            });
        }

        let payload: DeviceCodeResponse = serde_json::from_str(&body)?;
        let session = DeviceCodeSession {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            interval_secs: payload.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
        };
        tracing::debug!(
            verification_uri = %session.verification_uri,
            interval_secs = session.interval_secs,
            "Device authorization started"
        );
        Ok(session)
    }

    /// Show the verification URL and user code, and try to open the browser.
    ///
    /// A browser that fails to open is not an error; the printed instructions
    /// are enough to continue.
    pub fn present_to_user(&self, session: &DeviceCodeSession) {
        self.emit(AuthEvent::VerificationRequired {
            verification_uri: session.verification_uri.clone(),
            user_code: session.user_code.clone(),
        });

        if !self.open_browser {
            return;
        }
        if let Err(e) = webbrowser::open(&session.verification_uri) {
            tracing::debug!(error = %e, "Could not open browser");
        }
    }

    /// Poll the token endpoint until a token is issued or the session ends.
    ///
    /// Sleeps the session interval before every request, the first included.
    pub async fn poll(&self, mut session: DeviceCodeSession) -> Result<BearerToken, AuthError> {
        loop {
            self.sleeper.sleep(session.interval()).await;
            match self.poll_once(&session).await? {
                DeviceCodePoll::Authorized { token } => {
                    tracing::info!("Device authorization granted");
                    self.emit(AuthEvent::Authorized);
                    return Ok(token);
                }
                DeviceCodePoll::Pending { .. } => self.emit(AuthEvent::Pending),
                DeviceCodePoll::SlowDown { interval_secs } => {
                    tracing::debug!(interval_secs, "Provider asked to slow down");
                    session.interval_secs = interval_secs;
                    self.emit(AuthEvent::SlowDown { interval_secs });
                }
            }
        }
    }

    /// Send one token request for `session` without sleeping.
    pub async fn poll_once(
        &self,
        session: &DeviceCodeSession,
    ) -> Result<DeviceCodePoll, AuthError> {
        let resp = self
            .client
            .post(&self.access_token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("device_code", session.device_code.as_str()),
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        let payload: DeviceTokenResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::InvalidResponse(format!("token endpoint (status {status}): {e}"))
        })?;

        if let Some(access_token) = payload.access_token {
            return Ok(DeviceCodePoll::Authorized {
                token: BearerToken::new(access_token),
            });
        }

        let error = payload.error.unwrap_or_default();
        tracing::debug!(%status, error = %error, "Token poll answered");
        let code = DeviceErrorCode::from_str(&error)
            .unwrap_or_else(|_| DeviceErrorCode::Other(error.clone()));
        match code {
            DeviceErrorCode::AuthorizationPending => Ok(DeviceCodePoll::Pending {
                interval_secs: session.interval_secs,
            }),
            DeviceErrorCode::SlowDown => Ok(DeviceCodePoll::SlowDown {
                interval_secs: session.slowed_interval_secs(self.max_poll_interval),
            }),
            DeviceErrorCode::ExpiredToken => Err(AuthError::Expired),
            DeviceErrorCode::Other(other) if other.is_empty() => Err(AuthError::Protocol(
                "response carried neither a token nor an error".to_string(),
            )),
            DeviceErrorCode::Other(other) => Err(AuthError::Protocol(
                match payload.error_description {
                    Some(description) => format!("{other} ({description})"),
                    None => other,
                },
            )),
        }
    }

    fn emit(&self, event: AuthEvent) {
        if let Some(sink) = &self.event_sink {
            sink(event);
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DeviceTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_github() {
        let auth = DeviceFlowAuthenticator::new("abc");
        assert_eq!(auth.client_id(), "abc");
        assert_eq!(auth.scope, "repo");
        assert_eq!(auth.device_code_url, DEFAULT_DEVICE_CODE_URL);
        assert_eq!(auth.access_token_url, DEFAULT_ACCESS_TOKEN_URL);
        assert!(auth.open_browser);
        assert!(auth.max_poll_interval.is_none());
    }

    #[test]
    fn from_config_threads_every_setting() {
        let config = ExporterConfig::new("cid")
            .with_scope("repo read:org")
            .with_device_code_url("http://auth/device")
            .with_access_token_url("http://auth/token")
            .with_open_browser(false)
            .with_max_poll_interval(Some(Duration::from_secs(30)));
        let auth = DeviceFlowAuthenticator::from_config(&config);
        assert_eq!(auth.client_id, "cid");
        assert_eq!(auth.scope, "repo read:org");
        assert_eq!(auth.device_code_url, "http://auth/device");
        assert_eq!(auth.access_token_url, "http://auth/token");
        assert!(!auth.open_browser);
        assert_eq!(auth.max_poll_interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn device_code_response_interval_is_optional() {
        let payload: DeviceCodeResponse = serde_json::from_str(
            r#"{"device_code":"d","user_code":"U","verification_uri":"http://x/v"}"#,
        )
        .unwrap();
        assert!(payload.interval.is_none());
    }

    #[test]
    fn present_to_user_emits_verification_event() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink_events = events.clone();
        let auth = DeviceFlowAuthenticator::new("abc")
            .with_open_browser(false)
            .with_event_sink(Arc::new(move |event: AuthEvent| {
                sink_events.lock().unwrap().push(event)
            }));
        let session = DeviceCodeSession {
            device_code: "d1".into(),
            user_code: "U1".into(),
            verification_uri: "http://x/v".into(),
            interval_secs: 1,
        };

        auth.present_to_user(&session);

        assert_eq!(
            *events.lock().unwrap(),
            vec![AuthEvent::VerificationRequired {
                verification_uri: "http://x/v".into(),
                user_code: "U1".into(),
            }]
        );
    }
}
