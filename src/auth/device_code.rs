use std::time::Duration;

use strum::EnumString;

use super::BearerToken;

/// Poll interval used when the provider does not send one.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Seconds added to the interval on every `slow_down` response.
pub const SLOW_DOWN_INCREMENT_SECS: u64 = 5;

/// Device-code session details returned by the authorization endpoint.
///
/// # Example
/// ```
/// use repo_exporter::auth::DeviceCodeSession;
///
/// let session = DeviceCodeSession {
///     device_code: "3584d83530557fdd1f46af8289938c8ef79f9dc5".to_string(),
///     user_code: "WDJB-MJHT".to_string(),
///     verification_uri: "https://github.com/login/device".to_string(),
///     interval_secs: 5,
/// };
/// assert_eq!(session.interval().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCodeSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub interval_secs: u64,
}

impl DeviceCodeSession {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Interval after one `slow_down`, optionally capped.
    ///
    /// Never lower than the current interval.
    pub fn slowed_interval_secs(&self, cap: Option<Duration>) -> u64 {
        let raised = self.interval_secs.saturating_add(SLOW_DOWN_INCREMENT_SECS);
        match cap {
            Some(cap) => raised.min(cap.as_secs()).max(self.interval_secs),
            None => raised,
        }
    }
}

/// Non-fatal outcome of a single token poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCodePoll {
    Pending { interval_secs: u64 },
    SlowDown { interval_secs: u64 },
    Authorized { token: BearerToken },
}

/// `error` values the token endpoint sends while no token is issued.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DeviceErrorCode {
    AuthorizationPending,
    SlowDown,
    ExpiredToken,
    #[strum(default)]
    Other(String),
}
