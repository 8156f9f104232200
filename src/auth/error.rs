use thiserror::Error;

/// Failures of the device-authorization flow. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorization endpoint answered with something other than 200.
    #[error("OAuth initialization error (status {status}): {body}")]
    Initialization { status: u16, body: String },
    /// The device/user code window elapsed before the user approved.
    #[error("Timed out waiting for authorization. Please try again.")]
    Expired,
    /// The token endpoint returned an error code this flow does not handle.
    #[error("Unexpected error: {0}")]
    Protocol(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(error.to_string())
    }
}
