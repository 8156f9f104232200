use std::fmt;

/// OAuth access token obtained from the device flow.
///
/// Lives only in memory for the rest of the run. `Debug` never prints the
/// secret.
///
/// # Example
/// ```
/// use repo_exporter::auth::BearerToken;
///
/// let token = BearerToken::new("gho_abc");
/// assert_eq!(token.secret(), "gho_abc");
/// assert_eq!(format!("{token:?}"), "BearerToken(***)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self(access_token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header of listing requests.
    pub fn authorization_header(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
