//! CLI-specific error formatting for user-facing messages.

use crate::auth::AuthError;
use crate::error::ExporterError;

/// Map an [`ExporterError`] to a user-facing message with actionable guidance.
pub fn format_error_help(err: &ExporterError) -> String {
    match err {
        ExporterError::Configuration(msg) => {
            format!("Configuration error: {msg}. Set it in the environment or a .env file")
        }
        ExporterError::Authentication(AuthError::Initialization { body, .. }) => {
            format!("OAuth initialization error: {body}")
        }
        ExporterError::Authentication(AuthError::Expired) => {
            "Timed out. Please try again.".to_string()
        }
        ExporterError::Authentication(AuthError::Protocol(code)) => {
            format!("Unexpected error: {code}")
        }
        ExporterError::Fetch { status } => format!("API Error: {status}"),
        other => format!("{other}"),
    }
}
