//! OAuth device-authorization grant.

pub mod device_code;
pub mod error;
pub mod flow;
pub mod token;

pub use device_code::{DeviceCodePoll, DeviceCodeSession, DeviceErrorCode};
pub use error::AuthError;
pub use flow::{AuthEvent, AuthEventSink, DeviceFlowAuthenticator};
pub use token::BearerToken;
