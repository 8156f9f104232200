//! Utility modules: retry with back-off, cooperative sleeping.

pub mod retry;
pub mod sleep;
