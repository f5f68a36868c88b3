//! Top-level error type for the synchronization crate

use thiserror::Error;

use crate::config::ConfigError;
use crate::dlq::DeadLetterError;

/// Errors that abort a whole invocation. Failures local to one record are
/// not errors; they surface as outcomes in the run summary.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid change event: {0}")]
    InvalidEvent(String),
    #[error("dead-letter escalation failed: {0}")]
    DeadLetter(#[from] DeadLetterError),
}
