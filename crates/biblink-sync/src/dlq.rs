//! Dead-letter escalation for permanently failed work

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Delay applied when escalating a payload, giving transient upstream
/// conditions a chance to clear before the payload is reprocessed.
pub const DEAD_LETTER_DELAY: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DeadLetterError {
    #[error("failed to enqueue payload on dead-letter channel: {0}")]
    Enqueue(String),
}

/// Channel holding change events whose processing was permanently abandoned.
/// The original payload is enqueued verbatim for delayed reprocessing.
#[async_trait]
pub trait DeadLetterQueue {
    async fn enqueue(&self, payload: &str, delay: Duration) -> Result<(), DeadLetterError>;
}

/// Fallback for environments without a real queue: the payload is logged at
/// error level so an operator can replay it by hand.
pub struct LoggingDeadLetter;

#[async_trait]
impl DeadLetterQueue for LoggingDeadLetter {
    async fn enqueue(&self, payload: &str, delay: Duration) -> Result<(), DeadLetterError> {
        error!(delay_seconds = delay.as_secs(), payload, "abandoned event payload");
        Ok(())
    }
}
