//! Bounded retry for remote calls
//!
//! One parameterized helper replaces per-call-site retry blocks: an
//! operation is attempted up to the policy's bound, sleeping a fixed backoff
//! between attempts, and the outcome is an explicit value rather than a null
//! response.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::http::{HttpError, HttpResponse};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(3),
        }
    }
}

#[derive(Debug)]
pub enum RetryResult {
    Success {
        response: HttpResponse,
        attempts: u32,
    },
    Exhausted {
        /// Status answered by the final attempt; None when that attempt
        /// failed in transport.
        last_status: Option<u16>,
        attempts: u32,
    },
}

/// Drive `operation` until it answers HTTP 200 or the policy is exhausted.
///
/// Every non-200 answer, timeout or transport error counts as a failed
/// attempt; the backoff is fixed, not exponential, and is never slept after
/// the final attempt.
pub async fn with_retries<F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<HttpResponse, HttpError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_status = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(response) if response.is_ok() => {
                return RetryResult::Success {
                    response,
                    attempts: attempt,
                }
            }
            Ok(response) => {
                warn!(status = response.status, attempt, "remote call answered non-success");
                last_status = Some(response.status);
            }
            Err(error) => {
                warn!(%error, attempt, "remote call failed");
                last_status = None;
            }
        }
        if attempt < max_attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    RetryResult::Exhausted {
        last_status,
        attempts: max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::ZERO,
        }
    }

    fn ok() -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            status: 200,
            body: "body".to_string(),
        })
    }

    fn server_error() -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            status: 500,
            body: String::new(),
        })
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ok() }
        })
        .await;
        assert!(matches!(result, RetryResult::Success { attempts: 1, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_within_bound() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    server_error()
                } else {
                    ok()
                }
            }
        })
        .await;
        assert!(matches!(result, RetryResult::Success { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_exhausted_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { server_error() }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            RetryResult::Exhausted {
                last_status: Some(500),
                attempts: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_transport_errors_leave_no_status() {
        let result = with_retries(&fast_policy(), || async {
            Err(HttpError::Timeout)
        })
        .await;
        assert!(matches!(
            result,
            RetryResult::Exhausted {
                last_status: None,
                attempts: 3
            }
        ));
    }
}
