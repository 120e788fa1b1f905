//! The bounded-attempt retry loop.

use tracing::debug;

use crate::transport::{HttpError, RawResponse};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry policy shared by transient-failure and retryable-status handling:
/// one loop, a fixed attempt ceiling, immediate retries, deterministic
/// termination.
///
/// A response whose status is in `retryable_statuses` does not terminate the
/// call by itself; it is retried up to the ceiling and then surfaces as
/// [`HttpError::RetriesExhausted`]. 500 is deliberately not in the default
/// set: it may carry a SOAP fault and must reach the response layer intact.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retryable_statuses: vec![404],
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retryable_statuses: Vec<u16>) -> Self {
        RetryPolicy {
            max_attempts,
            retryable_statuses,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Runs `attempt` until it answers a non-retryable outcome or the attempt
    /// ceiling is reached.
    ///
    /// Transient failures (timeout, connection) and retryable statuses are
    /// retried immediately; terminal failures and acceptable responses are
    /// answered as-is.
    pub fn run<F>(&self, mut attempt: F) -> Result<RawResponse, HttpError>
    where
        F: FnMut() -> Result<RawResponse, HttpError>,
    {
        let mut last_failure: Option<String> = None;

        for attempt_number in 1..=self.max_attempts {
            match attempt() {
                Ok(response) if self.retryable_status(response.status) => {
                    debug!(
                        attempt = attempt_number,
                        status = response.status,
                        "retryable status, trying again"
                    );
                    last_failure = Some(format!("HTTP status {}", response.status));
                }
                Ok(response) => return Ok(response),
                Err(error) if error.is_transient() => {
                    debug!(attempt = attempt_number, error = %error, "transient failure, trying again");
                    last_failure = Some(error.to_string());
                }
                Err(error) => return Err(error),
            }
        }

        Err(HttpError::RetriesExhausted {
            attempts: self.max_attempts,
            last: last_failure.unwrap_or_else(|| "no attempts were made".to_string()),
        })
    }
}
