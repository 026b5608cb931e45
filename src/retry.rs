//! Retry orchestration with category-driven backoff and cancellation
//!
//! An operation is attempted, and each failure is normalized and classified.
//! The category's [`RetryPolicy`] decides whether another attempt follows and
//! how long to wait first:
//!
//! ```text
//! Attempting(n) -> success -> done
//!               -> failure -> not retryable        -> Failed (immediately)
//!                          -> retryable, n < bound -> wait(delay(n)) -> Attempting(n + 1)
//!                          -> retryable, n = bound -> Failed (last error)
//! ```
//!
//! Attempts are strictly sequential. The wait schedule always comes from the
//! policy table; [`RetryOptions`] can override the attempt bound and base
//! delay, but cannot make a non-retryable category retryable.
//!
//! A [`CancellationToken`] passed through [`RetryOptions::cancel_on`] is
//! honoured while awaiting the operation and while waiting between attempts.

use crate::backoff;
use crate::classifier::classify;
use crate::core_types::ErrorContext;
use crate::error::RetryError;
use crate::logging::{log_debug, log_info, log_warn};
use crate::normalize::Normalize;
use crate::policy::{PolicyTable, RetryPolicy};

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Per-call overrides of the category retry policy.
#[derive(Debug, Clone, Default)]
pub struct RetryOptions {
    /// Replaces the policy's retry bound for retry-eligible categories
    pub max_attempts: Option<u32>,
    /// Replaces the policy's base delay; the ceiling becomes ten times this value
    pub base_delay: Option<Duration>,
    /// Aborts the loop when cancelled
    pub cancel: Option<CancellationToken>,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed local schedule older call sites were written against:
    /// three retries starting at one second.
    pub fn legacy() -> Self {
        Self::new()
            .max_attempts(3)
            .base_delay(Duration::from_millis(1_000))
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = Some(base_delay);
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Apply these overrides to a category policy.
    ///
    /// Non-eligible policies are returned unchanged.
    pub fn apply(&self, policy: RetryPolicy) -> RetryPolicy {
        if !policy.eligible {
            return policy;
        }

        let mut effective = policy;
        if let Some(max_attempts) = self.max_attempts {
            effective.max_attempts = max_attempts;
        }
        if let Some(base_delay) = self.base_delay {
            let base_ms = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX);
            effective.base_delay_ms = base_ms;
            effective.max_delay_ms = base_ms.saturating_mul(10);
        }
        effective
    }
}

/// Drives repeated execution of an asynchronous operation.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policies: PolicyTable,
    options: RetryOptions,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(PolicyTable::default(), RetryOptions::default())
    }
}

impl RetryExecutor {
    pub fn new(policies: PolicyTable, options: RetryOptions) -> Self {
        Self { policies, options }
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// exhausts its attempt bound, or is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Failed`] carrying the last operation error, or
    /// [`RetryError::Cancelled`] if the cancellation token fired.
    pub async fn execute<F, Fut, T, E>(
        &self,
        context: &ErrorContext,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Normalize,
    {
        let start_time = Instant::now();
        let mut attempt: u32 = 0;
        let mut last_error: Option<E> = None;

        if self.is_cancelled() {
            return Err(self.cancelled(context, 0, None));
        }

        loop {
            log_debug!(
                attempt = attempt,
                operation = %context.operation,
                module = %context.module,
                "Executing operation with retry logic"
            );

            let error = match self.until_cancelled(operation()).await {
                None => return Err(self.cancelled(context, attempt + 1, last_error.take())),
                Some(Ok(value)) => {
                    if attempt > 0 {
                        log_debug!(
                            attempts = attempt + 1,
                            total_duration_ms = start_time.elapsed().as_millis(),
                            operation = %context.operation,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Some(Err(error)) => error,
            };

            let api_error = error.normalize();
            let category = classify(&api_error);
            let policy = self.options.apply(self.policies.policy_for(category));

            if !policy.allows_retry(attempt) {
                if policy.eligible {
                    log_warn!(
                        attempts = attempt + 1,
                        category = %category,
                        status_code = api_error.status_code(),
                        total_duration_ms = start_time.elapsed().as_millis(),
                        operation = %context.operation,
                        module = %context.module,
                        "Operation failed after all retry attempts"
                    );
                } else {
                    log_debug!(
                        attempts = attempt + 1,
                        category = %category,
                        status_code = api_error.status_code(),
                        operation = %context.operation,
                        "Operation failed with non-retryable error"
                    );
                }
                return Err(RetryError::Failed {
                    attempts: attempt + 1,
                    error,
                });
            }

            let delay = backoff::delay(attempt, &policy);
            log_debug!(
                attempt = attempt,
                max_attempts = policy.max_attempts,
                delay_ms = delay.as_millis(),
                category = %category,
                operation = %context.operation,
                "Operation failed, retrying after delay"
            );

            last_error = Some(error);
            if self.until_cancelled(sleep(delay)).await.is_none() {
                return Err(self.cancelled(context, attempt + 1, last_error.take()));
            }
            attempt += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Await `future` unless the cancellation token fires first.
    async fn until_cancelled<Fut: Future>(&self, future: Fut) -> Option<Fut::Output> {
        match &self.options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            },
            None => Some(future.await),
        }
    }

    fn cancelled<E>(
        &self,
        context: &ErrorContext,
        attempts: u32,
        last_error: Option<E>,
    ) -> RetryError<E> {
        log_info!(
            attempts = attempts,
            operation = %context.operation,
            module = %context.module,
            "Retry loop cancelled"
        );
        RetryError::Cancelled {
            attempts,
            last_error,
        }
    }
}

/// Run `operation` with the default policy table and the given overrides.
///
/// `with_retry(op, &ctx, RetryOptions::new().max_attempts(2).base_delay(100ms))`
/// on an operation that keeps failing with a network error invokes it three
/// times and waits at least 100ms between attempts.
pub async fn with_retry<F, Fut, T, E>(
    operation: F,
    context: &ErrorContext,
    options: RetryOptions,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Normalize,
{
    RetryExecutor::new(PolicyTable::default(), options)
        .execute(context, operation)
        .await
}
