//! Top-level error handling entry point
//!
//! [`ErrorHandler`] owns the injected [`Logger`] and the [`PolicyTable`] and
//! exposes the three operations page and hook layers call:
//! [`handle_error`](ErrorHandler::handle_error),
//! [`with_retry`](ErrorHandler::with_retry) and
//! [`boundary`](ErrorHandler::boundary).

use crate::backoff;
use crate::boundary::FaultBoundary;
use crate::classifier::classify;
use crate::config::ResilienceConfig;
use crate::core_types::{CustomMessages, ErrorContext, ErrorReport, HandlingResult, Severity};
use crate::error::{ResilienceResult, RetryError};
use crate::logger::{log_level_for, should_log, Logger, TracingLogger};
use crate::logging::log_debug;
use crate::messages::resolve_message;
use crate::normalize::Normalize;
use crate::policy::PolicyTable;
use crate::retry::{RetryExecutor, RetryOptions};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Shared entry point for failure handling.
///
/// Cheap to clone; clones share the same logger.
#[derive(Clone)]
pub struct ErrorHandler {
    logger: Arc<dyn Logger>,
    policies: PolicyTable,
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("logger", &"<logger>")
            .field("policies", &self.policies)
            .finish()
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogger))
    }
}

impl ErrorHandler {
    /// Create a handler with the default policy table.
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            policies: PolicyTable::default(),
        }
    }

    /// Create a handler from a configuration, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::Configuration`](crate::ResilienceError::Configuration)
    /// if any policy in the configuration is invalid.
    pub fn from_config(
        logger: Arc<dyn Logger>,
        config: ResilienceConfig,
    ) -> ResilienceResult<Self> {
        config.validate()?;
        Ok(Self {
            logger,
            policies: config.policies,
        })
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Resolve what to show and do for `error`, logging and reporting it as
    /// its severity and category require.
    pub fn handle_error<E: Normalize + ?Sized>(
        &self,
        error: &E,
        context: &ErrorContext,
        custom_messages: Option<&CustomMessages>,
    ) -> HandlingResult {
        let api_error = error.normalize();
        let category = classify(&api_error);
        let policy = self.policies.policy_for(category);

        let retry_delay_ms = policy.allows_retry(0).then(|| {
            u64::try_from(backoff::delay(0, &policy).as_millis()).unwrap_or(u64::MAX)
        });
        let user_message = resolve_message(&api_error, category, custom_messages);
        let log = should_log(&api_error, category);

        let result = HandlingResult {
            user_message,
            retry_delay_ms,
            should_log: log,
            severity: api_error.severity(),
            category,
        };

        log_debug!(
            status_code = api_error.status_code(),
            category = %category,
            severity = %api_error.severity(),
            should_retry = result.should_retry(),
            should_log = log,
            operation = %context.operation,
            "Handled error"
        );

        if log {
            let message = format!(
                "[{}] {} failed: {}",
                context.module,
                context.operation,
                api_error.message()
            );
            self.logger.log(
                log_level_for(api_error.severity()),
                &message,
                Some(&api_error),
                Some(context),
            );
        }

        if api_error.severity() == Severity::Critical {
            let report = ErrorReport::new(&api_error, &result, Some(context));
            self.logger.report(&report);
        }

        result
    }

    /// Run `operation` with retries driven by this handler's policy table.
    ///
    /// # Errors
    ///
    /// See [`RetryExecutor::execute`].
    pub async fn with_retry<F, Fut, T, E>(
        &self,
        operation: F,
        context: &ErrorContext,
        options: RetryOptions,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Normalize,
    {
        RetryExecutor::new(self.policies, options)
            .execute(context, operation)
            .await
    }

    /// Create a fault boundary for rendering work in `module`.
    pub fn boundary(&self, module: impl Into<String>) -> FaultBoundary {
        FaultBoundary::new(self.clone(), module)
    }
}
