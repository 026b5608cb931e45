//! Records produced after a failure has been handled.

use super::context::ErrorContext;
use super::errors::{ApiError, ErrorCategory, Severity};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;
use uuid::Uuid;

/// What a caller should show and do after a failure.
///
/// The retry decision is carried by `retry_delay_ms` alone: a delay is present
/// exactly when a retry is advised, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlingResult {
    /// Non-empty, human-readable message safe to display
    pub user_message: String,
    /// Suggested wait before retrying; `None` when the failure should surface
    pub retry_delay_ms: Option<u64>,
    /// Whether the failure was sent to the logger
    pub should_log: bool,
    pub severity: Severity,
    pub category: ErrorCategory,
}

impl HandlingResult {
    pub fn should_retry(&self) -> bool {
        self.retry_delay_ms.is_some()
    }

    pub fn retry_delay(&self) -> Option<Duration> {
        self.retry_delay_ms.map(Duration::from_millis)
    }
}

impl Serialize for HandlingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HandlingResult", 6)?;
        state.serialize_field("userMessage", &self.user_message)?;
        state.serialize_field("shouldRetry", &self.should_retry())?;
        state.serialize_field("retryDelayMs", &self.retry_delay_ms)?;
        state.serialize_field("shouldLog", &self.should_log)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("category", &self.category)?;
        state.end()
    }
}

/// Error details carried inside an [`ErrorReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedError {
    /// Domain error code, or `HTTP_<status>` when the backend supplied none
    pub code: String,
    pub message: String,
    pub user_friendly_message: String,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub retryable: bool,
    pub timestamp: DateTime<Utc>,
    /// Captured backtrace, when backtraces are enabled for the process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Payload handed to [`Logger::report`](crate::logger::Logger::report) for critical failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub id: Uuid,
    pub error: ReportedError,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl ErrorReport {
    /// Build a report for `error` as it was resolved into `result`.
    pub fn new(error: &ApiError, result: &HandlingResult, context: Option<&ErrorContext>) -> Self {
        let code = error
            .error_code()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP_{}", error.status_code()));

        Self {
            id: Uuid::new_v4(),
            error: ReportedError {
                code,
                message: error.message().to_string(),
                user_friendly_message: result.user_message.clone(),
                category: result.category,
                severity: error.severity(),
                retryable: result.should_retry(),
                timestamp: Utc::now(),
                stack: capture_stack(),
            },
            context: context.cloned(),
        }
    }
}

fn capture_stack() -> Option<String> {
    let backtrace = std::backtrace::Backtrace::capture();
    match backtrace.status() {
        std::backtrace::BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
