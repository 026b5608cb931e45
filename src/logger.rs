//! Logging router and the pluggable logger sink
//!
//! [`should_log`] and [`log_level_for`] decide *whether* and *how loudly* a
//! failure is logged; a [`Logger`] decides *where* it goes. The default sink,
//! [`TracingLogger`], emits `tracing` events. Production deployments can swap
//! in a remote telemetry sink by passing a different `Logger` to
//! [`ErrorHandler`](crate::handler::ErrorHandler).

use crate::core_types::{ApiError, ErrorCategory, ErrorContext, ErrorReport, Severity};
use crate::logging::{log_debug, log_error, log_info, log_warn, CRITICAL_TARGET, REPORT_TARGET};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output level of a log entry.
///
/// `Critical` is a separate channel from `Error` even though both originate
/// from the top of the severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Log level for a severity: 1:1, with `Critical` on its own level.
pub fn log_level_for(severity: Severity) -> LogLevel {
    match severity {
        Severity::Info => LogLevel::Info,
        Severity::Warning => LogLevel::Warn,
        Severity::Error => LogLevel::Error,
        Severity::Critical => LogLevel::Critical,
    }
}

/// Whether a failure should be logged.
///
/// Rules, first match wins:
/// 1. critical severity: always (a report is produced separately)
/// 2. server and network failures: always
/// 3. authentication failures: always, as a security audit trail
/// 4. validation failures: never; expected, frequent and not actionable
/// 5. anything else: only at `Error` severity
pub fn should_log(error: &ApiError, category: ErrorCategory) -> bool {
    if error.severity() == Severity::Critical {
        return true;
    }
    match category {
        ErrorCategory::Server | ErrorCategory::Network => true,
        ErrorCategory::Authentication => true,
        ErrorCategory::Validation => false,
        ErrorCategory::Authorization
        | ErrorCategory::NotFound
        | ErrorCategory::Conflict
        | ErrorCategory::Unknown => error.severity() == Severity::Error,
    }
}

/// Sink for logged failures and critical reports.
///
/// Calls are synchronous and fire-and-forget: implementations must not block
/// on delivery and have no way to report failure back to the caller.
pub trait Logger: Send + Sync {
    /// Record a log entry.
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&ApiError>,
        context: Option<&ErrorContext>,
    );

    /// Hand a critical failure to the reporting channel.
    fn report(&self, report: &ErrorReport);
}

/// Default [`Logger`] writing `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&ApiError>,
        context: Option<&ErrorContext>,
    ) {
        let status_code = error.map(ApiError::status_code);
        let error_code = error.and_then(ApiError::error_code);
        let operation = context.map(|c| c.operation.as_str());
        let module = context.map(|c| c.module.as_str());
        let user_id = context.and_then(|c| c.user_id.as_deref());

        match level {
            LogLevel::Debug => log_debug!(
                status_code = ?status_code,
                error_code = ?error_code,
                operation = ?operation,
                module = ?module,
                user_id = ?user_id,
                "{message}"
            ),
            LogLevel::Info => log_info!(
                status_code = ?status_code,
                error_code = ?error_code,
                operation = ?operation,
                module = ?module,
                user_id = ?user_id,
                "{message}"
            ),
            LogLevel::Warn => log_warn!(
                status_code = ?status_code,
                error_code = ?error_code,
                operation = ?operation,
                module = ?module,
                user_id = ?user_id,
                "{message}"
            ),
            LogLevel::Error => log_error!(
                status_code = ?status_code,
                error_code = ?error_code,
                operation = ?operation,
                module = ?module,
                user_id = ?user_id,
                "{message}"
            ),
            LogLevel::Critical => log_error!(
                target: CRITICAL_TARGET,
                critical = true,
                status_code = ?status_code,
                error_code = ?error_code,
                operation = ?operation,
                module = ?module,
                user_id = ?user_id,
                "{message}"
            ),
        }
    }

    fn report(&self, report: &ErrorReport) {
        match serde_json::to_string(report) {
            Ok(payload) => log_error!(
                target: REPORT_TARGET,
                report_id = %report.id,
                code = %report.error.code,
                category = %report.error.category,
                report = %payload,
                "Critical error reported"
            ),
            Err(e) => log_error!(
                target: REPORT_TARGET,
                report_id = %report.id,
                code = %report.error.code,
                error = %e,
                "Failed to serialize critical error report"
            ),
        }
    }
}
