//! Test helper utilities for bizops-resilience tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::core_types::{ApiError, ErrorContext, ErrorReport, Severity};
use crate::handler::ErrorHandler;
use crate::logger::{LogLevel, Logger};
use std::sync::{Arc, Mutex};

/// A single captured `Logger::log` call
#[derive(Debug, Clone)]
pub struct LoggedEntry {
    pub level: LogLevel,
    pub message: String,
    pub error: Option<ApiError>,
    pub context: Option<ErrorContext>,
}

/// Logger stub that records every call for later assertions
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LoggedEntry>>,
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<LoggedEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&ApiError>,
        context: Option<&ErrorContext>,
    ) {
        self.entries.lock().unwrap().push(LoggedEntry {
            level,
            message: message.to_string(),
            error: error.cloned(),
            context: context.cloned(),
        });
    }

    fn report(&self, report: &ErrorReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

/// Create a handler wired to a fresh recording logger
pub fn recording_handler() -> (ErrorHandler, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let handler = ErrorHandler::new(logger.clone());
    (handler, logger)
}

/// Context used by most tests
pub fn test_context() -> ErrorContext {
    ErrorContext::new("save_employee", "hr").with_user("user-42")
}

pub fn network_error() -> ApiError {
    ApiError::new(0, "connection refused")
}

pub fn validation_error(code: &str) -> ApiError {
    ApiError::new(422, "validation failed").with_code(code)
}

pub fn server_error() -> ApiError {
    ApiError::new(503, "service unavailable")
}

pub fn critical(error: ApiError) -> ApiError {
    error.with_severity(Severity::Critical)
}
