//! Test helper utilities for bizops-resilience integration tests
//!
//! This module provides a capturing logger and shared fixtures for the
//! integration test files.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use bizops_resilience::{
    create_context, ApiError, ErrorContext, ErrorHandler, ErrorReport, LogLevel, Logger,
};
use std::sync::{Arc, Mutex};

/// One call to [`Logger::log`] as observed by [`CapturingLogger`]
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: LogLevel,
    pub message: String,
    pub status_code: Option<u16>,
    pub operation: Option<String>,
    pub module: Option<String>,
}

/// Logger that keeps every entry and report for later assertions
#[derive(Debug, Default)]
pub struct CapturingLogger {
    logs: Mutex<Vec<CapturedLog>>,
    reports: Mutex<Vec<ErrorReport>>,
}

impl CapturingLogger {
    pub fn logs(&self) -> Vec<CapturedLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl Logger for CapturingLogger {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&ApiError>,
        context: Option<&ErrorContext>,
    ) {
        self.logs.lock().unwrap().push(CapturedLog {
            level,
            message: message.to_string(),
            status_code: error.map(ApiError::status_code),
            operation: context.map(|c| c.operation.clone()),
            module: context.map(|c| c.module.clone()),
        });
    }

    fn report(&self, report: &ErrorReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

/// Handler wired to a fresh capturing logger
pub fn capturing_handler() -> (ErrorHandler, Arc<CapturingLogger>) {
    let logger = Arc::new(CapturingLogger::default());
    (ErrorHandler::new(logger.clone()), logger)
}

/// Context for an invoice approval in the finance module
pub fn invoice_context() -> ErrorContext {
    let mut data = serde_json::Map::new();
    data.insert("invoice_id".to_string(), serde_json::json!("INV-2041"));
    create_context("approve_invoice", "finance", Some(data)).with_user("user-9")
}

/// Backend body for a critical failure as the transport hands it over
pub fn critical_body(code: &str) -> String {
    serde_json::json!({
        "code": code,
        "message": "ledger write failed",
        "severity": "critical",
    })
    .to_string()
}
