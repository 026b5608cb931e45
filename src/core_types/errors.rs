//! Normalized failure record and the closed taxonomies it is classified into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Escalation level of a failure, independent of its category.
///
/// Variants are declared in escalation order so `Ord` compares by severity:
/// `Info < Warning < Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected failure (e.g., not found).
    Info,
    /// Unexpected but recoverable.
    Warning,
    /// Action failed but system is stable.
    Error,
    /// System is unusable or data integrity is at risk.
    ///
    /// Always logged and reported regardless of category.
    Critical,
}

impl Severity {
    /// Default severity for a response status when the backend did not supply one.
    pub fn for_status(status_code: u16) -> Self {
        match status_code {
            404 => Self::Info,
            400..=499 => Self::Warning,
            _ => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Case-insensitive; also accepts `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Closed set of buckets a failure is classified into.
///
/// Every category owns a retry policy, a default user message and a
/// logging rule. Adding a variant here fails compilation until each of
/// those tables handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Caller is not signed in or the session is no longer valid (401).
    Authentication,
    /// Caller is signed in but lacks permission (403).
    Authorization,
    /// No response reached the client (status 0).
    Network,
    /// Backend rejected the submitted data (422).
    Validation,
    /// Requested record or page does not exist (404).
    NotFound,
    /// Change conflicts with current server state (409).
    Conflict,
    /// Backend failed to serve the request (500, 502, 503, 504).
    Server,
    /// Anything not covered by the table above.
    Unknown,
}

impl ErrorCategory {
    /// All categories, in declaration order.
    pub const ALL: [ErrorCategory; 8] = [
        Self::Authentication,
        Self::Authorization,
        Self::Network,
        Self::Validation,
        Self::NotFound,
        Self::Conflict,
        Self::Server,
        Self::Unknown,
    ];

    /// Map a status code to its category.
    ///
    /// The table is exact: only the listed codes are recognised, every other
    /// value (including neighbouring 4xx/5xx codes) is `Unknown`.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Validation,
            500 | 502 | 503 | 504 => Self::Server,
            0 => Self::Network,
            _ => Self::Unknown,
        }
    }

    /// Stable upper-case name, used in serialized output and env keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Network => "NETWORK",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Server => "SERVER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCategory {
    type Err = String;

    /// Case-insensitive; accepts `not_found`, `NOT_FOUND`, `not-found` and `notfound`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "authentication" => Ok(Self::Authentication),
            "authorization" => Ok(Self::Authorization),
            "network" => Ok(Self::Network),
            "validation" => Ok(Self::Validation),
            "notfound" => Ok(Self::NotFound),
            "conflict" => Ok(Self::Conflict),
            "server" => Ok(Self::Server),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown error category: {s}")),
        }
    }
}

/// Normalized failure record.
///
/// Produced by a [`Normalize`](crate::normalize::Normalize) implementation and
/// immutable once built: fields are read through accessors and the `with_*`
/// builders consume the value.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (status {status_code})")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    status_code: u16,
    error_code: Option<String>,
    message: String,
    severity: Severity,
}

impl ApiError {
    /// Create an error with the default severity for `status_code`.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error_code: None,
            message: message.into(),
            severity: Severity::for_status(status_code),
        }
    }

    /// Attach a domain-specific error code (e.g. `SESSION_EXPIRED`).
    pub fn with_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// Override the severity derived from the status code.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Category this error classifies into.
    pub fn category(&self) -> ErrorCategory {
        crate::classifier::classify(self)
    }
}
