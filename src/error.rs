//! Error types for the resilience core itself.
//!
//! Failures *handled* by this crate are described by
//! [`ApiError`](crate::core_types::ApiError). The types here describe failures
//! *of* the crate's own operations:
//!
//! - [`ResilienceError`] - invalid configuration or policy tables
//! - [`RetryError`] - the outcome of a retry loop that did not succeed
//!
//! # Example
//!
//! ```rust
//! use bizops_resilience::{ApiError, RetryError};
//!
//! fn surface(err: RetryError<ApiError>) -> String {
//!     match err {
//!         RetryError::Failed { attempts, error } => {
//!             format!("gave up after {attempts} attempt(s): {error}")
//!         }
//!         RetryError::Cancelled { .. } => "cancelled".to_string(),
//!     }
//! }
//! ```

use crate::logging::log_error;
use thiserror::Error;

/// Convenient result type for crate operations.
pub type ResilienceResult<T> = std::result::Result<T, ResilienceError>;

/// Errors raised by the resilience core's own operations.
///
/// Use the constructor methods, which log the error at creation.
#[derive(Error, Debug)]
pub enum ResilienceError {
    /// A configuration source or policy table is invalid.
    ///
    /// Common causes:
    /// - `max_delay_ms` smaller than `base_delay_ms`
    /// - a retry-eligible policy with a zero base delay
    /// - unparseable values in environment variables or config sections
    #[error("Resilience configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A JSON configuration document could not be parsed.
    #[error("Failed to parse resilience configuration: {source}")]
    ConfigurationParse {
        #[from]
        source: serde_json::Error,
    },
}

impl ResilienceError {
    /// Create a configuration error (logs at ERROR level).
    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Resilience configuration validation failed"
        );
        Self::Configuration { message }
    }
}

/// Outcome of a retry loop that did not produce a value.
///
/// The operation's own error type is preserved unchanged, so callers can
/// rethrow exactly what the last attempt failed with.
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The last attempt failed and no further attempt is allowed, either
    /// because the failure is not retryable or the attempt bound was reached.
    #[error("operation failed after {attempts} attempt(s): {error}")]
    Failed {
        /// Total number of times the operation was invoked.
        attempts: u32,
        /// Error returned by the final attempt.
        error: E,
    },

    /// The cancellation signal fired while waiting on the operation or
    /// between attempts.
    #[error("operation cancelled after {attempts} attempt(s)")]
    Cancelled {
        /// Number of attempts started before cancellation.
        attempts: u32,
        /// Error of the most recent completed attempt, if any.
        last_error: Option<E>,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before the loop stopped.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Failed { attempts, .. } | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The last observed operation error, if one was observed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Cancelled { last_error, .. } => last_error,
        }
    }
}
