//! # bizops-resilience
//!
//! Error handling and resilience core for business-administration backends
//! (CRM, HR, finance, assets, procurement).
//!
//! ## Key Features
//!
//! - **Classification**: Deterministic mapping of failures into eight closed categories
//! - **Retry Policies**: Per-category retry eligibility, attempt bounds and delay bounds
//! - **Backoff**: Exponential delays with additive jitter against synchronized retries
//! - **User Messages**: Override, specific-code and category-default precedence
//! - **Logging & Reporting**: Severity- and category-driven decisions through a pluggable logger
//! - **Fault Boundaries**: Panics during rendering work funnel into the same entry point
//!
//! ## Example
//!
//! ```rust,no_run
//! use bizops_resilience::{ApiError, ErrorContext, ErrorHandler, RetryOptions};
//!
//! # async fn fetch_invoices() -> Result<Vec<String>, ApiError> { Ok(vec![]) }
//! # async fn example() {
//! let handler = ErrorHandler::default();
//! let context = ErrorContext::new("list_invoices", "finance");
//!
//! match handler
//!     .with_retry(fetch_invoices, &context, RetryOptions::new())
//!     .await
//! {
//!     Ok(invoices) => println!("{} invoices", invoices.len()),
//!     Err(err) => {
//!         if let Some(error) = err.into_inner() {
//!             let result = handler.handle_error(&error, &context, None);
//!             println!("{}", result.user_message);
//!         }
//!     }
//! }
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod backoff;
pub mod boundary;
pub mod classifier;
pub mod config;
pub mod core_types;
pub mod error;
pub mod handler;
pub mod logger;
pub mod messages;
pub mod normalize;
pub mod policy;
pub mod retry;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use boundary::FaultBoundary;
pub use classifier::classify;
pub use config::ResilienceConfig;
pub use error::{ResilienceError, ResilienceResult, RetryError};
pub use handler::ErrorHandler;
pub use logger::{log_level_for, should_log, LogLevel, Logger, TracingLogger};
pub use messages::{resolve_message, MessageVariant};
pub use normalize::{Normalize, RawFailure};
pub use policy::{policy_for, PolicyTable, RetryPolicy};
pub use retry::{with_retry, RetryExecutor, RetryOptions};

// Re-export core types
pub use core_types::{
    create_context, ApiError, CustomMessages, ErrorCategory, ErrorContext, ErrorReport,
    HandlingResult, ReportedError, Severity,
};
