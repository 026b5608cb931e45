//! Core types for the error handling and resilience core
//!
//! ## Organization
//! - `errors` - Normalized failure record, severity scale and category taxonomy
//! - `context` - Per-call provenance attached to a failure occurrence
//! - `outcome` - Records produced after handling a failure (result and report)

pub mod context;
pub mod errors;
pub mod outcome;

// Re-export commonly used types
pub use context::{create_context, ErrorContext};
pub use errors::{ApiError, ErrorCategory, Severity};
pub use outcome::{ErrorReport, HandlingResult, ReportedError};

/// Per-call override table mapping an error code to a user-facing message.
pub type CustomMessages = std::collections::HashMap<String, String>;
