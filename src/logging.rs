//! Logging utilities for bizops-resilience
//!
//! Re-exports tracing macros with log_* naming convention for consistency.
//! The targets below separate critical failures and reports from ordinary
//! error output so subscribers can route them to their own sinks.

pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};

/// Target used for `LogLevel::Critical` events.
pub const CRITICAL_TARGET: &str = "bizops_resilience::critical";

/// Target used for serialized error reports.
pub const REPORT_TARGET: &str = "bizops_resilience::report";
