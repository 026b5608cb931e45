//! Deterministic classification of normalized failures.

use crate::core_types::{ApiError, ErrorCategory};
use crate::logging::log_trace;

/// Map an [`ApiError`] to exactly one [`ErrorCategory`].
///
/// Total and pure. Classification is driven by the status code only;
/// `error_code` refines the user message later but never moves an error to
/// another category. See [`ErrorCategory::from_status`] for the table.
pub fn classify(error: &ApiError) -> ErrorCategory {
    let category = ErrorCategory::from_status(error.status_code());
    log_trace!(
        status_code = error.status_code(),
        error_code = ?error.error_code(),
        category = %category,
        "Classified error"
    );
    category
}
