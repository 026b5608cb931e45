// Unit Tests for the Top-Level Error Handler
//
// UNIT UNDER TEST: ErrorHandler::handle_error
//
// BUSINESS RESPONSIBILITY:
//   - Turns any failure into a single HandlingResult for the page layer
//   - Advises a retry (with a delay) only for retry-eligible categories
//   - Logs through the injected logger according to the routing rules
//   - Reports critical failures in addition to logging them
//
// TEST COVERAGE:
//   - Network and validation scenarios end to end
//   - retry_delay_ms present iff should_retry
//   - Logger interaction (level, message, context) and critical reports
//   - Custom message overrides flowing through

use crate::core_types::{ApiError, CustomMessages, ErrorCategory, Severity};
use crate::handler::ErrorHandler;
use crate::logger::LogLevel;
use crate::messages::{default_message, MessageVariant};
use crate::normalize::RawFailure;
use crate::tests::helpers::{
    critical, network_error, recording_handler, server_error, test_context, validation_error,
};

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_status_zero_is_a_retryable_network_error() {
        // Arrange
        let (handler, logger) = recording_handler();

        // Act
        let result = handler.handle_error(&network_error(), &test_context(), None);

        // Assert
        assert_eq!(result.category, ErrorCategory::Network);
        assert!(result.should_retry());
        let delay = result.retry_delay_ms.expect("retryable errors carry a delay");
        assert!((1_000..=11_000).contains(&delay), "delay {delay}ms out of range");
        assert!(result.should_log);
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn test_required_field_validation_scenario() {
        // Arrange
        let (handler, logger) = recording_handler();

        // Act
        let result = handler.handle_error(&validation_error("REQUIRED_FIELD"), &test_context(), None);

        // Assert
        assert_eq!(result.category, ErrorCategory::Validation);
        assert_eq!(result.user_message, MessageVariant::Required.text());
        assert!(!result.should_log);
        assert!(!result.should_retry());
        assert_eq!(result.retry_delay_ms, None);
        assert!(logger.entries().is_empty(), "Validation errors are not logged");
        assert!(logger.reports().is_empty());
    }

    #[test]
    fn test_retry_delay_present_iff_should_retry_for_every_category() {
        let (handler, _logger) = recording_handler();

        for status in [0, 401, 403, 404, 409, 422, 500, 418] {
            let result = handler.handle_error(&ApiError::new(status, "x"), &test_context(), None);
            assert_eq!(result.should_retry(), result.retry_delay_ms.is_some());
            assert_eq!(
                result.should_retry(),
                matches!(
                    result.category,
                    ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Unknown
                ),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_raw_failures_are_normalized_first() {
        let (handler, _logger) = recording_handler();

        let result = handler.handle_error(&RawFailure::Offline, &test_context(), None);

        assert_eq!(result.category, ErrorCategory::Network);
        assert_eq!(result.user_message, MessageVariant::Offline.text());
    }

    #[test]
    fn test_custom_messages_override_resolution() {
        let (handler, _logger) = recording_handler();
        let mut custom = CustomMessages::new();
        custom.insert("DUPLICATE_ENTRY".to_string(), "An employee with this email already exists.".to_string());
        let error = ApiError::new(409, "unique violation").with_code("DUPLICATE_ENTRY");

        let result = handler.handle_error(&error, &test_context(), Some(&custom));

        assert_eq!(result.user_message, "An employee with this email already exists.");
    }
}

#[cfg(test)]
mod logging_tests {
    use super::*;

    #[test]
    fn test_logged_entry_carries_level_error_and_context() {
        // Arrange
        let (handler, logger) = recording_handler();
        let context = test_context();

        // Act
        handler.handle_error(&server_error(), &context, None);

        // Assert
        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.message.contains("save_employee"));
        assert!(entry.message.contains("hr"));
        assert_eq!(entry.error.as_ref().map(ApiError::status_code), Some(503));
        assert_eq!(entry.context.as_ref(), Some(&context));
        assert!(logger.reports().is_empty(), "Only critical errors are reported");
    }

    #[test]
    fn test_authentication_is_logged_at_warn() {
        let (handler, logger) = recording_handler();

        let result = handler.handle_error(&ApiError::new(401, "expired").with_code("TOKEN_EXPIRED"), &test_context(), None);

        assert_eq!(result.user_message, MessageVariant::Expired.text());
        assert_eq!(logger.entries()[0].level, LogLevel::Warn);
    }

    #[test]
    fn test_not_found_at_info_is_not_logged() {
        let (handler, logger) = recording_handler();

        let result = handler.handle_error(&ApiError::new(404, "missing"), &test_context(), None);

        assert!(!result.should_log);
        assert_eq!(result.user_message, default_message(ErrorCategory::NotFound));
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_critical_is_logged_and_reported_even_for_validation() {
        // Arrange
        let (handler, logger) = recording_handler();
        let error = critical(validation_error("INVALID_FORMAT"));

        // Act
        let result = handler.handle_error(&error, &test_context(), None);

        // Assert
        assert!(result.should_log);
        assert_eq!(result.severity, Severity::Critical);
        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Critical);

        let reports = logger.reports();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.error.code, "INVALID_FORMAT");
        assert_eq!(report.error.category, ErrorCategory::Validation);
        assert_eq!(report.error.user_friendly_message, MessageVariant::Format.text());
        assert!(!report.error.retryable);
        assert_eq!(report.context.as_ref().map(|c| c.operation.as_str()), Some("save_employee"));
    }

    #[test]
    fn test_report_code_falls_back_to_status() {
        let (handler, logger) = recording_handler();

        handler.handle_error(&critical(server_error()), &test_context(), None);

        let report = &logger.reports()[0];
        assert_eq!(report.error.code, "HTTP_503");
        assert!(report.error.retryable);
    }

    #[test]
    fn test_handling_result_serializes_should_retry() {
        let (handler, _logger) = recording_handler();

        let result = handler.handle_error(&validation_error("INVALID_LENGTH"), &test_context(), None);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["shouldRetry"], false);
        assert!(json["retryDelayMs"].is_null());
        assert_eq!(json["category"], "VALIDATION");
        assert_eq!(json["userMessage"], MessageVariant::Length.text());
    }

    #[test]
    fn test_default_handler_uses_standard_policies() {
        let handler = ErrorHandler::default();
        assert_eq!(*handler.policies(), crate::policy::PolicyTable::standard());
        assert!(format!("{handler:?}").contains("<logger>"));
    }
}
