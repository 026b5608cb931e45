// Unit Tests for Failure Normalization
//
// UNIT UNDER TEST: Normalize implementations for ApiError, RawFailure, anyhow::Error
//
// BUSINESS RESPONSIBILITY:
//   - Always populates status code, message and severity
//   - Uses the no-transport sentinel (status 0) when no response was received
//   - Picks up code, message and severity from JSON error bodies when present
//
// TEST COVERAGE:
//   - Transport, timeout and offline failures
//   - Response bodies: well-formed, partial, malformed and absent
//   - Per-field leniency: unknown severities, nested error objects, non-string values
//   - Panic payloads and anyhow downcasting

use crate::core_types::{ApiError, ErrorCategory, Severity};
use crate::normalize::{Normalize, RawFailure, LOCAL_FAULT_STATUS, NO_TRANSPORT_STATUS};

#[cfg(test)]
mod transport_tests {
    use super::*;

    #[test]
    fn test_transport_failures_use_no_transport_sentinel() {
        let error = RawFailure::Transport("connection reset".to_string()).normalize();

        assert_eq!(error.status_code(), NO_TRANSPORT_STATUS);
        assert_eq!(error.category(), ErrorCategory::Network);
        assert_eq!(error.message(), "connection reset");
        assert_eq!(error.error_code(), None);
    }

    #[test]
    fn test_timeout_and_offline_carry_their_codes() {
        let timeout = RawFailure::Timeout.normalize();
        let offline = RawFailure::Offline.normalize();

        assert_eq!(timeout.error_code(), Some("REQUEST_TIMEOUT"));
        assert_eq!(offline.error_code(), Some("OFFLINE"));
        assert_eq!(timeout.category(), ErrorCategory::Network);
        assert_eq!(offline.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_blank_transport_detail_gets_a_message() {
        let error = RawFailure::Transport(String::new()).normalize();
        assert!(!error.message().is_empty());
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn test_json_body_supplies_code_message_and_severity() {
        // Arrange
        let raw = RawFailure::response(
            503,
            r#"{"code":"MAINTENANCE_MODE","message":"Back at 02:00 UTC","severity":"critical"}"#,
        );

        // Act
        let error = raw.normalize();

        // Assert
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.error_code(), Some("MAINTENANCE_MODE"));
        assert_eq!(error.message(), "Back at 02:00 UTC");
        assert_eq!(error.severity(), Severity::Critical);
    }

    #[test]
    fn test_alias_keys_are_accepted() {
        let raw = RawFailure::response(422, r#"{"errorCode":"REQUIRED_FIELD","error":"name is required"}"#);

        let error = raw.normalize();

        assert_eq!(error.error_code(), Some("REQUIRED_FIELD"));
        assert_eq!(error.message(), "name is required");
        assert_eq!(error.severity(), Severity::Warning, "Default severity for 4xx");
    }

    #[test]
    fn test_malformed_or_missing_body_falls_back_to_status() {
        for raw in [
            RawFailure::response(500, "<html>Bad gateway</html>"),
            RawFailure::Response {
                status: 500,
                body: None,
            },
        ] {
            let error = raw.normalize();
            assert_eq!(error.status_code(), 500);
            assert_eq!(error.error_code(), None);
            assert_eq!(error.message(), "Request failed with status 500");
            assert_eq!(error.severity(), Severity::Error);
        }
    }

    #[test]
    fn test_unrecognised_severity_keeps_code_and_message() {
        // Arrange
        let raw = RawFailure::response(
            409,
            r#"{"code":"DUPLICATE_ENTRY","message":"supplier exists","severity":"high"}"#,
        );

        // Act
        let error = raw.normalize();

        // Assert
        assert_eq!(error.error_code(), Some("DUPLICATE_ENTRY"));
        assert_eq!(error.message(), "supplier exists");
        assert_eq!(error.severity(), Severity::Warning, "Falls back to the status default");
        assert_eq!(
            crate::messages::resolve_message(&error, error.category(), None),
            crate::messages::MessageVariant::Duplicate.text()
        );
    }

    #[test]
    fn test_severity_is_case_insensitive() {
        let raw = RawFailure::response(500, r#"{"code":"LEDGER_WRITE","severity":"CRITICAL"}"#);

        let error = raw.normalize();

        assert_eq!(error.error_code(), Some("LEDGER_WRITE"));
        assert_eq!(error.severity(), Severity::Critical);
    }

    #[test]
    fn test_object_valued_error_is_read_as_nested_payload() {
        let raw = RawFailure::response(
            422,
            r#"{"error":{"code":"INVALID_FORMAT","message":"iban checksum"},"requestId":7}"#,
        );

        let error = raw.normalize();

        assert_eq!(error.error_code(), Some("INVALID_FORMAT"));
        assert_eq!(error.message(), "iban checksum");
    }

    #[test]
    fn test_non_string_fields_are_skipped_individually() {
        let raw = RawFailure::response(
            409,
            r#"{"code":"RESOURCE_LOCKED","message":42,"severity":null}"#,
        );

        let error = raw.normalize();

        assert_eq!(error.error_code(), Some("RESOURCE_LOCKED"));
        assert_eq!(error.message(), "Request failed with status 409");
        assert_eq!(error.severity(), Severity::Warning);
    }

    #[test]
    fn test_default_severity_by_status() {
        assert_eq!(Severity::for_status(404), Severity::Info);
        assert_eq!(Severity::for_status(409), Severity::Warning);
        assert_eq!(Severity::for_status(401), Severity::Warning);
        assert_eq!(Severity::for_status(500), Severity::Error);
        assert_eq!(Severity::for_status(0), Severity::Error);
    }
}

#[cfg(test)]
mod fault_tests {
    use super::*;

    #[test]
    fn test_panic_payloads_become_faults() {
        let str_payload: Box<dyn std::any::Any + Send> = Box::new("widget exploded");
        let string_payload: Box<dyn std::any::Any + Send> = Box::new("grid exploded".to_string());
        let other_payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);

        assert_eq!(
            RawFailure::from_panic(str_payload.as_ref()),
            RawFailure::Fault("widget exploded".to_string())
        );
        assert_eq!(
            RawFailure::from_panic(string_payload.as_ref()),
            RawFailure::Fault("grid exploded".to_string())
        );
        assert_eq!(
            RawFailure::from_panic(other_payload.as_ref()),
            RawFailure::Fault("Unknown panic".to_string())
        );
    }

    #[test]
    fn test_faults_normalize_to_local_fault_status() {
        let error = RawFailure::Fault("boom".to_string()).normalize();

        assert_eq!(error.status_code(), LOCAL_FAULT_STATUS);
        assert_eq!(error.severity(), Severity::Error);
        assert!(error.message().contains("boom"));
    }

    #[test]
    fn test_anyhow_errors_are_downcast_before_falling_back() {
        let wrapped_api: anyhow::Error = ApiError::new(409, "taken").with_code("DUPLICATE_ENTRY").into();
        let wrapped_raw: anyhow::Error = RawFailure::Offline.into();
        let plain = anyhow::anyhow!("disk full").context("writing export");

        assert_eq!(wrapped_api.normalize().error_code(), Some("DUPLICATE_ENTRY"));
        assert_eq!(wrapped_raw.normalize().error_code(), Some("OFFLINE"));

        let fallback = plain.normalize();
        assert_eq!(fallback.status_code(), LOCAL_FAULT_STATUS);
        assert!(fallback.message().contains("writing export"));
        assert!(fallback.message().contains("disk full"));
    }

    #[test]
    fn test_api_error_normalizes_to_itself() {
        let error = ApiError::new(403, "nope").with_code("ROLE_REQUIRED");
        assert_eq!(error.normalize(), error);
        assert_eq!((&error).normalize(), error);
    }
}
