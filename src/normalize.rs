//! Conversion of raw failures into [`ApiError`] records.
//!
//! The normalizer is a collaborator seam: anything an operation can fail with
//! implements [`Normalize`], and the rest of the core only ever looks at the
//! resulting `ApiError`. Implementations guarantee that status code, message
//! and severity are always populated.
//!
//! Bundled implementations:
//! - [`ApiError`] (identity)
//! - [`RawFailure`], a transport-agnostic description of what went wrong
//! - [`anyhow::Error`], which is downcast to the two above before falling
//!   back to a generic fault

use crate::core_types::{ApiError, Severity};
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code recorded when no response reached the client.
pub const NO_TRANSPORT_STATUS: u16 = 0;

/// Status code recorded for local faults (panics, unexpected errors) that
/// did not come from a backend response.
pub const LOCAL_FAULT_STATUS: u16 = 500;

/// Anything that can be turned into an [`ApiError`].
pub trait Normalize {
    fn normalize(&self) -> ApiError;
}

impl Normalize for ApiError {
    fn normalize(&self) -> ApiError {
        self.clone()
    }
}

impl<T: Normalize + ?Sized> Normalize for &T {
    fn normalize(&self) -> ApiError {
        (**self).normalize()
    }
}

impl<T: Normalize + ?Sized> Normalize for Box<T> {
    fn normalize(&self) -> ApiError {
        (**self).normalize()
    }
}

/// A failure as observed by the transport or runtime, before normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// The request never produced a response (DNS, connection reset, CORS).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The request was abandoned after its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The client detected it has no connectivity.
    #[error("Client is offline")]
    Offline,

    /// The backend answered with a non-success status.
    ///
    /// `body` is the raw response body. When it is a JSON object, any usable
    /// `code`/`errorCode`, `message`/`error` and `severity` string values are
    /// picked up; everything else is ignored.
    #[error("Request failed with status {status}")]
    Response { status: u16, body: Option<String> },

    /// A local fault such as a panic during rendering.
    #[error("Unexpected fault: {0}")]
    Fault(String),
}

impl RawFailure {
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response {
            status,
            body: Some(body.into()),
        }
    }

    /// Build a fault from a panic payload as returned by `catch_unwind`.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        Self::Fault(message)
    }
}

/// Lenient view of a backend error body.
///
/// Each key is read independently, so an unusable value only loses that
/// field. Keys missing at the top level are looked up inside a nested
/// `"error"` object.
#[derive(Debug, Default)]
struct ErrorPayload {
    code: Option<String>,
    message: Option<String>,
    severity: Option<Severity>,
}

impl ErrorPayload {
    fn parse(body: Option<&str>) -> Self {
        let Some(Value::Object(fields)) = body.and_then(|b| serde_json::from_str::<Value>(b).ok())
        else {
            return Self::default();
        };
        let nested = fields.get("error").and_then(Value::as_object);

        let lookup = |keys: &[&str]| {
            first_text(&fields, keys).or_else(|| nested.and_then(|inner| first_text(inner, keys)))
        };

        Self {
            code: lookup(&["code", "errorCode"]),
            message: lookup(&["message", "error"]),
            severity: lookup(&["severity"]).and_then(|s| s.parse().ok()),
        }
    }
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    })
}

impl Normalize for RawFailure {
    fn normalize(&self) -> ApiError {
        match self {
            Self::Transport(detail) => {
                let message = if detail.trim().is_empty() {
                    self.to_string()
                } else {
                    detail.clone()
                };
                ApiError::new(NO_TRANSPORT_STATUS, message)
            }
            Self::Timeout => {
                ApiError::new(NO_TRANSPORT_STATUS, self.to_string()).with_code("REQUEST_TIMEOUT")
            }
            Self::Offline => {
                ApiError::new(NO_TRANSPORT_STATUS, self.to_string()).with_code("OFFLINE")
            }
            Self::Response { status, body } => {
                let payload = ErrorPayload::parse(body.as_deref());
                let message = payload.message.unwrap_or_else(|| self.to_string());

                let mut error = ApiError::new(*status, message);
                if let Some(code) = payload.code {
                    error = error.with_code(code);
                }
                if let Some(severity) = payload.severity {
                    error = error.with_severity(severity);
                }
                error
            }
            Self::Fault(_) => {
                ApiError::new(LOCAL_FAULT_STATUS, self.to_string()).with_severity(Severity::Error)
            }
        }
    }
}

impl Normalize for anyhow::Error {
    fn normalize(&self) -> ApiError {
        if let Some(api_error) = self.downcast_ref::<ApiError>() {
            return api_error.clone();
        }
        if let Some(raw) = self.downcast_ref::<RawFailure>() {
            return raw.normalize();
        }
        RawFailure::Fault(format!("{self:#}")).normalize()
    }
}
