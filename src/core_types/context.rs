//! Per-call provenance attached to a failure occurrence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied provenance for one failure occurrence.
///
/// Created at the call site and never persisted beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    /// Operation being performed, e.g. `"create_invoice"` or `"ui_render"`
    pub operation: String,
    /// Domain module the operation belongs to, e.g. `"finance"`
    pub module: String,
    /// Signed-in user, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the context was created
    pub timestamp: DateTime<Utc>,
    /// Free-form data the caller wants attached to logs and reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Map<String, Value>>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            module: module.into(),
            user_id: None,
            timestamp: Utc::now(),
            additional_data: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Add a single key to `additional_data`, creating the map if needed.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Convenience constructor exposed to domain hooks and pages.
pub fn create_context(
    operation: impl Into<String>,
    module: impl Into<String>,
    additional_data: Option<Map<String, Value>>,
) -> ErrorContext {
    ErrorContext {
        additional_data,
        ..ErrorContext::new(operation, module)
    }
}
