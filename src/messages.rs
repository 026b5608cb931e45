//! User-facing message resolution
//!
//! Precedence, first match wins:
//! 1. caller-supplied override for the error's code
//! 2. a specific variant nested under the error's category
//! 3. the category default
//!
//! Every category has a default, so resolution is total and never empty.
//! Messages never include the raw backend message or any technical detail.

use crate::core_types::{ApiError, CustomMessages, ErrorCategory};

/// Specific message variants, each nested under exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageVariant {
    // Authentication
    Expired,
    InvalidCredentials,
    // Authorization
    Insufficient,
    RoleRequired,
    // Network
    Timeout,
    Offline,
    // Validation
    Required,
    Format,
    Length,
    // NotFound
    Resource,
    Page,
    // Conflict
    Duplicate,
    Locked,
    // Server
    Maintenance,
    Overloaded,
}

impl MessageVariant {
    /// Look up the variant for `code` within `category`.
    ///
    /// A code only matches inside its own category: `OFFLINE` on a server
    /// error does not resolve to the network "offline" variant.
    pub fn lookup(category: ErrorCategory, code: &str) -> Option<Self> {
        match (category, code) {
            (ErrorCategory::Authentication, "SESSION_EXPIRED" | "TOKEN_EXPIRED") => {
                Some(Self::Expired)
            }
            (ErrorCategory::Authentication, "INVALID_CREDENTIALS") => {
                Some(Self::InvalidCredentials)
            }
            (ErrorCategory::Authorization, "INSUFFICIENT_PERMISSIONS") => Some(Self::Insufficient),
            (ErrorCategory::Authorization, "ROLE_REQUIRED") => Some(Self::RoleRequired),
            (ErrorCategory::Network, "REQUEST_TIMEOUT") => Some(Self::Timeout),
            (ErrorCategory::Network, "OFFLINE") => Some(Self::Offline),
            (ErrorCategory::Validation, "REQUIRED_FIELD") => Some(Self::Required),
            (ErrorCategory::Validation, "INVALID_FORMAT") => Some(Self::Format),
            (ErrorCategory::Validation, "INVALID_LENGTH") => Some(Self::Length),
            (ErrorCategory::NotFound, "RESOURCE_NOT_FOUND") => Some(Self::Resource),
            (ErrorCategory::NotFound, "PAGE_NOT_FOUND") => Some(Self::Page),
            (ErrorCategory::Conflict, "DUPLICATE_ENTRY") => Some(Self::Duplicate),
            (ErrorCategory::Conflict, "RESOURCE_LOCKED") => Some(Self::Locked),
            (ErrorCategory::Server, "MAINTENANCE_MODE") => Some(Self::Maintenance),
            (ErrorCategory::Server, "SERVER_OVERLOADED") => Some(Self::Overloaded),
            _ => None,
        }
    }

    /// Category this variant belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Expired | Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::Insufficient | Self::RoleRequired => ErrorCategory::Authorization,
            Self::Timeout | Self::Offline => ErrorCategory::Network,
            Self::Required | Self::Format | Self::Length => ErrorCategory::Validation,
            Self::Resource | Self::Page => ErrorCategory::NotFound,
            Self::Duplicate | Self::Locked => ErrorCategory::Conflict,
            Self::Maintenance | Self::Overloaded => ErrorCategory::Server,
        }
    }

    /// Variant key within its category's message table.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::InvalidCredentials => "invalid",
            Self::Insufficient => "insufficient",
            Self::RoleRequired => "role_required",
            Self::Timeout => "timeout",
            Self::Offline => "offline",
            Self::Required => "required",
            Self::Format => "format",
            Self::Length => "length",
            Self::Resource => "resource",
            Self::Page => "page",
            Self::Duplicate => "duplicate",
            Self::Locked => "locked",
            Self::Maintenance => "maintenance",
            Self::Overloaded => "overloaded",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Expired => "Your session has expired. Please sign in again.",
            Self::InvalidCredentials => "The username or password you entered is incorrect.",
            Self::Insufficient => "You do not have sufficient permissions for this operation.",
            Self::RoleRequired => "This action requires a role that has not been assigned to you.",
            Self::Timeout => "The request took too long to complete. Please try again.",
            Self::Offline => "You appear to be offline. Reconnect and try again.",
            Self::Required => "Please fill in all required fields.",
            Self::Format => "One or more fields have an invalid format.",
            Self::Length => "One or more fields are too long or too short.",
            Self::Resource => "The requested record no longer exists.",
            Self::Page => "The page you are looking for does not exist.",
            Self::Duplicate => "A record with these details already exists.",
            Self::Locked => "This record is locked by another user. Please try again later.",
            Self::Maintenance => "The system is undergoing maintenance. Please try again shortly.",
            Self::Overloaded => "The server is busy right now. Please try again in a moment.",
        }
    }
}

/// Default message for `category`.
pub fn default_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Authentication => "Please sign in to continue.",
        ErrorCategory::Authorization => "You do not have permission to perform this action.",
        ErrorCategory::Network => {
            "Unable to reach the server. Please check your connection and try again."
        }
        ErrorCategory::Validation => {
            "Some of the information provided is invalid. Please review it and try again."
        }
        ErrorCategory::NotFound => "The requested item could not be found.",
        ErrorCategory::Conflict => "This change conflicts with the current state of the record.",
        ErrorCategory::Server => "Something went wrong on our end. Please try again later.",
        ErrorCategory::Unknown => "An unexpected error occurred. Please try again.",
    }
}

/// Resolve the message to show for `error`.
pub fn resolve_message(
    error: &ApiError,
    category: ErrorCategory,
    custom_messages: Option<&CustomMessages>,
) -> String {
    let Some(code) = error.error_code() else {
        return default_message(category).to_string();
    };

    if let Some(custom) = custom_messages
        .and_then(|messages| messages.get(code))
        .filter(|message| !message.trim().is_empty())
    {
        return custom.clone();
    }

    MessageVariant::lookup(category, code)
        .map(|variant| variant.text())
        .unwrap_or_else(|| default_message(category))
        .to_string()
}
