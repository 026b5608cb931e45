//! Retry policy configuration
//!
//! A [`ResilienceConfig`] starts from the standard policy table and accepts
//! overrides from a JSON document, `RESILIENCE_*` environment variables or a
//! parsed `<category>.<field>` key/value section. Every loader validates the
//! resulting table before returning it.

use crate::core_types::ErrorCategory;
use crate::error::{ResilienceError, ResilienceResult};
use crate::logging::log_debug;
use crate::policy::{PolicyTable, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix of the environment variables read by [`ResilienceConfig::from_env`].
pub const ENV_PREFIX: &str = "RESILIENCE";

/// Configuration of the resilience core.
///
/// Every field has a default, so an empty document or environment yields the
/// standard policy table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Retry policy per error category
    pub policies: PolicyTable,
}

/// Fields of a [`RetryPolicy`] that can be overridden by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyField {
    Eligible,
    MaxAttempts,
    BaseDelayMs,
    MaxDelayMs,
}

impl PolicyField {
    const ALL: [PolicyField; 4] = [
        Self::Eligible,
        Self::MaxAttempts,
        Self::BaseDelayMs,
        Self::MaxDelayMs,
    ];

    fn section_key(&self) -> &'static str {
        match self {
            Self::Eligible => "retry",
            Self::MaxAttempts => "max_attempts",
            Self::BaseDelayMs => "base_delay_ms",
            Self::MaxDelayMs => "max_delay_ms",
        }
    }

    fn env_suffix(&self) -> &'static str {
        match self {
            Self::Eligible => "RETRY",
            Self::MaxAttempts => "MAX_ATTEMPTS",
            Self::BaseDelayMs => "BASE_DELAY_MS",
            Self::MaxDelayMs => "MAX_DELAY_MS",
        }
    }

    fn from_section_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.section_key() == key.trim().to_ascii_lowercase())
    }

    fn apply(&self, policy: &mut RetryPolicy, raw: &str, origin: &str) -> ResilienceResult<()> {
        let raw = raw.trim();
        match self {
            Self::Eligible => policy.eligible = parse_bool(raw, origin)?,
            Self::MaxAttempts => policy.max_attempts = parse_number(raw, origin)?,
            Self::BaseDelayMs => policy.base_delay_ms = parse_number(raw, origin)?,
            Self::MaxDelayMs => policy.max_delay_ms = parse_number(raw, origin)?,
        }
        Ok(())
    }
}

fn parse_bool(raw: &str, origin: &str) -> ResilienceResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ResilienceError::configuration_error(format!(
            "{origin}: expected a boolean, got '{raw}'"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, origin: &str) -> ResilienceResult<T> {
    raw.parse::<T>().map_err(|_| {
        ResilienceError::configuration_error(format!(
            "{origin}: expected a non-negative integer, got '{raw}'"
        ))
    })
}

impl ResilienceConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::Configuration`] if any policy is invalid.
    pub fn validate(&self) -> ResilienceResult<()> {
        self.policies.validate()
    }

    /// Parse a JSON document, e.g. `{"policies": {"network": {...}}}`.
    ///
    /// Categories missing from the document keep their default policy.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::ConfigurationParse`] for malformed JSON and
    /// [`ResilienceError::Configuration`] if the result fails validation.
    pub fn from_json(json: &str) -> ResilienceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log_debug!("Resilience configuration loaded from JSON");
        Ok(config)
    }

    /// Load overrides from `RESILIENCE_<CATEGORY>_<FIELD>` environment variables.
    ///
    /// `<CATEGORY>` is one of `AUTHENTICATION`, `AUTHORIZATION`, `NETWORK`,
    /// `VALIDATION`, `NOT_FOUND`, `CONFLICT`, `SERVER`, `UNKNOWN`; `<FIELD>` is
    /// one of `RETRY`, `MAX_ATTEMPTS`, `BASE_DELAY_MS`, `MAX_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::Configuration`] if a variable cannot be
    /// parsed or the resulting table fails validation.
    pub fn from_env() -> ResilienceResult<Self> {
        let mut config = Self::default();
        let mut overrides = 0usize;

        for category in ErrorCategory::ALL {
            for field in PolicyField::ALL {
                let name = format!("{ENV_PREFIX}_{}_{}", category.as_str(), field.env_suffix());
                if let Ok(value) = std::env::var(&name) {
                    field.apply(config.policies.policy_for_mut(category), &value, &name)?;
                    overrides += 1;
                }
            }
        }

        config.validate()?;
        log_debug!(
            overrides = overrides,
            "Resilience configuration loaded from environment"
        );
        Ok(config)
    }

    /// Build a configuration from a parsed key/value section.
    ///
    /// Keys take the form `<category>.<field>`, e.g. `network.max_attempts`
    /// or `server.retry`. Category names are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::Configuration`] for unknown keys,
    /// unparseable values, or a table that fails validation.
    pub fn from_section(section: &HashMap<String, String>) -> ResilienceResult<Self> {
        let mut config = Self::default();

        for (key, value) in section {
            let (category, field) = Self::parse_section_key(key)?;
            field.apply(config.policies.policy_for_mut(category), value, key)?;
        }

        config.validate()?;
        log_debug!(
            overrides = section.len(),
            "Resilience configuration loaded from section"
        );
        Ok(config)
    }

    fn parse_section_key(key: &str) -> ResilienceResult<(ErrorCategory, PolicyField)> {
        let (category, field) = key.split_once('.').ok_or_else(|| {
            ResilienceError::configuration_error(format!(
                "invalid key '{key}': expected <category>.<field>"
            ))
        })?;

        let category = category
            .parse::<ErrorCategory>()
            .map_err(ResilienceError::configuration_error)?;
        let field = PolicyField::from_section_key(field).ok_or_else(|| {
            ResilienceError::configuration_error(format!("invalid key '{key}': unknown field"))
        })?;

        Ok((category, field))
    }
}
