//! Per-category retry policies
//!
//! Only transient infrastructure failures are worth retrying:
//!
//! | Category | Retry | Attempts | Base | Max |
//! |----------|-------|----------|------|-----|
//! | `Network` | yes | 3 | 1s | 10s |
//! | `Server` | yes | 2 | 2s | 15s |
//! | `Unknown` | yes | 1 | 1s | 5s |
//! | `Authentication`, `Authorization`, `Validation`, `NotFound`, `Conflict` | no | 0 | - | - |
//!
//! Client-semantic failures will not change on retry and must surface
//! immediately.

use crate::core_types::ErrorCategory;
use crate::error::{ResilienceError, ResilienceResult};
use serde::{Deserialize, Serialize};

/// Retry rule set for one error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Whether the category may be retried at all
    pub eligible: bool,
    /// Maximum number of retries after the first attempt
    pub max_attempts: u32,
    /// Delay before the first retry, doubled for each further retry
    pub base_delay_ms: u64,
    /// Ceiling for the exponential part of the delay (jitter is added on top)
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub const fn network() -> Self {
        Self {
            eligible: true,
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }

    pub const fn server() -> Self {
        Self {
            eligible: true,
            max_attempts: 2,
            base_delay_ms: 2_000,
            max_delay_ms: 15_000,
        }
    }

    pub const fn unknown() -> Self {
        Self {
            eligible: true,
            max_attempts: 1,
            base_delay_ms: 1_000,
            max_delay_ms: 5_000,
        }
    }

    /// Policy for failures that are surfaced on first occurrence.
    pub const fn no_retry() -> Self {
        Self {
            eligible: false,
            max_attempts: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Attempt bound actually in force: zero whenever the policy is not eligible.
    pub fn effective_max_attempts(&self) -> u32 {
        if self.eligible {
            self.max_attempts
        } else {
            0
        }
    }

    /// Whether a retry may follow the failed attempt with index `attempt` (0-based).
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.effective_max_attempts()
    }

    /// Validate a configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::Configuration`] if an eligible policy has a
    /// zero base delay or its ceiling is below its base delay.
    pub fn validate(&self, category: ErrorCategory) -> ResilienceResult<()> {
        if !self.eligible {
            return Ok(());
        }
        if self.base_delay_ms == 0 {
            return Err(ResilienceError::configuration_error(format!(
                "{category} policy is retry-eligible but has a zero base delay"
            )));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(ResilienceError::configuration_error(format!(
                "{category} policy max_delay_ms ({}) is below base_delay_ms ({})",
                self.max_delay_ms, self.base_delay_ms
            )));
        }
        Ok(())
    }
}

/// Complete mapping from category to policy.
///
/// One field per category so that a configuration document can override any
/// subset while the rest keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PolicyTable {
    #[serde(default = "RetryPolicy::no_retry")]
    pub authentication: RetryPolicy,
    #[serde(default = "RetryPolicy::no_retry")]
    pub authorization: RetryPolicy,
    #[serde(default = "RetryPolicy::network")]
    pub network: RetryPolicy,
    #[serde(default = "RetryPolicy::no_retry")]
    pub validation: RetryPolicy,
    #[serde(default = "RetryPolicy::no_retry")]
    pub not_found: RetryPolicy,
    #[serde(default = "RetryPolicy::no_retry")]
    pub conflict: RetryPolicy,
    #[serde(default = "RetryPolicy::server")]
    pub server: RetryPolicy,
    #[serde(default = "RetryPolicy::unknown")]
    pub unknown: RetryPolicy,
}

impl PolicyTable {
    pub const fn standard() -> Self {
        Self {
            authentication: RetryPolicy::no_retry(),
            authorization: RetryPolicy::no_retry(),
            network: RetryPolicy::network(),
            validation: RetryPolicy::no_retry(),
            not_found: RetryPolicy::no_retry(),
            conflict: RetryPolicy::no_retry(),
            server: RetryPolicy::server(),
            unknown: RetryPolicy::unknown(),
        }
    }

    /// Policy for `category`. Total: every category has an entry.
    pub fn policy_for(&self, category: ErrorCategory) -> RetryPolicy {
        match category {
            ErrorCategory::Authentication => self.authentication,
            ErrorCategory::Authorization => self.authorization,
            ErrorCategory::Network => self.network,
            ErrorCategory::Validation => self.validation,
            ErrorCategory::NotFound => self.not_found,
            ErrorCategory::Conflict => self.conflict,
            ErrorCategory::Server => self.server,
            ErrorCategory::Unknown => self.unknown,
        }
    }

    pub fn policy_for_mut(&mut self, category: ErrorCategory) -> &mut RetryPolicy {
        match category {
            ErrorCategory::Authentication => &mut self.authentication,
            ErrorCategory::Authorization => &mut self.authorization,
            ErrorCategory::Network => &mut self.network,
            ErrorCategory::Validation => &mut self.validation,
            ErrorCategory::NotFound => &mut self.not_found,
            ErrorCategory::Conflict => &mut self.conflict,
            ErrorCategory::Server => &mut self.server,
            ErrorCategory::Unknown => &mut self.unknown,
        }
    }

    /// Validate every policy in the table.
    pub fn validate(&self) -> ResilienceResult<()> {
        ErrorCategory::ALL
            .iter()
            .try_for_each(|category| self.policy_for(*category).validate(*category))
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Default policy for `category`.
pub fn policy_for(category: ErrorCategory) -> RetryPolicy {
    PolicyTable::standard().policy_for(category)
}
