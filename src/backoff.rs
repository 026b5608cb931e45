//! Jittered exponential backoff
//!
//! `delay = min(base * 2^attempt, max) + uniform(0..=1000ms)`
//!
//! The jitter is additive and applied after clamping, so a returned delay may
//! exceed `max_delay_ms` by up to [`MAX_JITTER_MS`]. Existing timing-sensitive
//! callers depend on exactly this shape.

use crate::policy::RetryPolicy;
use std::time::Duration;

/// Upper bound of the uniformly distributed jitter added to every delay.
pub const MAX_JITTER_MS: u64 = 1_000;

/// Exponential part of the delay for `attempt` (0-based), clamped to the policy ceiling.
pub fn clamped_base_ms(attempt: u32, policy: &RetryPolicy) -> u64 {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    policy
        .base_delay_ms
        .saturating_mul(factor)
        .min(policy.max_delay_ms)
}

/// Delay to wait before the retry that follows failed attempt `attempt`.
pub fn delay(attempt: u32, policy: &RetryPolicy) -> Duration {
    delay_with_rng(attempt, policy, &mut fastrand::Rng::new())
}

/// [`delay`] with an explicit random source, for reproducible schedules.
pub fn delay_with_rng(attempt: u32, policy: &RetryPolicy, rng: &mut fastrand::Rng) -> Duration {
    let jitter = rng.u64(0..=MAX_JITTER_MS);
    Duration::from_millis(clamped_base_ms(attempt, policy).saturating_add(jitter))
}
