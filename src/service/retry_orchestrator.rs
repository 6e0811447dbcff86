use crate::gateways::{GatewayAck, GatewayError};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
            max_backoff_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDirective {
    Done,
    RetryAfter(Duration),
    GiveUp,
}

pub fn attempt_limit(policy: &RetryPolicy) -> u32 {
    policy.max_attempts.max(1)
}

/// Delay before attempt `attempt + 1`, where `attempt` is 1-based.
pub fn backoff_for(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let ms = policy
        .base_backoff_ms
        .saturating_mul(1_u64 << exp)
        .min(policy.max_backoff_ms);
    Duration::from_millis(ms)
}

pub fn classify_attempt_result(
    result: &Result<GatewayAck, GatewayError>,
    attempt: u32,
    policy: &RetryPolicy,
) -> RetryDirective {
    match result {
        Ok(_) => RetryDirective::Done,
        Err(e) if e.is_retryable() && attempt < attempt_limit(policy) => {
            RetryDirective::RetryAfter(backoff_for(policy, attempt))
        }
        Err(_) => RetryDirective::GiveUp,
    }
}
