//! # Resilient Invoker
//!
//! Executes one backend operation with bounded retry, exponential backoff,
//! and fallback substitution. Every feature-level call site funnels its
//! backend calls through [`with_retry`], which is the only place retry
//! policy lives.
//!
//! The retry loop is driven by an explicit state machine ([`RetryState`])
//! so the "exactly N attempts, `2^k` delay schedule" contract is
//! unit-testable without timing real sleeps.
//!
//! A substituted fallback resolves indistinguishably from a genuine
//! result. That keeps call sites simple; callers that need to tell the
//! difference consult the health monitor separately.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use super::config::ModuleClientConfig;
use crate::constants::{system, Module};
use crate::error::DispatchError;

/// Backoff wait after `completed_attempts` failures: `2^k` backoff units.
/// No jitter, no cap; growth saturates at the numeric limit.
pub fn backoff_delay(completed_attempts: u32) -> Duration {
    let multiplier = 2u64.saturating_pow(completed_attempts);
    Duration::from_millis(system::BACKOFF_UNIT_MS.saturating_mul(multiplier))
}

/// Progress of one [`with_retry`] invocation, driven by attempt outcomes
/// and elapsed backoff waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt number `attempt` (1-based) is in flight.
    Attempting { attempt: u32 },
    /// The previous attempt failed; wait `delay` before `next_attempt`.
    Backoff { next_attempt: u32, delay: Duration },
    /// Every allowed attempt has failed.
    Exhausted,
}

impl RetryState {
    pub fn first() -> Self {
        RetryState::Attempting { attempt: 1 }
    }

    /// Transition after attempt `attempt` of `retries` has failed.
    pub fn after_failure(attempt: u32, retries: u32) -> Self {
        if attempt >= retries {
            RetryState::Exhausted
        } else {
            RetryState::Backoff {
                next_attempt: attempt + 1,
                delay: backoff_delay(attempt),
            }
        }
    }
}

/// Execute `operation` with bounded retry and exponential backoff.
///
/// Attempts `operation()` up to `config.retries` times, each attempt
/// bounded by `config.timeout_ms`. After the final failure the call
/// resolves to `config.fallback_data` when present, otherwise it fails
/// with the last attempt's error unmodified.
///
/// The wrapped operation may run up to `retries` times for one logical
/// action; callers must ensure it is safe to repeat.
pub async fn with_retry<R, F, Fut>(
    module: Module,
    config: ModuleClientConfig<R>,
    operation: F,
) -> Result<R, DispatchError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<R, DispatchError>>,
{
    let retries = config.retries.max(1);
    let mut state = RetryState::first();
    let mut last_error: Option<DispatchError> = None;

    loop {
        match state {
            RetryState::Attempting { attempt } => {
                debug!(
                    module = %module,
                    attempt,
                    retries,
                    "Dispatching module operation"
                );
                let failure = match timeout(config.timeout(), operation()).await {
                    Ok(Ok(value)) => {
                        debug!(module = %module, attempt, "Module operation succeeded");
                        return Ok(value);
                    }
                    Ok(Err(error)) => error,
                    Err(_) => DispatchError::Timeout {
                        module,
                        timeout_ms: config.timeout_ms,
                    },
                };
                warn!(
                    module = %module,
                    attempt,
                    retries,
                    error = %failure,
                    "Module operation attempt failed"
                );
                last_error = Some(failure);
                state = RetryState::after_failure(attempt, retries);
            }
            RetryState::Backoff {
                next_attempt,
                delay,
            } => {
                debug!(
                    module = %module,
                    next_attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Backing off before retry"
                );
                sleep(delay).await;
                state = RetryState::Attempting {
                    attempt: next_attempt,
                };
            }
            RetryState::Exhausted => break,
        }
    }

    match config.fallback_data {
        Some(fallback) => {
            warn!(
                module = %module,
                retries,
                "🛟 Retries exhausted - substituting fallback data"
            );
            Ok(fallback)
        }
        None => match last_error {
            Some(error) => Err(error),
            // retries >= 1 guarantees at least one attempt ran
            None => Err(DispatchError::Configuration(format!(
                "with_retry for {module} completed no attempts"
            ))),
        },
    }
}
