use std::time::Duration;

use crate::constants::system;
use crate::error::{DispatchError, Result};

/// Process-wide dispatch configuration.
///
/// Per-call settings live in
/// [`ModuleClientConfig`](crate::resilience::ModuleClientConfig); this
/// struct only carries the environment-level defaults read once at startup.
#[derive(Debug, Clone)]
pub struct SanctumConfig {
    pub health_poll_interval_ms: u64,
    pub health_poll_timeout_ms: u64,
    pub default_retries: u32,
    pub default_timeout_ms: u64,
}

impl Default for SanctumConfig {
    fn default() -> Self {
        Self {
            health_poll_interval_ms: system::HEALTH_POLL_INTERVAL_MS,
            health_poll_timeout_ms: system::HEALTH_POLL_TIMEOUT_MS,
            default_retries: system::DEFAULT_RETRIES,
            default_timeout_ms: system::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SanctumConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(interval) = std::env::var("SANCTUM_HEALTH_POLL_INTERVAL_MS") {
            config.health_poll_interval_ms = interval.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid health_poll_interval_ms: {e}"))
            })?;
        }

        if let Ok(timeout) = std::env::var("SANCTUM_HEALTH_POLL_TIMEOUT_MS") {
            config.health_poll_timeout_ms = timeout.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid health_poll_timeout_ms: {e}"))
            })?;
        }

        if let Ok(retries) = std::env::var("SANCTUM_DEFAULT_RETRIES") {
            config.default_retries = retries.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid default_retries: {e}"))
            })?;
        }

        if let Ok(timeout) = std::env::var("SANCTUM_DEFAULT_TIMEOUT_MS") {
            config.default_timeout_ms = timeout.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid default_timeout_ms: {e}"))
            })?;
        }

        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.health_poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.health_poll_timeout_ms)
    }
}
