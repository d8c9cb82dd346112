use std::time::Duration;

use crate::constants::system;

/// Per-call configuration for one resilient backend operation.
///
/// Constructed once per call site and immutable for the duration of the
/// call. Fallback data belongs on idempotent reads only; there is no safe
/// default answer to "did my journal entry get saved?".
#[derive(Debug, Clone)]
pub struct ModuleClientConfig<R> {
    /// Maximum number of attempts (>= 1). A value of 1 means exactly one
    /// attempt: no retry, immediate fallback-or-fail.
    pub retries: u32,
    /// Per-attempt timeout in milliseconds; a timed-out attempt counts as
    /// a failed attempt.
    pub timeout_ms: u64,
    /// Safe value substituted when every attempt has failed.
    pub fallback_data: Option<R>,
}

impl<R> Default for ModuleClientConfig<R> {
    fn default() -> Self {
        Self {
            retries: system::DEFAULT_RETRIES,
            timeout_ms: system::DEFAULT_TIMEOUT_MS,
            fallback_data: None,
        }
    }
}

impl<R> ModuleClientConfig<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped to at least one attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_fallback(mut self, fallback: R) -> Self {
        self.fallback_data = Some(fallback);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback_data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ModuleClientConfig<()> = ModuleClientConfig::new();
        assert_eq!(config.retries, 3);
        assert_eq!(config.timeout_ms, 10_000);
        assert!(!config.has_fallback());
    }

    #[test]
    fn test_retries_clamped_to_one() {
        let config: ModuleClientConfig<()> = ModuleClientConfig::new().with_retries(0);
        assert_eq!(config.retries, 1);
    }

    #[test]
    fn test_builder_chain() {
        let config = ModuleClientConfig::new()
            .with_retries(5)
            .with_timeout_ms(2_500)
            .with_fallback(Vec::<u8>::new());
        assert_eq!(config.retries, 5);
        assert_eq!(config.timeout(), Duration::from_millis(2_500));
        assert!(config.has_fallback());
    }
}
