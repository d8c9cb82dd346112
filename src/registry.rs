//! # Module Registry
//!
//! Static, read-only association of backend module to default call policy,
//! plus the "safe empty" fallback convention for read-oriented UI.
//!
//! Fallback data is only ever attached to idempotent reads. Mutations get
//! a config with no fallback; the dispatcher enforces this at runtime.

use serde::{Deserialize, Serialize};

use crate::constants::{system, Module};
use crate::resilience::ModuleClientConfig;

/// Default retry/timeout policy for one backend module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePolicy {
    pub retries: u32,
    pub timeout_ms: u64,
}

/// Read-only table of per-module dispatch policies.
pub struct ModuleRegistry;

impl ModuleRegistry {
    /// Default policy for a module. The assistant tolerates slow
    /// generation with fewer attempts; auth never repeats a credential
    /// round-trip.
    pub fn policy_for(module: Module) -> ModulePolicy {
        match module {
            Module::Journal
            | Module::Meditation
            | Module::Community
            | Module::Codex
            | Module::EchoGlyphs => ModulePolicy {
                retries: system::DEFAULT_RETRIES,
                timeout_ms: system::DEFAULT_TIMEOUT_MS,
            },
            Module::Assistant => ModulePolicy {
                retries: 2,
                timeout_ms: 30_000,
            },
            Module::Auth => ModulePolicy {
                retries: 1,
                timeout_ms: 10_000,
            },
            Module::System => ModulePolicy {
                retries: 2,
                timeout_ms: 5_000,
            },
        }
    }

    /// Config for an idempotent read, pre-loaded with the empty-page
    /// fallback so list views can always render something while degraded.
    pub fn read_config<T>(module: Module) -> ModuleClientConfig<PageEnvelope<T>> {
        let policy = Self::policy_for(module);
        ModuleClientConfig::new()
            .with_retries(policy.retries)
            .with_timeout_ms(policy.timeout_ms)
            .with_fallback(PageEnvelope::empty())
    }

    /// Config for a mutation: module policy, no fallback.
    pub fn mutation_config<R>(module: Module) -> ModuleClientConfig<R> {
        let policy = Self::policy_for(module);
        ModuleClientConfig::new()
            .with_retries(policy.retries)
            .with_timeout_ms(policy.timeout_ms)
    }
}

/// Paged collection shape shared by the read endpoints. `empty()` is the
/// conventional degraded-mode fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageEnvelope<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_has_a_policy() {
        for module in Module::ALL {
            let policy = ModuleRegistry::policy_for(module);
            assert!(policy.retries >= 1);
            assert!(policy.timeout_ms > 0);
        }
    }

    #[test]
    fn test_auth_never_retries() {
        assert_eq!(ModuleRegistry::policy_for(Module::Auth).retries, 1);
    }

    #[test]
    fn test_read_config_carries_empty_fallback() {
        let config = ModuleRegistry::read_config::<String>(Module::Journal);
        let fallback = config.fallback_data.unwrap();
        assert!(fallback.items.is_empty());
        assert_eq!(fallback.total, 0);
    }

    #[test]
    fn test_mutation_config_has_no_fallback() {
        let config = ModuleRegistry::mutation_config::<String>(Module::Journal);
        assert!(!config.has_fallback());
        assert_eq!(config.retries, 3);
    }
}
