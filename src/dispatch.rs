//! # Module Dispatcher
//!
//! The funnel every feature call site uses: consult the cached health
//! snapshot, run the operation through the resilient invoker, and publish
//! the resulting domain event for mutations.
//!
//! Gating is a per-feature choice. `invoke` always attempts the call and
//! lets retry/fallback decide; `invoke_gated` skips the network entirely
//! for a known-unhealthy module and renders the fallback instead.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::constants::Module;
use crate::error::DispatchError;
use crate::events::{DomainEvent, EventBus, EventHandlerError};
use crate::health::HealthMonitor;
use crate::resilience::{with_retry, ModuleClientConfig};

/// Health-aware dispatch facade over the resilient invoker and event bus.
pub struct ModuleDispatcher {
    monitor: Arc<HealthMonitor>,
    bus: Arc<EventBus>,
}

impl std::fmt::Debug for ModuleDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDispatcher")
            .field("monitor", &self.monitor)
            .field("bus", &self.bus)
            .finish()
    }
}

impl ModuleDispatcher {
    pub fn new(monitor: Arc<HealthMonitor>, bus: Arc<EventBus>) -> Self {
        Self { monitor, bus }
    }

    pub fn monitor(&self) -> &Arc<HealthMonitor> {
        &self.monitor
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Run an operation through the resilient invoker without consulting
    /// health state.
    pub async fn invoke<R, F, Fut>(
        &self,
        module: Module,
        config: ModuleClientConfig<R>,
        operation: F,
    ) -> Result<R, DispatchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, DispatchError>>,
    {
        with_retry(module, config, operation).await
    }

    /// Consult the cached snapshot first: a known-unhealthy module is
    /// skipped without any network traffic, resolving to the fallback or
    /// `ModuleUnavailable`. `Unknown` (e.g. at startup) and `Degraded`
    /// still attempt the call.
    pub async fn invoke_gated<R, F, Fut>(
        &self,
        module: Module,
        config: ModuleClientConfig<R>,
        operation: F,
    ) -> Result<R, DispatchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, DispatchError>>,
    {
        let view = self.monitor.module_status(module);
        if view.is_unhealthy {
            warn!(module = %module, "Skipping call to unhealthy module");
            return match config.fallback_data {
                Some(fallback) => Ok(fallback),
                None => Err(DispatchError::ModuleUnavailable { module }),
            };
        }
        with_retry(module, config, operation).await
    }

    /// Run a mutation. Mutations must not carry fallback data; on success
    /// the event produced by `event_for` (if any) is published.
    pub async fn invoke_mutation<R, F, Fut, E>(
        &self,
        module: Module,
        config: ModuleClientConfig<R>,
        operation: F,
        event_for: E,
    ) -> Result<R, DispatchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, DispatchError>>,
        E: FnOnce(&R) -> Option<DomainEvent>,
    {
        if config.has_fallback() {
            return Err(DispatchError::Configuration(format!(
                "mutation against {module} must not carry fallback data"
            )));
        }

        let result = with_retry(module, config, operation).await?;

        if let Some(event) = event_for(&result) {
            debug!(
                module = %module,
                event_type = %event.event_type,
                "Publishing mutation event"
            );
            self.bus.publish(event).await;
        }

        Ok(result)
    }

    /// Publish an ad hoc domain event.
    pub async fn publish(&self, event: DomainEvent) -> Vec<EventHandlerError> {
        self.bus.publish(event).await
    }
}
