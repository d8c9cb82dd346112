#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Sanctum Core
//!
//! Resilience core for the Sanctum companion app. The app is composed of
//! independently deployable backend modules (journal, meditation,
//! community, AI assistant, codex, echo-glyphs, auth, system) behind thin
//! CRUD endpoints; this crate is the layer that keeps one unhealthy module
//! from cascading into a frozen UI.
//!
//! ## Architecture
//!
//! Every feature-level backend call funnels through the same path:
//!
//! 1. The **health monitor** polls the aggregate health endpoint on a
//!    fixed interval and caches an immutable snapshot for synchronous
//!    consultation — feature calls never trigger polls.
//! 2. The **resilient invoker** wraps one backend operation with bounded
//!    retry, exponential backoff, and optional fallback substitution.
//! 3. For mutations, a **domain event** is published on the in-process
//!    bus so other modules can react without importing each other.
//!
//! ## Module Organization
//!
//! - [`health`] - Aggregate health polling and the cached snapshot
//! - [`resilience`] - Retry state machine and the `with_retry` invoker
//! - [`registry`] - Static per-module call policies and fallback shapes
//! - [`events`] - Domain event envelope and in-process bus
//! - [`dispatch`] - Health-aware facade tying the layers together
//! - [`config`] - Environment-level defaults
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use sanctum_core::constants::Module;
//! use sanctum_core::dispatch::ModuleDispatcher;
//! use sanctum_core::error::DispatchError;
//! use sanctum_core::events::EventBus;
//! use sanctum_core::health::{HealthEndpoint, HealthMonitor};
//! use sanctum_core::registry::{ModuleRegistry, PageEnvelope};
//!
//! struct HttpHealthEndpoint;
//!
//! #[async_trait]
//! impl HealthEndpoint for HttpHealthEndpoint {
//!     async fn fetch_system_health(&self) -> Result<serde_json::Value, DispatchError> {
//!         // issue the real aggregate health request here
//!         Ok(serde_json::json!({ "system": { "status": "healthy" }, "modules": [] }))
//!     }
//! }
//!
//! # async fn example() -> Result<(), DispatchError> {
//! let monitor = Arc::new(HealthMonitor::new(
//!     Arc::new(HttpHealthEndpoint),
//!     Duration::from_secs(5),
//! ));
//! let poller = monitor.start(Duration::from_secs(30));
//! let dispatcher = ModuleDispatcher::new(monitor, Arc::new(EventBus::new()));
//!
//! let entries: PageEnvelope<serde_json::Value> = dispatcher
//!     .invoke_gated(
//!         Module::Journal,
//!         ModuleRegistry::read_config(Module::Journal),
//!         || async {
//!             // call the journal list endpoint here
//!             Ok(PageEnvelope::empty())
//!         },
//!     )
//!     .await?;
//!
//! poller.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod health;
pub mod logging;
pub mod registry;
pub mod resilience;

pub use config::SanctumConfig;
pub use constants::Module;
pub use dispatch::ModuleDispatcher;
pub use error::{DispatchError, Result};
pub use events::{
    DomainEvent, EventBus, EventBusStats, EventHandler, EventHandlerError, EventPayload,
    EventType, SubscriptionId,
};
pub use health::{
    HealthEndpoint, HealthMonitor, HealthMonitorStats, HealthPollerHandle, ModuleHealth,
    ModuleStatus, ModuleStatusView, SystemHealthSnapshot,
};
pub use registry::{ModulePolicy, ModuleRegistry, PageEnvelope};
pub use resilience::{backoff_delay, with_retry, ModuleClientConfig, RetryState};
