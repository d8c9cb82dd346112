//! # Health Module
//!
//! Health-awareness for module dispatch: a background poller against the
//! aggregate health endpoint and a cached snapshot that feature call sites
//! consult synchronously before going to the network.
//!
//! ## Architecture
//!
//! - **Snapshot types**: immutable, replace-wholesale results of one poll
//! - **Endpoint seam**: transport trait implemented outside this crate
//! - **Monitor**: single-writer cached snapshot plus the scoped poll loop
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use sanctum_core::constants::Module;
//! use sanctum_core::health::{HealthEndpoint, HealthMonitor};
//!
//! # async fn example(endpoint: Arc<dyn HealthEndpoint>) {
//! let monitor = Arc::new(HealthMonitor::new(endpoint, Duration::from_secs(5)));
//! let poller = monitor.start(Duration::from_secs(30));
//!
//! if monitor.module_status(Module::Journal).status.at_least_degraded() {
//!     // route the call
//! }
//!
//! poller.stop().await;
//! # }
//! ```

pub mod endpoint;
pub mod monitor;
pub mod types;

pub use endpoint::HealthEndpoint;
pub use monitor::{HealthMonitor, HealthMonitorStats, HealthPollerHandle};
pub use types::{ModuleHealth, ModuleStatus, ModuleStatusView, SystemHealthSnapshot};
