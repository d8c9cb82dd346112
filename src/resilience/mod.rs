//! # Resilience Module
//!
//! Fault tolerance for module dispatch: bounded retry with exponential
//! backoff and fallback substitution, so one flaky backend module cannot
//! cascade into a frozen UI.
//!
//! ## Architecture
//!
//! - **Per-call configuration**: retries, per-attempt timeout, optional
//!   fallback value, constructed once per call site
//! - **Retry state machine**: explicit states make the attempt/delay
//!   schedule testable without wall-clock time
//! - **Invoker**: the single funnel every backend call goes through
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sanctum_core::constants::Module;
//! use sanctum_core::resilience::{with_retry, ModuleClientConfig};
//!
//! # async fn example() -> Result<(), sanctum_core::DispatchError> {
//! let sessions: Vec<String> = with_retry(
//!     Module::Meditation,
//!     ModuleClientConfig::new()
//!         .with_retries(3)
//!         .with_fallback(Vec::new()),
//!     || async {
//!         // call the meditation session listing here
//!         Ok(Vec::new())
//!     },
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod invoker;

pub use config::ModuleClientConfig;
pub use invoker::{backoff_delay, with_retry, RetryState};
