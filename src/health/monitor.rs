//! # Health Monitor
//!
//! Maintains a continuously refreshed, synchronously readable belief about
//! which backend modules are reachable and functioning. One background loop
//! polls the aggregate health endpoint on a fixed interval; every feature
//! call site consults the cached snapshot without touching the network.
//!
//! A failed poll is recorded as a synthetic unhealthy snapshot and is never
//! retried before the next scheduled tick, so an incident cannot amplify
//! poll traffic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::endpoint::HealthEndpoint;
use super::types::{ModuleHealth, ModuleStatus, ModuleStatusView, SystemHealthSnapshot};
use crate::constants::Module;

/// Lenient view of the untrusted aggregate payload. Anything that fails
/// to fit this shape forces the synthetic unhealthy snapshot.
#[derive(Debug, Deserialize)]
struct HealthEnvelope {
    system: SystemSummary,
    #[serde(default)]
    modules: Vec<ModuleHealth>,
}

#[derive(Debug, Deserialize)]
struct SystemSummary {
    status: ModuleStatus,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    uptime_seconds: Option<u64>,
}

/// Poll counters for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthMonitorStats {
    pub polls_completed: u64,
    pub polls_failed: u64,
}

/// Health monitor with a single-writer cached snapshot.
///
/// The snapshot cell is written only by the poll loop and read by any
/// number of concurrent consulters; writes replace the whole `Arc`, so
/// readers never observe a partially updated snapshot.
pub struct HealthMonitor {
    endpoint: Arc<dyn HealthEndpoint>,
    poll_timeout: Duration,
    snapshot: RwLock<Arc<SystemHealthSnapshot>>,
    polls_completed: AtomicU64,
    polls_failed: AtomicU64,
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("poll_timeout", &self.poll_timeout)
            .field("snapshot_status", &self.snapshot.read().status)
            .finish()
    }
}

impl HealthMonitor {
    /// Create a monitor. The snapshot starts as `Unknown` until the first
    /// poll completes; consumers must tolerate that at startup.
    pub fn new(endpoint: Arc<dyn HealthEndpoint>, poll_timeout: Duration) -> Self {
        Self {
            endpoint,
            poll_timeout,
            snapshot: RwLock::new(Arc::new(SystemHealthSnapshot::unknown())),
            polls_completed: AtomicU64::new(0),
            polls_failed: AtomicU64::new(0),
        }
    }

    /// Latest cached snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<SystemHealthSnapshot> {
        self.snapshot.read().clone()
    }

    /// Synchronous status query against the cached snapshot.
    pub fn module_status(&self, module: Module) -> ModuleStatusView {
        self.snapshot().status_view(module)
    }

    pub fn stats(&self) -> HealthMonitorStats {
        HealthMonitorStats {
            polls_completed: self.polls_completed.load(Ordering::Relaxed),
            polls_failed: self.polls_failed.load(Ordering::Relaxed),
        }
    }

    /// Perform one aggregate health poll and replace the cached snapshot.
    ///
    /// Never returns an error: timeout, transport failure, and malformed
    /// payloads all record a synthetic unhealthy snapshot.
    pub async fn poll_once(&self) {
        let next = match tokio::time::timeout(
            self.poll_timeout,
            self.endpoint.fetch_system_health(),
        )
        .await
        {
            Ok(Ok(raw)) => match parse_snapshot(raw) {
                Ok(snapshot) => {
                    self.polls_completed.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        status = %snapshot.status,
                        module_count = snapshot.modules.len(),
                        "Health poll completed"
                    );
                    snapshot
                }
                Err(reason) => {
                    self.polls_failed.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        reason = %reason,
                        "Health payload malformed - recording synthetic unhealthy snapshot"
                    );
                    SystemHealthSnapshot::unreachable()
                }
            },
            Ok(Err(error)) => {
                self.polls_failed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %error, "Aggregate health call failed");
                SystemHealthSnapshot::unreachable()
            }
            Err(_) => {
                self.polls_failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    timeout_ms = self.poll_timeout.as_millis() as u64,
                    "Aggregate health call timed out"
                );
                SystemHealthSnapshot::unreachable()
            }
        };

        *self.snapshot.write() = Arc::new(next);
    }

    /// Start the background polling loop: one immediate poll, then a poll
    /// per `interval` tick regardless of prior outcome.
    ///
    /// The returned handle is a scoped resource: `stop()` ends the loop
    /// gracefully and dropping the handle aborts it, so the timer cannot
    /// outlive its owning context.
    pub fn start(self: &Arc<Self>, interval: Duration) -> HealthPollerHandle {
        let monitor = Arc::clone(self);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        info!(
            interval_ms = interval.as_millis() as u64,
            "🩺 Starting health poller"
        );

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => monitor.poll_once().await,
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Health poller stopped");
        });

        HealthPollerHandle {
            stop: stop_tx,
            join: Some(join),
        }
    }
}

/// Handle to the background polling loop.
pub struct HealthPollerHandle {
    stop: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

impl HealthPollerHandle {
    /// Stop the loop and wait for it to wind down.
    pub async fn stop(mut self) {
        let _ = self.stop.send(true);
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for HealthPollerHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

fn parse_snapshot(raw: serde_json::Value) -> Result<SystemHealthSnapshot, String> {
    let envelope: HealthEnvelope = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    Ok(SystemHealthSnapshot {
        status: envelope.system.status,
        timestamp: envelope.system.timestamp.unwrap_or_else(Utc::now),
        uptime_seconds: envelope.system.uptime_seconds.unwrap_or(0),
        modules: envelope.modules,
    })
}
