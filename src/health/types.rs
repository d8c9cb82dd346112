//! Snapshot types produced by the health monitor.
//!
//! A snapshot is the complete, immutable result of one poll; each poll
//! replaces the previous snapshot wholesale, so readers never see a merge
//! of fresh and stale data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::Module;

/// Health classification for one backend module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ModuleStatus {
    Healthy,
    /// Reachable but impaired.
    Degraded,
    Unhealthy,
    /// No successful poll has reported on the module yet, or the wire
    /// carried a status string we do not recognize.
    Unknown,
}

impl From<String> for ModuleStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "healthy" => ModuleStatus::Healthy,
            "degraded" => ModuleStatus::Degraded,
            "unhealthy" => ModuleStatus::Unhealthy,
            _ => ModuleStatus::Unknown,
        }
    }
}

impl ModuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Healthy => "healthy",
            ModuleStatus::Degraded => "degraded",
            ModuleStatus::Unhealthy => "unhealthy",
            ModuleStatus::Unknown => "unknown",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ModuleStatus::Healthy)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ModuleStatus::Degraded)
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, ModuleStatus::Unhealthy)
    }

    /// Reachable enough to route calls to: healthy or merely degraded.
    pub fn at_least_degraded(&self) -> bool {
        matches!(self, ModuleStatus::Healthy | ModuleStatus::Degraded)
    }
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of a single module as reported by the aggregate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHealth {
    pub service: String,
    pub status: ModuleStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
}

/// Complete result of one health poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHealthSnapshot {
    pub status: ModuleStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub modules: Vec<ModuleHealth>,
}

impl SystemHealthSnapshot {
    /// The snapshot in force before any poll has completed.
    pub fn unknown() -> Self {
        Self {
            status: ModuleStatus::Unknown,
            timestamp: Utc::now(),
            uptime_seconds: 0,
            modules: Vec::new(),
        }
    }

    /// Synthetic snapshot recorded when a poll fails outright. Replaces
    /// the previous snapshot so stale data never masquerades as fresh.
    pub fn unreachable() -> Self {
        Self {
            status: ModuleStatus::Unhealthy,
            timestamp: Utc::now(),
            uptime_seconds: 0,
            modules: Vec::new(),
        }
    }

    pub fn module(&self, service: &str) -> Option<&ModuleHealth> {
        self.modules.iter().find(|m| m.service == service)
    }

    /// Derive the per-module status view. A module absent from the
    /// snapshot yields `Unknown` with every predicate false.
    pub fn status_view(&self, module: Module) -> ModuleStatusView {
        match self.module(module.as_str()) {
            Some(health) => ModuleStatusView {
                status: health.status,
                is_healthy: health.status.is_healthy(),
                is_degraded: health.status.is_degraded(),
                is_unhealthy: health.status.is_unhealthy(),
                version: health.version.clone(),
                uptime_seconds: health.uptime_seconds,
            },
            None => ModuleStatusView::unknown(),
        }
    }
}

/// Synchronous answer to "can I call this module right now?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStatusView {
    pub status: ModuleStatus,
    pub is_healthy: bool,
    pub is_degraded: bool,
    pub is_unhealthy: bool,
    pub version: Option<String>,
    pub uptime_seconds: Option<u64>,
}

impl ModuleStatusView {
    pub fn unknown() -> Self {
        Self {
            status: ModuleStatus::Unknown,
            is_healthy: false,
            is_degraded: false,
            is_unhealthy: false,
            version: None,
            uptime_seconds: None,
        }
    }
}
