use async_trait::async_trait;

use crate::error::DispatchError;

/// Transport seam for the aggregate health endpoint.
///
/// The concrete transport (HTTP client, RPC stub) lives outside this crate;
/// embedders and tests provide implementations. The payload comes back
/// untrusted — the monitor parses it leniently and converts any failure
/// into a synthetic unhealthy snapshot.
#[async_trait]
pub trait HealthEndpoint: Send + Sync {
    async fn fetch_system_health(&self) -> Result<serde_json::Value, DispatchError>;
}
