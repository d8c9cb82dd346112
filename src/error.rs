use thiserror::Error;

use crate::constants::Module;

/// Errors surfaced by the dispatch resilience layer.
///
/// Transport and timeout failures are transient and normally stay inside
/// [`with_retry`](crate::resilience::with_retry); only an exhausted call
/// without fallback data crosses the component boundary, and it carries
/// the last attempt's error verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The underlying transport failed (connection refused, reset, 5xx).
    #[error("transport error calling {module}: {reason}")]
    Transport { module: Module, reason: String },

    /// A single attempt exceeded the configured per-attempt timeout.
    #[error("call to {module} timed out after {timeout_ms}ms")]
    Timeout { module: Module, timeout_ms: u64 },

    /// The module answered with a payload we could not interpret.
    #[error("malformed payload from {module}: {reason}")]
    MalformedPayload { module: Module, reason: String },

    /// A health-gated call was skipped and no fallback was configured.
    #[error("{module} is unhealthy and no fallback data was configured")]
    ModuleUnavailable { module: Module },

    /// Caller misconfiguration, e.g. fallback data attached to a mutation.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
