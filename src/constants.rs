//! # System Constants
//!
//! Core constants and enums that define the operational boundaries of the
//! Sanctum dispatch layer: the fixed module set, the domain event name
//! registry, and process-wide defaults applied at startup.

use serde::{Deserialize, Serialize};

/// Domain event names published across module boundaries.
///
/// Names use dot notation (`module.what_happened`) and are stable across
/// releases; schema evolution happens through the envelope's version field,
/// never by renaming.
pub mod events {
    // Journal lifecycle events
    pub const JOURNAL_ENTRY_CREATED: &str = "journal.entry_created";
    pub const JOURNAL_ENTRY_UPDATED: &str = "journal.entry_updated";
    pub const JOURNAL_ENTRY_DELETED: &str = "journal.entry_deleted";

    // Meditation events
    pub const MEDITATION_SESSION_COMPLETED: &str = "meditation.session_completed";

    // Community events
    pub const COMMUNITY_POST_PUBLISHED: &str = "community.post_published";
    pub const COMMUNITY_POST_REMOVED: &str = "community.post_removed";

    // Assistant events
    pub const ASSISTANT_REPLY_GENERATED: &str = "assistant.reply_generated";

    // Codex events
    pub const CODEX_PAGE_SAVED: &str = "codex.page_saved";

    // Echo-glyph events
    pub const GLYPH_INSCRIBED: &str = "glyphs.glyph_inscribed";

    // Auth events
    pub const AUTH_SESSION_REVOKED: &str = "auth.session_revoked";

    // System events
    pub const SYSTEM_ANNOUNCEMENT_PUBLISHED: &str = "system.announcement_published";
}

/// Process-wide operational defaults, set once at startup.
pub mod system {
    /// Default number of attempts for a resilient call.
    pub const DEFAULT_RETRIES: u32 = 3;

    /// Default per-attempt timeout in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    /// Interval between aggregate health polls.
    pub const HEALTH_POLL_INTERVAL_MS: u64 = 30_000;

    /// Timeout for one aggregate health call.
    pub const HEALTH_POLL_TIMEOUT_MS: u64 = 5_000;

    /// Base unit for exponential backoff: the wait before attempt `k + 1`
    /// is `2^k` units.
    pub const BACKOFF_UNIT_MS: u64 = 1_000;
}

/// The fixed set of independently deployable backend modules.
///
/// Variant names serialize to the `service` keys reported by the aggregate
/// health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Journal,
    Meditation,
    Community,
    Assistant,
    Codex,
    EchoGlyphs,
    Auth,
    System,
}

impl Module {
    /// All modules, in dashboard display order.
    pub const ALL: [Module; 8] = [
        Module::Journal,
        Module::Meditation,
        Module::Community,
        Module::Assistant,
        Module::Codex,
        Module::EchoGlyphs,
        Module::Auth,
        Module::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Journal => "journal",
            Module::Meditation => "meditation",
            Module::Community => "community",
            Module::Assistant => "assistant",
            Module::Codex => "codex",
            Module::EchoGlyphs => "echo_glyphs",
            Module::Auth => "auth",
            Module::System => "system",
        }
    }

    /// Resolve a health-endpoint service name back to a module.
    pub fn from_name(name: &str) -> Option<Module> {
        Module::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_round_trip() {
        for module in Module::ALL {
            assert_eq!(Module::from_name(module.as_str()), Some(module));
        }
    }

    #[test]
    fn test_unknown_service_name() {
        assert_eq!(Module::from_name("billing"), None);
        assert_eq!(Module::from_name(""), None);
    }

    #[test]
    fn test_module_serialization_matches_service_keys() {
        let serialized = serde_json::to_string(&Module::EchoGlyphs).unwrap();
        assert_eq!(serialized, "\"echo_glyphs\"");
    }
}
