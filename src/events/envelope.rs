//! # Domain Event Envelope
//!
//! Versioned notifications of state changes, published by one module and
//! optionally consumed by others. The envelope is the only coupling
//! between modules: the event type uniquely determines the payload shape,
//! and consumers gate on the schema version instead of guessing field
//! meanings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{events, Module};

/// Fixed registry of domain event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    JournalEntryCreated,
    JournalEntryUpdated,
    JournalEntryDeleted,
    MeditationSessionCompleted,
    CommunityPostPublished,
    CommunityPostRemoved,
    AssistantReplyGenerated,
    CodexPageSaved,
    GlyphInscribed,
    AuthSessionRevoked,
    SystemAnnouncementPublished,
}

impl EventType {
    /// Dot-notation event name, stable across releases.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::JournalEntryCreated => events::JOURNAL_ENTRY_CREATED,
            EventType::JournalEntryUpdated => events::JOURNAL_ENTRY_UPDATED,
            EventType::JournalEntryDeleted => events::JOURNAL_ENTRY_DELETED,
            EventType::MeditationSessionCompleted => events::MEDITATION_SESSION_COMPLETED,
            EventType::CommunityPostPublished => events::COMMUNITY_POST_PUBLISHED,
            EventType::CommunityPostRemoved => events::COMMUNITY_POST_REMOVED,
            EventType::AssistantReplyGenerated => events::ASSISTANT_REPLY_GENERATED,
            EventType::CodexPageSaved => events::CODEX_PAGE_SAVED,
            EventType::GlyphInscribed => events::GLYPH_INSCRIBED,
            EventType::AuthSessionRevoked => events::AUTH_SESSION_REVOKED,
            EventType::SystemAnnouncementPublished => events::SYSTEM_ANNOUNCEMENT_PUBLISHED,
        }
    }

    /// Schema version currently produced for this event type. A consumer
    /// seeing any other version must treat the event as a no-op.
    pub fn schema_version(&self) -> u16 {
        match self {
            // journal entries gained the mood field in v2
            EventType::JournalEntryCreated | EventType::JournalEntryUpdated => 2,
            _ => 1,
        }
    }

    /// Module that publishes this event type.
    pub fn module(&self) -> Module {
        match self {
            EventType::JournalEntryCreated
            | EventType::JournalEntryUpdated
            | EventType::JournalEntryDeleted => Module::Journal,
            EventType::MeditationSessionCompleted => Module::Meditation,
            EventType::CommunityPostPublished | EventType::CommunityPostRemoved => {
                Module::Community
            }
            EventType::AssistantReplyGenerated => Module::Assistant,
            EventType::CodexPageSaved => Module::Codex,
            EventType::GlyphInscribed => Module::EchoGlyphs,
            EventType::AuthSessionRevoked => Module::Auth,
            EventType::SystemAnnouncementPublished => Module::System,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryChange {
    pub entry_id: Uuid,
    pub mood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationSessionCompleted {
    pub session_id: Uuid,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPostChange {
    pub post_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReplyGenerated {
    pub conversation_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexPageSaved {
    pub page_id: Uuid,
    pub revision: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphInscribed {
    pub glyph_id: Uuid,
    pub resonance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSessionRevoked {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAnnouncementPublished {
    pub announcement_id: Uuid,
    pub severity: String,
}

/// Payload sum type: one variant per entry in the event type registry, so
/// the type statically determines the payload shape for all consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    JournalEntryCreated(JournalEntryChange),
    JournalEntryUpdated(JournalEntryChange),
    JournalEntryDeleted { entry_id: Uuid },
    MeditationSessionCompleted(MeditationSessionCompleted),
    CommunityPostPublished(CommunityPostChange),
    CommunityPostRemoved(CommunityPostChange),
    AssistantReplyGenerated(AssistantReplyGenerated),
    CodexPageSaved(CodexPageSaved),
    GlyphInscribed(GlyphInscribed),
    AuthSessionRevoked(AuthSessionRevoked),
    SystemAnnouncementPublished(SystemAnnouncementPublished),
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::JournalEntryCreated(_) => EventType::JournalEntryCreated,
            EventPayload::JournalEntryUpdated(_) => EventType::JournalEntryUpdated,
            EventPayload::JournalEntryDeleted { .. } => EventType::JournalEntryDeleted,
            EventPayload::MeditationSessionCompleted(_) => EventType::MeditationSessionCompleted,
            EventPayload::CommunityPostPublished(_) => EventType::CommunityPostPublished,
            EventPayload::CommunityPostRemoved(_) => EventType::CommunityPostRemoved,
            EventPayload::AssistantReplyGenerated(_) => EventType::AssistantReplyGenerated,
            EventPayload::CodexPageSaved(_) => EventType::CodexPageSaved,
            EventPayload::GlyphInscribed(_) => EventType::GlyphInscribed,
            EventPayload::AuthSessionRevoked(_) => EventType::AuthSessionRevoked,
            EventPayload::SystemAnnouncementPublished(_) => EventType::SystemAnnouncementPublished,
        }
    }
}

/// Domain event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event identifier (UUID v7 for time-ordering).
    pub event_id: Uuid,
    pub event_type: EventType,
    /// Originating module.
    pub module: Module,
    pub occurred_at: DateTime<Utc>,
    /// Schema version of `payload`.
    pub schema_version: u16,
    pub payload: EventPayload,
}

impl DomainEvent {
    /// Build an event with a fresh id, the current timestamp, and the
    /// type's current schema version.
    pub fn new(payload: EventPayload) -> Self {
        let event_type = payload.event_type();
        Self {
            event_id: Uuid::now_v7(),
            event_type,
            module: event_type.module(),
            occurred_at: Utc::now(),
            schema_version: event_type.schema_version(),
            payload,
        }
    }

    /// Whether this consumer build understands the event's schema version.
    pub fn is_current_version(&self) -> bool {
        self.schema_version == self.event_type.schema_version()
    }

    /// Payload gated on schema version: `None` for versions this build
    /// does not understand. Handlers must treat `None` as a no-op.
    pub fn versioned_payload(&self) -> Option<&EventPayload> {
        self.is_current_version().then_some(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> DomainEvent {
        DomainEvent::new(EventPayload::JournalEntryCreated(JournalEntryChange {
            entry_id: Uuid::new_v4(),
            mood: Some("calm".to_string()),
        }))
    }

    #[test]
    fn test_new_fills_envelope_from_payload() {
        let event = sample_event();
        assert_eq!(event.event_type, EventType::JournalEntryCreated);
        assert_eq!(event.module, Module::Journal);
        assert_eq!(event.schema_version, 2);
        assert!(event.is_current_version());
    }

    #[test]
    fn test_versioned_payload_gates_unknown_versions() {
        let mut event = sample_event();
        assert!(event.versioned_payload().is_some());

        event.schema_version = 99;
        assert!(event.versioned_payload().is_none());
    }

    #[test]
    fn test_event_names_match_registry_constants() {
        assert_eq!(
            EventType::MeditationSessionCompleted.as_str(),
            "meditation.session_completed"
        );
        assert_eq!(EventType::GlyphInscribed.as_str(), "glyphs.glyph_inscribed");
    }

    #[test]
    fn test_event_ids_are_unique() {
        assert_ne!(sample_event().event_id, sample_event().event_id);
    }
}
