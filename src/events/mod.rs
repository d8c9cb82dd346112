//! # Events Module
//!
//! The domain event contract: a typed, versioned envelope plus an
//! in-process bus. Modules announce state changes here instead of
//! importing each other, so a journal save can invalidate a codex cache
//! without either module knowing the other exists.

pub mod bus;
pub mod envelope;

pub use bus::{EventBus, EventBusStats, EventHandler, EventHandlerError, SubscriptionId};
pub use envelope::{
    AssistantReplyGenerated, AuthSessionRevoked, CodexPageSaved, CommunityPostChange, DomainEvent,
    EventPayload, EventType, GlyphInscribed, JournalEntryChange, MeditationSessionCompleted,
    SystemAnnouncementPublished,
};
