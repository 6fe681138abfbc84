//! Domain 層
//!
//! チャットセッションの状態とルールを表現します。I/O は一切行わず、
//! 外部との境界は trait（`HistoryRepository`, `MessagePusher`, `ProfanityFilter`）で定義します。

pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod moderation;
pub mod profanity;
pub mod repository;
pub mod session;
pub mod value_object;

pub use config::SessionConfig;
pub use entity::{ChatMessage, IDLE_SUFFIX, Participant, PresenceEntry};
pub use error::{MessagePushError, RepositoryError, SessionError};
pub use event::{InboundEvent, Notice, NoticeKind, SessionEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use moderation::{
    COMMAND_PREFIX, CountdownKey, EscalationOutcome, EscalationRecord, GlobalModerationState,
    ModerationCommand, help_text,
};
pub use profanity::{NoProfanityFilter, ProfanityFilter, contains_profanity};
pub use repository::HistoryRepository;
#[cfg(test)]
pub use repository::MockHistoryRepository;
pub use session::{IdleTransition, PrivateRoute, Registration, Session};
pub use value_object::{
    AvatarGlyph, Color, ConnectionId, ConnectionIdFactory, MessageBody, ParticipantName,
    Timestamp, ValueObjectError,
};
