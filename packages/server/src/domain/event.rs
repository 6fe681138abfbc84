//! Inbound and outbound session events.
//!
//! Inbound events are the closed set of things a connection can ask for;
//! outbound events are what observers are told. Wire encoding lives in the
//! infrastructure DTOs.

use super::{ChatMessage, PresenceEntry, SessionError, Timestamp};

/// Everything a connected client can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Register {
        name: String,
        color: String,
        avatar: String,
    },
    Rename {
        name: String,
    },
    Chat {
        body: String,
    },
    PrivateMessage {
        recipient: String,
        body: String,
    },
    Typing {
        is_typing: bool,
    },
    Activity,
}

impl InboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Register { .. } => "register",
            InboundEvent::Rename { .. } => "rename",
            InboundEvent::Chat { .. } => "chat",
            InboundEvent::PrivateMessage { .. } => "private-message",
            InboundEvent::Typing { .. } => "typing",
            InboundEvent::Activity => "activity",
        }
    }
}

/// Everything an observer can be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    HistoryReplay(Vec<ChatMessage>),
    Chat(ChatMessage),
    PrivateMessage {
        from: String,
        body: String,
        sent_at: Timestamp,
    },
    PresenceSnapshot(Vec<PresenceEntry>),
    Typing {
        participant: String,
        is_typing: bool,
    },
    SuspendedState(bool),
    HistoryCleared,
    ShutdownAnnounced,
    Registered {
        name: String,
    },
    Notice(Notice),
}

/// Machine-readable category of a private notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    InvalidInput,
    NotRegistered,
    NameCollision,
    RecipientNotFound,
    RateLimited,
    ContentBlocked,
    NotAuthorized,
    ChatSuspended,
    AlreadyKicked,
    AlreadyScheduled,
    EscalationPending,
    EscalationGranted,
    KickCountdown,
    Kicked,
}

/// A message addressed to one connection only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, text)
    }
}

impl From<&SessionError> for Notice {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::InvalidInput(reason) => {
                Notice::new(NoticeKind::InvalidInput, format!("Invalid input: {}", reason))
            }
            SessionError::NotRegistered => Notice::new(
                NoticeKind::NotRegistered,
                "Choose a username before chatting.",
            ),
            SessionError::NameCollision(name) => Notice::new(
                NoticeKind::NameCollision,
                format!("The username \"{}\" is already in use.", name),
            ),
            SessionError::RecipientNotFound(name) => Notice::new(
                NoticeKind::RecipientNotFound,
                format!("User {} not found.", name),
            ),
            SessionError::TargetNotFound(name) => Notice::new(
                NoticeKind::Info,
                format!("User \"{}\" not found.", name),
            ),
            SessionError::TargetAlreadyKicked(name) => {
                Notice::new(NoticeKind::Info, format!("{} is already kicked.", name))
            }
            SessionError::RateLimited => Notice::new(
                NoticeKind::RateLimited,
                "Slow mode is enabled. Please wait before sending another message.",
            ),
            SessionError::ContentBlocked => Notice::new(
                NoticeKind::ContentBlocked,
                "Your message was blocked due to profanity.",
            ),
            SessionError::NotAuthorized => {
                Notice::new(NoticeKind::NotAuthorized, "You are not authorized to do that.")
            }
            SessionError::ChatSuspended => Notice::new(
                NoticeKind::ChatSuspended,
                "Chat is temporarily suspended.",
            ),
            SessionError::AlreadyKicked => Notice::new(
                NoticeKind::AlreadyKicked,
                "You have been kicked and cannot send messages.",
            ),
            SessionError::AlreadyScheduled(what) => Notice::new(
                NoticeKind::AlreadyScheduled,
                format!("{} is already in progress.", what),
            ),
        }
    }
}
