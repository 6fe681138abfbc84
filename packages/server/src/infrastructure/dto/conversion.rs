//! Conversion logic between DTOs and domain types.

use lanai_shared::time::{timestamp_to_clock_time, timestamp_to_rfc3339};

use crate::domain::{
    ChatMessage, InboundEvent, NoticeKind, Participant, PresenceEntry, SessionEvent,
};
use crate::infrastructure::dto::{
    http::ParticipantDetailDto,
    websocket::{ChatMessageDto, ClientMessage, NoticeCode, ParticipantDto, ServerMessage},
};

// ========================================
// DTO → Domain
// ========================================

impl From<ClientMessage> for InboundEvent {
    fn from(dto: ClientMessage) -> Self {
        match dto {
            ClientMessage::Register {
                name,
                color,
                avatar,
            } => InboundEvent::Register {
                name,
                color,
                avatar,
            },
            ClientMessage::Rename { name } => InboundEvent::Rename { name },
            ClientMessage::Chat { body } => InboundEvent::Chat { body },
            ClientMessage::PrivateMessage { recipient, body } => {
                InboundEvent::PrivateMessage { recipient, body }
            }
            ClientMessage::Typing { is_typing } => InboundEvent::Typing { is_typing },
            ClientMessage::Activity => InboundEvent::Activity,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            author: model.author.clone(),
            body: model.body.clone(),
            color: model.color.clone(),
            avatar: model.avatar.clone(),
            sent_at: model.sent_at.value(),
            time: timestamp_to_clock_time(model.sent_at.value()),
        }
    }
}

impl From<&PresenceEntry> for ParticipantDto {
    fn from(model: &PresenceEntry) -> Self {
        Self {
            display_name: model.display_name.clone(),
            color: model.color.clone(),
            avatar: model.avatar.clone(),
        }
    }
}

impl From<&Participant> for ParticipantDetailDto {
    fn from(model: &Participant) -> Self {
        Self {
            name: model.name.as_str().to_string(),
            display_name: model.display_name(),
            color: model.color.as_str().to_string(),
            avatar: model.avatar.as_str().to_string(),
            idle: model.is_idle,
            kicked: model.is_kicked,
            joined_at: timestamp_to_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<NoticeKind> for NoticeCode {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Info => NoticeCode::Info,
            NoticeKind::InvalidInput => NoticeCode::InvalidInput,
            NoticeKind::NotRegistered => NoticeCode::NotRegistered,
            NoticeKind::NameCollision => NoticeCode::NameCollision,
            NoticeKind::RecipientNotFound => NoticeCode::RecipientNotFound,
            NoticeKind::RateLimited => NoticeCode::RateLimited,
            NoticeKind::ContentBlocked => NoticeCode::ContentBlocked,
            NoticeKind::NotAuthorized => NoticeCode::NotAuthorized,
            NoticeKind::ChatSuspended => NoticeCode::ChatSuspended,
            NoticeKind::AlreadyKicked => NoticeCode::AlreadyKicked,
            NoticeKind::AlreadyScheduled => NoticeCode::AlreadyScheduled,
            NoticeKind::EscalationPending => NoticeCode::EscalationPending,
            NoticeKind::EscalationGranted => NoticeCode::EscalationGranted,
            NoticeKind::KickCountdown => NoticeCode::KickCountdown,
            NoticeKind::Kicked => NoticeCode::Kicked,
        }
    }
}

impl From<&SessionEvent> for ServerMessage {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::HistoryReplay(messages) => ServerMessage::HistoryReplay {
                messages: messages.iter().map(ChatMessageDto::from).collect(),
            },
            SessionEvent::Chat(message) => ServerMessage::Chat {
                message: message.into(),
            },
            SessionEvent::PrivateMessage {
                from,
                body,
                sent_at,
            } => ServerMessage::PrivateMessage {
                from: from.clone(),
                body: body.clone(),
                sent_at: sent_at.value(),
                time: timestamp_to_clock_time(sent_at.value()),
            },
            SessionEvent::PresenceSnapshot(entries) => ServerMessage::PresenceSnapshot {
                participants: entries.iter().map(ParticipantDto::from).collect(),
            },
            SessionEvent::Typing {
                participant,
                is_typing,
            } => ServerMessage::Typing {
                participant: participant.clone(),
                is_typing: *is_typing,
            },
            SessionEvent::SuspendedState(suspended) => ServerMessage::SuspendedState {
                suspended: *suspended,
            },
            SessionEvent::HistoryCleared => ServerMessage::HistoryCleared,
            SessionEvent::ShutdownAnnounced => ServerMessage::ShutdownAnnounced,
            SessionEvent::Registered { name } => ServerMessage::Registered { name: name.clone() },
            SessionEvent::Notice(notice) => ServerMessage::Notice {
                code: notice.kind.into(),
                text: notice.text.clone(),
            },
        }
    }
}
