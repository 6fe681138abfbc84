//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` (kebab-case) with
//! snake_case fields.

use serde::{Deserialize, Serialize};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
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

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    HistoryReplay {
        messages: Vec<ChatMessageDto>,
    },
    Chat {
        message: ChatMessageDto,
    },
    PrivateMessage {
        from: String,
        body: String,
        sent_at: i64,
        time: String,
    },
    PresenceSnapshot {
        participants: Vec<ParticipantDto>,
    },
    Typing {
        participant: String,
        is_typing: bool,
    },
    SuspendedState {
        suspended: bool,
    },
    HistoryCleared,
    ShutdownAnnounced,
    Registered {
        name: String,
    },
    Notice {
        code: NoticeCode,
        text: String,
    },
}

/// A public chat message as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub author: String,
    pub body: String,
    pub color: String,
    pub avatar: String,
    /// Unix timestamp (milliseconds)
    pub sent_at: i64,
    /// Server-local wall clock (`h:mm:ss AM/PM`)
    pub time: String,
}

/// One row of the presence list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub display_name: String,
    pub color: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeCode {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_parses_kebab_case_tag() {
        // テスト項目: type タグが kebab-case、フィールドが snake_case で解釈される
        // given (前提条件):
        let json = r#"{"type":"private-message","recipient":"bob","body":"hi"}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::PrivateMessage {
                recipient: "bob".to_string(),
                body: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_client_message_without_fields() {
        // テスト項目: フィールドのない activity フレームを解釈できる
        // given (前提条件):
        let json = r#"{"type":"activity"}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(message, ClientMessage::Activity);
    }

    #[test]
    fn test_client_message_rejects_unknown_type() {
        // テスト項目: 未知の type やフィールド不足のフレームはエラーになる
        // given (前提条件):
        let unknown = r#"{"type":"dance"}"#;
        let missing = r#"{"type":"chat"}"#;

        // when (操作) / then (期待する結果):
        assert!(serde_json::from_str::<ClientMessage>(unknown).is_err());
        assert!(serde_json::from_str::<ClientMessage>(missing).is_err());
    }

    #[test]
    fn test_server_message_serializes_with_type_tag() {
        // テスト項目: サーバーからのフレームは type タグ付きの JSON になる
        // given (前提条件):
        let notice = ServerMessage::Notice {
            code: NoticeCode::RateLimited,
            text: "slow down".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(&notice).unwrap();
        let cleared = serde_json::to_value(ServerMessage::HistoryCleared).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "notice", "code": "rate-limited", "text": "slow down"})
        );
        assert_eq!(cleared, serde_json::json!({"type": "history-cleared"}));
    }
}
