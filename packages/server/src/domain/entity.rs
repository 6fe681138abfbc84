//! エンティティ

use serde::{Deserialize, Serialize};

use super::value_object::{AvatarGlyph, Color, ConnectionId, MessageBody, ParticipantName, Timestamp};

/// Suffix appended to a participant's name while they are idle.
pub const IDLE_SUFFIX: &str = " (idle)";

/// 参加者（接続 1 つにつき 1 人）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub name: ParticipantName,
    pub color: Color,
    pub avatar: AvatarGlyph,
    pub joined_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub is_idle: bool,
    pub is_kicked: bool,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        name: ParticipantName,
        color: Color,
        avatar: AvatarGlyph,
        now: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            name,
            color,
            avatar,
            joined_at: now,
            last_activity_at: now,
            is_idle: false,
            is_kicked: false,
        }
    }

    /// Name used for rendering: the canonical name, plus [`IDLE_SUFFIX`] while idle.
    pub fn display_name(&self) -> String {
        if self.is_idle {
            format!("{}{}", self.name, IDLE_SUFFIX)
        } else {
            self.name.as_str().to_string()
        }
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_at = now;
    }

    pub fn presence(&self) -> PresenceEntry {
        PresenceEntry {
            display_name: self.display_name(),
            color: self.color.as_str().to_string(),
            avatar: self.avatar.as_str().to_string(),
        }
    }
}

/// 参加者一覧の 1 行（外部に公開する表示情報のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceEntry {
    pub display_name: String,
    pub color: String,
    pub avatar: String,
}

/// 公開チャットメッセージ
///
/// 履歴に追加された後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub body: String,
    pub color: String,
    pub avatar: String,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub const SYSTEM_AUTHOR: &'static str = ParticipantName::RESERVED;
    pub const SYSTEM_COLOR: &'static str = "#000000";
    pub const SYSTEM_AVATAR: &'static str = "S";

    /// Message authored by a participant, stamped with their current display name.
    pub fn from_participant(participant: &Participant, body: MessageBody, now: Timestamp) -> Self {
        Self {
            author: participant.display_name(),
            body: body.into_string(),
            color: participant.color.as_str().to_string(),
            avatar: participant.avatar.as_str().to_string(),
            sent_at: now,
        }
    }

    /// Public announcement authored by the server itself.
    pub fn system(body: impl Into<String>, now: Timestamp) -> Self {
        Self {
            author: Self::SYSTEM_AUTHOR.to_string(),
            body: body.into(),
            color: Self::SYSTEM_COLOR.to_string(),
            avatar: Self::SYSTEM_AVATAR.to_string(),
            sent_at: now,
        }
    }

    pub fn is_system(&self) -> bool {
        self.author == Self::SYSTEM_AUTHOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(name: &str) -> Participant {
        Participant::new(
            ConnectionId::new("conn-1".to_string()).unwrap(),
            ParticipantName::new(name.to_string()).unwrap(),
            Color::new("#336699".to_string()).unwrap(),
            AvatarGlyph::new("A".to_string()).unwrap(),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn test_display_name_has_idle_suffix_only_while_idle() {
        // テスト項目: アイドル中のみ表示名に " (idle)" が付く
        // given (前提条件):
        let mut alice = participant("Alice");

        // when (操作):
        let active = alice.display_name();
        alice.is_idle = true;
        let idle = alice.display_name();

        // then (期待する結果):
        assert_eq!(active, "Alice");
        assert_eq!(idle, "Alice (idle)");
        assert_eq!(alice.name.as_str(), "Alice");
    }

    #[test]
    fn test_chat_message_from_participant_uses_display_identity() {
        // テスト項目: 参加者のメッセージは送信時点の表示名・色・アバターを持つ
        // given (前提条件):
        let mut alice = participant("Alice");
        alice.is_idle = true;
        let body = MessageBody::new("hi".to_string()).unwrap();

        // when (操作):
        let message = ChatMessage::from_participant(&alice, body, Timestamp::new(2_000));

        // then (期待する結果):
        assert_eq!(message.author, "Alice (idle)");
        assert_eq!(message.body, "hi");
        assert_eq!(message.color, "#336699");
        assert_eq!(message.avatar, "A");
        assert_eq!(message.sent_at, Timestamp::new(2_000));
        assert!(!message.is_system());
    }

    #[test]
    fn test_system_message_identity() {
        // テスト項目: システムメッセージは Server 名義で黒・"S" アバター
        // given (前提条件):

        // when (操作):
        let message = ChatMessage::system("Alice has joined the chat.", Timestamp::new(5));

        // then (期待する結果):
        assert!(message.is_system());
        assert_eq!(message.author, "Server");
        assert_eq!(message.color, "#000000");
        assert_eq!(message.avatar, "S");
    }
}
