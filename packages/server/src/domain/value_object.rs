//! 値オブジェクト
//!
//! 生の `String` / `i64` をそのまま持ち回らず、生成時に検証済みであることを型で保証します。

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("name must not be empty")]
    EmptyName,

    #[error("name is too long (max {max} characters)")]
    NameTooLong { max: usize },

    #[error("name contains control characters")]
    NameHasControlCharacters,

    #[error("name '{0}' is reserved")]
    ReservedName(String),

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message is too long (max {max} characters)")]
    MessageTooLong { max: usize },

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid avatar '{0}'")]
    InvalidAvatar(String),
}

/// 接続（トランスポートセッション）の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ConnectionId の生成器（UUID v4）
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// 参加者名（canonical name）
///
/// 前後の空白は取り除かれ、入力された大文字・小文字はそのまま保持されます。
/// 一意性の判定・個別メッセージの宛先解決・kick 対象の検索はすべて
/// [`ParticipantName::canonical_key`]（小文字化したもの）で比較します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub const MAX_CHARS: usize = 32;

    /// System announcements are authored under this name.
    pub const RESERVED: &'static str = "Server";

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyName);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(ValueObjectError::NameTooLong {
                max: Self::MAX_CHARS,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValueObjectError::NameHasControlCharacters);
        }
        if canonicalize(trimmed) == canonicalize(Self::RESERVED) {
            return Err(ValueObjectError::ReservedName(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// 大文字・小文字を区別しない比較用のキー
    pub fn canonical_key(&self) -> String {
        canonicalize(&self.0)
    }

    /// `raw` がこの名前を指しているか（前後の空白と大文字・小文字を無視）
    pub fn matches(&self, raw: &str) -> bool {
        self.canonical_key() == canonicalize(raw.trim())
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn canonicalize(value: &str) -> String {
    value.to_lowercase()
}

/// メッセージ本文
///
/// 本文は送信されたまま保持します（空白のみの本文は不可）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    pub const MAX_CHARS: usize = 2000;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        if value.chars().count() > Self::MAX_CHARS {
            return Err(ValueObjectError::MessageTooLong {
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 表示色（`#` + 1〜8 桁の 16 進数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        let valid = trimmed
            .strip_prefix('#')
            .is_some_and(|hex| (1..=8).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if !valid {
            return Err(ValueObjectError::InvalidColor(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// アバター文字（1〜16 文字、空白を含まない）
///
/// 上限は char 数で数えるため、ZWJ で結合した絵文字（家族の絵文字など）も 1 つのアバターとして収まる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarGlyph(String);

impl AvatarGlyph {
    pub const MAX_CHARS: usize = 16;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        let count = trimmed.chars().count();
        if count == 0 || count > Self::MAX_CHARS || trimmed.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::InvalidAvatar(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `earlier` からの経過ミリ秒（時計が巻き戻った場合は 0）
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_name_is_trimmed() {
        // テスト項目: 参加者名の前後の空白が取り除かれる
        // given (前提条件):
        let raw = "  Alice  ".to_string();

        // when (操作):
        let name = ParticipantName::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_participant_name_matches_case_insensitively() {
        // テスト項目: 名前の比較は大文字・小文字を区別しない
        // given (前提条件):
        let name = ParticipantName::new("Alice".to_string()).unwrap();

        // when (操作):
        let lower = name.matches("alice");
        let upper = name.matches(" ALICE ");
        let other = name.matches("alicia");

        // then (期待する結果):
        assert!(lower);
        assert!(upper);
        assert!(!other);
        assert_eq!(name.canonical_key(), "alice");
    }

    #[test]
    fn test_participant_name_rejects_invalid_values() {
        // テスト項目: 空・長すぎる・制御文字・予約名は拒否される
        // given (前提条件):
        let too_long = "a".repeat(ParticipantName::MAX_CHARS + 1);

        // when (操作) / then (期待する結果):
        assert_eq!(
            ParticipantName::new("   ".to_string()),
            Err(ValueObjectError::EmptyName)
        );
        assert_eq!(
            ParticipantName::new(too_long),
            Err(ValueObjectError::NameTooLong {
                max: ParticipantName::MAX_CHARS
            })
        );
        assert_eq!(
            ParticipantName::new("bad\nname".to_string()),
            Err(ValueObjectError::NameHasControlCharacters)
        );
        assert!(matches!(
            ParticipantName::new("server".to_string()),
            Err(ValueObjectError::ReservedName(_))
        ));
    }

    #[test]
    fn test_message_body_keeps_original_text() {
        // テスト項目: 本文は送信されたまま保持され、空白のみは拒否される
        // given (前提条件):
        let raw = " hello there ".to_string();

        // when (操作):
        let body = MessageBody::new(raw.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(body.as_str(), raw);
        assert_eq!(
            MessageBody::new(" \t ".to_string()),
            Err(ValueObjectError::EmptyMessage)
        );
    }

    #[test]
    fn test_color_accepts_short_and_long_hex() {
        // テスト項目: 桁数の異なる 16 進カラーを受け付け、不正な値は拒否する
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert!(Color::new("#fff".to_string()).is_ok());
        assert!(Color::new("#1a2b3c".to_string()).is_ok());
        assert!(Color::new("#a1b2c".to_string()).is_ok());
        assert!(Color::new("red".to_string()).is_err());
        assert!(Color::new("#zzzzzz".to_string()).is_err());
        assert!(Color::new("#".to_string()).is_err());
    }

    #[test]
    fn test_avatar_glyph_limits() {
        // テスト項目: アバターは 1〜16 文字で空白を含まない
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(AvatarGlyph::new("A".to_string()).unwrap().as_str(), "A");
        assert!(AvatarGlyph::new("🦀".to_string()).is_ok());
        assert!(AvatarGlyph::new("".to_string()).is_err());
        assert!(AvatarGlyph::new("A B".to_string()).is_err());
        assert!(AvatarGlyph::new("A".repeat(AvatarGlyph::MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn test_avatar_accepts_zwj_emoji_sequence() {
        // テスト項目: ZWJ で結合した絵文字（複数の char からなる 1 つの絵文字）をアバターとして受け付ける
        // given (前提条件):
        let family = "👨\u{200d}👩\u{200d}👧\u{200d}👦".to_string();

        // when (操作):
        let result = AvatarGlyph::new(family.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), family);
    }

    #[test]
    fn test_timestamp_millis_since_never_negative() {
        // テスト項目: 経過時間は負にならない
        // given (前提条件):
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(3_500);

        // when (操作) / then (期待する結果):
        assert_eq!(later.millis_since(earlier), 2_500);
        assert_eq!(earlier.millis_since(later), 0);
    }

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: 生成される ConnectionId は一意
        // given (前提条件):

        // when (操作):
        let a = ConnectionIdFactory::generate();
        let b = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(ConnectionId::new(a.into_string()).is_ok());
        assert!(ConnectionId::new(" ".to_string()).is_err());
    }
}
