//! ドメイン層のエラー定義

use thiserror::Error;

use super::value_object::ValueObjectError;

/// Rejections produced while handling a participant's event.
///
/// Every variant is recoverable: the offending connection is told privately
/// and no state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("connection is not registered")]
    NotRegistered,

    #[error("name '{0}' is already in use")]
    NameCollision(String),

    #[error("recipient '{0}' not found")]
    RecipientNotFound(String),

    #[error("user '{0}' not found")]
    TargetNotFound(String),

    #[error("user '{0}' is already kicked")]
    TargetAlreadyKicked(String),

    #[error("slow mode is enabled")]
    RateLimited,

    #[error("message blocked by the content filter")]
    ContentBlocked,

    #[error("not authorized")]
    NotAuthorized,

    #[error("chat is suspended")]
    ChatSuspended,

    #[error("participant has been kicked")]
    AlreadyKicked,

    #[error("{0} is already in progress")]
    AlreadyScheduled(String),
}

impl From<ValueObjectError> for SessionError {
    fn from(error: ValueObjectError) -> Self {
        SessionError::InvalidInput(error.to_string())
    }
}

/// 履歴ストアのエラー
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("history store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history store contents are invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
