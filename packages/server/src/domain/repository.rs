//! Repository trait 定義
//!
//! ドメイン層が必要とする履歴ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError};

/// History Repository trait
///
/// 公開チャットの履歴を永続化する外部コラボレーター。
/// 起動時に `load` で読み込み、以降は `append` / `replace_all` で書き込みます。
///
/// ## 依存性の逆転（DIP）
///
/// - UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない
/// - 書き込みの失敗はメモリ上の状態に影響しない（ログに残すのみ）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 永続化されている履歴を送信順に取得
    async fn load(&self) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// メッセージを 1 件追加
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// 履歴全体を置き換え（履歴の消去に使用）
    async fn replace_all(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError>;
}
