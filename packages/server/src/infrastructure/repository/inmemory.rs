//! InMemory History Repository 実装
//!
//! `--no-persist` で起動した場合やテストで使用します。プロセスの終了とともに履歴は失われます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データ付きで作成
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn load(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self.messages.lock().await.clone())
    }

    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        self.messages.lock().await.push(message);
        Ok(())
    }

    async fn replace_all(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError> {
        *self.messages.lock().await = messages;
        Ok(())
    }
}
