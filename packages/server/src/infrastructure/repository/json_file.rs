//! JSON ファイルを使った HistoryRepository 実装
//!
//! 履歴全体を 1 つの JSON 配列として保存します。書き込みのたびにファイル全体を
//! 一時ファイルへ書き出してから rename で置き換えるため、1 件の追加は O(n) です。
//! 読み込めないファイルは `<name>.corrupt` へ退避し、空の履歴から書き直します。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryRepository, RepositoryError};

pub struct JsonFileHistoryRepository {
    path: PathBuf,
    /// ファイルの内容のキャッシュ（最初の読み込みまでは `None`）
    cache: Mutex<Option<Vec<ChatMessage>>>,
}

impl JsonFileHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    async fn read_file(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, messages: &[ChatMessage]) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(messages)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp_path = self.sibling_path(".tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            "Wrote {} message(s) to '{}'",
            messages.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Move an unparsable history file out of the way so later writes start fresh.
    async fn quarantine(&self) {
        let corrupt_path = self.sibling_path(".corrupt");
        match tokio::fs::rename(&self.path, &corrupt_path).await {
            Ok(()) => tracing::warn!(
                "Moved unreadable history '{}' to '{}'",
                self.path.display(),
                corrupt_path.display()
            ),
            Err(e) => tracing::warn!(
                "Failed to move unreadable history '{}' aside: {}",
                self.path.display(),
                e
            ),
        }
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryRepository for JsonFileHistoryRepository {
    async fn load(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut cache = self.cache.lock().await;
        match self.read_file().await {
            Ok(messages) => {
                *cache = Some(messages.clone());
                Ok(messages)
            }
            Err(RepositoryError::Serialization(e)) => {
                // Appends continue from an empty history instead of re-reading the bad file
                self.quarantine().await;
                *cache = Some(Vec::new());
                Err(RepositoryError::Serialization(e))
            }
            Err(e) => Err(e),
        }
    }

    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        let messages = cache.get_or_insert_with(Vec::new);
        messages.push(message);
        self.write_file(messages).await
    }

    async fn replace_all(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError> {
        let mut cache = self.cache.lock().await;
        let messages = cache.insert(messages);
        self.write_file(messages).await
    }
}
