//! UseCase: 公開チャット履歴の取得（HTTP API 用）

use crate::domain::ChatMessage;

use super::context::SessionContext;

pub struct GetHistoryUseCase {
    ctx: SessionContext,
}

impl GetHistoryUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Oldest first, same order as the replay sent to new connections.
    pub async fn execute(&self) -> Vec<ChatMessage> {
        self.ctx.session.lock().await.history().to_vec()
    }
}
