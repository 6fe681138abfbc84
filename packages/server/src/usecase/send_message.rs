//! UseCase: 公開チャットの送信処理
//!
//! ## 処理の流れ
//!
//! 1. 一時停止・kick・スローモードの判定（`Session::admit_chat`）
//! 2. 予約プレフィックスで始まる本文はモデレーションコマンドとして処理し、チャットには流さない
//! 3. 禁止語を含む本文は拒否（配信も保存もしない）
//! 4. それ以外は全員に配信し、履歴に追加

use crate::domain::{
    ChatMessage, ConnectionId, MessageBody, ModerationCommand, SessionError, contains_profanity,
};

use super::{context::SessionContext, moderate::ModerateUseCase};

pub struct SendMessageUseCase {
    ctx: SessionContext,
    moderate: ModerateUseCase,
}

impl SendMessageUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        let moderate = ModerateUseCase::new(ctx.clone());
        Self { ctx, moderate }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        body: String,
    ) -> Result<(), SessionError> {
        let body = MessageBody::new(body)?;
        let command = ModerationCommand::parse(body.as_str());

        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;
        let sender = session
            .admit_chat(connection_id, command.as_ref(), now)?
            .clone();

        if let Some(command) = command {
            tracing::info!("'{}' issued moderation command {:?}", sender.name, command);
            return self
                .moderate
                .execute_locked(&mut session, connection_id, command, now)
                .await;
        }

        if contains_profanity(self.ctx.profanity.as_ref(), body.as_str()) {
            tracing::info!("Blocked message from '{}'", sender.name);
            return Err(SessionError::ContentBlocked);
        }

        tracing::debug!("'{}': {}", sender.name, body.as_str());
        let message = ChatMessage::from_participant(&sender, body, now);
        self.ctx.broadcaster.publish(&mut session, message).await;
        Ok(())
    }
}
