//! UseCase: 個別メッセージの送信処理
//!
//! 宛先は canonical name（大文字・小文字を区別しない）で解決し、宛先の接続にだけ届けます。
//! 個別メッセージは履歴に残りません。

use crate::domain::{ConnectionId, MessageBody, SessionError, SessionEvent, contains_profanity};

use super::context::SessionContext;

pub struct SendPrivateMessageUseCase {
    ctx: SessionContext,
}

impl SendPrivateMessageUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        recipient: String,
        body: String,
    ) -> Result<(), SessionError> {
        let body = MessageBody::new(body)?;
        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;

        let route = session.admit_private(connection_id, &recipient, now)?;
        if contains_profanity(self.ctx.profanity.as_ref(), body.as_str()) {
            tracing::info!("Blocked private message from '{}'", route.sender_display_name);
            return Err(SessionError::ContentBlocked);
        }

        tracing::debug!(
            "Private message '{}' -> '{}'",
            route.sender_display_name,
            route.recipient_name
        );
        self.ctx
            .broadcaster
            .send_to(
                &route.recipient,
                SessionEvent::PrivateMessage {
                    from: route.sender_display_name,
                    body: body.into_string(),
                    sent_at: now,
                },
            )
            .await;
        Ok(())
    }
}
