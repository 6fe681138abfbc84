//! UseCase: 受信イベントの振り分け
//!
//! 1 つの接続から届いたイベントを種類ごとのユースケースに渡します。
//! ユースケースが返したエラーはその接続だけに通知として送り、接続は維持します。

use crate::domain::{ConnectionId, InboundEvent, Notice, SessionError};

use super::{
    context::SessionContext, register_participant::RegisterParticipantUseCase,
    relay_typing::RelayTypingUseCase, rename_participant::RenameParticipantUseCase,
    send_message::SendMessageUseCase, send_private_message::SendPrivateMessageUseCase,
};

pub struct DispatchEventUseCase {
    ctx: SessionContext,
    register: RegisterParticipantUseCase,
    rename: RenameParticipantUseCase,
    send_message: SendMessageUseCase,
    send_private_message: SendPrivateMessageUseCase,
    relay_typing: RelayTypingUseCase,
}

impl DispatchEventUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            register: RegisterParticipantUseCase::new(ctx.clone()),
            rename: RenameParticipantUseCase::new(ctx.clone()),
            send_message: SendMessageUseCase::new(ctx.clone()),
            send_private_message: SendPrivateMessageUseCase::new(ctx.clone()),
            relay_typing: RelayTypingUseCase::new(ctx.clone()),
            ctx,
        }
    }

    /// Handle one event. A rejection is reported to the sender and also returned.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        event: InboundEvent,
    ) -> Result<(), SessionError> {
        let kind = event.kind();
        let result = match event {
            InboundEvent::Register {
                name,
                color,
                avatar,
            } => {
                self.register
                    .execute(connection_id, name, color, avatar)
                    .await
            }
            InboundEvent::Rename { name } => self.rename.execute(connection_id, name).await,
            InboundEvent::Chat { body } => self.send_message.execute(connection_id, body).await,
            InboundEvent::PrivateMessage { recipient, body } => {
                self.send_private_message
                    .execute(connection_id, recipient, body)
                    .await
            }
            InboundEvent::Typing { is_typing } => {
                self.relay_typing.execute(connection_id, is_typing).await;
                Ok(())
            }
            InboundEvent::Activity => {
                self.record_activity(connection_id).await;
                Ok(())
            }
        };

        if let Err(e) = &result {
            tracing::info!("Rejected {} from '{}': {}", kind, connection_id, e);
            self.ctx
                .broadcaster
                .notify(connection_id, Notice::from(e))
                .await;
        }
        result
    }

    /// Send a notice to one connection outside of event handling (e.g. an unparsable frame).
    pub async fn notify(&self, connection_id: &ConnectionId, notice: Notice) {
        self.ctx.broadcaster.notify(connection_id, notice).await;
    }

    async fn record_activity(&self, connection_id: &ConnectionId) {
        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;
        if session.touch(connection_id, now).is_err() {
            tracing::debug!("Ignoring activity from unregistered '{}'", connection_id);
        }
    }
}
