//! UseCase: 入力中表示の中継

use crate::domain::{ConnectionId, SessionEvent};

use super::context::SessionContext;

pub struct RelayTypingUseCase {
    ctx: SessionContext,
}

impl RelayTypingUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 送信者以外の全員に中継する。状態は持たない。
    pub async fn execute(&self, connection_id: &ConnectionId, is_typing: bool) {
        let session = self.ctx.session.lock().await;
        let Some(participant) = session.admit_typing(connection_id) else {
            return;
        };
        self.ctx
            .broadcaster
            .broadcast_except(
                connection_id,
                SessionEvent::Typing {
                    participant,
                    is_typing,
                },
            )
            .await;
    }
}
