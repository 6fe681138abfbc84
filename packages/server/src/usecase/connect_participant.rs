//! UseCase: 観測者の接続処理
//!
//! 接続直後のクライアントを送信先として登録し、履歴・一時停止状態・参加者一覧を
//! そのクライアントだけに送ります。セッションのロックを保持したまま行うため、
//! 履歴の再生より前にライブのイベントが届くことはありません。

use crate::domain::{ConnectionId, PusherChannel, SessionEvent};

use super::context::SessionContext;

pub struct ConnectParticipantUseCase {
    ctx: SessionContext,
}

impl ConnectParticipantUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let session = self.ctx.session.lock().await;
        let broadcaster = &self.ctx.broadcaster;

        broadcaster
            .pusher()
            .register_client(connection_id.clone(), sender)
            .await;
        broadcaster.replay(&connection_id, &session).await;
        broadcaster
            .send_to(
                &connection_id,
                SessionEvent::SuspendedState(session.moderation().suspended),
            )
            .await;
        broadcaster
            .send_to(
                &connection_id,
                SessionEvent::PresenceSnapshot(session.snapshot()),
            )
            .await;

        tracing::info!(
            "Observer '{}' connected ({} message(s) replayed)",
            connection_id,
            session.history().len()
        );
    }
}
