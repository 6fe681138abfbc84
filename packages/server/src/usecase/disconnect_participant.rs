//! UseCase: 接続の切断処理
//!
//! 送信先の登録を解除し、参加者であれば一覧から外して退出を告知します。
//! 進行中のカウントダウンは取り消しません。

use crate::domain::{ConnectionId, Participant};

use super::context::SessionContext;

pub struct DisconnectParticipantUseCase {
    ctx: SessionContext,
}

impl DisconnectParticipantUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 参加者として登録されていた場合はその参加者
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;
        let broadcaster = &self.ctx.broadcaster;

        broadcaster.pusher().unregister_client(connection_id).await;
        let participant = session.remove(connection_id)?;

        tracing::info!("'{}' ({}) left", participant.name, connection_id);
        broadcaster.broadcast_presence(&session).await;
        broadcaster
            .announce(
                &mut session,
                format!("{} has left the chat.", participant.name),
                now,
            )
            .await;
        Some(participant)
    }
}
