//! UseCase: 参加者の名前変更

use crate::domain::{ConnectionId, ParticipantName, SessionError, SessionEvent};

use super::context::SessionContext;

pub struct RenameParticipantUseCase {
    ctx: SessionContext,
}

impl RenameParticipantUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 名前変更を実行（色・アバターは変わらない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        new_name: String,
    ) -> Result<(), SessionError> {
        let new_name = ParticipantName::new(new_name)?;
        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;

        let previous = session.rename(connection_id, new_name.clone())?;
        let broadcaster = &self.ctx.broadcaster;
        broadcaster
            .send_to(
                connection_id,
                SessionEvent::Registered {
                    name: new_name.as_str().to_string(),
                },
            )
            .await;
        if previous == new_name {
            return Ok(());
        }

        tracing::info!("'{}' renamed '{}' -> '{}'", connection_id, previous, new_name);
        broadcaster.broadcast_presence(&session).await;
        broadcaster
            .announce(
                &mut session,
                format!("{} changed username to {}.", previous, new_name),
                now,
            )
            .await;
        Ok(())
    }
}
