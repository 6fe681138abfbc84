//! UseCase: 参加者の登録処理
//!
//! 観測者が名前・色・アバターを選んで参加者になります。登録済みの接続からの
//! 再登録は、参加順を保ったまま表示情報を置き換えます。

use crate::domain::{
    AvatarGlyph, Color, ConnectionId, ParticipantName, Registration, SessionError, SessionEvent,
};

use super::context::SessionContext;

pub struct RegisterParticipantUseCase {
    ctx: SessionContext,
}

impl RegisterParticipantUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 参加者登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功（参加者一覧と参加のお知らせを全員に送信済み）
    /// * `Err(SessionError)` - 入力不正・名前の重複・一時停止中
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        name: String,
        color: String,
        avatar: String,
    ) -> Result<(), SessionError> {
        let name = ParticipantName::new(name)?;
        let color = Color::new(color)?;
        let avatar = AvatarGlyph::new(avatar)?;

        let now = self.ctx.now();
        let mut session = self.ctx.session.lock().await;
        if session.moderation().suspended {
            return Err(SessionError::ChatSuspended);
        }

        let registration =
            session.register(connection_id.clone(), name.clone(), color, avatar, now)?;

        let broadcaster = &self.ctx.broadcaster;
        broadcaster
            .send_to(
                connection_id,
                SessionEvent::Registered {
                    name: name.as_str().to_string(),
                },
            )
            .await;
        broadcaster.broadcast_presence(&session).await;

        match registration {
            Registration::Joined => {
                tracing::info!("'{}' joined as '{}'", connection_id, name);
                broadcaster
                    .announce(&mut session, format!("{} has joined the chat.", name), now)
                    .await;
            }
            Registration::Reregistered { previous } if previous != name => {
                tracing::info!("'{}' re-registered as '{}' (was '{}')", connection_id, name, previous);
                broadcaster
                    .announce(
                        &mut session,
                        format!("{} changed username to {}.", previous, name),
                        now,
                    )
                    .await;
            }
            Registration::Reregistered { .. } => {}
        }

        Ok(())
    }
}
