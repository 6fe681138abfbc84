//! UseCase: 参加者一覧の取得（HTTP API 用）

use crate::domain::Participant;

use super::context::SessionContext;

pub struct GetParticipantsUseCase {
    ctx: SessionContext,
}

impl GetParticipantsUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 登録済みの参加者を参加順で返す
    pub async fn execute(&self) -> Vec<Participant> {
        self.ctx.session.lock().await.participants().to_vec()
    }
}
