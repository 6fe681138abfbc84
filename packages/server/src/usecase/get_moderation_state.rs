//! UseCase: モデレーション状態の取得（HTTP API 用）

use crate::domain::GlobalModerationState;

use super::context::SessionContext;

/// Global flags plus the countdowns currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationSnapshot {
    pub state: GlobalModerationState,
    pub pending_countdowns: Vec<String>,
}

pub struct GetModerationStateUseCase {
    ctx: SessionContext,
}

impl GetModerationStateUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self) -> ModerationSnapshot {
        let state = self.ctx.session.lock().await.moderation();
        let pending_countdowns = self.ctx.scheduler.pending().await;
        ModerationSnapshot {
            state,
            pending_countdowns,
        }
    }
}
