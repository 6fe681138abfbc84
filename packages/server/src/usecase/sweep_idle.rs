//! UseCase: アイドル検出
//!
//! 一定間隔でセッションを走査し、アイドル状態が変わった参加者がいれば
//! 参加者一覧を 1 回だけ全員に送ります。

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::domain::config::duration_millis;

use super::context::SessionContext;

pub struct SweepIdleUseCase {
    ctx: SessionContext,
}

impl SweepIdleUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// 1 回分の走査。一覧を送信した場合は `true`。
    pub async fn execute(&self) -> bool {
        let now = self.ctx.now();
        let threshold = duration_millis(self.ctx.config.idle_threshold);
        let mut session = self.ctx.session.lock().await;

        let transitions = session.sweep_idle(now, threshold);
        if transitions.is_empty() {
            return false;
        }
        for transition in &transitions {
            let state = if transition.idle { "idle" } else { "active" };
            tracing::info!("'{}' is now {}", transition.name, state);
        }
        self.ctx.broadcaster.broadcast_presence(&session).await;
        true
    }
}

/// Run the sweep every `period` until the runtime shuts down.
pub fn spawn_idle_monitor(usecase: Arc<SweepIdleUseCase>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            usecase.execute().await;
        }
    })
}
