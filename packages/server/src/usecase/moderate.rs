//! UseCase: モデレーションコマンドの実行
//!
//! 昇格トークン（予約プレフィックスのみ）を 1 回受け付けるたびにハンドシェイクを進め、
//! GRANTED の接続からのコマンドだけを実行します。カウントダウンを伴うコマンドは
//! `TaskScheduler` に登録したタスクとして進み、1 ティックごとにセッションのロックを取り直します。

use crate::domain::{
    COMMAND_PREFIX, ConnectionId, CountdownKey, EscalationOutcome, ModerationCommand, Notice,
    NoticeKind, Session, SessionError, SessionEvent, Timestamp, help_text,
};

use super::context::SessionContext;

pub struct ModerateUseCase {
    ctx: SessionContext,
}

impl ModerateUseCase {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Run `command` for `issuer`. The caller holds the session lock and has
    /// already passed the chat admission gates.
    pub async fn execute_locked(
        &self,
        session: &mut Session,
        issuer: &ConnectionId,
        command: ModerationCommand,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        match command {
            ModerationCommand::Escalate => {
                self.escalate(session, issuer, now).await;
                Ok(())
            }
            _ if !session.is_granted(issuer) => {
                tracing::warn!("'{}' attempted a moderation command without admin access", issuer);
                Err(SessionError::NotAuthorized)
            }
            ModerationCommand::Help => {
                self.ctx.broadcaster.notify(issuer, Notice::info(help_text())).await;
                Ok(())
            }
            ModerationCommand::SlowMode(enabled) => {
                self.set_slow_mode(session, enabled, now).await;
                Ok(())
            }
            ModerationCommand::Suspend => self.suspend(session, now).await,
            ModerationCommand::Resume => {
                self.resume(session, now).await;
                Ok(())
            }
            ModerationCommand::Purge => self.purge().await,
            ModerationCommand::Kick(target) => self.kick(session, issuer, &target).await,
            ModerationCommand::Restart => self.restart().await,
            ModerationCommand::Unknown(raw) => {
                let text = format!(
                    "Unknown command \"{}\". Send \"{} help\" for the list of commands.",
                    raw, COMMAND_PREFIX
                );
                self.ctx.broadcaster.notify(issuer, Notice::info(text)).await;
                Ok(())
            }
        }
    }

    async fn escalate(&self, session: &mut Session, issuer: &ConnectionId, now: Timestamp) {
        let notice = match session.request_escalation(issuer, now) {
            EscalationOutcome::Pending => Notice::new(
                NoticeKind::EscalationPending,
                format!(
                    "Admin access requested. Send \"{}\" again within {} seconds to confirm.",
                    COMMAND_PREFIX,
                    self.ctx.config.escalation_window.as_secs()
                ),
            ),
            EscalationOutcome::Granted => {
                tracing::warn!("Admin access granted to '{}'", issuer);
                Notice::new(
                    NoticeKind::EscalationGranted,
                    format!(
                        "Admin access granted. Send \"{} help\" for the list of commands.",
                        COMMAND_PREFIX
                    ),
                )
            }
            EscalationOutcome::AlreadyGranted => Notice::info("Admin access is already granted."),
        };
        self.ctx.broadcaster.notify(issuer, notice).await;
    }

    async fn set_slow_mode(&self, session: &mut Session, enabled: bool, now: Timestamp) {
        session.set_slow_mode(enabled);
        let state = if enabled { "enabled" } else { "disabled" };
        self.ctx
            .broadcaster
            .announce(session, format!("Slow mode has been {} by admin.", state), now)
            .await;
    }

    async fn suspend(&self, session: &mut Session, now: Timestamp) -> Result<(), SessionError> {
        let ctx = self.ctx.clone();
        let delay = self.ctx.config.suspend_delay;
        self.ctx
            .scheduler
            .schedule(CountdownKey::Suspend, async move {
                tokio::time::sleep(delay).await;
                let now = ctx.now();
                let mut session = ctx.session.lock().await;
                if session.set_suspended(true) {
                    ctx.broadcaster
                        .broadcast(SessionEvent::SuspendedState(true))
                        .await;
                    ctx.broadcaster
                        .announce(&mut session, "Chat has been suspended by admin.", now)
                        .await;
                }
            })
            .await?;

        self.ctx
            .broadcaster
            .announce(
                session,
                format!("Chat will be suspended in {}.", seconds(delay.as_secs())),
                now,
            )
            .await;
        Ok(())
    }

    async fn resume(&self, session: &mut Session, now: Timestamp) {
        if self.ctx.scheduler.cancel(&CountdownKey::Suspend).await {
            tracing::info!("Pending suspend cancelled by resume");
        }
        session.set_suspended(false);
        self.ctx
            .broadcaster
            .broadcast(SessionEvent::SuspendedState(false))
            .await;
        self.ctx
            .broadcaster
            .announce(session, "Chat has been resumed by admin.", now)
            .await;
    }

    async fn purge(&self) -> Result<(), SessionError> {
        let ctx = self.ctx.clone();
        self.ctx
            .scheduler
            .schedule(CountdownKey::Purge, async move {
                let tick = ctx.config.countdown_tick;
                for remaining in (1..=ctx.config.purge_countdown).rev() {
                    {
                        let now = ctx.now();
                        let mut session = ctx.session.lock().await;
                        ctx.broadcaster
                            .announce(
                                &mut session,
                                format!("Clearing chat history in {}...", seconds(remaining.into())),
                                now,
                            )
                            .await;
                    }
                    tokio::time::sleep(tick).await;
                }

                let now = ctx.now();
                let mut session = ctx.session.lock().await;
                session.clear_history();
                ctx.broadcaster.writer().replace_all(Vec::new());
                ctx.broadcaster.broadcast(SessionEvent::HistoryCleared).await;
                ctx.broadcaster
                    .announce(&mut session, "Chat history has been cleared.", now)
                    .await;
            })
            .await
    }

    async fn kick(
        &self,
        session: &mut Session,
        issuer: &ConnectionId,
        target_name: &str,
    ) -> Result<(), SessionError> {
        let target = session
            .find_by_name(target_name)
            .ok_or_else(|| SessionError::TargetNotFound(target_name.trim().to_string()))?;
        if target.is_kicked {
            return Err(SessionError::TargetAlreadyKicked(target.name.to_string()));
        }
        let target_id = target.connection_id.clone();
        let target_name = target.name.to_string();

        let ctx = self.ctx.clone();
        let issuer_id = issuer.clone();
        let kicked_name = target_name.clone();
        self.ctx
            .scheduler
            .schedule(CountdownKey::Kick(target_id.clone()), async move {
                let tick = ctx.config.countdown_tick;
                for remaining in (1..=ctx.config.kick_countdown).rev() {
                    ctx.broadcaster
                        .notify(
                            &target_id,
                            Notice::new(
                                NoticeKind::KickCountdown,
                                format!("You will be kicked in {}...", remaining),
                            ),
                        )
                        .await;
                    tokio::time::sleep(tick).await;
                }

                let now = ctx.now();
                let mut session = ctx.session.lock().await;
                match session.kick(&target_id) {
                    Ok(kicked) => {
                        tracing::warn!("'{}' was kicked", kicked.name);
                        ctx.broadcaster
                            .notify(&target_id, Notice::new(NoticeKind::Kicked, "You were kicked."))
                            .await;
                        ctx.broadcaster
                            .notify(&issuer_id, Notice::info(format!("Kicked {}", kicked.name)))
                            .await;
                        ctx.broadcaster
                            .announce(
                                &mut session,
                                format!("{} was kicked by admin.", kicked.name),
                                now,
                            )
                            .await;
                    }
                    Err(SessionError::NotRegistered) => {
                        tracing::info!("Kick target '{}' left before the countdown ended", kicked_name);
                        ctx.broadcaster
                            .notify(
                                &issuer_id,
                                Notice::info(format!("{} left before the kick completed.", kicked_name)),
                            )
                            .await;
                    }
                    Err(e) => {
                        ctx.broadcaster.notify(&issuer_id, Notice::from(&e)).await;
                    }
                }
            })
            .await?;

        let text = format!(
            "Kicking {} in {}.",
            target_name,
            seconds(self.ctx.config.kick_countdown.into())
        );
        self.ctx.broadcaster.notify(issuer, Notice::info(text)).await;
        Ok(())
    }

    async fn restart(&self) -> Result<(), SessionError> {
        let ctx = self.ctx.clone();
        self.ctx
            .scheduler
            .schedule(CountdownKey::Restart, async move {
                let tick = ctx.config.countdown_tick;
                for remaining in (1..=ctx.config.restart_countdown).rev() {
                    {
                        let now = ctx.now();
                        let mut session = ctx.session.lock().await;
                        ctx.broadcaster
                            .announce(
                                &mut session,
                                format!("Server restarting in {}...", seconds(remaining.into())),
                                now,
                            )
                            .await;
                    }
                    tokio::time::sleep(tick).await;
                }

                ctx.broadcaster.writer().flush().await;
                tracing::warn!("Restart requested by admin, shutting down");
                ctx.shutdown.trigger();
            })
            .await?;

        self.ctx
            .broadcaster
            .broadcast(SessionEvent::ShutdownAnnounced)
            .await;
        Ok(())
    }
}

fn seconds(n: u64) -> String {
    if n == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::HistoryRepository;
    use crate::{
        domain::SessionConfig,
        infrastructure::dto::websocket::{NoticeCode, ServerMessage},
        usecase::{
            send_message::SendMessageUseCase,
            test_support::{Observer, TestHarness},
        },
    };

    use std::time::Duration;

    const SETTLE: Duration = Duration::from_millis(100);

    /// カウントダウン全体の所要時間
    fn countdown_duration(ticks: u32, tick: Duration) -> Duration {
        tick * ticks
    }

    struct Admin {
        id: ConnectionId,
        rx: Observer,
        send: SendMessageUseCase,
    }

    impl Admin {
        async fn say(&self, body: &str) -> Result<(), SessionError> {
            self.send.execute(&self.id, body.to_string()).await
        }
    }

    /// 昇格済みの管理者を用意する
    async fn granted_admin(harness: &TestHarness) -> Admin {
        let (id, mut rx) = harness.join("admin", "admin").await;
        let send = SendMessageUseCase::new(harness.ctx.clone());
        send.execute(&id, "server init".to_string()).await.unwrap();
        harness.clock.advance(1_000);
        send.execute(&id, "server init".to_string()).await.unwrap();
        rx.drain();
        Admin { id, rx, send }
    }

    #[tokio::test]
    async fn test_escalation_handshake_notices() {
        // テスト項目: 1 回目は PENDING、ウィンドウ内の 2 回目は GRANTED、3 回目は付与済みの通知
        // given (前提条件):
        let harness = TestHarness::new();
        let (alice, mut alice_rx) = harness.join("c1", "alice").await;
        let send = SendMessageUseCase::new(harness.ctx.clone());

        // when (操作):
        send.execute(&alice, "server init".to_string()).await.unwrap();
        harness.clock.advance(3_000);
        send.execute(&alice, "SERVER  INIT".to_string()).await.unwrap();
        harness.clock.advance(1_000);
        send.execute(&alice, "server init".to_string()).await.unwrap();

        // then (期待する結果):
        let codes: Vec<NoticeCode> = alice_rx.notices().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            codes,
            vec![
                NoticeCode::EscalationPending,
                NoticeCode::EscalationGranted,
                NoticeCode::Info
            ]
        );
    }

    #[tokio::test]
    async fn test_escalation_window_lapses() {
        // テスト項目: トークン → 10 秒超 → トークン は PENDING のままで、コマンドは NotAuthorized
        // given (前提条件):
        let harness = TestHarness::new();
        let (alice, mut alice_rx) = harness.join("c1", "alice").await;
        let send = SendMessageUseCase::new(harness.ctx.clone());

        // when (操作):
        send.execute(&alice, "server init".to_string()).await.unwrap();
        harness.clock.advance(10_001);
        send.execute(&alice, "server init".to_string()).await.unwrap();
        let command = send.execute(&alice, "server init slowmode on".to_string()).await;

        // then (期待する結果):
        let codes: Vec<NoticeCode> = alice_rx.notices().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            codes,
            vec![NoticeCode::EscalationPending, NoticeCode::EscalationPending]
        );
        assert_eq!(command, Err(SessionError::NotAuthorized));
    }

    #[tokio::test]
    async fn test_non_admin_command_has_no_side_effects() {
        // テスト項目: 昇格していない接続のコマンドは NotAuthorized で、状態は変わらない
        // given (前提条件):
        let harness = TestHarness::new();
        let (bob, _bob_rx) = harness.join("c2", "bob").await;
        let (_alice, mut alice_rx) = harness.join("c1", "alice").await;

        // when (操作):
        let result = SendMessageUseCase::new(harness.ctx.clone())
            .execute(&bob, "server init suspend".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotAuthorized));
        assert!(alice_rx.drain().is_empty());
        assert!(harness.ctx.scheduler.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        // テスト項目: help は管理者本人にコマンド一覧を送る
        // given (前提条件):
        let harness = TestHarness::new();
        let mut admin = granted_admin(&harness).await;

        // when (操作):
        admin.say("server init help").await.unwrap();

        // then (期待する結果):
        let notices = admin.rx.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].1.contains("kick <name>"));
    }

    #[tokio::test]
    async fn test_unknown_subcommand_is_reported() {
        // テスト項目: 未知のサブコマンドは管理者本人に通知される
        // given (前提条件):
        let harness = TestHarness::new();
        let mut admin = granted_admin(&harness).await;

        // when (操作):
        admin.say("server init dance").await.unwrap();

        // then (期待する結果):
        let notices = admin.rx.notices();
        assert!(notices[0].1.contains("Unknown command \"dance\""));
    }

    #[tokio::test]
    async fn test_slow_mode_toggle_is_announced() {
        // テスト項目: スローモードの切り替えは全員に告知される
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;
        let (_bob, mut bob_rx) = harness.join("c2", "bob").await;

        // when (操作):
        admin.say("server init slowmode on").await.unwrap();

        // then (期待する結果):
        assert!(harness.ctx.session.lock().await.moderation().slow_mode_enabled);
        assert_eq!(
            bob_rx.chat_bodies(),
            vec!["Slow mode has been enabled by admin.".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_flips_after_delay_and_resume_restores() {
        // テスト項目: suspend は遅延の後に一時停止し、resume で即座に解除される
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;
        let (bob, mut bob_rx) = harness.join("c2", "bob").await;
        let bob_send = SendMessageUseCase::new(harness.ctx.clone());

        // when (操作):
        admin.say("server init suspend").await.unwrap();
        let before_delay = harness.ctx.session.lock().await.moderation().suspended;
        tokio::time::sleep(harness.ctx.config.suspend_delay + SETTLE).await;
        let suspended = harness.ctx.session.lock().await.moderation().suspended;
        let refused = bob_send.execute(&bob, "anyone?".to_string()).await;
        let frames = bob_rx.drain();
        admin.say("server init resume").await.unwrap();

        // then (期待する結果):
        assert!(!before_delay);
        assert!(suspended);
        assert_eq!(refused, Err(SessionError::ChatSuspended));
        assert!(frames.contains(&ServerMessage::SuspendedState { suspended: true }));
        assert!(!harness.ctx.session.lock().await.moderation().suspended);
        assert!(bob_rx.drain().contains(&ServerMessage::SuspendedState { suspended: false }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_cancels_pending_suspend() {
        // テスト項目: 遅延中の suspend は resume で取り消され、一時停止にならない
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;

        // when (操作):
        admin.say("server init suspend").await.unwrap();
        admin.say("server init resume").await.unwrap();
        tokio::time::sleep(harness.ctx.config.suspend_delay * 2).await;

        // then (期待する結果):
        assert!(!harness.ctx.session.lock().await.moderation().suspended);
        assert!(harness.ctx.scheduler.pending().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_counts_down_then_clears() {
        // テスト項目: purge は 10→1 のカウントダウンの後、メモリと永続化ストアの履歴を消去する
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;
        let (_bob, mut bob_rx) = harness.join("c2", "bob").await;
        admin.say("before purge").await.unwrap();
        bob_rx.drain();

        // when (操作):
        admin.say("server init purge").await.unwrap();
        let duplicate = admin.say("server init purge").await;
        let config = harness.ctx.config.clone();
        tokio::time::sleep(countdown_duration(config.purge_countdown, config.countdown_tick) + SETTLE).await;
        harness.ctx.broadcaster.writer().flush().await;

        // then (期待する結果):
        assert_eq!(duplicate, Err(SessionError::AlreadyScheduled("purge".to_string())));
        let frames = bob_rx.drain();
        let countdown: Vec<String> = frames
            .iter()
            .filter_map(|m| match m {
                ServerMessage::Chat { message } if message.body.starts_with("Clearing") => {
                    Some(message.body.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(countdown.len(), 10);
        assert_eq!(countdown[0], "Clearing chat history in 10 seconds...");
        assert_eq!(countdown[9], "Clearing chat history in 1 second...");
        assert!(frames.contains(&ServerMessage::HistoryCleared));

        let history = harness.ctx.session.lock().await.history().to_vec();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].body, "Chat history has been cleared.");
        let stored = harness.repository.load().await.unwrap();
        assert_eq!(stored, history);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kick_countdown_then_refuses_chat() {
        // テスト項目: kick は対象者だけに 5→1 のカウントダウンを送り、その後の発言を AlreadyKicked にする（接続は維持）
        // given (前提条件):
        let harness = TestHarness::new();
        let mut admin = granted_admin(&harness).await;
        let (bob, mut bob_rx) = harness.join("c2", "bob").await;
        let (_carol, mut carol_rx) = harness.join("c3", "carol").await;

        // when (操作):
        admin.say("server init kick BOB").await.unwrap();
        let config = harness.ctx.config.clone();
        tokio::time::sleep(countdown_duration(config.kick_countdown, config.countdown_tick) + SETTLE).await;
        let result = SendMessageUseCase::new(harness.ctx.clone())
            .execute(&bob, "let me back".to_string())
            .await;

        // then (期待する結果):
        let bob_notices = bob_rx.notices();
        let countdown: Vec<&str> = bob_notices
            .iter()
            .filter(|(code, _)| *code == NoticeCode::KickCountdown)
            .map(|(_, text)| text.as_str())
            .collect();
        assert_eq!(countdown.len(), 5);
        assert_eq!(countdown[0], "You will be kicked in 5...");
        assert!(bob_notices.iter().any(|(code, _)| *code == NoticeCode::Kicked));
        assert!(carol_rx
            .notices()
            .iter()
            .all(|(code, _)| *code != NoticeCode::KickCountdown));
        assert!(admin.rx.notices().iter().any(|(_, text)| text == "Kicked bob"));
        assert_eq!(result, Err(SessionError::AlreadyKicked));
        assert!(harness.ctx.session.lock().await.find(&bob).is_some());
    }

    #[tokio::test]
    async fn test_kick_unknown_target_tells_issuer_only() {
        // テスト項目: 存在しない対象の kick は TargetNotFound になる
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;

        // when (操作):
        let result = admin.say("server init kick nobody").await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::TargetNotFound("nobody".to_string())));
        assert!(harness.ctx.scheduler.pending().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kick_survives_issuer_disconnect_and_target_leaving() {
        // テスト項目: 発行者が切断してもカウントダウンは続き、対象者が退出していれば何もせず終わる
        // given (前提条件):
        let harness = TestHarness::new();
        let admin = granted_admin(&harness).await;
        let (bob, _bob_rx) = harness.join("c2", "bob").await;
        admin.say("server init kick bob").await.unwrap();

        // when (操作):
        let disconnect =
            crate::usecase::disconnect_participant::DisconnectParticipantUseCase::new(harness.ctx.clone());
        disconnect.execute(&admin.id).await;
        disconnect.execute(&bob).await;
        let config = harness.ctx.config.clone();
        tokio::time::sleep(countdown_duration(config.kick_countdown, config.countdown_tick) + SETTLE).await;

        // then (期待する結果):
        assert!(harness.ctx.scheduler.pending().await.is_empty());
        let history = harness.ctx.session.lock().await.history().to_vec();
        assert!(history.iter().all(|m| !m.body.contains("was kicked")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_announces_and_triggers_shutdown() {
        // テスト項目: restart は即座に shutdown-announced を送り、カウントダウン後に履歴を保存して終了を要求する
        // given (前提条件):
        let harness = TestHarness::with_config(SessionConfig {
            slow_mode_enabled: false,
            restart_countdown: 3,
            ..SessionConfig::default()
        });
        let admin = granted_admin(&harness).await;
        let (_bob, mut bob_rx) = harness.join("c2", "bob").await;
        let mut shutdown_rx = harness.ctx.shutdown.subscribe();

        // when (操作):
        admin.say("server init restart").await.unwrap();
        let first = bob_rx.drain();
        tokio::time::timeout(Duration::from_secs(10), shutdown_rx.changed())
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        assert_eq!(first[0], ServerMessage::ShutdownAnnounced);
        assert!(harness.ctx.shutdown.is_triggered());
        let stored = harness.repository.load().await.unwrap();
        assert_eq!(stored.last().unwrap().body, "Server restarting in 1 second...");
    }
}
