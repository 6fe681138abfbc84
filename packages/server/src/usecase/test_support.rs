//! テスト用のセッション環境

use std::sync::Arc;

use lanai_shared::time::ManualClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, SessionConfig},
    infrastructure::{
        dto::websocket::{NoticeCode, ServerMessage},
        message_pusher::WebSocketMessagePusher,
        profanity::WordListFilter,
        repository::InMemoryHistoryRepository,
    },
};

use super::{
    connect_participant::ConnectParticipantUseCase, context::SessionContext,
    history_writer::HistoryWriter, register_participant::RegisterParticipantUseCase,
};

pub(crate) const START: i64 = 1_700_000_000_000;

pub(crate) struct TestHarness {
    pub ctx: SessionContext,
    pub clock: Arc<ManualClock>,
    pub repository: Arc<InMemoryHistoryRepository>,
}

impl TestHarness {
    /// スローモード無効の既定設定
    pub fn new() -> Self {
        Self::with_config(SessionConfig {
            slow_mode_enabled: false,
            ..SessionConfig::default()
        })
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let repository = Arc::new(InMemoryHistoryRepository::new());
        let writer = HistoryWriter::spawn(repository.clone());
        let ctx = SessionContext::new(
            config,
            Vec::new(),
            Arc::new(WebSocketMessagePusher::default()),
            writer,
        )
        .with_clock(clock.clone())
        .with_profanity_filter(Arc::new(WordListFilter::new(["darn"])));
        Self {
            ctx,
            clock,
            repository,
        }
    }

    /// 観測者として接続（登録はしない）。接続時に届くフレームは読み捨てる。
    pub async fn observe(&self, id: &str) -> (ConnectionId, Observer) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        ConnectParticipantUseCase::new(self.ctx.clone())
            .execute(connection_id.clone(), tx)
            .await;
        let mut observer = Observer { rx };
        observer.drain();
        (connection_id, observer)
    }

    /// 接続して参加者として登録。ここまでに届いたフレームは読み捨てる。
    pub async fn join(&self, id: &str, name: &str) -> (ConnectionId, Observer) {
        let (connection_id, mut observer) = self.observe(id).await;
        RegisterParticipantUseCase::new(self.ctx.clone())
            .execute(
                &connection_id,
                name.to_string(),
                "#336699".to_string(),
                name.chars().next().unwrap().to_uppercase().to_string(),
            )
            .await
            .unwrap();
        observer.drain();
        (connection_id, observer)
    }
}

pub(crate) struct Observer {
    rx: mpsc::UnboundedReceiver<String>,
}

impl Observer {
    /// 受信済みのフレームをすべて取り出す
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    pub fn notices(&mut self) -> Vec<(NoticeCode, String)> {
        self.drain()
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::Notice { code, text } => Some((code, text)),
                _ => None,
            })
            .collect()
    }

    /// 受信済みの公開チャットの本文
    pub fn chat_bodies(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::Chat { message } => Some(message.body),
                _ => None,
            })
            .collect()
    }
}
