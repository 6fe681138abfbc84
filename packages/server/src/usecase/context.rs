//! Shared dependencies of every use case.

use std::sync::Arc;

use lanai_shared::time::{Clock, SystemClock};
use tokio::sync::{Mutex, watch};

use crate::domain::{
    ChatMessage, CountdownKey, MessagePusher, NoProfanityFilter, ProfanityFilter, Session,
    SessionConfig, Timestamp,
};

use super::{broadcaster::Broadcaster, history_writer::HistoryWriter, scheduler::TaskScheduler};

/// Process-wide shutdown switch flipped by the admin restart command.
#[derive(Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ShutdownTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a use case needs, cheap to clone.
///
/// The session lives behind a single lock; use cases take it once per event
/// and fan out through the broadcaster while holding it.
#[derive(Clone)]
pub struct SessionContext {
    pub session: Arc<Mutex<Session>>,
    pub broadcaster: Arc<Broadcaster>,
    pub scheduler: Arc<TaskScheduler<CountdownKey>>,
    pub profanity: Arc<dyn ProfanityFilter>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<SessionConfig>,
    pub shutdown: ShutdownTrigger,
}

impl SessionContext {
    pub fn new(
        config: SessionConfig,
        history: Vec<ChatMessage>,
        pusher: Arc<dyn MessagePusher>,
        writer: HistoryWriter,
    ) -> Self {
        let session = Session::with_history(&config, history);
        Self {
            session: Arc::new(Mutex::new(session)),
            broadcaster: Arc::new(Broadcaster::new(pusher, writer)),
            scheduler: Arc::new(TaskScheduler::new()),
            profanity: Arc::new(NoProfanityFilter),
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
            shutdown: ShutdownTrigger::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_profanity_filter(mut self, filter: Arc<dyn ProfanityFilter>) -> Self {
        self.profanity = filter;
        self
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}
