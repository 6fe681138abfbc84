//! Fan-out of session events to connected observers.
//!
//! The broadcaster owns no business rules: it delivers what it is given, in
//! the order it is given, and forwards public messages to the history writer.
//! Delivery failures are logged and never surface to the caller.

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessagePusher, Notice, Session, SessionEvent, Timestamp,
};

use super::history_writer::HistoryWriter;

pub struct Broadcaster {
    pusher: Arc<dyn MessagePusher>,
    writer: HistoryWriter,
}

impl Broadcaster {
    pub fn new(pusher: Arc<dyn MessagePusher>, writer: HistoryWriter) -> Self {
        Self { pusher, writer }
    }

    pub fn pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.pusher
    }

    pub fn writer(&self) -> &HistoryWriter {
        &self.writer
    }

    pub async fn send_to(&self, target: &ConnectionId, event: SessionEvent) {
        if let Err(e) = self.pusher.push_to(target, &event).await {
            tracing::debug!("Dropped event for '{}': {}", target, e);
        }
    }

    pub async fn notify(&self, target: &ConnectionId, notice: Notice) {
        self.send_to(target, SessionEvent::Notice(notice)).await;
    }

    /// Deliver to every connected observer, registered or not.
    pub async fn broadcast(&self, event: SessionEvent) {
        let targets = self.pusher.registered_clients().await;
        if let Err(e) = self.pusher.broadcast(targets, &event).await {
            tracing::warn!("Broadcast failed: {}", e);
        }
    }

    pub async fn broadcast_except(&self, excluded: &ConnectionId, event: SessionEvent) {
        let targets: Vec<ConnectionId> = self
            .pusher
            .registered_clients()
            .await
            .into_iter()
            .filter(|id| id != excluded)
            .collect();
        if let Err(e) = self.pusher.broadcast(targets, &event).await {
            tracing::warn!("Broadcast failed: {}", e);
        }
    }

    pub async fn broadcast_presence(&self, session: &Session) {
        self.broadcast(SessionEvent::PresenceSnapshot(session.snapshot()))
            .await;
    }

    /// Append a public message to the history, deliver it and queue it for persistence.
    pub async fn publish(&self, session: &mut Session, message: ChatMessage) {
        session.record(message.clone());
        self.broadcast(SessionEvent::Chat(message.clone())).await;
        self.writer.append(message);
    }

    /// Publish a system announcement authored by the server.
    pub async fn announce(&self, session: &mut Session, body: impl Into<String>, now: Timestamp) {
        let body = body.into();
        tracing::info!("Announcement: {}", body);
        self.publish(session, ChatMessage::system(body, now)).await;
    }

    /// Send the full history to a single observer.
    pub async fn replay(&self, target: &ConnectionId, session: &Session) {
        self.send_to(target, SessionEvent::HistoryReplay(session.history().to_vec()))
            .await;
    }
}
