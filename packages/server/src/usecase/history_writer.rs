//! Ordered single writer in front of the history store.
//!
//! Writes are queued on an unbounded channel and applied one at a time by a
//! background task, so fan-out never waits on disk I/O and the store sees
//! writes in the order the session produced them.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ChatMessage, HistoryRepository};

enum WriteCommand {
    Append(ChatMessage),
    ReplaceAll(Vec<ChatMessage>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Cloning shares the same queue.
#[derive(Clone)]
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl HistoryWriter {
    /// Spawn the writer task. It runs until every handle is dropped.
    pub fn spawn(repository: Arc<dyn HistoryRepository>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Append(message) => {
                        if let Err(e) = repository.append(message).await {
                            tracing::warn!("Failed to append to chat history: {}", e);
                        }
                    }
                    WriteCommand::ReplaceAll(messages) => {
                        if let Err(e) = repository.replace_all(messages).await {
                            tracing::warn!("Failed to rewrite chat history: {}", e);
                        }
                    }
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("History writer stopped");
        });

        Self { tx }
    }

    pub fn append(&self, message: ChatMessage) {
        self.enqueue(WriteCommand::Append(message));
    }

    pub fn replace_all(&self, messages: Vec<ChatMessage>) {
        self.enqueue(WriteCommand::ReplaceAll(messages));
    }

    /// Wait until every write queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.enqueue(WriteCommand::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn enqueue(&self, command: WriteCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("History writer is gone; dropping write");
        }
    }
}
