//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, InboundEvent, Notice, NoticeKind},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: everything the session
/// pushes to this connection (via rx channel) is written to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Replay history, current moderation state and presence before anything live
    state
        .connect_participant_usecase
        .execute(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();
    let id_clone = connection_id.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => handle_text(&state_clone, &id_clone, text.as_str()).await,
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Some(participant) = state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        tracing::info!("'{}' left ({})", participant.name, connection_id);
    } else {
        tracing::info!("Connection '{}' closed", connection_id);
    }
}

async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => InboundEvent::from(message),
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            let notice = Notice::new(
                NoticeKind::InvalidInput,
                "Could not understand that message.",
            );
            state
                .dispatch_event_usecase
                .notify(connection_id, notice)
                .await;
            return;
        }
    };

    // Rejections are reported to the sender by the use case itself
    let _ = state
        .dispatch_event_usecase
        .execute(connection_id, event)
        .await;
}
