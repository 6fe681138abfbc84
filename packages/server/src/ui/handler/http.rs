//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        http::{ModerationStateDto, ParticipantDetailDto},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Registered participants in join order
pub async fn get_participants(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ParticipantDetailDto>> {
    let participants = state.get_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(participants.iter().map(ParticipantDetailDto::from).collect())
}

/// Global moderation flags and pending countdowns
pub async fn get_moderation_state(State(state): State<Arc<AppState>>) -> Json<ModerationStateDto> {
    let snapshot = state.get_moderation_state_usecase.execute().await;

    Json(ModerationStateDto {
        suspended: snapshot.state.suspended,
        slow_mode_enabled: snapshot.state.slow_mode_enabled,
        slow_mode_interval_ms: snapshot.state.slow_mode_interval_ms,
        pending_countdowns: snapshot.pending_countdowns,
    })
}

/// Public history, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessageDto>> {
    let history = state.get_history_usecase.execute().await;
    Json(history.iter().map(ChatMessageDto::from).collect())
}
