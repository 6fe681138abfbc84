//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Participant detail for `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub name: String,
    pub display_name: String,
    pub color: String,
    pub avatar: String,
    pub idle: bool,
    pub kicked: bool,
    /// RFC 3339
    pub joined_at: String,
}

/// Moderation flags for `GET /api/moderation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationStateDto {
    pub suspended: bool,
    pub slow_mode_enabled: bool,
    pub slow_mode_interval_ms: i64,
    pub pending_countdowns: Vec<String>,
}
