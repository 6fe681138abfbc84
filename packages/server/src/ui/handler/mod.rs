mod http;
mod websocket;

pub use http::{get_history, get_moderation_state, get_participants, health_check};
pub use websocket::websocket_handler;
