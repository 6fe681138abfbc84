//! MessagePusher 実装

mod websocket;

pub use websocket::WebSocketMessagePusher;
