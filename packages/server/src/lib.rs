//! Lanai: a single-room WebSocket chat server with presence tracking,
//! persisted history and in-band moderation.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
