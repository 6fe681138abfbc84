//! WebSocket chat server implementation.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase 層の組み立て結果を handler から参照するため public

pub use server::Server;
