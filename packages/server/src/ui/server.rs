//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{SessionContext, ShutdownTrigger};

use super::{
    handler::{get_history, get_moderation_state, get_participants, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// This struct wires the use cases built over one [`SessionContext`] into an
/// axum router and serves it until Ctrl+C, SIGTERM or an admin restart.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(&ctx);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    shutdown: ShutdownTrigger,
}

impl Server {
    /// Create a new Server instance over a session context
    pub fn new(ctx: &SessionContext) -> Self {
        Self {
            app_state: Arc::new(AppState::from_context(ctx)),
            shutdown: ctx.shutdown.clone(),
        }
    }

    /// Build the router (WebSocket + HTTP API)
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(get_participants))
            .route("/api/moderation", get(get_moderation_state))
            .route("/api/history", get(get_history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        self.run_with_listener(listener).await
    }

    /// Serve on an already-bound listener (port 0 in tests).
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let local_addr = listener.local_addr()?;

        tracing::info!("WebSocket chat server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.shutdown))
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
