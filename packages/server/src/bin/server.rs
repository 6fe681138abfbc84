//! Lanai chat server.
//!
//! One shared chat room over WebSocket with presence, persisted history and
//! in-band moderation.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lanai-server
//! cargo run --bin lanai-server -- --host 0.0.0.0 --port 3000 --profanity-list words.json
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use lanai_server::{
    domain::{HistoryRepository, SessionConfig},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        profanity::WordListFilter,
        repository::{InMemoryHistoryRepository, JsonFileHistoryRepository},
    },
    ui::Server,
    usecase::{HistoryWriter, SessionContext, SweepIdleUseCase, spawn_idle_monitor},
};
use lanai_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "lanai-server")]
#[command(about = "Single-room WebSocket chat server with moderation", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// JSON file holding the public chat history
    #[arg(long, default_value = "chat-history.json")]
    history_file: PathBuf,

    /// Keep history in memory only
    #[arg(long)]
    no_persist: bool,

    /// Word list for the profanity filter (.json array or one word per line); repeatable
    #[arg(long = "profanity-list")]
    profanity_lists: Vec<PathBuf>,

    /// Inactivity in seconds before a participant is shown as idle
    #[arg(long, default_value = "300")]
    idle_threshold_secs: u64,

    /// Seconds between idle sweeps
    #[arg(long, default_value = "5")]
    idle_sweep_secs: u64,

    /// Minimum milliseconds between two chat messages from one connection
    #[arg(long, default_value = "2000")]
    slow_mode_interval_ms: u64,

    /// Start with slow mode disabled
    #[arg(long)]
    slow_mode_off: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            idle_threshold: Duration::from_secs(self.idle_threshold_secs),
            idle_sweep_interval: Duration::from_secs(self.idle_sweep_secs.max(1)),
            slow_mode_enabled: !self.slow_mode_off,
            slow_mode_interval: Duration::from_millis(self.slow_mode_interval_ms),
            ..SessionConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repository (history load)
    // 2. Profanity filter
    // 3. MessagePusher + history writer
    // 4. Session context and idle monitor
    // 5. Server

    // 1. Create Repository
    let repository: Arc<dyn HistoryRepository> = if args.no_persist {
        tracing::info!("History persistence disabled");
        Arc::new(InMemoryHistoryRepository::new())
    } else {
        tracing::info!("History file: {}", args.history_file.display());
        Arc::new(JsonFileHistoryRepository::new(&args.history_file))
    };
    let history = match repository.load().await {
        Ok(history) => {
            tracing::info!("Loaded {} history messages", history.len());
            history
        }
        Err(e) => {
            tracing::warn!("Failed to load history, starting empty: {}", e);
            Vec::new()
        }
    };

    // 2. Load the profanity word lists
    let profanity = match WordListFilter::load_files(args.profanity_lists.as_slice()) {
        Ok(filter) => filter,
        Err(e) => {
            tracing::error!("Failed to load profanity list: {}", e);
            std::process::exit(1);
        }
    };
    if profanity.is_empty() {
        tracing::warn!("Profanity filter has no words; all messages will pass");
    }

    // 3. Create MessagePusher and the ordered history writer
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let writer = HistoryWriter::spawn(repository);

    // 4. Create the session context and start the idle monitor
    let config = args.session_config();
    let sweep_period = config.idle_sweep_interval;
    let ctx = SessionContext::new(config, history, message_pusher, writer.clone())
        .with_profanity_filter(Arc::new(profanity));
    let idle_monitor = spawn_idle_monitor(Arc::new(SweepIdleUseCase::new(ctx.clone())), sweep_period);

    // 5. Create and run the server
    let server = Server::new(&ctx);
    let result = server.run(args.host, args.port).await;

    idle_monitor.abort();
    writer.flush().await;

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
