//! Realtime chat synchronization server.
//!
//! Keeps an ordered message history, fans new messages out to every
//! connection and broadcasts who is currently typing.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin natter-server
//! cargo run --bin natter-server -- --host 0.0.0.0 --port 3000 --typing-window-ms 1500
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use natter_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use natter_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "natter-server")]
#[command(about = "WebSocket chat synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Typing debounce window in milliseconds
    #[arg(long, default_value = "1000")]
    typing_window_ms: u64,

    /// Extra grace period added to the typing window in milliseconds
    #[arg(long, default_value = "250")]
    typing_margin_ms: u64,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value = "256")]
    outbound_capacity: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            typing_window: Duration::from_millis(args.typing_window_ms),
            typing_margin: Duration::from_millis(args.typing_margin_ms),
            outbound_capacity: args.outbound_capacity.max(1),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::debug!("Starting with {:?}", config);

    // Wire repositories, the broadcast bus and use cases, then run the server
    let state = AppState::in_memory(config, Arc::new(SystemClock));
    if let Err(e) = Server::new(state).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
