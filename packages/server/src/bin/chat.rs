//! WebSocket chat relay.
//!
//! Clients send `send_message` events; every other client receives them as
//! `receive_message`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fanout-chat
//! cargo run --bin fanout-chat -- --host 127.0.0.1 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use fanout_server::{
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::{
        AppState,
        chat::{ChatConfig, ChatServer, DEFAULT_HOST, DEFAULT_PORT},
    },
};
use fanout_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "fanout-chat")]
#[command(about = "WebSocket chat relay with exclude-sender broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value_t = DEFAULT_HOST.to_string())]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // 1. Registry
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    // 2. AppState (use cases)
    let state = Arc::new(AppState::new(registry, Arc::new(SystemClock)));

    // 3. Server
    let result = match ChatServer::bind(ChatConfig::new(args.host, args.port), state).await {
        Ok(server) => server.run_until_ctrl_c().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
