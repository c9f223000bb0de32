//! TCP broadcast relay.
//!
//! Every byte a client sends is forwarded verbatim to all other connected
//! clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fanout-tcp
//! cargo run --bin fanout-tcp -- --host 127.0.0.1 --port 65432
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use fanout_server::{
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::{
        AppState,
        tcp::{
            DEFAULT_ACCEPT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_READ_BUFFER_SIZE,
            RelayConfig, TcpRelay,
        },
    },
};
use fanout_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "fanout-tcp")]
#[command(about = "TCP relay that broadcasts every message to all other clients", long_about = None)]
struct Args {
    /// Host address to bind the relay to
    #[arg(short = 'H', long, default_value_t = DEFAULT_HOST.to_string())]
    host: String,

    /// Port number to bind the relay to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Milliseconds one accept may block before checking for shutdown
    #[arg(long, default_value_t = DEFAULT_ACCEPT_TIMEOUT_MS)]
    accept_timeout_ms: u64,

    /// Bytes requested per read from a client
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    read_buffer_size: usize,

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

    // 3. Relay
    let config = RelayConfig {
        host: args.host,
        port: args.port,
        accept_timeout: Duration::from_millis(args.accept_timeout_ms),
        read_buffer_size: args.read_buffer_size,
    };
    let result = match TcpRelay::bind(config, state).await {
        Ok(relay) => relay.run_until_ctrl_c().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("Relay error: {}", e);
        std::process::exit(1);
    }
}
