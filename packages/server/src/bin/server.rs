//! Merlinfest realtime hub server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin merlinfest-server
//! cargo run --bin merlinfest-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use merlinfest_server::ui::{AppState, Server};
use merlinfest_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "merlinfest-server")]
#[command(about = "Festival realtime visual-state hub", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "MERLINFEST_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "MERLINFEST_PORT", default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Repositories, pusher and use cases are wired by AppState
    let app_state = Arc::new(AppState::in_memory(Arc::new(SystemClock)));
    tracing::info!("Visual state initialized with defaults");

    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
