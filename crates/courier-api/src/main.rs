//! Courier CLI and HTTP transport entry point.
//!
//! Binary name: `courier`
//!
//! Parses CLI arguments, initializes the database and relay service, then
//! either runs the interactive console transport or serves the HTTP
//! transport.

mod cli;
mod http;
mod state;

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Parser)]
#[command(
    name = "courier",
    about = "Multi-user conversational relay to an OpenAI-compatible completion service"
)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat from this terminal (a single local user identity)
    Chat {
        /// User identity to chat as
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Serve the HTTP transport
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8350")]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,courier=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Initialize application state (config, DB, relay service)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat { user } => cli::chat::run_chat_loop(&state, &user).await,
        Commands::Serve { listen } => http::serve(state, listen).await,
    }
}
