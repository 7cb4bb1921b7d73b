//! Yavalath CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the board server
//! - encode: Pack a move history into a board token
//! - decode: Rebuild a move history from a board token
//! - validate: Check a board token

mod server;
mod token_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "yavalath")]
#[command(about = "Yavalath board server and board token tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the board server
    Serve(server::ServerArgs),
    /// Pack a move history into a board token
    Encode(token_cmd::EncodeArgs),
    /// Rebuild a move history from a board token
    Decode(token_cmd::DecodeArgs),
    /// Check a board token
    Validate(token_cmd::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Encode(args) => token_cmd::encode(args),
        Commands::Decode(args) => token_cmd::decode(args),
        Commands::Validate(args) => token_cmd::validate(args),
    }
}
