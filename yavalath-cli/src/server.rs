//! Server command - start the board server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to yavalath-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};

use yavalath_core::{check, Player};
use yavalath_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Side played by the computer
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiSide {
    P0,
    P1,
    /// Two human players
    None,
}

impl AiSide {
    fn player(self) -> Option<Player> {
        match self {
            AiSide::P0 => Some(Player::P0),
            AiSide::P1 => Some(Player::P1),
            AiSide::None => None,
        }
    }
}

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing the front-end's static files
    #[arg(long, default_value = "yavalath/web")]
    pub static_dir: PathBuf,

    /// Board token to start from
    #[arg(long, value_name = "HEX")]
    pub board_hex: Option<String>,

    /// Label cells with their index
    #[arg(long)]
    pub show_numbers: bool,

    /// Side played by the computer
    #[arg(long, value_enum, default_value = "p0")]
    pub ai_player: AiSide,

    /// Seed for the computer player
    #[arg(long)]
    pub seed: Option<u64>,

    /// Program that judges positions, called with the board token
    #[arg(long, value_name = "PROGRAM")]
    pub judge_command: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting Yavalath server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;
    if let Some(board_hex) = &args.board_hex {
        warn_if_invalid_token(board_hex);
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        board_hex: args.board_hex.clone(),
        show_numbers: args.show_numbers,
        ai_player: args.ai_player.player(),
        seed: args.seed,
        judge_command: args.judge_command.clone(),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

/// An invalid starting token is not fatal, the game starts empty
fn warn_if_invalid_token(board_hex: &str) {
    if let Err(e) = check(board_hex) {
        tracing::warn!("--board-hex {} will be ignored: {}", board_hex, e);
    }
}

// ============================================================================
// TESTS
// ============================================================================
