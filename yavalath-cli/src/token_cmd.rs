//! Token commands - encode, decode and validate board tokens
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: encode(), decode(), validate() - orchestration
//! - Level 2: (delegated to yavalath-core token codec)
//! - Level 3: report formatting

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use yavalath_core::{check, encode as encode_moves, BoardToken, Cell, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct EncodeArgs {
    /// Cell indices in play order, first player first
    pub moves: Vec<Cell>,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Board token (32 hex characters)
    pub token: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Board token (32 hex characters)
    pub token: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Print the token for a move history
pub fn encode(args: EncodeArgs) -> Result<()> {
    let token = encode_moves(&args.moves).context("Cannot encode moves")?;
    println!("{}", token);
    Ok(())
}

/// Print the history a token decodes to
///
/// Tokens that break the occupancy invariants are still decoded, with a
/// warning.
pub fn decode(args: DecodeArgs) -> Result<()> {
    let token = parse_lenient(&args.token)?;

    if args.json {
        let (p0, p1) = token.counts();
        let report = json!({
            "board_hex": token,
            "moves": token.moves(),
            "stones": [p0, p1],
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_decoded(&token));
    }
    Ok(())
}

/// Report whether a token is valid, failing if it is not
pub fn validate(args: ValidateArgs) -> Result<()> {
    match check(&args.token) {
        Ok(token) => {
            let (p0, p1) = token.counts();
            println!("valid ({} + {} stones)", p0, p1);
            Ok(())
        }
        Err(e) => anyhow::bail!("invalid: {}", e),
    }
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

/// Parse the format only, warning about invariant violations
fn parse_lenient(board_hex: &str) -> Result<BoardToken> {
    let token: BoardToken = board_hex
        .parse()
        .with_context(|| format!("Cannot decode {}", board_hex))?;
    if let Err(e) = token.validate() {
        tracing::warn!("{} is not a legal position: {}", board_hex, e);
    }
    Ok(token)
}

/// One line per move: position, player and cell
fn format_decoded(token: &BoardToken) -> String {
    let mut out = format!("{}\n", token);
    for (i, cell) in token.moves().into_iter().enumerate() {
        let player = match Player::from_parity(i) {
            Player::P0 => "P0",
            Player::P1 => "P1",
        };
        out.push_str(&format!("{:>3}. {} {:>2}\n", i + 1, player, cell));
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================
