//! Error types for token handling and session transitions

use crate::board::Cell;

/// A board token or bit string that is not well-formed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("board token must be {expected} hex characters, got {len}")]
    InvalidLength { expected: usize, len: usize },

    #[error("invalid hex character {ch:?} at index {index}")]
    InvalidCharacter { ch: char, index: usize },

    #[error("invalid bit {ch:?} at index {index}")]
    InvalidBit { ch: char, index: usize },

    #[error("cell {0} is outside the board")]
    CellOutOfRange(Cell),
}

/// A well-formed token whose occupancy masks break the game's invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("cells {cells:?} are occupied by both players")]
    Overlap { cells: Vec<Cell> },

    #[error("players have {p0} and {p1} stones, counts may differ by at most one")]
    TurnImbalance { p0: u32, p1: u32 },
}

/// Any failure to turn a token into a move history
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed board token: {0}")]
    Format(#[from] FormatError),

    #[error("invalid board token: {0}")]
    Validation(#[from] ValidationError),
}

/// Rejected session transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell {0} is not on the board")]
    OffBoard(Cell),

    #[error("cell {0} is already occupied")]
    Occupied(Cell),

    #[error("reply for generation {received} is stale (outstanding: {outstanding:?})")]
    StaleReply {
        received: u64,
        outstanding: Option<u64>,
    },

    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
