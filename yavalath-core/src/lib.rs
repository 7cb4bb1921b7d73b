//! Yavalath Core - board tokens and game sessions
//!
//! This crate provides the I/O-free core of the Yavalath board server:
//! - Hex digit / bit string conversion
//! - Board geometry and the cell numbering used by tokens
//! - Board tokens (32 hex characters, two occupancy masks)
//! - Game sessions with replay cursor, selection and turn handling
//! - Seams for the external judge and move source

pub mod bits;
pub mod board;
pub mod error;
pub mod judge;
pub mod session;
pub mod source;
pub mod token;

// Re-exports for convenient access
pub use board::{Cell, Hex, BOARD_RADIUS, CELL_COUNT};
pub use error::{FormatError, MoveError, TokenError, ValidationError};
pub use judge::{Judge, JudgeReport, NoJudge, Outcome};
pub use session::{MoveReply, MoveRequest, Session, SessionView};
pub use source::{MoveSource, RandomMover};
pub use token::{check, decode, encode, validate, BoardToken, Player, TOKEN_LEN};
