//! Board tokens: a game position packed into 32 hex characters
//!
//! A token is two 64-bit occupancy masks, first player then second, each
//! written most-significant bit first. Bit `c` of a mask is set when that
//! player holds cell `c`. Only the low 61 bits are used.
//!
//! The format records which cells each player holds, not the order they
//! were played in. Decoding rebuilds a history by interleaving each
//! player's cells in ascending order, so `decode(encode(m)) == m` only when
//! each player's moves in `m` are already ascending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bits::{bits_to_hex, hex_to_bits};
use crate::board::{Cell, CELL_COUNT};
use crate::error::{FormatError, TokenError, ValidationError};

/// Length of a board token in hex characters
pub const TOKEN_LEN: usize = 32;

const MASK_BITS: usize = 64;

/// Player color, first player moves first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P0 = 0,
    P1 = 1,
}

impl Player {
    /// Player who made (or makes) the move at a history position
    pub fn from_parity(position: usize) -> Self {
        if position % 2 == 0 {
            Player::P0
        } else {
            Player::P1
        }
    }
}

/// Occupancy masks for both players
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoardToken {
    pub p0: u64,
    pub p1: u64,
}

impl BoardToken {
    pub const fn empty() -> Self {
        Self { p0: 0, p1: 0 }
    }

    /// Build masks from a move history, alternating players from the first.
    pub fn from_moves(moves: &[Cell]) -> Result<Self, FormatError> {
        let mut token = Self::empty();
        for (i, &cell) in moves.iter().enumerate() {
            if cell as usize >= CELL_COUNT {
                return Err(FormatError::CellOutOfRange(cell));
            }
            match Player::from_parity(i) {
                Player::P0 => token.p0 |= 1 << cell,
                Player::P1 => token.p1 |= 1 << cell,
            }
        }
        Ok(token)
    }

    /// Reconstruct a history: each player's cells ascending, interleaved.
    pub fn moves(&self) -> Vec<Cell> {
        let p0 = set_cells(self.p0);
        let p1 = set_cells(self.p1);
        let mut moves = Vec::with_capacity(p0.len() + p1.len());
        for i in 0..p0.len().max(p1.len()) {
            moves.extend(p0.get(i));
            moves.extend(p1.get(i));
        }
        moves
    }

    /// Check the occupancy invariants: disjoint masks, balanced turns.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let overlap = self.p0 & self.p1;
        if overlap != 0 {
            return Err(ValidationError::Overlap {
                cells: set_cells(overlap),
            });
        }
        let (p0, p1) = self.counts();
        if p0.abs_diff(p1) > 1 {
            return Err(ValidationError::TurnImbalance { p0, p1 });
        }
        Ok(())
    }

    /// Stone counts for both players
    pub fn counts(&self) -> (u32, u32) {
        (self.p0.count_ones(), self.p1.count_ones())
    }

    /// Mask of all occupied cells
    pub fn occupied(&self) -> u64 {
        self.p0 | self.p1
    }

    /// Owner of a cell, if any
    pub fn player_at(&self, cell: Cell) -> Option<Player> {
        if cell as usize >= MASK_BITS {
            return None;
        }
        let bit = 1u64 << cell;
        if self.p0 & bit != 0 {
            Some(Player::P0)
        } else if self.p1 & bit != 0 {
            Some(Player::P1)
        } else {
            None
        }
    }

    /// Free on-board cells in ascending order
    pub fn free_cells(&self) -> Vec<Cell> {
        (0..CELL_COUNT as Cell)
            .filter(|&c| self.occupied() & (1 << c) == 0)
            .collect()
    }
}

impl fmt::Display for BoardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = format!("{:064b}{:064b}", self.p0, self.p1);
        // only '0' and '1' here
        let hex = bits_to_hex(&bits).map_err(|_| fmt::Error)?;
        f.write_str(&hex)
    }
}

impl FromStr for BoardToken {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != TOKEN_LEN {
            return Err(FormatError::InvalidLength {
                expected: TOKEN_LEN,
                len,
            });
        }
        let bits = hex_to_bits(s)?;
        let (p0_bits, p1_bits) = bits.split_at(MASK_BITS);
        Ok(Self {
            p0: parse_mask(p0_bits)?,
            p1: parse_mask(p1_bits)?,
        })
    }
}

impl Serialize for BoardToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BoardToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Encode a move history as a board token string
pub fn encode(moves: &[Cell]) -> Result<String, TokenError> {
    Ok(BoardToken::from_moves(moves)?.to_string())
}

/// Decode a token into a move history (see module docs for the ordering)
///
/// Only the format is checked. Use [`check`] to also enforce the occupancy
/// invariants.
pub fn decode(token: &str) -> Result<Vec<Cell>, TokenError> {
    let token: BoardToken = token.parse()?;
    Ok(token.moves())
}

/// Parse a token and enforce the occupancy invariants
pub fn check(token: &str) -> Result<BoardToken, TokenError> {
    let parsed: BoardToken = token.parse()?;
    parsed.validate()?;
    Ok(parsed)
}

/// Whether a token is well-formed and satisfies the occupancy invariants.
///
/// Game rules are not checked; that is the judge's job.
pub fn validate(token: &str) -> bool {
    check(token).is_ok()
}

fn parse_mask(bits: &str) -> Result<u64, FormatError> {
    let mut mask = 0u64;
    for (index, ch) in bits.chars().enumerate() {
        let bit = match ch {
            '0' => 0,
            '1' => 1,
            _ => return Err(FormatError::InvalidBit { ch, index }),
        };
        mask = (mask << 1) | bit;
    }
    Ok(mask)
}

fn set_cells(mask: u64) -> Vec<Cell> {
    (0..MASK_BITS as Cell)
        .filter(|&c| mask & (1 << c) != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = "00000000000000000000000000000000";

    #[test]
    fn test_empty_token() {
        assert_eq!(encode(&[]).unwrap(), EMPTY);
        assert!(validate(EMPTY));
        assert!(decode(EMPTY).unwrap().is_empty());
    }

    #[test]
    fn test_encode_layout() {
        // first player on cell 0, second player on cell 5
        assert_eq!(
            encode(&[0, 5]).unwrap(),
            "00000000000000010000000000000020"
        );
        assert_eq!(
            encode(&[60]).unwrap(),
            "10000000000000000000000000000000"
        );
    }

    #[test]
    fn test_display_matches_engine_format() {
        let token = BoardToken::from_moves(&[3, 17, 42, 8]).unwrap();
        assert_eq!(token.to_string(), format!("{:016X}{:016X}", token.p0, token.p1));
    }

    #[test]
    fn test_round_trip_for_ascending_histories() {
        let histories: [&[Cell]; 4] = [
            &[5],
            &[0, 1, 2, 3],
            &[4, 9, 30, 31, 60, 59],
            &[10, 0, 20, 1, 40],
        ];
        for moves in histories {
            let token = encode(moves).unwrap();
            assert_eq!(decode(&token).unwrap(), moves, "token {}", token);
        }
    }

    #[test]
    fn test_decode_is_lossy_for_unordered_histories() {
        let token = encode(&[30, 2, 10, 1]).unwrap();
        assert_eq!(decode(&token).unwrap(), vec![10, 1, 30, 2]);
    }

    #[test]
    fn test_decode_accepts_lowercase() {
        let token = encode(&[12, 44]).unwrap().to_ascii_lowercase();
        assert_eq!(decode(&token).unwrap(), vec![12, 44]);
    }

    #[test]
    fn test_decode_keeps_high_bits() {
        let token = "80000000000000000000000000000000";
        assert_eq!(decode(token).unwrap(), vec![63]);
    }

    #[test]
    fn test_interleave_with_uneven_lists() {
        let token = BoardToken { p0: 0b1, p1: 0b110 };
        assert_eq!(token.moves(), vec![0, 1, 2]);
    }

    #[test]
    fn test_validate_rejects_bad_length() {
        assert!(!validate("00"));
        assert_eq!(
            check("00"),
            Err(TokenError::Format(FormatError::InvalidLength {
                expected: TOKEN_LEN,
                len: 2
            }))
        );
    }

    #[test]
    fn test_validate_rejects_non_hex() {
        let token = format!("{}z", "0".repeat(31));
        assert!(!validate(&token));
        assert!(matches!(
            check(&token),
            Err(TokenError::Format(FormatError::InvalidCharacter { ch: 'z', index: 31 }))
        ));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        assert!(!validate(&"f".repeat(32)));
        let token = "00000000000000010000000000000001";
        assert_eq!(
            check(token),
            Err(TokenError::Validation(ValidationError::Overlap { cells: vec![0] }))
        );
    }

    #[test]
    fn test_validate_rejects_turn_imbalance() {
        let token = BoardToken { p0: 0b111, p1: 0b1000 }.to_string();
        assert_eq!(
            check(&token),
            Err(TokenError::Validation(ValidationError::TurnImbalance { p0: 3, p1: 1 }))
        );
    }

    #[test]
    fn test_encode_rejects_off_board_cell() {
        assert_eq!(
            encode(&[1, 61]),
            Err(TokenError::Format(FormatError::CellOutOfRange(61)))
        );
    }

    #[test]
    fn test_committed_histories_stay_valid() {
        let mut moves = Vec::new();
        for cell in [30u8, 0, 59, 12, 7, 44, 2] {
            moves.push(cell);
            let token = BoardToken::from_moves(&moves).unwrap();
            assert_eq!(token.p0 & token.p1, 0);
            let (p0, p1) = token.counts();
            assert!(p0.abs_diff(p1) <= 1);
            assert!(validate(&token.to_string()));
        }
    }

    #[test]
    fn test_player_at_and_free_cells() {
        let token = BoardToken::from_moves(&[0, 1]).unwrap();
        assert_eq!(token.player_at(0), Some(Player::P0));
        assert_eq!(token.player_at(1), Some(Player::P1));
        assert_eq!(token.player_at(2), None);
        assert_eq!(token.free_cells().len(), CELL_COUNT - 2);
    }

    #[test]
    fn test_serde_as_string() {
        let token = BoardToken::from_moves(&[5]).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"00000000000000200000000000000000\"");
        let back: BoardToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
