//! Move sources: who picks the computer player's cell

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Cell;
use crate::token::BoardToken;

/// Supplies a move for the player to move in a position
pub trait MoveSource: Send {
    /// Pick a free cell, or `None` when there is nothing to play.
    fn choose_move(&mut self, token: &BoardToken) -> Option<Cell>;
}

/// Plays a uniformly random free cell
pub struct RandomMover {
    rng: ChaCha8Rng,
}

impl RandomMover {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSource for RandomMover {
    fn choose_move(&mut self, token: &BoardToken) -> Option<Cell> {
        token.free_cells().choose(&mut self.rng).copied()
    }
}
