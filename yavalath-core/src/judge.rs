//! Game outcome reports from an external judge

use serde::{Deserialize, Serialize};

use crate::board::{Cell, CELL_COUNT};
use crate::token::{BoardToken, Player};

/// Outcome of a position as reported by the judge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Ongoing,
    Invalid,
    Draw,
}

/// Judge verdict for one position
///
/// `locations` holds the cells of the deciding line, padded with negative
/// sentinels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeReport {
    pub outcome: Outcome,
    pub locations: Option<[i32; 4]>,
}

impl JudgeReport {
    pub fn ongoing() -> Self {
        Self {
            outcome: Outcome::Ongoing,
            locations: None,
        }
    }

    pub fn winner(player: Player, line: &[Cell]) -> Self {
        let mut locations = [-1; 4];
        for (slot, &cell) in locations.iter_mut().zip(line) {
            *slot = cell as i32;
        }
        Self {
            outcome: Outcome::Winner(player),
            locations: Some(locations),
        }
    }

    /// Only a winner ends the game; a full board is not terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self.outcome, Outcome::Winner(_))
    }

    /// Deciding line with the sentinels removed
    pub fn winning_line(&self) -> Vec<Cell> {
        self.locations
            .iter()
            .flatten()
            .filter(|&&loc| loc >= 0 && (loc as usize) < CELL_COUNT)
            .map(|&loc| loc as Cell)
            .collect()
    }

    /// Parse the JSON a judge process prints
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Decides the outcome of a position
pub trait Judge: Send + Sync {
    fn judge(&self, token: &BoardToken) -> JudgeReport;
}

/// Judge that never ends the game, for free play and review
#[derive(Clone, Copy, Debug, Default)]
pub struct NoJudge;

impl Judge for NoJudge {
    fn judge(&self, _token: &BoardToken) -> JudgeReport {
        JudgeReport::ongoing()
    }
}
