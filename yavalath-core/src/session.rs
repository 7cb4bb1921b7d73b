//! Game session: move history, replay cursor and turn handling
//!
//! A session owns the history of one game and a cursor into it. Stepping
//! back and forward moves the cursor without touching the history; playing
//! a move behind the end discards the moves after the cursor.
//!
//! The computer player is not driven from here. When it is the computer's
//! turn, transitions return a [`MoveRequest`] that the caller forwards to a
//! move source. Each request carries a generation number, and a reply is
//! only applied if its generation is still the outstanding one.

use serde::Serialize;

use crate::board::{Cell, CELL_COUNT};
use crate::error::{FormatError, MoveError, TokenError};
use crate::judge::{Judge, JudgeReport};
use crate::token::{self, BoardToken, Player};

/// Ask the move source to play from a position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRequest {
    pub generation: u64,
    pub token: BoardToken,
}

/// A move source's answer to a [`MoveRequest`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveReply {
    pub generation: u64,
    pub cell: Cell,
}

/// Snapshot of a session for display
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub board_hex: BoardToken,
    pub moves: Vec<Cell>,
    pub position: usize,
    pub total_moves: usize,
    pub at_start: bool,
    pub at_end: bool,
    pub player_to_move: Player,
    pub selection: Option<Cell>,
    pub game_over: bool,
    pub winning_line: Vec<Cell>,
    pub ai_player: Option<Player>,
    pub awaiting_ai: bool,
}

/// One game being played or reviewed
pub struct Session {
    history: Vec<Cell>,
    position: usize,
    selection: Option<Cell>,
    game_over: bool,
    winning_line: Vec<Cell>,
    ai_player: Option<Player>,
    /// Bumped on every transition that invalidates an outstanding request
    generation: u64,
    pending: Option<u64>,
    judge: Box<dyn Judge>,
}

impl Session {
    pub fn new(judge: Box<dyn Judge>, ai_player: Option<Player>) -> Self {
        Self {
            history: Vec::new(),
            position: 0,
            selection: None,
            game_over: false,
            winning_line: Vec::new(),
            ai_player,
            generation: 0,
            pending: None,
            judge,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn history(&self) -> &[Cell] {
        &self.history
    }

    /// Moves currently applied
    pub fn played(&self) -> &[Cell] {
        &self.history[..self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn selection(&self) -> Option<Cell> {
        self.selection
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winning_line(&self) -> &[Cell] {
        &self.winning_line
    }

    pub fn player_to_move(&self) -> Player {
        Player::from_parity(self.position)
    }

    /// Generation of the outstanding move request, if any
    pub fn pending_request(&self) -> Option<u64> {
        self.pending
    }

    /// Token for the applied moves
    pub fn board_token(&self) -> BoardToken {
        // history only ever holds on-board cells
        BoardToken::from_moves(self.played()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionView {
        SessionView {
            board_hex: self.board_token(),
            moves: self.history.clone(),
            position: self.position,
            total_moves: self.history.len(),
            at_start: self.position == 0,
            at_end: self.position >= self.history.len(),
            player_to_move: self.player_to_move(),
            selection: self.selection,
            game_over: self.game_over,
            winning_line: self.winning_line.clone(),
            ai_player: self.ai_player,
            awaiting_ai: self.pending.is_some(),
        }
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// First click on a cell selects it, a second click on it plays it.
    pub fn select_or_commit(&mut self, cell: Cell) -> Result<Option<MoveRequest>, MoveError> {
        if cell as usize >= CELL_COUNT {
            return Err(MoveError::OffBoard(cell));
        }
        if self.game_over || self.played().contains(&cell) {
            return Ok(None);
        }
        if self.selection == Some(cell) {
            return self.commit_move(cell);
        }
        self.selection = Some(cell);
        Ok(None)
    }

    /// Play a cell at the cursor, discarding any moves after it.
    pub fn commit_move(&mut self, cell: Cell) -> Result<Option<MoveRequest>, MoveError> {
        if cell as usize >= CELL_COUNT {
            return Err(MoveError::OffBoard(cell));
        }
        if self.played().contains(&cell) {
            return Err(MoveError::Occupied(cell));
        }

        self.history.truncate(self.position);
        self.history.push(cell);
        self.position += 1;
        self.selection = None;
        self.invalidate_requests();

        tracing::debug!(
            "Move {}: {:?} plays cell {}",
            self.position,
            Player::from_parity(self.position - 1),
            cell
        );

        self.refresh_outcome();
        Ok(self.request_ai_move_if_due())
    }

    /// Apply a move source's reply if it answers the outstanding request.
    pub fn receive_move(&mut self, reply: MoveReply) -> Result<Option<MoveRequest>, MoveError> {
        if self.pending != Some(reply.generation) {
            return Err(MoveError::StaleReply {
                received: reply.generation,
                outstanding: self.pending,
            });
        }
        self.commit_move(reply.cell)
    }

    /// Redo one move. Returns whether the cursor moved.
    pub fn step_forward(&mut self) -> bool {
        if self.position >= self.history.len() {
            return false;
        }
        self.position += 1;
        self.invalidate_requests();
        self.refresh_outcome();
        true
    }

    /// Cancel the selection, or else undo one move.
    ///
    /// Returns whether anything changed. The cursor stops at 0.
    pub fn step_back(&mut self) -> bool {
        if self.selection.take().is_some() {
            return true;
        }
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.invalidate_requests();
        self.refresh_outcome();
        true
    }

    /// Start a new game, asking the computer to open if it plays first.
    pub fn reset(&mut self) -> Option<MoveRequest> {
        self.history.clear();
        self.position = 0;
        self.selection = None;
        self.game_over = false;
        self.winning_line.clear();
        self.invalidate_requests();
        self.refresh_outcome();
        self.request_ai_move_if_due()
    }

    /// Replace the history with the one a token describes.
    ///
    /// On error the session is left empty, and the error is returned for
    /// reporting.
    pub fn load_token(&mut self, board_hex: &str) -> Result<(), TokenError> {
        let loaded = token::check(board_hex).and_then(|parsed| {
            let moves = parsed.moves();
            // the unused high bits decode to cells past the board
            match moves.iter().find(|&&c| c as usize >= CELL_COUNT) {
                Some(&cell) => Err(FormatError::CellOutOfRange(cell).into()),
                None => Ok(moves),
            }
        });
        let result = match loaded {
            Ok(moves) => {
                self.history = moves;
                Ok(())
            }
            Err(e) => {
                self.history.clear();
                Err(e)
            }
        };
        self.position = self.history.len();
        self.selection = None;
        self.invalidate_requests();
        self.refresh_outcome();
        result
    }

    /// Hand a side to the computer, or `None` for two humans.
    ///
    /// Any outstanding request is dropped. If the computer now has the move,
    /// a fresh request is returned.
    pub fn set_ai_player(&mut self, ai_player: Option<Player>) -> Option<MoveRequest> {
        self.ai_player = ai_player;
        self.invalidate_requests();
        self.request_ai_move_if_due()
    }

    /// Issue a move request if the computer is to move in a live game.
    pub fn request_ai_move_if_due(&mut self) -> Option<MoveRequest> {
        if self.game_over || self.ai_player != Some(self.player_to_move()) {
            return None;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        Some(MoveRequest {
            generation: self.generation,
            token: self.board_token(),
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn invalidate_requests(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Ask the judge about the applied moves.
    fn refresh_outcome(&mut self) {
        let report: JudgeReport = self.judge.judge(&self.board_token());
        self.game_over = report.is_terminal();
        self.winning_line = if self.game_over {
            report.winning_line()
        } else {
            Vec::new()
        };
        if self.game_over {
            tracing::info!(
                "Game over after {} moves: {:?}, line {:?}",
                self.position,
                report.outcome,
                self.winning_line
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::NoJudge;
    use crate::token::encode;

    /// Declares the first player the winner once they hold a given cell
    struct CellJudge(Cell);

    impl Judge for CellJudge {
        fn judge(&self, token: &BoardToken) -> JudgeReport {
            if token.player_at(self.0) == Some(Player::P0) {
                JudgeReport::winner(Player::P0, &[self.0])
            } else {
                JudgeReport::ongoing()
            }
        }
    }

    fn hotseat() -> Session {
        Session::new(Box::new(NoJudge), None)
    }

    fn play(session: &mut Session, cells: &[Cell]) {
        for &cell in cells {
            session.commit_move(cell).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let session = hotseat();
        assert_eq!(session.position(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.selection(), None);
        assert!(!session.is_game_over());
        assert_eq!(session.player_to_move(), Player::P0);
        assert_eq!(session.board_token(), BoardToken::empty());
    }

    #[test]
    fn test_select_then_confirm_commits() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P1));

        assert_eq!(session.select_or_commit(5).unwrap(), None);
        assert_eq!(session.selection(), Some(5));
        assert_eq!(session.position(), 0);

        let request = session.select_or_commit(5).unwrap().expect("AI should be asked");
        assert_eq!(session.history(), &[5]);
        assert_eq!(session.position(), 1);
        assert_eq!(session.selection(), None);
        assert_eq!(request.token.to_string(), encode(&[5]).unwrap());
        assert_eq!(session.pending_request(), Some(request.generation));
    }

    #[test]
    fn test_selecting_another_cell_moves_selection() {
        let mut session = hotseat();
        session.select_or_commit(5).unwrap();
        session.select_or_commit(6).unwrap();
        assert_eq!(session.selection(), Some(6));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_played_cell_is_ignored() {
        let mut session = hotseat();
        play(&mut session, &[10]);
        assert_eq!(session.select_or_commit(10).unwrap(), None);
        assert_eq!(session.selection(), None);
        assert_eq!(session.commit_move(10), Err(MoveError::Occupied(10)));
    }

    #[test]
    fn test_undone_cell_can_be_played_again() {
        let mut session = hotseat();
        play(&mut session, &[10, 11]);
        session.step_back();
        session.select_or_commit(11).unwrap();
        assert_eq!(session.selection(), Some(11));
    }

    #[test]
    fn test_off_board_cell() {
        let mut session = hotseat();
        assert_eq!(session.select_or_commit(61), Err(MoveError::OffBoard(61)));
        assert_eq!(session.commit_move(99), Err(MoveError::OffBoard(99)));
    }

    #[test]
    fn test_step_forward_stops_at_end() {
        let mut session = hotseat();
        play(&mut session, &[1, 2, 3]);
        assert!(!session.step_forward());
        assert_eq!(session.position(), 3);

        session.step_back();
        session.step_back();
        assert!(session.step_forward());
        assert!(session.step_forward());
        assert!(!session.step_forward());
        assert_eq!(session.position(), 3);
    }

    #[test]
    fn test_step_back_clamps_at_zero() {
        let mut session = hotseat();
        play(&mut session, &[1]);
        assert!(session.step_back());
        for _ in 0..5 {
            assert!(!session.step_back());
        }
        assert_eq!(session.position(), 0);
        assert_eq!(session.history(), &[1]);
        assert_eq!(session.player_to_move(), Player::P0);
    }

    #[test]
    fn test_step_back_cancels_selection_first() {
        let mut session = hotseat();
        play(&mut session, &[1, 2]);
        session.select_or_commit(9).unwrap();
        assert!(session.step_back());
        assert_eq!(session.selection(), None);
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn test_commit_behind_end_discards_future() {
        let mut session = hotseat();
        play(&mut session, &[1, 2, 3, 4]);
        session.step_back();
        session.step_back();
        assert_eq!(session.played(), &[1, 2]);
        assert_eq!(session.history().len(), 4);

        play(&mut session, &[40]);
        assert_eq!(session.history(), &[1, 2, 40]);
        assert_eq!(session.position(), 3);
        assert!(!session.step_forward());
    }

    #[test]
    fn test_turn_follows_cursor() {
        let mut session = hotseat();
        play(&mut session, &[1, 2, 3]);
        assert_eq!(session.player_to_move(), Player::P1);
        session.step_back();
        assert_eq!(session.player_to_move(), Player::P0);
        assert_eq!(session.board_token(), BoardToken::from_moves(&[1, 2]).unwrap());
    }

    #[test]
    fn test_game_over_makes_selection_inert() {
        let mut session = Session::new(Box::new(CellJudge(7)), None);
        play(&mut session, &[7]);
        assert!(session.is_game_over());
        assert_eq!(session.winning_line(), &[7]);

        assert_eq!(session.select_or_commit(8).unwrap(), None);
        assert_eq!(session.selection(), None);
        assert_eq!(session.history(), &[7]);
    }

    #[test]
    fn test_review_finished_game() {
        let mut session = Session::new(Box::new(CellJudge(7)), None);
        play(&mut session, &[1, 2, 7]);
        assert!(session.is_game_over());

        assert!(session.step_back());
        assert!(!session.is_game_over());
        assert!(session.winning_line().is_empty());

        assert!(session.step_forward());
        assert!(session.is_game_over());
    }

    #[test]
    fn test_no_request_after_game_over() {
        let mut session = Session::new(Box::new(CellJudge(7)), Some(Player::P1));
        assert_eq!(session.commit_move(7).unwrap(), None);
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new(Box::new(CellJudge(7)), None);
        play(&mut session, &[7]);
        session.select_or_commit(3).unwrap();

        assert_eq!(session.reset(), None);
        assert!(session.history().is_empty());
        assert_eq!(session.position(), 0);
        assert_eq!(session.selection(), None);
        assert!(!session.is_game_over());
    }

    #[test]
    fn test_reset_asks_opening_computer() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P0));
        let request = session.reset().expect("computer opens");
        assert_eq!(request.token, BoardToken::empty());
    }

    #[test]
    fn test_reply_is_applied() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P1));
        let request = session.commit_move(30).unwrap().unwrap();

        let next = session
            .receive_move(MoveReply {
                generation: request.generation,
                cell: 12,
            })
            .unwrap();
        assert_eq!(next, None);
        assert_eq!(session.history(), &[30, 12]);
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn test_stale_reply_after_reset_is_discarded() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P1));
        let request = session.commit_move(30).unwrap().unwrap();
        session.reset();

        let result = session.receive_move(MoveReply {
            generation: request.generation,
            cell: 12,
        });
        assert_eq!(
            result,
            Err(MoveError::StaleReply {
                received: request.generation,
                outstanding: None,
            })
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_reply_after_cursor_move_is_discarded() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P1));
        let request = session.commit_move(30).unwrap().unwrap();
        session.step_back();

        let reply = MoveReply {
            generation: request.generation,
            cell: 12,
        };
        assert!(matches!(session.receive_move(reply), Err(MoveError::StaleReply { .. })));
        assert_eq!(session.history(), &[30]);
    }

    #[test]
    fn test_each_request_gets_new_generation() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P0));
        let first = session.reset().unwrap();
        let second = session.reset().unwrap();
        assert!(second.generation > first.generation);
    }

    #[test]
    fn test_set_ai_player_to_side_on_move_requests_move() {
        let mut session = hotseat();
        let request = session.set_ai_player(Some(Player::P0)).expect("computer has the move");
        assert_eq!(request.token, BoardToken::empty());
        assert_eq!(session.pending_request(), Some(request.generation));
        assert_eq!(session.snapshot().ai_player, Some(Player::P0));
    }

    #[test]
    fn test_set_ai_player_drops_outstanding_request() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P0));
        let old = session.reset().unwrap();

        assert_eq!(session.set_ai_player(Some(Player::P1)), None);
        assert_eq!(session.pending_request(), None);

        let reply = MoveReply {
            generation: old.generation,
            cell: 30,
        };
        assert!(matches!(
            session.receive_move(reply),
            Err(MoveError::StaleReply { outstanding: None, .. })
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_set_ai_player_none_stops_requests() {
        let mut session = Session::new(Box::new(NoJudge), Some(Player::P1));
        assert_eq!(session.set_ai_player(None), None);
        session.select_or_commit(4).unwrap();
        assert_eq!(session.select_or_commit(4).unwrap(), None);
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn test_load_token() {
        let mut session = hotseat();
        let board_hex = encode(&[3, 8, 20]).unwrap();
        session.load_token(&board_hex).unwrap();
        assert_eq!(session.history(), &[3, 8, 20]);
        assert_eq!(session.position(), 3);
        assert_eq!(session.player_to_move(), Player::P1);
    }

    #[test]
    fn test_load_invalid_token_falls_back_to_empty() {
        let mut session = hotseat();
        play(&mut session, &[1, 2]);

        let err = session.load_token(&"f".repeat(32)).unwrap_err();
        assert!(matches!(err, TokenError::Validation(_)));
        assert!(session.history().is_empty());
        assert_eq!(session.position(), 0);

        assert!(session.load_token("00").is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_load_token_with_high_bits_is_rejected() {
        let mut session = hotseat();
        let err = session.load_token("80000000000000000000000000000000").unwrap_err();
        assert_eq!(err, TokenError::Format(FormatError::CellOutOfRange(63)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut session = hotseat();
        play(&mut session, &[1, 2]);
        session.step_back();
        let view = session.snapshot();
        assert_eq!(view.moves, vec![1, 2]);
        assert_eq!(view.position, 1);
        assert_eq!(view.total_moves, 2);
        assert!(!view.at_start);
        assert!(!view.at_end);
        assert_eq!(view.board_hex, BoardToken::from_moves(&[1]).unwrap());
    }
}
