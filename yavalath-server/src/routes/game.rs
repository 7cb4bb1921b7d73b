//! Game session API
//!
//! Every endpoint applies one transition and answers with the session
//! snapshot, or `{"error": ...}` when the request is rejected.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use yavalath_core::board::cell_for_hex;
use yavalath_core::{Cell, Hex, MoveRequest, Player, Session};

use crate::state::ServerState;

#[derive(Deserialize)]
pub struct SelectRequest {
    pub cell: Option<Cell>,
    /// Clicked hex, resolved to a cell index
    pub hex: Option<Hex>,
}

#[derive(Deserialize)]
pub struct AiRequest {
    /// `null` for two human players
    pub player: Option<Player>,
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub board_hex: String,
}

/// Get current session state
pub async fn get_game_state(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let session = state.session();
    Json(json!(session.snapshot()))
}

/// Select a cell, or play it if it was already selected
pub async fn select_cell(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<SelectRequest>,
) -> Json<Value> {
    let cell = match (req.cell, req.hex) {
        (Some(_), Some(_)) => {
            return Json(json!({ "error": "Provide either \"cell\" or \"hex\", not both" }))
        }
        (Some(cell), None) => cell,
        (None, Some(hex)) => match cell_for_hex(hex) {
            Some(cell) => cell,
            None => return Json(json!({ "error": "Hex is not on the board" })),
        },
        (None, None) => return Json(json!({ "error": "Must provide \"cell\" or \"hex\"" })),
    };

    transition(&state, |session| match session.select_or_commit(cell) {
        Ok(request) => Ok(request),
        Err(e) => Err(e.to_string()),
    })
}

/// Step forward one move
pub async fn step_forward(State(state): State<Arc<ServerState>>) -> Json<Value> {
    transition(&state, |session| {
        session.step_forward();
        Ok(None)
    })
}

/// Cancel the selection or step back one move
pub async fn step_back(State(state): State<Arc<ServerState>>) -> Json<Value> {
    transition(&state, |session| {
        session.step_back();
        Ok(None)
    })
}

/// Start a new game
pub async fn reset_game(State(state): State<Arc<ServerState>>) -> Json<Value> {
    transition(&state, |session| Ok(session.reset()))
}

/// Choose the computer's side
pub async fn set_ai_player(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<AiRequest>,
) -> Json<Value> {
    transition(&state, |session| Ok(session.set_ai_player(req.player)))
}

/// Replace the session with the position a board token describes
///
/// An invalid token leaves an empty game and is reported in `error`.
pub async fn load_board(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<LoadRequest>,
) -> Json<Value> {
    let (loaded, request, mut body) = {
        let mut session = state.session();
        let loaded = session.load_token(&req.board_hex);
        let request = session.request_ai_move_if_due();
        (loaded, request, json!(session.snapshot()))
    };
    state.dispatch(request);

    if let Err(e) = loaded {
        tracing::warn!("Invalid boardHex {}: {}", req.board_hex, e);
        body["error"] = json!(e.to_string());
    }
    Json(body)
}

/// Apply one transition, then hand any computer move request to the worker
fn transition<F>(state: &ServerState, apply: F) -> Json<Value>
where
    F: FnOnce(&mut Session) -> Result<Option<MoveRequest>, String>,
{
    let (request, body) = {
        let mut session = state.session();
        match apply(&mut session) {
            Ok(request) => (request, json!(session.snapshot())),
            Err(e) => return Json(json!({ "error": e })),
        }
    };
    state.dispatch(request);
    Json(body)
}
