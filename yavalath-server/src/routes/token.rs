//! Board token utilities

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use yavalath_core::{check, encode, Cell};

#[derive(Deserialize)]
pub struct CheckRequest {
    pub board_hex: String,
}

#[derive(Deserialize)]
pub struct EncodeRequest {
    pub moves: Vec<Cell>,
}

/// Check a token and decode it
pub async fn check_token(Json(req): Json<CheckRequest>) -> Json<Value> {
    match check(&req.board_hex) {
        Ok(token) => {
            let (p0, p1) = token.counts();
            Json(json!({
                "valid": true,
                "board_hex": token,
                "moves": token.moves(),
                "stones": [p0, p1],
            }))
        }
        Err(e) => Json(json!({
            "valid": false,
            "error": e.to_string(),
        })),
    }
}

/// Encode a move history as a token
pub async fn encode_moves(Json(req): Json<EncodeRequest>) -> Json<Value> {
    match encode(&req.moves) {
        Ok(board_hex) => Json(json!({ "board_hex": board_hex })),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}
