//! Status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use yavalath_core::TOKEN_LEN;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub game: &'static str,
    pub token_len: usize,
    /// A move worker is attached
    pub computer_player: bool,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        game: "yavalath",
        token_len: TOKEN_LEN,
        computer_player: state.has_worker(),
    })
}
