//! Board geometry endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use yavalath_core::board::{hex_for_cell, ring_of};
use yavalath_core::{Cell, BOARD_RADIUS, CELL_COUNT};

use crate::state::ServerState;

#[derive(Serialize)]
pub struct CellInfo {
    pub index: Cell,
    pub q: i8,
    pub r: i8,
    pub ring: u8,
}

#[derive(Serialize)]
pub struct BoardInfo {
    pub radius: i8,
    pub cell_count: usize,
    pub show_numbers: bool,
    /// Cells in index order
    pub cells: Vec<CellInfo>,
}

/// All cells with their axial coordinates
fn all_cells() -> Vec<CellInfo> {
    (0..CELL_COUNT as Cell)
        .filter_map(|index| {
            let hex = hex_for_cell(index)?;
            Some(CellInfo {
                index,
                q: hex.q,
                r: hex.r,
                ring: ring_of(index)?,
            })
        })
        .collect()
}

/// Get board geometry
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<BoardInfo> {
    Json(BoardInfo {
        radius: BOARD_RADIUS,
        cell_count: CELL_COUNT,
        show_numbers: state.show_numbers,
        cells: all_cells(),
    })
}
