//! Hex board geometry and cell numbering
//!
//! Cells are numbered 0..61 outward from the center, ring by ring. That
//! numbering is what board tokens store. The grid used for display is
//! enumerated in its own native order, and two constant permutation tables
//! translate between the two.

use serde::{Deserialize, Serialize};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 4;

/// Number of cells on the board
pub const CELL_COUNT: usize = 61;

/// Canonical cell index, `0..CELL_COUNT`
pub type Cell = u8;

/// Play index -> ring-ordered intermediate index.
///
/// Center, then each ring outward. Within a ring the six sides are visited
/// in turn, one cell per side per pass.
pub const SPINNY_BOARD_ORDER: [usize; CELL_COUNT] = [
    0,

    1, 2, 3, 4, 5, 6,

    7, 9, 11, 13, 15, 17,
    8, 10, 12, 14, 16, 18,

    19, 22, 25, 28, 31, 34,
    20, 23, 26, 29, 32, 35,
    21, 24, 27, 30, 33, 36,

    37, 41, 45, 49, 53, 57,
    38, 42, 46, 50, 54, 58,
    39, 43, 47, 51, 55, 59,
    40, 44, 48, 52, 56, 60,
];

/// Intermediate index -> position in the native grid enumeration.
///
/// Only this table changes if the grid is generated in another order.
pub const SPIRAL_BOARD_ORDER: [usize; CELL_COUNT] = [
    30,
    22, 31, 39, 38, 29, 21,
    15, 23, 32, 40, 47, 46, 45, 37, 28, 20, 13, 14,
    9, 16, 24, 33, 41, 48, 54, 53, 52, 51, 44, 36, 27, 19, 12, 6, 7, 8,
    4, 10, 17, 25, 34, 42, 49, 55, 60, 59, 58, 57, 56, 50, 43, 35, 26, 18, 11, 5, 0, 1, 2, 3,
];

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        self.q.abs() <= BOARD_RADIUS
            && self.r.abs() <= BOARD_RADIUS
            && (self.q + self.r).abs() <= BOARD_RADIUS
    }
}

/// All board hexes in native grid order: `q` outer, `r` inner.
pub fn native_grid() -> Vec<Hex> {
    let mut hexes = Vec::with_capacity(CELL_COUNT);
    for q in -BOARD_RADIUS..=BOARD_RADIUS {
        for r in -BOARD_RADIUS..=BOARD_RADIUS {
            let hex = Hex::new(q, r);
            if hex.is_valid() {
                hexes.push(hex);
            }
        }
    }
    hexes
}

/// Position of a cell in the native grid enumeration
pub fn native_index(cell: Cell) -> Option<usize> {
    let intermediate = *SPINNY_BOARD_ORDER.get(cell as usize)?;
    Some(SPIRAL_BOARD_ORDER[intermediate])
}

/// Look up a cell in a grid laid out in native order
pub fn resolve_cell<T>(grid: &[T], cell: Cell) -> Option<&T> {
    grid.get(native_index(cell)?)
}

/// Axial coordinates of a cell
pub fn hex_for_cell(cell: Cell) -> Option<Hex> {
    resolve_cell(&native_grid(), cell).copied()
}

/// Cell index of a hex, the inverse of [`hex_for_cell`]
pub fn cell_for_hex(hex: Hex) -> Option<Cell> {
    if !hex.is_valid() {
        return None;
    }
    let native = native_grid().iter().position(|&h| h == hex)?;
    (0..CELL_COUNT as Cell).find(|&cell| native_index(cell) == Some(native))
}

/// Ring of a cell (0 = center)
pub fn ring_of(cell: Cell) -> Option<u8> {
    match cell {
        0 => Some(0),
        1..=6 => Some(1),
        7..=18 => Some(2),
        19..=36 => Some(3),
        37..=60 => Some(4),
        _ => None,
    }
}
