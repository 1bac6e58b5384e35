use chrono::{DateTime, Utc};
use minesweeper_common::models::CellStatus;
use serde::{Deserialize, Serialize};

/// Neighbour count stored on a bomb cell.
pub const BOMB_SENTINEL: i8 = -1;

/// A validated, zero-based grid coordinate. `x` indexes columns, `y` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) bomb: bool,
    pub(crate) bomb_count: i8,
    pub(crate) status: CellStatus,
}

/// Outcome facts reported by a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub is_bomb: bool,
    pub has_neighbor_bombs: bool,
}

/// Column-major grid: the cell at `(x, y)` lives at `x * rows + y`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) columns: usize,
    pub(crate) rows: usize,
    pub(crate) cells: Vec<Cell>,
}

#[derive(Clone, Debug)]
pub struct Minesweeper {
    pub(crate) board: Board,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished: bool,
    pub(crate) finished_at: Option<DateTime<Utc>>,
}
