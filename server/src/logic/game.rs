use chrono::{DateTime, Utc};
use minesweeper_common::models::{BoardSize, Dimensions, Position};
use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    data::{Board, Cell, Minesweeper, Pos},
    error::{GameError, Result},
    logic::placement::calculate_bombs_positions,
};

pub fn validate_start(size: Option<&BoardSize>, bomb_count: Option<i64>) -> Result<(Dimensions, usize)> {
    let (Some(columns), Some(rows), Some(bombs)) = (
        size.and_then(|size| size.columns),
        size.and_then(|size| size.rows),
        bomb_count,
    ) else {
        return Err(GameError::MissingArgument(
            "there are not enough parameters to start a new game",
        ));
    };

    if columns < 1 || rows < 1 || bombs < 1 {
        return Err(GameError::invalid(
            "the board sizes and bomb count should be positive integers",
        ));
    }

    let Some(cells) = columns.checked_mul(rows) else {
        return Err(GameError::invalid("the board is too large"));
    };
    if cells < bombs {
        return Err(GameError::invalid(
            "the board has not enough cells to accommodate this amount of bombs",
        ));
    }

    let (Ok(columns), Ok(rows), Ok(bombs)) = (
        usize::try_from(columns),
        usize::try_from(rows),
        usize::try_from(bombs),
    ) else {
        return Err(GameError::invalid("the board is too large"));
    };

    Ok((Dimensions { columns, rows }, bombs))
}

impl Minesweeper {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            started_at: Utc::now(),
            finished: false,
            finished_at: None,
        }
    }

    pub fn start_game(size: Option<&BoardSize>, bomb_count: Option<i64>) -> Result<Self> {
        Self::start_game_with_rng(size, bomb_count, &mut rand::rng())
    }

    pub fn start_game_with_rng<R: Rng + ?Sized>(
        size: Option<&BoardSize>,
        bomb_count: Option<i64>,
        rng: &mut R,
    ) -> Result<Self> {
        let (dimensions, bombs) = validate_start(size, bomb_count)?;
        Ok(Self::start_validated(dimensions, bombs, rng))
    }

    pub(crate) fn start_validated<R: Rng + ?Sized>(
        dimensions: Dimensions,
        bombs: usize,
        rng: &mut R,
    ) -> Self {
        let bombs_at = calculate_bombs_positions(dimensions, bombs, rng);
        Self::new(Board::new(dimensions.columns, dimensions.rows, &bombs_at))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn end_game(&mut self) {
        if !self.finished {
            self.finished = true;
            self.finished_at = Some(Utc::now());
            debug!(solved = self.board.is_solved(), "Game ended");
        }
    }

    /// Reveals a cell, ending the game on a bomb or a solved board.
    ///
    /// Returns `Ok(None)` without touching anything once the game is over.
    #[instrument(level = "trace", skip(self))]
    pub fn reveal_cell(&mut self, position: &Position) -> Result<Option<Vec<Cell>>> {
        if self.finished {
            return Ok(None);
        }
        let pos = self.checked_pos(position, "can't reveal cells outside the board")?;

        let cells = self.board.reveal_cell(pos);
        if cells.iter().any(Cell::is_bomb) || self.board.is_solved() {
            self.end_game();
        }
        Ok(Some(cells))
    }

    /// Marks a cell as a bomb. Marking the last bomb of an otherwise
    /// revealed board wins the game.
    #[instrument(level = "trace", skip(self))]
    pub fn mark_cell_as_bomb(&mut self, position: &Position) -> Result<Option<Vec<Cell>>> {
        if self.finished {
            return Ok(None);
        }
        let pos = self.checked_pos(position, "can't mark cells outside the board")?;

        let cell = self.board.mark_cell_as_bomb(pos);
        if self.board.is_solved() {
            self.end_game();
        }
        Ok(Some(cell.into_iter().collect()))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn mark_cell_as_question(&mut self, position: &Position) -> Result<Option<Vec<Cell>>> {
        if self.finished {
            return Ok(None);
        }
        let pos = self.checked_pos(position, "can't mark cells outside the board")?;

        Ok(Some(self.board.mark_cell_as_question(pos).into_iter().collect()))
    }

    // The upper bound is inclusive: `x == columns` and `y == rows` pass.
    fn checked_pos(&self, position: &Position, outside: &str) -> Result<Pos> {
        let (Some(x), Some(y)) = (position.x, position.y) else {
            return Err(GameError::MissingArgument(
                "there are not enough parameters perform this action",
            ));
        };

        let Dimensions { columns, rows } = self.board.dimensions();
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x <= columns && y <= rows => Ok(Pos::new(x, y)),
            _ => Err(GameError::invalid(outside)),
        }
    }
}
