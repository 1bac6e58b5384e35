use std::collections::HashSet;

use minesweeper_common::models::{CellStatus, Dimensions};

use crate::data::{Board, Cell, Pos};

impl Board {
    pub fn new(columns: usize, rows: usize, bombs_at: &[Pos]) -> Self {
        let bombs: HashSet<Pos> = bombs_at.iter().copied().collect();

        let cells = (0..columns)
            .flat_map(|x| (0..rows).map(move |y| Pos::new(x, y)))
            .map(|pos| Cell::new(pos, bombs.contains(&pos)))
            .collect();

        let mut board = Self {
            columns,
            rows,
            cells,
        };
        board.calculate_bomb_count();
        board
    }

    fn calculate_bomb_count(&mut self) {
        for index in 0..self.cells.len() {
            let pos = self.cells[index].pos();
            let count = self
                .neighbors(pos)
                .filter(|neighbor| self.cells[self.index(*neighbor)].bomb)
                .count();
            self.cells[index].set_bomb_count(count as i8);
        }
    }

    fn index(&self, pos: Pos) -> usize {
        pos.x * self.rows + pos.y
    }

    fn contains(&self, pos: Pos) -> bool {
        pos.x < self.columns && pos.y < self.rows
    }

    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let (columns, rows) = (self.columns, self.rows);
        let x_range = pos.x.saturating_sub(1)..=(pos.x + 1).min(columns.saturating_sub(1));
        let y_range = pos.y.saturating_sub(1)..=(pos.y + 1).min(rows.saturating_sub(1));

        x_range
            .flat_map(move |x| y_range.clone().map(move |y| Pos::new(x, y)))
            .filter(move |neighbor| *neighbor != pos)
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.contains(pos).then(|| &self.cells[self.index(pos)])
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if !self.contains(pos) {
            return None;
        }
        let index = self.index(pos);
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            columns: self.columns,
            rows: self.rows,
        }
    }

    /// Reveals the cell at `pos` and returns every cell that changed.
    ///
    /// Hitting a bomb reveals and returns all bombs. A cell without
    /// neighbouring bombs cascades to its unrevealed neighbours. An already
    /// revealed or off-grid position touches nothing.
    pub fn reveal_cell(&mut self, pos: Pos) -> Vec<Cell> {
        let Some(cell) = self.cell_mut(pos) else {
            return Vec::new();
        };
        if cell.is_revealed() {
            return Vec::new();
        }

        let change = cell.change_status(CellStatus::Revealed);
        if change.is_bomb {
            return self.reveal_bombs();
        }
        if change.has_neighbor_bombs {
            return vec![cell.clone()];
        }

        let mut queued = vec![false; self.cells.len()];
        queued[self.index(pos)] = true;
        let mut touched = vec![pos];
        let mut stack = vec![pos];

        while let Some(current) = stack.pop() {
            for neighbor in self.neighbors(current) {
                let index = self.index(neighbor);
                if queued[index] || self.cells[index].is_revealed() {
                    continue;
                }
                queued[index] = true;

                let change = self.cells[index].change_status(CellStatus::Revealed);
                touched.push(neighbor);
                if !change.is_bomb && !change.has_neighbor_bombs {
                    stack.push(neighbor);
                }
            }
        }

        touched
            .into_iter()
            .map(|pos| self.cells[self.index(pos)].clone())
            .collect()
    }

    fn reveal_bombs(&mut self) -> Vec<Cell> {
        self.cells
            .iter_mut()
            .filter(|cell| cell.bomb)
            .map(|cell| {
                cell.change_status(CellStatus::Revealed);
                cell.clone()
            })
            .collect()
    }

    pub fn mark_cell_as_bomb(&mut self, pos: Pos) -> Option<Cell> {
        self.mark_cell(pos, CellStatus::BombMark)
    }

    pub fn mark_cell_as_question(&mut self, pos: Pos) -> Option<Cell> {
        self.mark_cell(pos, CellStatus::Question)
    }

    fn mark_cell(&mut self, pos: Pos, status: CellStatus) -> Option<Cell> {
        let cell = self.cell_mut(pos)?;
        cell.change_status(status);
        Some(cell.clone())
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|cell| {
            if cell.bomb {
                cell.status == CellStatus::BombMark
            } else {
                cell.is_revealed()
            }
        })
    }
}
