use minesweeper_common::models::{CellStatus, CellView};

use crate::data::{BOMB_SENTINEL, Cell, Pos, StatusChange};

impl Cell {
    pub(crate) fn new(pos: Pos, bomb: bool) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            bomb,
            bomb_count: 0,
            status: CellStatus::Hidden,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn is_bomb(&self) -> bool {
        self.bomb
    }

    pub fn bomb_count(&self) -> i8 {
        self.bomb_count
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn is_revealed(&self) -> bool {
        self.status == CellStatus::Revealed
    }

    /// Overwrites the status unless the cell is already revealed, which is
    /// terminal. The returned facts describe the cell itself and do not
    /// depend on the requested status.
    pub fn change_status(&mut self, status: CellStatus) -> StatusChange {
        if !self.is_revealed() {
            self.status = status;
        }

        StatusChange {
            is_bomb: self.bomb,
            has_neighbor_bombs: self.bomb_count > 0,
        }
    }

    pub fn change_status_tag(&mut self, tag: &str) -> crate::error::Result<StatusChange> {
        let status = tag.parse::<CellStatus>()?;
        Ok(self.change_status(status))
    }

    pub(crate) fn set_bomb_count(&mut self, count: i8) {
        self.bomb_count = if self.bomb { BOMB_SENTINEL } else { count };
    }
}

/// Client-facing view: the bomb flag never leaves the server and the bomb
/// count only once the cell is revealed.
impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        Self {
            x: value.x,
            y: value.y,
            status: value.status,
            bomb_count: value.is_revealed().then_some(value.bomb_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    fn safe_cell(bomb_count: i8) -> Cell {
        let mut cell = Cell::new(Pos::new(2, 3), false);
        cell.set_bomb_count(bomb_count);
        cell
    }

    #[test]
    fn new_cell_is_hidden() {
        let cell = Cell::new(Pos::new(1, 4), true);
        assert_eq!(cell.status(), CellStatus::Hidden);
        assert_eq!(cell.pos(), Pos::new(1, 4));
        assert!(cell.is_bomb());
    }

    #[test]
    fn marks_can_be_changed_freely() {
        let mut cell = safe_cell(1);
        cell.change_status(CellStatus::BombMark);
        assert_eq!(cell.status(), CellStatus::BombMark);
        cell.change_status(CellStatus::Question);
        assert_eq!(cell.status(), CellStatus::Question);
        cell.change_status(CellStatus::Hidden);
        assert_eq!(cell.status(), CellStatus::Hidden);
    }

    #[test]
    fn revealed_is_sticky() {
        let mut cell = safe_cell(0);
        cell.change_status(CellStatus::Revealed);
        cell.change_status(CellStatus::BombMark);
        cell.change_status(CellStatus::Hidden);
        assert_eq!(cell.status(), CellStatus::Revealed);
    }

    #[test]
    fn change_reports_cell_facts() {
        let mut cell = safe_cell(2);
        assert_eq!(
            cell.change_status(CellStatus::Question),
            StatusChange {
                is_bomb: false,
                has_neighbor_bombs: true
            }
        );

        let mut bomb = Cell::new(Pos::new(0, 0), true);
        bomb.set_bomb_count(3);
        assert_eq!(bomb.bomb_count(), BOMB_SENTINEL);
        assert_eq!(
            bomb.change_status(CellStatus::Revealed),
            StatusChange {
                is_bomb: true,
                has_neighbor_bombs: false
            }
        );
    }

    #[test]
    fn unknown_tag_is_rejected_without_change() {
        let mut cell = safe_cell(0);
        let error = cell.change_status_tag("FLAGGED").unwrap_err();
        assert!(matches!(error, GameError::InvalidArgument(_)));
        assert_eq!(cell.status(), CellStatus::Hidden);

        cell.change_status_tag("BOMB_MARK").unwrap();
        assert_eq!(cell.status(), CellStatus::BombMark);
    }

    #[test]
    fn view_hides_count_until_revealed() {
        let mut cell = safe_cell(3);
        assert_eq!(CellView::from(&cell).bomb_count, None);
        cell.change_status(CellStatus::Revealed);
        assert_eq!(CellView::from(&cell).bomb_count, Some(3));
    }
}
