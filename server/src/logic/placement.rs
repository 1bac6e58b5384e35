use minesweeper_common::models::Dimensions;
use rand::Rng;
use tracing::debug;

use crate::data::Pos;

/// Picks `bomb_count` distinct positions, every subset equally likely.
///
/// Candidates are listed row by row (`x = i % columns`, `y = i / columns`)
/// and drawn without replacement. The caller guarantees
/// `bomb_count <= columns * rows`.
pub fn calculate_bombs_positions<R: Rng + ?Sized>(
    size: Dimensions,
    bomb_count: usize,
    rng: &mut R,
) -> Vec<Pos> {
    let mut candidates: Vec<Pos> = (0..size.cell_count())
        .map(|index| Pos::new(index % size.columns, index / size.columns))
        .collect();

    let mut bombs = Vec::with_capacity(bomb_count);
    for _ in 0..bomb_count.min(candidates.len()) {
        let index = rng.random_range(0..candidates.len());
        bombs.push(candidates.remove(index));
    }

    debug!(
        "Placed {} bombs on a {}x{} board",
        bombs.len(),
        size.columns,
        size.rows
    );
    bombs
}
