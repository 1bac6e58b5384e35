mod board;
mod cell;
mod game;
pub mod placement;

pub use game::validate_start;
pub use placement::calculate_bombs_positions;
