//! Engine module: the 4x4 board value type, the slide-and-merge transform,
//! random spawning and the stateful `Game` built on top of them.
//!
//! - `Board` is a plain `Copy` grid with pure methods; nothing on it mutates
//!   in place.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - `Game` owns a board, the running score, the terminal flags and its own
//!   random source.

pub mod game;
mod ops;
pub mod state;

pub use game::{Game, Snapshot};
pub use state::{Board, Move, ParseMoveError, Shifted, Tile, TilesIter};

pub use ops::{count_empty, has_adjacent_pair, is_game_over, shift};

/// Side length of the board.
pub const SIZE: usize = 4;

/// Tile value that wins the game when produced by a merge.
pub const WINNING_TILE: u32 = 2048;
