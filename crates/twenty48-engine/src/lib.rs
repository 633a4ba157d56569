//! Rules engine for 2048 on a 4x4 grid, plus the session store the HTTP
//! service keeps its games in.
//!
//! ```
//! use twenty48_engine::{Game, Move};
//!
//! let mut game = Game::from_seed(7);
//! assert_eq!(game.tiles().count(), 2);
//! let _moved = game.make_move(Move::Left);
//! assert!(game.score() % 2 == 0);
//! ```

pub mod engine;
pub mod session;

pub use engine::{Board, Game, Move, ParseMoveError, Shifted, Snapshot, Tile};
pub use session::{SessionError, SessionId, SessionStore};
