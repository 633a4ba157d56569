use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::state::{Board, Move, Score, Tile, TilesIter};

/// Response view of a game: the four fields every transport reproduces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tiles: Vec<Tile>,
    pub score: Score,
    pub game_over: bool,
    pub game_won: bool,
}

/// One game of 2048: board, running score, terminal flags and its own
/// random source.
///
/// Not internally synchronized; callers sharing a `Game` across threads must
/// hold a lock for the whole of each `make_move`/`reset`.
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    board: Board,
    score: Score,
    won: bool,
    over: bool,
    rng: R,
}

impl Game<StdRng> {
    /// Fresh game seeded from the wall clock.
    pub fn new() -> Self {
        Self::from_seed(clock_seed())
    }

    /// Fresh game whose spawns replay deterministically for a given seed.
    ///
    /// ```
    /// use twenty48_engine::Game;
    /// let a = Game::from_seed(99);
    /// let b = Game::from_seed(99);
    /// assert_eq!(a.board(), b.board());
    /// ```
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Game<R> {
    /// Fresh game with two random tiles, drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        let mut game = Self {
            board: Board::EMPTY,
            score: 0,
            won: false,
            over: false,
            rng,
        };
        game.place_starting_tiles();
        game
    }

    /// Resume from an existing position with score 0.
    ///
    /// `won` starts false; `over` is evaluated against `board` immediately so
    /// a stuck position is terminal from the start.
    pub fn from_board(board: Board, rng: R) -> Self {
        Self {
            board,
            score: 0,
            won: false,
            over: board.is_game_over(),
            rng,
        }
    }

    /// Slide in `direction`; spawn one tile and re-check the terminal state
    /// if anything changed. Returns whether the board changed.
    ///
    /// Once the game is over this is a no-op that returns false.
    pub fn make_move(&mut self, direction: Move) -> bool {
        if self.over {
            return false;
        }
        let shifted = self.board.shift(direction);
        let moved = shifted.board != self.board;
        if !moved {
            return false;
        }
        self.board = shifted.board.with_random_tile(&mut self.rng);
        self.score += shifted.score;
        self.won |= shifted.reached_win;
        self.over = self.board.is_game_over();
        true
    }

    /// Like `make_move`, but takes the wire literal. Anything other than
    /// `up`/`down`/`left`/`right` leaves the game untouched and returns false.
    pub fn apply_move(&mut self, direction: &str) -> bool {
        match direction.parse::<Move>() {
            Ok(dir) => self.make_move(dir),
            Err(_) => false,
        }
    }

    /// Back to an empty board, score 0, flags cleared, two new tiles.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.won = false;
        self.over = false;
        self.place_starting_tiles();
    }

    fn place_starting_tiles(&mut self) {
        self.board = self
            .board
            .with_random_tile(&mut self.rng)
            .with_random_tile(&mut self.rng);
    }
}

impl<R> Game<R> {
    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn tiles(&self) -> TilesIter {
        self.board.tiles()
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.over
    }

    #[inline]
    pub fn is_game_won(&self) -> bool {
        self.won
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tiles: self.tiles().collect(),
            score: self.score,
            game_over: self.over,
            game_won: self.won,
        }
    }
}

/// Nanoseconds since the epoch folded into a u64; good enough for gameplay.
pub(crate) fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
