use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::{SIZE, ops};
use serde::{Deserialize, Serialize};

// Internal type aliases for the grid representation
pub(crate) type Cell = u32;
pub(crate) type Grid = [[Cell; SIZE]; SIZE];
pub(crate) type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The literal used on the wire for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a direction string is not one of `up`, `down`, `left`, `right`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized direction {0:?}")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// 4x4 2048 board. Each cell is 0 (empty) or a power of two >= 2.
///
/// `Board` is a value: every operation returns a new board and leaves the
/// receiver untouched, which makes "did this move change anything" a plain
/// equality check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(pub(crate) Grid);

/// Result of sliding a board in one direction (no random insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shifted {
    pub board: Board,
    /// Sum of the values produced by merges during this shift.
    pub score: Score,
    /// True if at least one merge produced the winning tile.
    pub reached_win: bool,
}

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Construct a `Board` from its rows, top to bottom.
    ///
    /// Cells must be 0 or a power of two; this is only checked in debug builds.
    #[inline]
    pub fn from_rows(rows: Grid) -> Self {
        debug_assert!(
            rows.iter().flatten().all(|&v| v == 0 || (v >= 2 && v.is_power_of_two())),
            "board cells must be 0 or a power of two >= 2"
        );
        Board(rows)
    }

    /// Borrow the rows of this board.
    #[inline]
    pub fn rows(&self) -> &Grid {
        &self.0
    }

    /// Value at (`row`, `col`), 0 if empty.
    ///
    /// Panics if either coordinate is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.0[row][col]
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let shifted = b.shift(Move::Left);
    /// assert_eq!(shifted.board.rows()[0], [4, 0, 0, 0]);
    /// assert_eq!(shifted.score, 4);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Shifted {
        ops::shift(self, dir)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use twenty48_engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::with_random_tile(self, rng)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Count the number of occupied cells on the board.
    #[inline]
    pub fn count_tiles(self) -> usize {
        SIZE * SIZE - self.count_empty()
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self.count_empty() == 0
    }

    /// True if two horizontally or vertically adjacent cells hold the same value.
    #[inline]
    pub fn has_adjacent_pair(self) -> bool {
        ops::has_adjacent_pair(self)
    }

    /// Return true if the board is full and no merge remains in any direction.
    ///
    /// ```
    /// use twenty48_engine::Board;
    /// assert!(!Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    /// Return the highest tile value present on the board (0 when empty).
    #[inline]
    pub fn highest_tile(self) -> Cell {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Iterate over the occupied cells in row-major order as `Tile` views.
    ///
    /// Ids are assigned 1..=N in scan order each time the iterator is
    /// created; they are not stable across moves.
    #[inline]
    pub fn tiles(&self) -> TilesIter {
        TilesIter {
            grid: self.0,
            idx: 0,
            next_id: 1,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Reporting view of one occupied cell.
///
/// `is_new` and `is_merged` are client animation hints; they are always
/// false because the engine does not track tile provenance between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: u32,
    pub value: Cell,
    pub row: usize,
    pub col: usize,
    pub is_new: bool,
    pub is_merged: bool,
}

/// Iterator over occupied cells in row-major order.
///
/// Holds its own copy of the grid, so it can outlive the board it came from.
#[derive(Debug, Clone)]
pub struct TilesIter {
    grid: Grid,
    idx: usize,
    next_id: u32,
}

impl Iterator for TilesIter {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < SIZE * SIZE {
            let (row, col) = (self.idx / SIZE, self.idx % SIZE);
            self.idx += 1;
            let value = self.grid[row][col];
            if value != 0 {
                let id = self.next_id;
                self.next_id += 1;
                return Some(Tile {
                    id,
                    value,
                    row,
                    col,
                    is_new: false,
                    is_merged: false,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(SIZE * SIZE - self.idx))
    }
}

impl IntoIterator for &Board {
    type Item = Tile;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}
