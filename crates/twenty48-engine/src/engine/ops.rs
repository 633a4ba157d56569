use rand::Rng;

use super::state::{Board, Cell, Move, Score, Shifted};
use super::{SIZE, WINNING_TILE};

/// Slide/merge tiles in the given direction. No randomness.
///
/// Every row (left/right) or column (up/down) goes through the same
/// `merge_line`; only the order in which its cells are read and written back
/// depends on the direction.
pub fn shift(board: Board, direction: Move) -> Shifted {
    let mut out = board;
    let mut score = 0;
    let mut reached_win = false;
    for line_idx in 0..SIZE {
        let cells = line_cells(direction, line_idx);
        let merged = merge_line(cells.map(|(row, col)| board.0[row][col]));
        for ((row, col), value) in cells.into_iter().zip(merged.line) {
            out.0[row][col] = value;
        }
        score += merged.score;
        reached_win |= merged.reached_win;
    }
    Shifted {
        board: out,
        score,
        reached_win,
    }
}

/// Coordinates of line `line_idx`, ordered from the target edge outward.
fn line_cells(direction: Move, line_idx: usize) -> [(usize, usize); SIZE] {
    std::array::from_fn(|k| match direction {
        Move::Left => (line_idx, k),
        Move::Right => (line_idx, SIZE - 1 - k),
        Move::Up => (k, line_idx),
        Move::Down => (SIZE - 1 - k, line_idx),
    })
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LineMerge {
    pub(crate) line: [Cell; SIZE],
    pub(crate) score: Score,
    pub(crate) reached_win: bool,
}

/// Compact a line toward index 0 and merge equal neighbours once each.
///
/// A value produced by a merge is written out immediately, so it can never
/// take part in a second merge during the same pass. A pair whose sum does
/// not fit in a cell is left unmerged.
pub(crate) fn merge_line(line: [Cell; SIZE]) -> LineMerge {
    let mut out = [0; SIZE];
    let mut len = 0;
    let mut score = 0;
    let mut reached_win = false;
    let mut pending: Option<Cell> = None;
    for value in line.into_iter().filter(|&v| v != 0) {
        match pending {
            Some(prev) if prev == value && prev.checked_mul(2).is_some() => {
                let merged = prev * 2;
                out[len] = merged;
                len += 1;
                score += Score::from(merged);
                reached_win |= merged == WINNING_TILE;
                pending = None;
            }
            Some(prev) => {
                out[len] = prev;
                len += 1;
                pending = Some(value);
            }
            None => pending = Some(value),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }
    LineMerge {
        line: out,
        score,
        reached_win,
    }
}

/// Count the number of zero cells.
pub fn count_empty(board: Board) -> usize {
    board.0.iter().flatten().filter(|&&v| v == 0).count()
}

/// Coordinates of every empty cell in row-major order.
pub(crate) fn empty_cells(board: Board) -> Vec<(usize, usize)> {
    (0..SIZE * SIZE)
        .map(|idx| (idx / SIZE, idx % SIZE))
        .filter(|&(row, col)| board.0[row][col] == 0)
        .collect()
}

pub(crate) fn with_random_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let empty = empty_cells(board);
    if empty.is_empty() {
        return board;
    }
    // Cell first, then value.
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let mut out = board;
    out.0[row][col] = generate_random_tile(rng);
    out
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Cell {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

/// True if some cell has an equal right or lower neighbour.
pub fn has_adjacent_pair(board: Board) -> bool {
    let g = &board.0;
    (0..SIZE).any(|row| {
        (0..SIZE).any(|col| {
            let v = g[row][col];
            (col + 1 < SIZE && g[row][col + 1] == v) || (row + 1 < SIZE && g[row + 1][col] == v)
        })
    })
}

/// True if the board is full and no two adjacent cells are equal.
///
/// On a full board an adjacent equal pair is always mergeable along the axis
/// joining it, so this agrees with "no direction changes the board".
pub fn is_game_over(board: Board) -> bool {
    count_empty(board) == 0 && !has_adjacent_pair(board)
}

pub(crate) fn format_val(val: Cell) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{x:^7}"),
    }
}
