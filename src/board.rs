//! Board: fixed-size grid of locked cells and the collision predicate.

use crate::shapes::Shape;
use thiserror::Error;

/// Board width in cells.
pub const COLS: usize = 10;
/// Board height in cells.
pub const ROWS: usize = 20;

/// Cell value for an empty cell. Any other value is a kind code.
pub const EMPTY: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
}

/// Locked cells. rows[0] is the top row. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<u8>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![EMPTY; width]; height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell value, or None when (row, col) is off the board.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Writes a cell. Out-of-bounds writes are rejected and leave the board untouched.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), BoardError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(BoardError::OutOfBounds { row, col })?;
        *cell = value;
        Ok(())
    }

    /// Empties every cell. This is the only clear the game has.
    pub fn clear_all(&mut self) {
        for row in &mut self.rows {
            row.fill(EMPTY);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|&v| v == EMPTY)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(COLS, ROWS)
    }
}

/// True if `shape` anchored with its top-left at (x, y) hits a wall, the floor, or a locked cell.
///
/// There is no ceiling: filled cells with a negative row pass as long as their column is on the
/// board, so pieces may poke out above row 0 while spawning or rotating.
pub fn collides(shape: &Shape, x: i32, y: i32, board: &Board) -> bool {
    let (w, h) = (board.width() as i32, board.height() as i32);
    for (r, c, _) in shape.filled_cells() {
        let gx = x + c as i32;
        let gy = y + r as i32;
        if gx < 0 || gx >= w || gy >= h {
            return true;
        }
        if gy < 0 {
            continue;
        }
        if board.get(gy as usize, gx as usize).is_some_and(|v| v != EMPTY) {
            return true;
        }
    }
    false
}
