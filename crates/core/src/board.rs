//! Board module - manages the locked-cell grid
//!
//! The board is a `rows × columns` grid where each cell is [`Cell::Empty`] or
//! [`Cell::Locked`]. Uses a flat vector in row-major order for cache locality;
//! the dimensions never change after construction.
//!
//! Coordinates are `(row, col)` where row `0` is the top of the playfield and
//! col `0` the leftmost column. Signed coordinates are accepted everywhere so
//! callers can probe positions just outside the grid without casting.

use arrayvec::ArrayVec;

use crate::types::{Cell, ColorCategory, MAX_BOARD_DIMENSION};

/// Row indices removed by a clear, sorted bottom to top
pub type ClearedRows = ArrayVec<usize, MAX_BOARD_DIMENSION>;

/// Top-most occupied row of every column (`rows` for an empty column)
pub type ColumnTops = ArrayVec<usize, MAX_BOARD_DIMENSION>;

/// The game board using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    columns: usize,
    /// Flat array of cells, row-major order (row * columns + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board.
    ///
    /// Panics if a dimension is zero or larger than [`MAX_BOARD_DIMENSION`];
    /// session configuration validates both before a board is ever built.
    pub fn new(rows: usize, columns: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_DIMENSION).contains(&rows)
                && (1..=MAX_BOARD_DIMENSION).contains(&columns),
            "board dimensions {}x{} outside 1..={}",
            rows,
            columns,
            MAX_BOARD_DIMENSION
        );
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(row as usize * self.columns + col as usize)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.columns
    }

    /// Get cell at (row, col). Returns None if out of bounds.
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false if out of bounds.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and holding a locked cell
    pub fn is_locked(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(Cell::Locked(_)))
    }

    fn row_slice(&self, row: usize) -> &[Cell] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.rows && self.row_slice(row).iter().all(|c| !c.is_empty())
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top).
    ///
    /// Rows above a cleared row move down; the same number of empty rows appear
    /// at the top. A board without full rows is left untouched.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = self.columns;
        let mut write_row = self.rows;

        for read_row in (0..self.rows).rev() {
            if self.is_row_full(read_row) {
                cleared.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * width;
                    self.cells.copy_within(src..src + width, write_row * width);
                }
            }
        }

        for cell in &mut self.cells[..write_row * width] {
            *cell = Cell::Empty;
        }

        cleared
    }

    /// Push `count` garbage rows in from the bottom, each with one empty
    /// column at `hole_col`. The same number of rows are trimmed off the top.
    pub fn inject_garbage(&mut self, count: usize, hole_col: usize) {
        assert!(hole_col < self.columns, "garbage hole outside the board");
        let count = count.min(self.rows);
        if count == 0 {
            return;
        }

        let width = self.columns;
        self.cells.copy_within(count * width.., 0);
        let first = (self.rows - count) * width;
        for (i, cell) in self.cells[first..].iter_mut().enumerate() {
            *cell = if i % width == hole_col {
                Cell::Empty
            } else {
                Cell::Locked(ColorCategory::Garbage)
            };
        }
    }

    /// Turn cells left behind by ghost, heavy and zombie pieces into plain garbage cells
    pub fn fade_transient_colors(&mut self) {
        for cell in &mut self.cells {
            if let Cell::Locked(color) = cell {
                if color.is_transient() {
                    *cell = Cell::Locked(ColorCategory::Garbage);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Any locked cell in row 0 means the stack has topped out
    pub fn top_row_occupied(&self) -> bool {
        self.row_slice(0).iter().any(Cell::is_locked)
    }

    /// Index of the highest row holding a locked cell
    pub fn highest_occupied_row(&self) -> Option<usize> {
        (0..self.rows).find(|&r| self.row_slice(r).iter().any(Cell::is_locked))
    }

    /// First locked row in `col`, or `rows` if the column is empty
    pub fn column_top(&self, col: usize) -> usize {
        (0..self.rows)
            .find(|&r| self.cells[r * self.columns + col].is_locked())
            .unwrap_or(self.rows)
    }

    pub fn column_tops(&self) -> ColumnTops {
        (0..self.columns).map(|c| self.column_top(c)).collect()
    }

    /// Count empty cells that have a locked cell somewhere above them
    pub fn count_holes(&self) -> usize {
        let mut holes = 0;
        for col in 0..self.columns {
            let top = self.column_top(col);
            holes += (top..self.rows)
                .filter(|&r| !self.cells[r * self.columns + col].is_locked())
                .count();
        }
        holes
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid out row by row
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        (0..self.rows).map(|r| self.row_slice(r).to_vec()).collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Cell = Cell::Locked(ColorCategory::Blue);

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(20, 10);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(0, 9), Some(9));
        assert_eq!(board.index(1, 0), Some(10));
        assert_eq!(board.index(19, 9), Some(199));
        assert_eq!(board.index(0, -1), None);
        assert_eq!(board.index(0, 10), None);
        assert_eq!(board.index(20, 0), None);
    }

    #[test]
    fn test_clear_full_rows_compacts_stack() {
        let mut board = Board::new(6, 5);
        for col in 0..5 {
            board.set(5, col, X);
            board.set(3, col, X);
        }
        board.set(4, 2, X);
        board.set(2, 0, X);

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[5, 3]);

        // Row 4 moves to the bottom, row 2 lands right above it.
        assert_eq!(board.get(5, 2), Some(X));
        assert_eq!(board.get(4, 0), Some(X));
        assert!(board.highest_occupied_row() == Some(4));
        assert_eq!(board.cells().iter().filter(|c| c.is_locked()).count(), 2);
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new(20, 10);
        board.set(19, 0, X);
        board.set(10, 5, X);
        let before = board.clone();

        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_inject_garbage_shifts_stack_up() {
        let mut board = Board::new(8, 5);
        board.set(7, 1, X);

        board.inject_garbage(2, 3);

        assert_eq!(board.get(5, 1), Some(X));
        for row in 6..8 {
            for col in 0..5 {
                let expected = if col == 3 {
                    Cell::Empty
                } else {
                    Cell::Locked(ColorCategory::Garbage)
                };
                assert_eq!(board.get(row, col), Some(expected));
            }
        }
    }

    #[test]
    fn test_holes_and_column_tops() {
        let mut board = Board::new(6, 5);
        board.set(3, 0, X);
        board.set(5, 0, X);
        board.set(5, 1, X);

        assert_eq!(board.column_top(0), 3);
        assert_eq!(board.column_top(4), 6);
        assert_eq!(board.count_holes(), 1);
        assert!(!board.top_row_occupied());
    }
}
