//! Lock module - where a piece lands and how it is written to the board
//!
//! A piece is rigid: the landing shift is the smallest clearance between any of
//! its cells and the first locked cell (or the floor) beneath it. Heavy pieces
//! ignore the stack and go straight to the floor, clearing whatever they pass.

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::{Cell, Effect};

/// Rows the piece drops before one of its cells meets the stack or the floor
pub fn landing_shift(board: &Board, piece: &Piece) -> i32 {
    let rows = board.rows() as i32;
    piece
        .cells()
        .map(|(row, col)| {
            let mut below = row + 1;
            while below < rows && !board.is_locked(below, col) {
                below += 1;
            }
            below - row - 1
        })
        .min()
        .unwrap_or(0)
        .max(0)
}

/// Rows a heavy piece drops to reach the floor
pub fn floor_shift(board: &Board, piece: &Piece) -> i32 {
    let bottom = piece.cells().map(|(row, _)| row).max().unwrap_or(0);
    (board.rows() as i32 - 1 - bottom).max(0)
}

/// Where the piece ends up on a hard drop
pub fn drop_shift(board: &Board, piece: &Piece) -> i32 {
    if piece.has_effect(Effect::Heavy) {
        floor_shift(board, piece)
    } else {
        landing_shift(board, piece)
    }
}

/// Board coordinates the piece would occupy after a hard drop
pub fn landing_cells(board: &Board, piece: &Piece) -> Vec<(i32, i32)> {
    let shift = drop_shift(board, piece);
    piece.cells().map(|(r, c)| (r + shift, c)).collect()
}

/// Move a heavy piece to the floor, emptying every cell on its way down
pub fn crush_beneath(board: &mut Board, piece: &mut Piece) {
    let shift = floor_shift(board, piece);
    let cells: Vec<(i32, i32)> = piece.cells().collect();
    for (row, col) in cells {
        for below in row + 1..=row + shift {
            board.set(below, col, Cell::Empty);
        }
    }
    piece.row += shift;
}

/// Copy the piece's occupied cells onto the board.
///
/// Panics if a cell falls outside the grid; collision checks keep every
/// reachable piece inside it.
pub fn write_piece(board: &mut Board, piece: &Piece) {
    for (r, c, cell) in piece.footprint.iter() {
        if !cell.is_locked() {
            continue;
        }
        let (row, col) = (piece.row + r as i32, piece.col + c as i32);
        let written = board.set(row, col, cell);
        assert!(
            written,
            "locked piece cell ({}, {}) outside the board",
            row, col
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::catalog_footprint;
    use crate::types::{ColorCategory, ShapeId};

    const X: Cell = Cell::Locked(ColorCategory::Garbage);

    fn piece(shape: ShapeId, row: i32, col: i32) -> Piece {
        Piece::new(shape, catalog_footprint(shape).unwrap(), row, col)
    }

    #[test]
    fn test_landing_on_empty_board_reaches_floor() {
        let board = Board::new(20, 10);
        let p = piece(ShapeId::O, 0, 4);
        assert_eq!(landing_shift(&board, &p), 18);
        assert_eq!(landing_cells(&board, &p), vec![(18, 4), (18, 5), (19, 4), (19, 5)]);
    }

    #[test]
    fn test_landing_uses_smallest_column_clearance() {
        let mut board = Board::new(20, 10);
        board.set(15, 5, X);
        let p = piece(ShapeId::O, 0, 4);
        assert_eq!(landing_shift(&board, &p), 13);
    }

    #[test]
    fn test_ring_cannot_sink_around_a_cell() {
        let mut board = Board::new(10, 5);
        // The hole of the ring is directly above this cell.
        board.set(9, 1, X);
        let p = piece(ShapeId::ORing, 0, 0);
        assert_eq!(landing_shift(&board, &p), 6);
    }

    #[test]
    fn test_heavy_crushes_to_floor() {
        let mut board = Board::new(20, 10);
        for row in 15..20 {
            board.set(row, 4, X);
            board.set(row, 7, X);
        }
        let mut p = piece(ShapeId::O, 0, 4);
        p.effect = Some(Effect::Heavy);

        crush_beneath(&mut board, &mut p);
        assert_eq!(p.row, 18);
        assert!((15..20).all(|r| !board.is_locked(r, 4)));
        assert!((15..20).all(|r| board.is_locked(r, 7)));
    }

    #[test]
    fn test_write_piece_skips_markers() {
        let mut board = Board::new(20, 10);
        let p = piece(ShapeId::T, 17, 3);
        write_piece(&mut board, &p);
        assert_eq!(board.cells().iter().filter(|c| c.is_locked()).count(), 4);
        assert!(board.cells().iter().all(|c| !matches!(c, Cell::CornerMarker(_))));
    }
}
