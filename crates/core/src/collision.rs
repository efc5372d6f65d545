//! Collision module - translation and rotation legality
//!
//! Board bounds always block a piece. Locked cells block every piece except
//! ghosts, which pass through the stack but still cannot leave the grid.
//! Failed moves never touch the piece, so callers treat them as silent no-ops.

use crate::board::Board;
use crate::pieces::{kicks, Footprint, Piece};
use crate::types::{Corner, Effect, Rotation, ShapeId, TSpinKind};

/// True if a piece cell may not occupy (row, col)
#[inline]
pub fn is_blocked(board: &Board, row: i32, col: i32, ghost: bool) -> bool {
    !board.in_bounds(row, col) || (!ghost && board.is_locked(row, col))
}

fn fits_at(board: &Board, footprint: &Footprint, row: i32, col: i32, ghost: bool) -> bool {
    footprint
        .occupied()
        .all(|(r, c)| !is_blocked(board, row + r, col + c, ghost))
}

/// Whether the piece fits where it currently stands
pub fn fits(board: &Board, piece: &Piece) -> bool {
    fits_at(
        board,
        &piece.footprint,
        piece.row,
        piece.col,
        piece.has_effect(Effect::Ghost),
    )
}

/// Whether the piece can be shifted by (d_row, d_col)
pub fn can_translate(board: &Board, piece: &Piece, d_row: i32, d_col: i32) -> bool {
    fits_at(
        board,
        &piece.footprint,
        piece.row + d_row,
        piece.col + d_col,
        piece.has_effect(Effect::Ghost),
    )
}

/// Shift the piece if every occupied cell lands on a free position
pub fn try_translate(board: &Board, piece: &mut Piece, d_row: i32, d_col: i32) -> bool {
    if !can_translate(board, piece, d_row, d_col) {
        return false;
    }
    piece.row += d_row;
    piece.col += d_col;
    true
}

/// Whether the piece rests on something in its gravity direction
pub fn is_landed(board: &Board, piece: &Piece) -> bool {
    !can_translate(board, piece, piece.gravity(), 0)
}

/// Result of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    /// The kick offset that was applied, as (d_col, d_row)
    pub kick: (i8, i8),
    pub rotation: Rotation,
    /// T-spin classification of the new position
    pub tspin: TSpinKind,
}

/// Try to rotate a piece with wall kicks
///
/// Candidates from the shape family's kick table are tried in order; the first
/// one that fits is applied. Returns None (and leaves the piece untouched) if
/// every candidate is blocked.
pub fn try_rotate(board: &Board, piece: &mut Piece, clockwise: bool) -> Option<RotationOutcome> {
    let rotated = if clockwise {
        piece.footprint.rotated_cw()
    } else {
        piece.footprint.rotated_ccw()
    };
    let new_rotation = if clockwise {
        piece.rotation.rotate_cw()
    } else {
        piece.rotation.rotate_ccw()
    };
    let ghost = piece.has_effect(Effect::Ghost);
    let family = piece.shape.kick_family();

    for &(d_col, d_row) in kicks(family, piece.rotation, clockwise) {
        let row = piece.row + d_row as i32;
        let col = piece.col + d_col as i32;
        if fits_at(board, &rotated, row, col, ghost) {
            piece.footprint = rotated;
            piece.rotation = new_rotation;
            piece.row = row;
            piece.col = col;
            return Some(RotationOutcome {
                kick: (d_col, d_row),
                rotation: new_rotation,
                tspin: classify_tspin(board, piece),
            });
        }
    }

    None
}

/// Classify a T piece by how many of its corner markers overlap the stack.
///
/// Only locked cells count; walls and the floor do not cover a corner.
pub fn classify_tspin(board: &Board, piece: &Piece) -> TSpinKind {
    if piece.shape != ShapeId::T {
        return TSpinKind::None;
    }

    let covered = |corner| {
        piece
            .markers(corner)
            .filter(|&(r, c)| board.is_locked(r, c))
            .count()
    };
    let front = covered(Corner::Front);
    let back = covered(Corner::Back);

    if front == 2 && back >= 1 {
        TSpinKind::Full
    } else if front >= 1 && back == 2 {
        TSpinKind::Mini
    } else {
        TSpinKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::catalog_footprint;
    use crate::types::{Cell, ColorCategory};

    const X: Cell = Cell::Locked(ColorCategory::Garbage);

    fn piece(shape: ShapeId, row: i32, col: i32) -> Piece {
        Piece::new(shape, catalog_footprint(shape).unwrap(), row, col)
    }

    #[test]
    fn test_translate_blocked_by_wall_and_stack() {
        let mut board = Board::new(20, 10);
        let mut p = piece(ShapeId::O, 0, 0);

        assert!(!try_translate(&board, &mut p, 0, -1));
        assert_eq!((p.row, p.col), (0, 0));

        board.set(0, 2, X);
        assert!(!try_translate(&board, &mut p, 0, 1));
        assert!(try_translate(&board, &mut p, 1, 0));
        assert_eq!((p.row, p.col), (1, 0));
    }

    #[test]
    fn test_ghost_passes_stack_but_not_walls() {
        let mut board = Board::new(20, 10);
        board.set(0, 2, X);
        let mut p = piece(ShapeId::O, 0, 0);
        p.effect = Some(Effect::Ghost);

        assert!(try_translate(&board, &mut p, 0, 1));
        assert!(!try_translate(&board, &mut p, 0, 9));
        p.row = 18;
        assert!(is_landed(&board, &p));
    }

    #[test]
    fn test_rotation_kicks_off_left_wall() {
        let board = Board::new(20, 10);
        // I standing in the West state against the left wall.
        let mut p = piece(ShapeId::I, 0, -1);
        p.footprint = p.footprint.rotated_ccw();
        p.rotation = Rotation::West;
        assert!(fits(&board, &p));

        let outcome = try_rotate(&board, &mut p, true).expect("kick should resolve");
        assert_eq!(p.rotation, Rotation::North);
        assert_ne!(outcome.kick, (0, 0));
        assert!(fits(&board, &p));
    }

    #[test]
    fn test_o_rotates_in_place_only() {
        let mut board = Board::new(20, 10);
        let mut p = piece(ShapeId::O, 5, 5);
        assert!(try_rotate(&board, &mut p, true).is_some());
        assert_eq!((p.row, p.col), (5, 5));

        // A blocked O has no kick to fall back on.
        let mut p = piece(ShapeId::O6, 5, 5);
        board.set(7, 6, X);
        let before = p.clone();
        assert!(try_rotate(&board, &mut p, true).is_none());
        assert_eq!(p, before);
    }

    #[test]
    fn test_tspin_classification() {
        let mut board = Board::new(20, 10);
        let p = piece(ShapeId::T, 17, 3);
        // Front corners sit at (17,3) and (17,5); back corners at (19,3) and (19,5).
        board.set(17, 3, X);
        board.set(17, 5, X);
        board.set(19, 3, X);
        assert_eq!(classify_tspin(&board, &p), TSpinKind::Full);

        let mut board = Board::new(20, 10);
        board.set(17, 3, X);
        board.set(19, 3, X);
        board.set(19, 5, X);
        assert_eq!(classify_tspin(&board, &p), TSpinKind::Mini);

        let mut board = Board::new(20, 10);
        board.set(19, 3, X);
        board.set(19, 5, X);
        assert_eq!(classify_tspin(&board, &p), TSpinKind::None);
    }
}
