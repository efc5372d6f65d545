//! Board tests - grid access, clearing and garbage rows

use tetron::core::Board;
use tetron::types::{Cell, ColorCategory, DEFAULT_COLUMN_COUNT, DEFAULT_ROW_COUNT};

const X: Cell = Cell::Locked(ColorCategory::Blue);
const G: Cell = Cell::Locked(ColorCategory::Garbage);

fn fill_row(board: &mut Board, row: i32, except: &[i32]) {
    for col in 0..board.columns() as i32 {
        if !except.contains(&col) {
            board.set(row, col, X);
        }
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new(DEFAULT_ROW_COUNT, DEFAULT_COLUMN_COUNT);
    assert_eq!(board.rows(), 20);
    assert_eq!(board.columns(), 10);
    assert!(board.is_empty());
    assert_eq!(board.highest_occupied_row(), None);
    assert_eq!(board.count_holes(), 0);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(20, 10);
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(20, 0), None);
    assert_eq!(board.get(0, 10), None);
    assert_eq!(board.get(19, 9), Some(Cell::Empty));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new(20, 10);
    assert!(board.set(10, 5, X));
    assert_eq!(board.get(10, 5), Some(X));
    assert!(board.is_locked(10, 5));

    assert!(board.set(10, 5, Cell::Empty));
    assert!(!board.is_locked(10, 5));

    assert!(!board.set(-1, 0, X));
    assert!(!board.set(0, 10, X));
    assert!(board.is_empty());
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::new(20, 10);
    fill_row(&mut board, 19, &[]);
    fill_row(&mut board, 18, &[3]);
    fill_row(&mut board, 17, &[]);
    board.set(16, 7, X);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[19, 17]);

    // The partial row and the single cell both drop by the rows cleared below them.
    assert!(!board.is_row_full(19));
    assert_eq!(board.get(19, 3), Some(Cell::Empty));
    assert_eq!(board.get(19, 0), Some(X));
    assert_eq!(board.get(18, 7), Some(X));
    assert_eq!(board.highest_occupied_row(), Some(18));
}

#[test]
fn test_clear_without_full_rows_is_noop() {
    let mut board = Board::new(20, 10);
    fill_row(&mut board, 19, &[0]);
    board.set(5, 5, X);
    let before = board.clone();

    assert!(board.clear_full_rows().is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_inject_garbage_pushes_stack_up() {
    let mut board = Board::new(20, 10);
    board.set(19, 0, X);
    board.inject_garbage(2, 3);

    assert_eq!(board.get(17, 0), Some(X));
    for row in [18, 19] {
        for col in 0..10 {
            let expected = if col == 3 { Cell::Empty } else { G };
            assert_eq!(board.get(row, col), Some(expected));
        }
    }
    // The hole column is open to the top, so it does not count as a hole.
    assert_eq!(board.count_holes(), 0);
}

#[test]
fn test_transient_colors_fade_to_garbage() {
    let mut board = Board::new(20, 10);
    board.set(19, 0, Cell::Locked(ColorCategory::Heavy));
    board.set(19, 1, Cell::Locked(ColorCategory::Ghost));
    board.set(19, 2, X);
    board.fade_transient_colors();

    assert_eq!(board.get(19, 0), Some(G));
    assert_eq!(board.get(19, 1), Some(G));
    assert_eq!(board.get(19, 2), Some(X));
}

#[test]
fn test_column_tops_and_holes() {
    let mut board = Board::new(20, 10);
    board.set(15, 2, X);
    board.set(19, 2, X);
    board.set(19, 4, X);

    let tops = board.column_tops();
    assert_eq!(tops[2], 15);
    assert_eq!(tops[4], 19);
    assert_eq!(tops[0], 20);
    assert_eq!(board.count_holes(), 3);
}

#[test]
fn test_top_row_detection() {
    let mut board = Board::new(20, 10);
    assert!(!board.top_row_occupied());
    board.set(0, 9, X);
    assert!(board.top_row_occupied());
}
