//! Pieces module - shape footprints and rotation kick tables
//!
//! Every shape is stored as a small matrix of [`Cell`]s (its footprint). Rotating
//! a piece rotates the whole matrix by 90°, so the canonical 3×3 and 4×4
//! tetrimino matrices reproduce the SRS rotation states exactly. The T footprint
//! additionally carries [`Cell::CornerMarker`] cells used to classify T-spins;
//! markers never collide and are never written to the board.
//!
//! Kick tables list `(d_col, d_row)` offsets with columns growing to the right
//! and rows growing downward. Reference: https://tetris.wiki/SRS

use crate::types::{Cell, ColorCategory, Corner, Effect, KickFamily, Rotation, ShapeId};

/// Largest catalog footprint edge (I5 is 5×5)
pub const CATALOG_FOOTPRINT_MAX: usize = 5;

/// A rectangular matrix of cells describing a piece's shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Footprint {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Footprint {
    /// Build a footprint from row-major cells.
    ///
    /// Panics when the footprint has no locked cell: a piece that occupies
    /// nothing means the catalog or the generator is corrupted.
    pub fn new(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), rows * cols, "footprint cell count mismatch");
        assert!(
            cells.iter().any(Cell::is_locked),
            "footprint without occupied cells"
        );
        Self { rows, cols, cells }
    }

    /// Parse an ASCII pattern: `X` locked, `F`/`B` front/back corner marker,
    /// anything else empty.
    pub fn from_pattern(pattern: &[&str], shape: ShapeId) -> Self {
        let rows = pattern.len();
        let cols = pattern.first().map(|r| r.len()).unwrap_or(0);
        let color = shape.color();
        let cells = pattern
            .iter()
            .flat_map(|row| {
                debug_assert_eq!(row.len(), cols);
                row.bytes().map(move |b| match b {
                    b'X' => Cell::Locked(color),
                    b'F' => Cell::CornerMarker(Corner::Front),
                    b'B' => Cell::CornerMarker(Corner::Back),
                    _ => Cell::Empty,
                })
            })
            .collect();
        Self::new(rows, cols, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Iterate `(row, col, cell)` over every position of the matrix
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / self.cols, i % self.cols, cell))
    }

    /// Offsets of the locked cells relative to the top-left corner
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.iter()
            .filter(|(_, _, cell)| cell.is_locked())
            .map(|(r, c, _)| (r as i32, c as i32))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_locked()).count()
    }

    /// Rotate the matrix 90° clockwise
    pub fn rotated_cw(&self) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..rows {
            for c in 0..cols {
                cells.push(self.get(self.rows - 1 - c, r));
            }
        }
        Self { rows, cols, cells }
    }

    /// Rotate the matrix 90° counter-clockwise
    pub fn rotated_ccw(&self) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..rows {
            for c in 0..cols {
                cells.push(self.get(c, self.cols - 1 - r));
            }
        }
        Self { rows, cols, cells }
    }

    /// Recolor every locked cell, used when a special effect tints a piece
    pub fn tinted(&self, color: ColorCategory) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|c| match c {
                Cell::Locked(_) => Cell::Locked(color),
                other => *other,
            })
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }
}

/// Canonical spawn footprint for a shape.
///
/// Returns `None` for shapes that are built from live state: Freebie and
/// RandomSparse are generated when they become active, Zombie is carved from
/// the stack.
pub fn catalog_footprint(shape: ShapeId) -> Option<Footprint> {
    let pattern: &[&str] = match shape {
        ShapeId::I => &["....", "XXXX", "....", "...."],
        ShapeId::J => &["X..", "XXX", "..."],
        ShapeId::L => &["..X", "XXX", "..."],
        ShapeId::O => &["XX", "XX"],
        ShapeId::S => &[".XX", "XX.", "..."],
        ShapeId::T => &["FXF", "XXX", "B.B"],
        ShapeId::Z => &["XX.", ".XX", "..."],
        ShapeId::I5 => &[".....", "XXXXX", ".....", ".....", "....."],
        ShapeId::I3 => &["...", "XXX", "..."],
        ShapeId::J3 => &["X..", "X..", "XXX"],
        ShapeId::J2 => &["X.", "XX"],
        ShapeId::J4 => &["....", "X...", "XXXX", "...."],
        ShapeId::L3 => &["..X", "..X", "XXX"],
        ShapeId::L2 => &[".X", "XX"],
        ShapeId::L4 => &["....", "...X", "XXXX", "...."],
        ShapeId::O6 => &["XXX", "XXX", "..."],
        ShapeId::O8 => &["....", "XXXX", "XXXX", "...."],
        ShapeId::ORing => &["XXX", "X.X", "XXX"],
        ShapeId::S5 => &[".XX", ".X.", "XX."],
        ShapeId::TPlus => &[".X.", "XXX", ".X."],
        ShapeId::TCapital => &["XXX", ".X.", ".X."],
        ShapeId::Z5 => &["XX.", ".X.", ".XX"],
        ShapeId::Period => &["X"],
        ShapeId::Comma => &[".X", "X."],
        ShapeId::Colon => &["...", "X.X", "..."],
        ShapeId::Quote => &["X.X", "X.X", "..."],
        ShapeId::RandomSparse | ShapeId::Freebie | ShapeId::Zombie => return None,
    };
    Some(Footprint::from_pattern(pattern, shape))
}

/// A piece on the board: shape, rotated footprint and anchor.
///
/// `(row, col)` is the board position of the footprint's top-left corner and
/// may be negative while padding rows/columns hang outside the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: ShapeId,
    pub footprint: Footprint,
    pub rotation: Rotation,
    pub row: i32,
    pub col: i32,
    pub effect: Option<Effect>,
}

impl Piece {
    pub fn new(shape: ShapeId, footprint: Footprint, row: i32, col: i32) -> Self {
        Self {
            shape,
            footprint,
            rotation: Rotation::North,
            row,
            col,
            effect: None,
        }
    }

    /// Board coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.footprint
            .occupied()
            .map(move |(r, c)| (self.row + r, self.col + c))
    }

    /// Board coordinates of the T-spin corner markers of one kind
    pub fn markers(&self, corner: Corner) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.footprint
            .iter()
            .filter(move |(_, _, cell)| *cell == Cell::CornerMarker(corner))
            .map(move |(r, c, _)| (self.row + r as i32, self.col + c as i32))
    }

    /// Sorted distinct columns covered by occupied cells
    pub fn columns(&self) -> Vec<i32> {
        let mut cols: Vec<i32> = self.cells().map(|(_, c)| c).collect();
        cols.sort_unstable();
        cols.dedup();
        cols
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effect == Some(effect)
    }

    /// Row direction gravity pulls this piece: zombies fall upward
    pub fn gravity(&self) -> i32 {
        if self.has_effect(Effect::Zombie) {
            -1
        } else {
            1
        }
    }
}

/// SRS wall kick data
/// Each entry is (d_col, d_row) offset to try in order; the first is always (0, 0)
pub type KickTable = [[(i8, i8); 5]; 8];

/// O pieces only rotate in place
const O_KICKS: [(i8, i8); 1] = [(0, 0)];

/// JLSTZ kick table (shared by J, L, S, T, Z and their variants)
const JLSTZ_KICKS: KickTable = [
    // 0->R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // R->0
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // R->2
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 2->L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // L->2
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // L->0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->R
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 0->L
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // R->0
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // R->2
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->R
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 2->L
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // L->2
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // L->0
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// Shapes outside the SRS families use one small table per direction
const OTHER_CW_KICKS: [(i8, i8); 6] = [(0, 0), (-1, 0), (0, -1), (-1, -1), (0, -2), (-1, -2)];
const OTHER_CCW_KICKS: [(i8, i8); 6] = [(0, 0), (1, 0), (0, -1), (1, -1), (0, -2), (1, -2)];

/// Get the kick index for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // 0->R
        (Rotation::North, false) => 1, // 0->L
        (Rotation::East, false) => 2,  // R->0
        (Rotation::East, true) => 3,   // R->2
        (Rotation::South, false) => 4, // 2->R
        (Rotation::South, true) => 5,  // 2->L
        (Rotation::West, false) => 6,  // L->2
        (Rotation::West, true) => 7,   // L->0
    }
}

/// Ordered kick candidates for rotating `family` out of `from`
pub fn kicks(family: KickFamily, from: Rotation, clockwise: bool) -> &'static [(i8, i8)] {
    match family {
        KickFamily::O => &O_KICKS,
        KickFamily::Jlstz => &JLSTZ_KICKS[get_kick_index(from, clockwise)],
        KickFamily::I => &I_KICKS[get_kick_index(from, clockwise)],
        KickFamily::Other if clockwise => &OTHER_CW_KICKS,
        KickFamily::Other => &OTHER_CCW_KICKS,
    }
}
