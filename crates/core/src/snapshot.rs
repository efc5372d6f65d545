use crate::pieces::Piece;
use crate::types::{Effect, Rotation, ShapeId};

/// FNV-1a 64-bit hash, stable across runs and platforms
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    bytes.iter().fold(OFFSET_BASIS, |h, &b| (h ^ b as u64).wrapping_mul(PRIME))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub shape: ShapeId,
    pub rotation: Rotation,
    pub row: i32,
    pub col: i32,
    pub effect: Option<Effect>,
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            shape: value.shape,
            rotation: value.rotation,
            row: value.row,
            col: value.col,
            effect: value.effect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub fall_ms: u64,
    pub lock_ms: u64,
    pub disoriented_ms: u64,
    pub blind_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub rows: usize,
    pub columns: usize,
    /// Row-major cell codes (see `Cell::as_u8`)
    pub board: Vec<u8>,
    /// FNV-1a 64 of `board`
    pub board_hash: u64,
    pub active: Option<ActiveSnapshot>,
    pub landing: Vec<(i32, i32)>,
    pub hold: Option<ShapeId>,
    pub next_queue: Vec<ShapeId>,
    pub can_hold: bool,
    pub paused: bool,
    pub lost: bool,
    pub won: bool,
    pub seed: u64,
    pub piece_serial: u32,
    pub score: u32,
    pub combo: u32,
    pub pending_garbage: u32,
    pub clock_ms: u64,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.rows = 0;
        self.columns = 0;
        self.board.clear();
        self.board_hash = fnv1a64(&[]);
        self.active = None;
        self.landing.clear();
        self.hold = None;
        self.next_queue.clear();
        self.can_hold = true;
        self.paused = false;
        self.lost = false;
        self.won = false;
        self.seed = 0;
        self.piece_serial = 0;
        self.score = 0;
        self.combo = 0;
        self.pending_garbage = 0;
        self.clock_ms = 0;
        self.timers = TimersSnapshot::default();
    }

    pub fn playable(&self) -> bool {
        !self.lost && !self.won && !self.paused
    }

    /// Cell code at (row, col), if inside the board
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.board.get(row * self.columns + col).copied()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            rows: 0,
            columns: 0,
            board: Vec::new(),
            board_hash: 0,
            active: None,
            landing: Vec::new(),
            hold: None,
            next_queue: Vec::new(),
            can_hold: true,
            paused: false,
            lost: false,
            won: false,
            seed: 0,
            piece_serial: 0,
            score: 0,
            combo: 0,
            pending_garbage: 0,
            clock_ms: 0,
            timers: TimersSnapshot::default(),
        };
        s.clear();
        s
    }
}
