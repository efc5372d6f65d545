//! Generator module - exhaustion-pool piece and effect selection
//!
//! Each category (classic shapes, advanced shapes, special effects) is an
//! exhaustion pool: ids are drawn uniformly among the ones not used yet and the
//! pool resets once every id has been drawn. With the advanced weight at zero
//! this is the familiar 7-bag.
//!
//! Two shapes depend on the board at the moment they become active and are
//! queued as [`NextEntry::Deferred`]: the Freebie (the silhouette of the empty
//! space above the stack) and the random sparse 3×3 block. The zombie effect
//! carves its piece out of the stack itself.
//!
//! All randomness comes from a seeded [`StdRng`], so the same seed and the same
//! inputs reproduce the same sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::config::ConfigError;
use crate::pieces::{catalog_footprint, Footprint};
use crate::types::{Cell, ColorCategory, Effect, ShapeId};

/// A selection pool that forbids repeats until every member has been drawn once
#[derive(Debug, Clone)]
pub struct ExhaustionPool<T> {
    items: Vec<T>,
    used: Vec<bool>,
}

impl<T: Copy> ExhaustionPool<T> {
    pub fn new(items: Vec<T>) -> Result<Self, ConfigError> {
        if items.is_empty() {
            return Err(ConfigError::EmptyPool);
        }
        let used = vec![false; items.len()];
        Ok(Self { items, used })
    }

    /// Draw an unused id, resetting the pool once it is exhausted
    pub fn draw(&mut self, rng: &mut StdRng) -> T {
        let available: Vec<usize> = (0..self.items.len()).filter(|&i| !self.used[i]).collect();
        let index = *available
            .choose(rng)
            .expect("exhaustion pool has no unused entry");
        self.used[index] = true;
        if self.used.iter().all(|&u| u) {
            self.used.fill(false);
        }
        self.items[index]
    }

    /// Ids still available before the pool resets
    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|&&u| !u).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One slot of the next queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextEntry {
    Ready { shape: ShapeId, footprint: Footprint },
    /// Generated from the board when it becomes the active piece
    Deferred(ShapeId),
}

impl NextEntry {
    pub fn shape(&self) -> ShapeId {
        match self {
            NextEntry::Ready { shape, .. } => *shape,
            NextEntry::Deferred(shape) => *shape,
        }
    }
}

/// A chunk carved out of the stack for the zombie effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZombieChunk {
    pub footprint: Footprint,
    pub row: i32,
    pub col: i32,
}

/// Seeded piece and effect generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: StdRng,
    classic: ExhaustionPool<ShapeId>,
    advanced: ExhaustionPool<ShapeId>,
    effects: ExhaustionPool<Effect>,
}

impl PieceGenerator {
    /// Create a generator over the full catalog
    pub fn new(seed: u64) -> Self {
        Self::with_pools(
            seed,
            ShapeId::CLASSIC.to_vec(),
            ShapeId::ADVANCED.to_vec(),
            Effect::ALL.to_vec(),
        )
        .expect("built-in pools are never empty")
    }

    /// Create a generator over custom pools; every pool must be non-empty
    pub fn with_pools(
        seed: u64,
        classic: Vec<ShapeId>,
        advanced: Vec<ShapeId>,
        effects: Vec<Effect>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            classic: ExhaustionPool::new(classic)?,
            advanced: ExhaustionPool::new(advanced)?,
            effects: ExhaustionPool::new(effects)?,
        })
    }

    /// Pick a category by weight, then an unused shape within it
    pub fn next_shape(&mut self, advanced_weight: f64) -> ShapeId {
        if self.rng.gen_bool(advanced_weight.clamp(0.0, 1.0)) {
            self.advanced.draw(&mut self.rng)
        } else {
            self.classic.draw(&mut self.rng)
        }
    }

    /// Draw the next queue entry, materializing it unless it depends on the board
    pub fn next_entry(&mut self, advanced_weight: f64) -> NextEntry {
        let shape = self.next_shape(advanced_weight);
        match catalog_footprint(shape) {
            Some(footprint) => NextEntry::Ready { shape, footprint },
            None => NextEntry::Deferred(shape),
        }
    }

    /// Optionally attach a special effect
    pub fn roll_effect(&mut self, special_weight: f64) -> Option<Effect> {
        if self.rng.gen_bool(special_weight.clamp(0.0, 1.0)) {
            Some(self.effects.draw(&mut self.rng))
        } else {
            None
        }
    }

    /// Turn a queue entry into a concrete footprint
    pub fn materialize(&mut self, entry: NextEntry, board: &Board) -> (ShapeId, Footprint) {
        match entry {
            NextEntry::Ready { shape, footprint } => (shape, footprint),
            NextEntry::Deferred(ShapeId::Freebie) => (ShapeId::Freebie, freebie_footprint(board)),
            NextEntry::Deferred(ShapeId::RandomSparse) => {
                (ShapeId::RandomSparse, self.random_sparse())
            }
            NextEntry::Deferred(shape) => match catalog_footprint(shape) {
                Some(footprint) => (shape, footprint),
                None => panic!("no way to build a footprint for {:?}", shape),
            },
        }
    }

    /// A 3×3 footprint with five of its nine cells filled
    pub fn random_sparse(&mut self) -> Footprint {
        let mut cells = [Cell::Empty; 9];
        let color = ShapeId::RandomSparse.color();
        for index in rand::seq::index::sample(&mut self.rng, 9, 5).iter() {
            cells[index] = Cell::Locked(color);
        }
        Footprint::new(3, 3, cells.to_vec())
    }

    /// Carve a 2–3 wide, 1–3 tall chunk off the top of the stack.
    ///
    /// The chunk is removed from the board and returned padded to a square,
    /// anchored where it was cut. Returns None on an empty board.
    pub fn zombie_chunk(&mut self, board: &mut Board) -> Option<ZombieChunk> {
        let rows = board.rows();
        let columns = board.columns();
        let width = *[2usize, 3].choose(&mut self.rng)?;
        let height = *[1usize, 2, 3].choose(&mut self.rng)?;
        let width = width.min(columns);

        let candidates: Vec<usize> = (0..=columns - width)
            .filter(|&c| board.column_top(c) < rows)
            .collect();
        let left = *candidates.choose(&mut self.rng)?;
        let right = left + width;

        let top = (left..right).map(|c| board.column_top(c)).min()?;
        let bottom = (top + height).min(rows);

        let mut chunk = vec![vec![Cell::Empty; width]; bottom - top];
        for (r, row) in chunk.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let (br, bc) = ((top + r) as i32, (left + c) as i32);
                if board.is_locked(br, bc) {
                    *cell = Cell::Locked(ColorCategory::Zombie);
                    board.set(br, bc, Cell::Empty);
                }
            }
        }

        // Pad to a square, growing down or right unless that leaves the board.
        let (mut top, mut left) = (top as i32, left as i32);
        let h = chunk.len();
        if h < width {
            let extra = width - h;
            if bottom + extra > rows {
                top -= extra as i32;
                for _ in 0..extra {
                    chunk.insert(0, vec![Cell::Empty; width]);
                }
            } else {
                chunk.extend((0..extra).map(|_| vec![Cell::Empty; width]));
            }
        } else if h > width {
            let extra = h - width;
            if right + extra > columns {
                left -= extra as i32;
                for row in &mut chunk {
                    row.splice(0..0, std::iter::repeat(Cell::Empty).take(extra));
                }
            } else {
                for row in &mut chunk {
                    row.extend(std::iter::repeat(Cell::Empty).take(extra));
                }
            }
        }

        let size = chunk.len();
        let cells = chunk.into_iter().flatten().collect();
        Some(ZombieChunk {
            footprint: Footprint::new(size, size, cells),
            row: top,
            col: left,
        })
    }
}

/// Silhouette of the empty space between the stack's highest cell and its
/// deepest column top.
///
/// The footprint spans every column, so dropping it from column 0 fills that
/// band exactly. An empty board yields a full one-row piece along the floor.
pub fn freebie_footprint(board: &Board) -> Footprint {
    let rows = board.rows();
    let columns = board.columns();
    let tops = board.column_tops();
    let highest = board.highest_occupied_row().unwrap_or(rows - 1);
    let deepest = tops.iter().map(|&t| t as i32 - 1).max().unwrap_or(-1);

    if deepest < 0 {
        // Every column is full to the top; nothing fits but a single cell.
        return Footprint::new(1, 1, vec![Cell::Locked(ShapeId::Freebie.color())]);
    }

    let upper = (highest as i32).min(deepest) as usize;
    let deepest = deepest as usize;
    let color = ShapeId::Freebie.color();
    let mut cells = Vec::with_capacity((deepest - upper + 1) * columns);
    for row in upper..=deepest {
        for &top in tops.iter() {
            cells.push(if row < top {
                Cell::Locked(color)
            } else {
                Cell::Empty
            });
        }
    }
    Footprint::new(deepest - upper + 1, columns, cells)
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
