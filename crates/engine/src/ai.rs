//! AI module - heuristic placement search for computer opponents
//!
//! The planner never simulates moves off-board. It walks the live piece with
//! the same primitive actions a player uses, scores the landing spot at every
//! reachable column and rotation, then replays the best one:
//!
//! 1. **Positioning**: walk to the preferred side wall.
//! 2. **Evaluating**: sweep back across the board, scoring every column; at the
//!    far wall rotate and start another pass from that side.
//! 3. **Deciding**: keep the best scores and break ties at random.
//! 4. **Performing**: rotate and shift toward the choice, then hard drop once
//!    the per-piece reaction delay has elapsed.
//!
//! Evaluation stops early when the delay runs out, so slow boards still play.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use tetron_core::board::Board;
use tetron_core::game::ActiveGame;
use tetron_core::lock;
use tetron_core::pieces::Piece;
use tetron_core::types::{Cell, ColorCategory, Rotation, AI_DELAY_MEAN_MS, AI_DELAY_STD_MS};

/// Penalty for a placement that leaves a cell in the top row
const TOP_OUT_PENALTY: i64 = 100;

/// Penalty per hole a placement creates
const HOLE_PENALTY: i64 = 5;

/// Rotation states to sample before deciding
const ROTATIONS: usize = 4;

/// Planner state for the current piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Positioning,
    Evaluating,
    Deciding,
    Performing,
}

/// A scored landing spot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Sorted columns covered by the piece
    pub columns: Vec<i32>,
    pub rotation: Rotation,
    pub score: i64,
}

/// Score dropping `piece` straight down from where it stands.
///
/// `lines − distance of the piece top from the floor − distance of the piece
/// bottom from the floor − 100 if the top row ends up occupied − 5 × new holes`,
/// computed on a scratch copy of the board before any line is cleared.
pub fn evaluate(board: &Board, piece: &Piece) -> i64 {
    let rows = board.rows() as i64;
    let landing = lock::landing_cells(board, piece);

    let mut scratch = board.clone();
    for &(row, col) in &landing {
        scratch.set(row, col, Cell::Locked(ColorCategory::Garbage));
    }

    let lines = (0..scratch.rows())
        .filter(|&r| scratch.is_row_full(r))
        .count() as i64;
    let top = landing.iter().map(|&(r, _)| r).min().unwrap_or(0) as i64;
    let bottom = landing.iter().map(|&(r, _)| r).max().unwrap_or(0) as i64;
    let top_out = if scratch.top_row_occupied() {
        TOP_OUT_PENALTY
    } else {
        0
    };
    let new_holes = scratch.count_holes().saturating_sub(board.count_holes()) as i64;

    lines - (rows - top) - (rows - 1 - bottom) - top_out - HOLE_PENALTY * new_holes
}

/// Plans and replays placements for one AI-controlled game
#[derive(Debug, Clone)]
pub struct AiPlanner {
    rng: StdRng,
    delay: Normal<f64>,
    phase: Phase,
    /// Piece serial the current plan belongs to
    serial: u32,
    delay_ms: u64,
    prefer_left: bool,
    evaluations: Vec<Evaluation>,
    choice: Option<Evaluation>,
}

impl AiPlanner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            delay: Normal::new(AI_DELAY_MEAN_MS, AI_DELAY_STD_MS)
                .expect("AI delay deviation is finite and positive"),
            phase: Phase::Positioning,
            serial: 0,
            delay_ms: 0,
            prefer_left: true,
            evaluations: Vec::new(),
            choice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Reaction delay drawn for the current piece
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn choice(&self) -> Option<&Evaluation> {
        self.choice.as_ref()
    }

    fn reset(&mut self, serial: u32) {
        self.serial = serial;
        self.phase = Phase::Positioning;
        self.prefer_left = true;
        self.delay_ms = self.delay.sample(&mut self.rng).max(0.0) as u64;
        self.evaluations.clear();
        self.choice = None;
    }

    fn sampled_rotations(&self) -> usize {
        let mut seen: Vec<Rotation> = Vec::with_capacity(ROTATIONS);
        for eval in &self.evaluations {
            if !seen.contains(&eval.rotation) {
                seen.push(eval.rotation);
            }
        }
        seen.len()
    }

    fn shift(&self, game: &mut ActiveGame) -> bool {
        if self.prefer_left {
            game.move_left()
        } else {
            game.move_right()
        }
    }

    fn record(&mut self, game: &ActiveGame) {
        let Some(piece) = game.active() else {
            return;
        };
        self.evaluations.push(Evaluation {
            columns: piece.columns(),
            rotation: piece.rotation,
            score: evaluate(game.board(), piece),
        });
    }

    fn decide(&mut self) {
        let best = self.evaluations.iter().map(|e| e.score).max();
        let candidates: Vec<&Evaluation> = self
            .evaluations
            .iter()
            .filter(|e| Some(e.score) == best)
            .collect();
        self.choice = candidates.choose(&mut self.rng).map(|&e| e.clone());
    }

    fn perform(&self, game: &mut ActiveGame, timed_out: bool) -> bool {
        let Some(choice) = &self.choice else {
            return game.hard_drop();
        };
        let Some(piece) = game.active() else {
            return false;
        };
        let rotation = piece.rotation;
        let columns = piece.columns();

        let acted = if rotation != choice.rotation {
            game.rotate_ccw()
        } else if columns != choice.columns {
            match (columns.first(), choice.columns.first()) {
                (Some(current), Some(target)) if current > target => game.move_left(),
                _ => game.move_right(),
            }
        } else {
            return timed_out && game.hard_drop();
        };

        // A blocked plan still has to land the piece.
        acted || (timed_out && game.hard_drop())
    }

    /// Issue at most one action for the game's current piece.
    ///
    /// Returns true when the game accepted an action.
    pub fn step(&mut self, game: &mut ActiveGame) -> bool {
        if !game.is_playing() || game.active().is_none() {
            return false;
        }
        if game.piece_serial() != self.serial {
            self.reset(game.piece_serial());
        }

        let elapsed = game.clock_ms().saturating_sub(game.spawned_at_ms());
        let timed_out = elapsed >= self.delay_ms;
        if timed_out && matches!(self.phase, Phase::Positioning | Phase::Evaluating) {
            self.phase = Phase::Deciding;
        }

        match self.phase {
            Phase::Positioning => {
                let moved = self.shift(game);
                if !moved {
                    self.prefer_left = !self.prefer_left;
                    self.phase = Phase::Evaluating;
                }
                moved
            }
            Phase::Evaluating => {
                self.record(game);
                let moved = self.shift(game);
                if !moved {
                    let rotated = game.rotate_ccw();
                    self.phase = if self.sampled_rotations() >= ROTATIONS {
                        Phase::Deciding
                    } else {
                        Phase::Positioning
                    };
                    return rotated;
                }
                moved
            }
            Phase::Deciding => {
                self.decide();
                self.phase = Phase::Performing;
                false
            }
            Phase::Performing => self.perform(game, timed_out),
        }
    }
}

impl Default for AiPlanner {
    fn default() -> Self {
        Self::new(1)
    }
}
