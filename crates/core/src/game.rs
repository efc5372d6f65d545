//! Game module - one player's complete game state
//!
//! [`ActiveGame`] ties the board, generator, collision rules, scoring and the
//! garbage queue together. It handles timing, piece movement and rotation,
//! special effects, locking and the game lifecycle. Every call is synchronous;
//! a driver advances the game with [`ActiveGame::tick`] and primitive actions.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::collision;
use crate::config::{ConfigError, GameConfig};
use crate::difficulty::Difficulty;
use crate::garbage::{attack_lines, GarbageEntry, GarbageQueue};
use crate::generator::{NextEntry, PieceGenerator};
use crate::lock;
use crate::pieces::{Footprint, Piece};
use crate::scoring::{score_increment, ClearContext};
use crate::snapshot::{fnv1a64, ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::types::*;

/// A piece parked in the hold slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldEntry {
    pub shape: ShapeId,
    /// None for shapes rebuilt from the board when they come back
    pub footprint: Option<Footprint>,
    pub rotation: Rotation,
}

/// Outcome of the most recent lock (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub score_increment: u32,
    /// Attack lines produced by the clear
    pub attack: u32,
    /// Part of the attack left after cancelling pending garbage
    pub sent: u32,
    pub tspin: TSpinKind,
    pub combo: u32,
    pub perfect_clear: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wind {
    direction: i32,
    elapsed_ms: u64,
}

/// Complete state of one game instance
#[derive(Debug, Clone)]
pub struct ActiveGame {
    config: GameConfig,
    seed: u64,
    board: Board,
    generator: PieceGenerator,
    /// Garbage holes and wind direction
    rng: StdRng,
    active: Option<Piece>,
    next_queue: VecDeque<NextEntry>,
    hold: Option<HoldEntry>,
    can_hold: bool,
    garbage: GarbageQueue,
    difficulty: Difficulty,
    score: u32,
    /// Session-wide score that drives difficulty when set
    shared_score: Option<u32>,
    combo: u32,
    tspin: TSpinKind,
    clock_ms: u64,
    fall_timer_ms: f64,
    lock_timer_ms: u64,
    lock_reset_count: u8,
    soft_dropping: bool,
    wind: Option<Wind>,
    disoriented_ms: u64,
    blind_ms: u64,
    started: bool,
    paused: bool,
    lost: bool,
    won: bool,
    /// Monotonic id for active pieces (increments on every spawn and hold swap)
    piece_serial: u32,
    spawned_at_ms: u64,
    hard_dropped: bool,
    last_event: Option<LockEvent>,
    attack_outbox: u32,
    score_delta: u32,
}

impl ActiveGame {
    /// Create a game; nothing spawns until [`start`](Self::start)
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            board: Board::new(config.row_count, config.column_count),
            generator: PieceGenerator::new(seed),
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            active: None,
            next_queue: VecDeque::with_capacity(config.next_queue_length),
            hold: None,
            can_hold: true,
            garbage: GarbageQueue::new(),
            difficulty: Difficulty::for_score(0, config.classic_mode),
            score: 0,
            shared_score: None,
            combo: 0,
            tspin: TSpinKind::None,
            clock_ms: 0,
            fall_timer_ms: 0.0,
            lock_timer_ms: 0,
            lock_reset_count: 0,
            soft_dropping: false,
            wind: None,
            disoriented_ms: 0,
            blind_ms: 0,
            started: false,
            paused: false,
            lost: false,
            won: false,
            piece_serial: 0,
            spawned_at_ms: 0,
            hard_dropped: false,
            last_event: None,
            attack_outbox: 0,
            score_delta: 0,
        }
    }

    /// Reset to a fresh game, fill the next queue and spawn the first piece
    pub fn start(&mut self) {
        *self = Self::build(self.config, self.seed);
        self.started = true;
        for _ in 0..self.config.next_queue_length {
            let entry = self.generator.next_entry(self.difficulty.advanced_weight);
            self.next_queue.push_back(entry);
        }
        self.spawn_piece(None);
    }

    /// End play; the game keeps its final state for inspection
    pub fn stop(&mut self) {
        self.started = false;
        self.active = None;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Mark the game as won and end play
    pub fn mark_won(&mut self) {
        self.won = true;
        self.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.started && !self.paused && !self.lost && !self.won
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn lost(&self) -> bool {
        self.lost
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn tspin(&self) -> TSpinKind {
        self.tspin
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn piece_serial(&self) -> u32 {
        self.piece_serial
    }

    /// Game clock value when the current piece became active
    pub fn spawned_at_ms(&self) -> u64 {
        self.spawned_at_ms
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scripted setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.active.as_ref().and_then(|p| p.effect)
    }

    pub fn disoriented_remaining_ms(&self) -> u64 {
        self.disoriented_ms
    }

    pub fn blind_remaining_ms(&self) -> u64 {
        self.blind_ms
    }

    pub fn hold_snapshot(&self) -> Option<ShapeId> {
        self.hold.as_ref().map(|h| h.shape)
    }

    pub fn next_snapshot(&self) -> Vec<ShapeId> {
        self.next_queue.iter().map(NextEntry::shape).collect()
    }

    pub fn garbage_snapshot(&self) -> Vec<GarbageEntry> {
        self.garbage.entries().copied().collect()
    }

    pub fn pending_garbage(&self) -> u32 {
        self.garbage.total_pending()
    }

    /// Board with the landing preview and the active piece drawn in
    pub fn board_snapshot(&self) -> Vec<Vec<Cell>> {
        let mut cells = self.board.to_cells();
        let Some(piece) = &self.active else {
            return cells;
        };

        let mut paint = |row: i32, col: i32, cell: Cell, only_empty: bool| {
            if row < 0 || col < 0 {
                return;
            }
            if let Some(slot) = cells
                .get_mut(row as usize)
                .and_then(|r| r.get_mut(col as usize))
            {
                if !only_empty || slot.is_empty() {
                    *slot = cell;
                }
            }
        };

        if !piece.has_effect(Effect::Ghost) && self.blind_ms == 0 {
            for (row, col) in lock::landing_cells(&self.board, piece) {
                paint(row, col, Cell::Preview, true);
            }
        }
        for (r, c, cell) in piece.footprint.iter() {
            if cell.is_locked() {
                paint(piece.row + r as i32, piece.col + c as i32, cell, false);
            }
        }
        cells
    }

    /// Cells the active piece would occupy after a hard drop
    pub fn landing_cells(&self) -> Vec<(i32, i32)> {
        self.active
            .as_ref()
            .map(|p| lock::landing_cells(&self.board, p))
            .unwrap_or_default()
    }

    /// Check if the active piece rests on something in its gravity direction
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(ref piece) => collision::is_landed(&self.board, piece),
            None => false,
        }
    }

    /// Current fall interval, including effect and soft drop adjustments
    pub fn fall_interval_ms(&self) -> f64 {
        let mut interval = self.difficulty.fall_interval_ms;
        if self.active_effect().is_some_and(|e| e.is_fast_fall()) {
            interval /= FAST_FALL_DIVISOR;
        }
        if self.soft_dropping {
            interval = interval.min(SOFT_DROP_INTERVAL_MS as f64);
        }
        interval
    }

    /// Column that centers a footprint of the given width
    fn spawn_column(&self, width: usize) -> i32 {
        (self.board.columns().saturating_sub(width) / 2) as i32
    }

    /// Spawn the next piece, from the hold slot when given, else from the queue
    fn spawn_piece(&mut self, from_hold: Option<HoldEntry>) -> bool {
        let mut effect = self.generator.roll_effect(self.difficulty.special_weight);
        self.wind = None;

        if effect == Some(Effect::Zombie) {
            if from_hold.is_none() && !self.board.is_empty() {
                if let Some(chunk) = self.generator.zombie_chunk(&mut self.board) {
                    let mut piece =
                        Piece::new(ShapeId::Zombie, chunk.footprint, chunk.row, chunk.col);
                    piece.effect = Some(Effect::Zombie);
                    return self.activate(piece);
                }
            }
            effect = None;
        }

        let (shape, footprint, rotation) = match from_hold {
            Some(HoldEntry {
                shape,
                footprint: Some(footprint),
                rotation,
            }) => (shape, footprint, rotation),
            Some(HoldEntry { shape, .. }) => {
                let (shape, footprint) = self
                    .generator
                    .materialize(NextEntry::Deferred(shape), &self.board);
                (shape, footprint, Rotation::North)
            }
            None => {
                let entry = self
                    .next_queue
                    .pop_front()
                    .expect("next queue is refilled on every pop");
                let refill = self.generator.next_entry(self.difficulty.advanced_weight);
                self.next_queue.push_back(refill);
                let (shape, footprint) = self.generator.materialize(entry, &self.board);
                (shape, footprint, Rotation::North)
            }
        };

        let footprint = match effect {
            Some(Effect::Ghost) => footprint.tinted(ColorCategory::Ghost),
            Some(Effect::Heavy) => footprint.tinted(ColorCategory::Heavy),
            _ => footprint,
        };
        match effect {
            Some(Effect::Disoriented) if self.disoriented_ms == 0 => {
                self.disoriented_ms = DISORIENTED_DURATION_MS;
            }
            Some(Effect::Blind) if self.blind_ms == 0 => {
                self.blind_ms = BLIND_DURATION_MS;
            }
            Some(Effect::Wind) => {
                let direction = if self.rng.gen_bool(0.5) { 1 } else { -1 };
                self.wind = Some(Wind {
                    direction,
                    elapsed_ms: 0,
                });
            }
            _ => {}
        }

        let col = self.spawn_column(footprint.cols());
        let mut piece = Piece::new(shape, footprint, 0, col);
        piece.rotation = rotation;
        piece.effect = effect;
        self.activate(piece)
    }

    /// Make `piece` the active piece, or lose if it does not fit
    fn activate(&mut self, piece: Piece) -> bool {
        if !collision::fits(&self.board, &piece) {
            self.lost = true;
            self.active = None;
            return false;
        }

        self.active = Some(piece);
        self.piece_serial = self.piece_serial.wrapping_add(1);
        self.spawned_at_ms = self.clock_ms;
        self.fall_timer_ms = 0.0;
        self.lock_timer_ms = 0;
        self.lock_reset_count = 0;
        self.tspin = TSpinKind::None;
        true
    }

    /// Replace the active piece with an effect-free `shape` at the spawn position.
    ///
    /// Panics for [`ShapeId::Zombie`], which only exists as a carved chunk.
    pub fn spawn_shape(&mut self, shape: ShapeId) -> bool {
        let (shape, footprint) = self
            .generator
            .materialize(NextEntry::Deferred(shape), &self.board);
        let col = self.spawn_column(footprint.cols());
        self.wind = None;
        self.activate(Piece::new(shape, footprint, 0, col))
    }

    fn translate_active(&mut self, d_row: i32, d_col: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        collision::try_translate(&self.board, piece, d_row, d_col)
    }

    /// Reset the lock timer (with reset limit)
    fn reset_lock_timer(&mut self) {
        if self.lock_reset_count < LOCK_RESET_LIMIT {
            self.lock_timer_ms = 0;
            self.lock_reset_count += 1;
        }
    }

    fn shift(&mut self, d_col: i32) -> bool {
        if !self.is_playing() || !self.translate_active(0, d_col) {
            return false;
        }
        self.tspin = TSpinKind::None;
        if self.is_grounded() {
            self.reset_lock_timer();
        }
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        match collision::try_rotate(&self.board, piece, clockwise) {
            Some(outcome) => {
                self.tspin = outcome.tspin;
                self.reset_lock_timer();
                true
            }
            None => false,
        }
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(true)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(false)
    }

    /// Begin soft dropping: fall one row now, then at the soft drop rate
    pub fn soft_drop_start(&mut self) -> bool {
        if !self.is_playing() || self.active.is_none() {
            return false;
        }
        self.soft_dropping = true;
        self.fall_timer_ms = 0.0;
        self.translate_active(1, 0);
        true
    }

    pub fn soft_drop_stop(&mut self) -> bool {
        if !self.soft_dropping {
            return false;
        }
        self.soft_dropping = false;
        self.fall_timer_ms = 0.0;
        true
    }

    /// Drop the active piece to its landing position and lock it
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(mut piece) = self.active.take() else {
            return false;
        };
        if !piece.has_effect(Effect::Heavy) {
            piece.row += lock::landing_shift(&self.board, &piece);
        }
        self.hard_dropped = true;
        self.lock_piece(piece);
        true
    }

    /// Swap the active piece with the hold slot (once per lock)
    pub fn hold(&mut self) -> bool {
        if !self.is_playing() || !self.can_hold {
            return false;
        }
        let holdable = match &self.active {
            Some(piece) => !matches!(
                piece.effect,
                Some(Effect::Ghost | Effect::Heavy | Effect::Zombie)
            ),
            None => false,
        };
        if !holdable {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };

        let stored = HoldEntry {
            shape: piece.shape,
            footprint: (piece.shape != ShapeId::Freebie).then_some(piece.footprint),
            rotation: piece.rotation,
        };
        let previous = self.hold.replace(stored);
        self.can_hold = false;
        self.spawn_piece(previous);
        true
    }

    /// Lock a piece and run the clear, scoring and garbage pipeline
    fn lock_piece(&mut self, mut piece: Piece) {
        if piece.has_effect(Effect::Heavy) {
            lock::crush_beneath(&mut self.board, &mut piece);
        }
        if !piece.has_effect(Effect::Fake) {
            lock::write_piece(&mut self.board, &piece);
        }
        self.board.fade_transient_colors();

        let lines = self.board.clear_full_rows().len() as u32;
        self.combo = if lines > 0 { self.combo + 1 } else { 0 };
        let perfect_clear = lines > 0 && self.board.is_empty();
        let ctx = ClearContext {
            lines,
            tspin: self.tspin,
            combo: self.combo,
            perfect_clear,
            scoring_eligible: piece.shape.is_scoring(),
        };

        let attack = attack_lines(
            lines,
            ctx.tspin,
            ctx.combo,
            perfect_clear,
            ctx.scoring_eligible,
        );
        let sent = self.garbage.cancel(attack);
        self.attack_outbox += sent;

        if attack == 0 && self.garbage.is_due(self.clock_ms, self.config.garbage_timeout_ms) {
            if let Some(count) = self.garbage.pop_due(self.clock_ms) {
                let hole = self.rng.gen_range(0..self.board.columns());
                self.board.inject_garbage(count as usize, hole);
            }
        }

        let increment = score_increment(&ctx);
        self.score = self.score.saturating_add(increment);
        self.score_delta = self.score_delta.saturating_add(increment);
        self.refresh_difficulty();

        self.last_event = Some(LockEvent {
            lines_cleared: lines,
            score_increment: increment,
            attack,
            sent,
            tspin: ctx.tspin,
            combo: self.combo,
            perfect_clear,
        });

        self.tspin = TSpinKind::None;
        self.wind = None;
        self.can_hold = true;

        if self.board.top_row_occupied() {
            self.lost = true;
            self.active = None;
            return;
        }
        self.spawn_piece(None);
    }

    fn refresh_difficulty(&mut self) {
        let score = self.shared_score.unwrap_or(self.score);
        self.difficulty = Difficulty::for_score(score, self.config.classic_mode);
    }

    /// Let the session-wide score drive this game's difficulty
    pub fn set_shared_score(&mut self, score: u32) {
        self.shared_score = Some(score);
        self.refresh_difficulty();
    }

    /// Queue incoming garbage; returns the lines accepted under the cap
    pub fn receive_garbage(&mut self, lines: u32) -> u32 {
        self.garbage.add(lines, self.clock_ms)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Take the attack lines waiting to be sent to an opponent
    pub fn take_attack(&mut self) -> u32 {
        std::mem::take(&mut self.attack_outbox)
    }

    /// Take the score gained since the last call
    pub fn take_score_delta(&mut self) -> u32 {
        std::mem::take(&mut self.score_delta)
    }

    /// Whether a hard drop happened since the last call
    pub fn take_hard_dropped(&mut self) -> bool {
        std::mem::take(&mut self.hard_dropped)
    }

    fn blow_wind(&mut self, elapsed_ms: u64) -> bool {
        let Some(wind) = self.wind.as_mut() else {
            return false;
        };
        wind.elapsed_ms += elapsed_ms;
        let pushes = wind.elapsed_ms / WIND_INTERVAL_MS;
        wind.elapsed_ms %= WIND_INTERVAL_MS;
        let direction = wind.direction;

        let mut moved = false;
        for _ in 0..pushes {
            moved |= self.translate_active(0, direction);
        }
        moved
    }

    /// Main game tick - advance clocks, effects, gravity and lock delay.
    ///
    /// Returns true when the active piece moved or locked.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        if !self.is_playing() {
            return false;
        }

        self.clock_ms += elapsed_ms;
        self.disoriented_ms = self.disoriented_ms.saturating_sub(elapsed_ms);
        self.blind_ms = self.blind_ms.saturating_sub(elapsed_ms);

        if self.active.is_none() {
            return false;
        }

        let mut changed = self.blow_wind(elapsed_ms);

        if self.is_grounded() {
            self.lock_timer_ms += elapsed_ms;
            if self.lock_timer_ms >= LOCK_DELAY_MS {
                if let Some(piece) = self.active.take() {
                    self.lock_piece(piece);
                }
                return true;
            }
            return changed;
        }

        self.lock_timer_ms = 0;
        self.fall_timer_ms += elapsed_ms as f64;
        if self.fall_timer_ms >= self.fall_interval_ms() {
            self.fall_timer_ms = 0.0;
            let gravity = self.active.as_ref().map_or(1, Piece::gravity);
            changed |= self.translate_active(gravity, 0);
        }

        changed
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::SoftDropStart => self.soft_drop_start(),
            GameAction::SoftDropStop => self.soft_drop_stop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold(),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.rows = self.board.rows();
        out.columns = self.board.columns();
        out.board.clear();
        out.board
            .extend(self.board.cells().iter().map(|cell| cell.as_u8()));
        out.board_hash = fnv1a64(&out.board);
        out.active = self.active.as_ref().map(ActiveSnapshot::from);
        out.landing = self.landing_cells();
        out.hold = self.hold_snapshot();
        out.next_queue.clear();
        out.next_queue
            .extend(self.next_queue.iter().map(NextEntry::shape));
        out.can_hold = self.can_hold;
        out.paused = self.paused;
        out.lost = self.lost;
        out.won = self.won;
        out.seed = self.seed;
        out.piece_serial = self.piece_serial;
        out.score = self.score;
        out.combo = self.combo;
        out.pending_garbage = self.garbage.total_pending();
        out.clock_ms = self.clock_ms;
        out.timers = TimersSnapshot {
            fall_ms: self.fall_timer_ms as u64,
            lock_ms: self.lock_timer_ms,
            disoriented_ms: self.disoriented_ms,
            blind_ms: self.blind_ms,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

impl Default for ActiveGame {
    fn default() -> Self {
        Self::build(GameConfig::default(), 1)
    }
}
