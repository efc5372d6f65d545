//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains every game rule of a single Tetron game. It has **no
//! dependencies** on rendering, audio, input or networking, making it:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Testable**: unit tests for every rule
//! - **Portable**: runs headless, in a terminal, or behind any renderer
//!
//! # Module Structure
//!
//! - [`board`]: the locked-cell grid, line clearing and garbage rows
//! - [`pieces`]: shape footprints and rotation kick tables
//! - [`collision`]: translation and rotation legality, T-spin classification
//! - [`generator`]: exhaustion-pool shape and effect selection
//! - [`lock`]: landing position and board writes
//! - [`scoring`]: points per lock with combo and perfect-clear multipliers
//! - [`garbage`]: attack lines and the pending garbage queue
//! - [`difficulty`]: score driven fall speed and generator weights
//! - [`game`]: one player's complete game state
//! - [`config`]: game configuration and construction errors
//! - [`snapshot`]: plain-data copies of a game for observers
//!
//! # Game Rules
//!
//! - **Exhaustion pools**: no shape repeats until its whole category was drawn
//! - **Kick tables**: SRS kicks for J/L/S/T/Z and I, in-place O, a small generic table for the rest
//! - **Lock Delay**: 500ms before a grounded piece locks, with 15 move/rotate reset limit
//! - **Hold**: store one piece for later use (once per lock)
//! - **Special effects**: ghost, heavy, disoriented, blind, wind, zombie and fake pieces
//! - **Garbage**: clears attack opponents after cancelling pending lines
//!
//! # Example
//!
//! ```
//! use tetron_core::{ActiveGame, GameConfig};
//! use tetron_types::GameAction;
//!
//! let mut game = ActiveGame::new(GameConfig::default(), 12345).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.piece_serial(), 2);
//! ```
//!
//! # Timing
//!
//! Call [`ActiveGame::tick`](game::ActiveGame::tick) every frame with the
//! elapsed milliseconds. Fall speed follows the score, from one row per second
//! down to six rows per second.

pub mod board;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod game;
pub mod garbage;
pub mod generator;
pub mod lock;
pub mod pieces;
pub mod scoring;
pub mod snapshot;

pub use tetron_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::{try_rotate, try_translate};
pub use config::{ConfigError, GameConfig};
pub use difficulty::Difficulty;
pub use game::{ActiveGame, HoldEntry, LockEvent};
pub use garbage::{attack_lines, GarbageEntry, GarbageQueue};
pub use generator::{NextEntry, PieceGenerator};
pub use pieces::{catalog_footprint, Footprint, Piece};
pub use scoring::{score_increment, ClearContext};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
