//! Engine - AI opponents and multi-player sessions on top of the core rules
//!
//! - [`ai`]: heuristic placement planner that plays through the same actions as a human
//! - [`session`]: advances every participant of a solo, twin, versus or battle session
//!
//! # Example
//!
//! ```
//! use tetron_engine::{SessionConfig, SessionCoordinator};
//! use tetron_types::{GameMode, TICK_MS};
//!
//! let mut session = SessionCoordinator::new(SessionConfig::for_mode(GameMode::Versus)).unwrap();
//! session.start();
//! for _ in 0..100 {
//!     session.tick(TICK_MS);
//! }
//! assert_eq!(session.participants().len(), 2);
//! ```

pub mod ai;
pub mod session;

pub use tetron_core as core;
pub use tetron_types as types;

pub use ai::{evaluate, AiPlanner, Evaluation, Phase};
pub use session::{
    Controller, Participant, SessionConfig, SessionCoordinator, SessionEvent, SessionOutcome,
};
