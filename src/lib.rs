//! Tetron (workspace facade crate).
//!
//! Re-exports the rule crates under `tetron::{core,engine,types}` and holds the
//! pieces of the headless `tetron-sim` runner that tests reach through the library.

pub mod options;
pub mod report;

pub use tetron_core as core;
pub use tetron_engine as engine;
pub use tetron_types as types;
