//! # Connect Four Engine
//!
//! Move selection for an automated Connect Four player. Early positions are
//! scored with score-weighted Monte Carlo playouts; late positions are solved
//! with a memoized, mirror-aware depth-first search under a wall-clock
//! deadline, and spare time per move keeps extending the search tables.
//!
//! ## Modules
//!
//! - [`game`]: Board, player, turn/outcome state machine
//! - [`ai`]: Monte Carlo evaluator, exhaustive search, transposition tables, dispatcher
//! - [`session`]: Live game driven by a UI collaborator
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
