//! Move selection: Monte Carlo rollouts, memoized exhaustive search, and the
//! dispatcher that picks between them by game phase.

mod agent;
pub mod dispatcher;
pub mod monte_carlo;
mod random;
pub mod search;
pub mod table;

pub use agent::Agent;
pub use dispatcher::{Dispatcher, EngineConfig, Strategy};
pub use monte_carlo::{MonteCarlo, MonteCarloResult};
pub use random::RandomAgent;
pub use search::{select_best, Score, Search, SearchResult, SearchStats};
pub use table::{mirror_move, TranspositionTable, TranspositionTables};
