use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::game::{Board, Move, TurnState, DEFAULT_RUN_LENGTH};

use super::agent::Agent;
use super::monte_carlo::MonteCarlo;
use super::search::Search;
use super::table::TranspositionTables;

/// Move-selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Empty-cell fraction at or above which the coarse Monte Carlo runs.
    pub monte_carlo_threshold: f64,
    /// Empty-cell fraction below which exhaustive search runs.
    pub exhaustive_threshold: f64,
    /// Trials for the opening phase.
    pub coarse_trials: usize,
    /// Trials for the middle phase and for the exhaustive fallback.
    pub fine_trials: usize,
    /// Overall allowance per move; leftover time is spent building tables.
    pub move_time_ms: u64,
    /// Hard deadline for the decisive exhaustive search.
    pub exhaustive_deadline_ms: u64,
    /// Trim the table-building pass.
    pub trim_table_building: bool,
    pub run_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            monte_carlo_threshold: 0.80,
            exhaustive_threshold: 0.70,
            coarse_trials: 500,
            fine_trials: 1000,
            move_time_ms: 10_000,
            exhaustive_deadline_ms: 15_000,
            trim_table_building: false,
            run_length: DEFAULT_RUN_LENGTH,
        }
    }
}

impl EngineConfig {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time_ms)
    }

    pub fn exhaustive_deadline(&self) -> Duration {
        Duration::from_millis(self.exhaustive_deadline_ms)
    }
}

/// Evaluator chosen for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MonteCarlo { trials: usize },
    Exhaustive,
}

impl Strategy {
    /// Pick an evaluator from the fraction of empty cells left on `board`.
    pub fn select(board: &Board, config: &EngineConfig) -> Strategy {
        let empty = board.empty_cells() as f64;
        let total = board.total_cells() as f64;
        if empty >= (config.monte_carlo_threshold * total).ceil() {
            Strategy::MonteCarlo {
                trials: config.coarse_trials,
            }
        } else if empty >= (config.exhaustive_threshold * total).ceil() {
            Strategy::MonteCarlo {
                trials: config.fine_trials,
            }
        } else {
            Strategy::Exhaustive
        }
    }
}

/// Chooses moves for the automated player and owns the per-player
/// transposition tables for the lifetime of a session.
pub struct Dispatcher {
    config: EngineConfig,
    tables: TranspositionTables,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(config: EngineConfig) -> Self {
        Dispatcher {
            config,
            tables: TranspositionTables::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Dispatcher {
            config,
            tables: TranspositionTables::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tables(&self) -> &TranspositionTables {
        &self.tables
    }

    pub fn reset_tables(&mut self) {
        self.tables.reset();
    }

    /// Choose a move for the player to move in `state`.
    ///
    /// Spends whatever remains of the per-move allowance extending the
    /// mover's transposition table.
    pub fn choose_move(&mut self, board: &Board, state: &TurnState) -> Result<Move, EngineError> {
        if state.is_game_over() || board.available_moves().is_empty() {
            return Err(EngineError::NoAvailableMoves);
        }
        if !state.is_in_progress() {
            return Err(EngineError::GameNotInProgress);
        }

        let started = Instant::now();
        let strategy = Strategy::select(board, &self.config);
        debug!(
            ?strategy,
            player = state.current_player().name(),
            empty_fraction = board.empty_fraction(),
            "selected strategy"
        );

        let mv = match strategy {
            Strategy::MonteCarlo { trials } => self.monte_carlo(board, state, trials)?,
            Strategy::Exhaustive => {
                let deadline = started + self.config.exhaustive_deadline();
                match self.exhaustive(board, state, deadline, false) {
                    Some(mv) => mv,
                    None => {
                        debug!(
                            trials = self.config.fine_trials,
                            "exhaustive search ran out of time, falling back to Monte Carlo"
                        );
                        self.monte_carlo(board, state, self.config.fine_trials)?
                    }
                }
            }
        };

        let move_deadline = started + self.config.move_time();
        if Instant::now() < move_deadline {
            let trim = self.config.trim_table_building;
            let resolved = self.exhaustive(board, state, move_deadline, trim).is_some();
            debug!(
                resolved,
                table_len = self.tables.for_player(state.current_player()).len(),
                "table building finished"
            );
        }

        Ok(mv)
    }

    fn monte_carlo(
        &mut self,
        board: &Board,
        state: &TurnState,
        trials: usize,
    ) -> Result<Move, EngineError> {
        let result = MonteCarlo::new(trials)
            .with_run_length(self.config.run_length)
            .evaluate(board, state, &mut self.rng)?;
        Ok(result.mv)
    }

    fn exhaustive(
        &mut self,
        board: &Board,
        state: &TurnState,
        deadline: Instant,
        trim: bool,
    ) -> Option<Move> {
        let table = self.tables.for_player_mut(state.current_player());
        Search::new(table, &mut self.rng, deadline)
            .with_trim(trim)
            .with_run_length(self.config.run_length)
            .run(board, state)
            .map(|result| result.mv)
    }
}

impl Agent for Dispatcher {
    fn select_move(&mut self, board: &Board, state: &TurnState) -> Result<Move, EngineError> {
        self.choose_move(board, state)
    }

    fn name(&self) -> &str {
        "Engine"
    }
}
