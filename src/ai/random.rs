use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::error::EngineError;
use crate::game::{Board, Move, TurnState};

use super::agent::Agent;

/// An agent that selects uniformly at random from available moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board, state: &TurnState) -> Result<Move, EngineError> {
        if state.is_game_over() {
            return Err(EngineError::NoAvailableMoves);
        }
        board
            .available_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(EngineError::NoAvailableMoves)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
