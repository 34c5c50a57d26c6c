//! Monte Carlo move evaluation with score-weighted playouts.
//!
//! Every cell of the grid carries a running score for the evaluating player.
//! Playouts pick each move with weight `1 + max(0, score)`, so cells that
//! featured in earlier wins are replayed more often within the same call.
//! Scores start from zero on every call.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::EngineError;
use crate::game::{Board, Cell, GameOutcome, Move, Player, TurnState, DEFAULT_RUN_LENGTH};

/// Best available move and its accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloResult {
    pub score: i64,
    pub mv: Move,
}

/// Per-cell desirability, column-major like the board.
#[derive(Debug, Clone)]
struct CellScores {
    rows: usize,
    scores: Vec<i64>,
}

impl CellScores {
    fn new(board: &Board) -> Self {
        CellScores {
            rows: board.rows(),
            scores: vec![0; board.total_cells()],
        }
    }

    fn get(&self, mv: Move) -> i64 {
        self.scores[mv.column * self.rows + mv.row]
    }

    fn weight(&self, mv: Move) -> u64 {
        1 + self.get(mv).max(0) as u64
    }

    /// Draw one of `moves`, each weighted by its current score.
    fn sample<R: Rng + ?Sized>(&self, moves: &[Move], rng: &mut R) -> Result<Move, EngineError> {
        moves
            .choose_weighted(rng, |&mv| self.weight(mv))
            .copied()
            .map_err(|_| EngineError::NoAvailableMoves)
    }

    /// Reward the winner's cells and penalize the loser's, from `evaluator`'s
    /// point of view.
    fn update(&mut self, board: &Board, winner: Player, evaluator: Player) {
        let sign = if winner == evaluator { 1 } else { -1 };
        for column in 0..board.cols() {
            for row in 0..board.rows() {
                let delta = match board.get(column, row) {
                    Cell::Occupied(player) if player == evaluator => sign,
                    Cell::Occupied(_) => -sign,
                    Cell::Empty => 0,
                };
                self.scores[column * self.rows + row] += delta;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarlo {
    trials: usize,
    run_length: usize,
}

impl MonteCarlo {
    pub fn new(trials: usize) -> Self {
        MonteCarlo {
            trials,
            run_length: DEFAULT_RUN_LENGTH,
        }
    }

    pub fn with_run_length(mut self, run_length: usize) -> Self {
        self.run_length = run_length;
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Run all trials and return the available move with the highest score.
    /// Ties go to the lowest column.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        board: &Board,
        state: &TurnState,
        rng: &mut R,
    ) -> Result<MonteCarloResult, EngineError> {
        let moves = board.available_moves();
        if moves.is_empty() || state.is_game_over() {
            return Err(EngineError::NoAvailableMoves);
        }
        if !state.is_in_progress() {
            return Err(EngineError::GameNotInProgress);
        }

        let evaluator = state.current_player();
        let mut scores = CellScores::new(board);

        for _ in 0..self.trials {
            let mut playout_board = board.clone();
            let mut playout_state = *state;
            let outcome = self.playout(&mut playout_board, &mut playout_state, &scores, rng)?;
            if let GameOutcome::Winner(winner) = outcome {
                scores.update(&playout_board, winner, evaluator);
            }
        }

        let mut best = MonteCarloResult {
            score: scores.get(moves[0]),
            mv: moves[0],
        };
        for &mv in &moves[1..] {
            let score = scores.get(mv);
            if score > best.score {
                best = MonteCarloResult { score, mv };
            }
        }
        Ok(best)
    }

    /// Play weighted-random moves until the game ends.
    fn playout<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        state: &mut TurnState,
        scores: &CellScores,
        rng: &mut R,
    ) -> Result<GameOutcome, EngineError> {
        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }
            let mv = scores.sample(&board.available_moves(), rng)?;
            board.place(mv, state.current_player());
            board.check_win(state, self.run_length);
            state.switch_turn();
        }
    }
}
