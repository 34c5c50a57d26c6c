use crate::error::EngineError;
use crate::game::{Board, Move, TurnState};

/// Anything that can pick a move for the player to move.
pub trait Agent {
    /// Select a move for `state.current_player()` on `board`.
    fn select_move(&mut self, board: &Board, state: &TurnState) -> Result<Move, EngineError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
