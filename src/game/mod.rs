//! Core Connect Four game logic: board representation, player types, and the
//! turn/outcome state machine that search clones alongside the board.

mod board;
mod player;
mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use board::{
    Board, BoardKey, Cell, Move, MoveError, ParseBoardError, DEFAULT_COLS, DEFAULT_ROWS,
    DEFAULT_RUN_LENGTH,
};
pub use player::Player;
pub use state::{GameOutcome, Phase, TurnState};
