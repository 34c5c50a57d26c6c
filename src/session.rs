//! A live play session: the board and turn state the UI collaborator shows,
//! who controls each side, and the engine that answers for computer turns.
//!
//! The engine's transposition tables live as long as the session. Starting a
//! new game keeps them; [`Session::stop`] throws them away.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::Dispatcher;
use crate::config::AppConfig;
use crate::error::{ConfigError, EngineError};
use crate::game::{Board, GameOutcome, Move, Player, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Computer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub first_player: Player,
    pub first_controller: Controller,
    pub second_controller: Controller,
    /// Fixed RNG seed for reproducible engine play.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            first_player: Player::First,
            first_controller: Controller::Human,
            second_controller: Controller::Computer,
            seed: None,
        }
    }
}

pub struct Session {
    board: Board,
    state: TurnState,
    first_player: Player,
    controllers: [Controller; 2],
    dispatcher: Dispatcher,
    games_started: u64,
}

impl Session {
    /// Build an idle session. The configuration is validated first, so bad
    /// board dimensions are reported instead of panicking.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = &config.session;
        let engine = config.engine.clone();
        let dispatcher = match session.seed {
            Some(seed) => Dispatcher::with_seed(engine, seed),
            None => Dispatcher::new(engine),
        };
        Ok(Session {
            board: Board::new(config.board.cols, config.board.rows),
            state: TurnState::new(session.first_player),
            first_player: session.first_player,
            controllers: [session.first_controller, session.second_controller],
            dispatcher,
            games_started: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn first_player(&self) -> Player {
        self.first_player
    }

    pub fn controller(&self, player: Player) -> Controller {
        self.controllers[player.index()]
    }

    pub fn games_started(&self) -> u64 {
        self.games_started
    }

    /// Whether the player to move is engine-controlled and a game is running.
    pub fn is_computer_turn(&self) -> bool {
        self.state.is_in_progress()
            && self.controller(self.state.current_player()) == Controller::Computer
    }

    /// Clear the board and begin a new game. Transposition tables are kept.
    pub fn start_game(&mut self) {
        self.board = Board::new(self.board.cols(), self.board.rows());
        self.state = TurnState::new(self.first_player);
        self.state.start();
        self.games_started += 1;
        info!(
            game = self.games_started,
            first = self.first_player.name(),
            "game started"
        );
    }

    /// Abandon the current game and forget everything the engine learned.
    pub fn stop(&mut self) {
        self.board = Board::new(self.board.cols(), self.board.rows());
        self.state = TurnState::new(self.first_player);
        self.dispatcher.reset_tables();
        info!("session reset");
    }

    /// Table keys only record the grid, so the same grid would have the
    /// other player to move once the opener changes. Switching the first
    /// player therefore clears the tables.
    pub fn set_first_player(&mut self, player: Player) -> Result<(), EngineError> {
        self.ensure_idle()?;
        if player != self.first_player {
            self.dispatcher.reset_tables();
            info!(first = player.name(), "first player changed, tables cleared");
        }
        self.first_player = player;
        self.state = TurnState::new(player);
        Ok(())
    }

    pub fn set_controller(&mut self, player: Player, controller: Controller) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.controllers[player.index()] = controller;
        Ok(())
    }

    /// Drop a chip for the player to move. Rejected moves leave the board
    /// untouched.
    pub fn play_column(&mut self, column: usize) -> Result<Move, EngineError> {
        if !self.state.is_in_progress() {
            return Err(EngineError::GameNotInProgress);
        }
        let mv = self.board.drop_piece(column, self.state.current_player())?;
        self.finish_turn();
        Ok(mv)
    }

    /// Let the engine move if the player to move is computer-controlled.
    /// Returns `Ok(None)` when it is a human's turn.
    pub fn play_computer_move(&mut self) -> Result<Option<Move>, EngineError> {
        if !self.state.is_in_progress() {
            return Err(EngineError::GameNotInProgress);
        }
        if !self.is_computer_turn() {
            return Ok(None);
        }
        let mv = self.dispatcher.choose_move(&self.board, &self.state)?;
        self.board.place(mv, self.state.current_player());
        self.finish_turn();
        Ok(Some(mv))
    }

    fn finish_turn(&mut self) {
        let run_length = self.dispatcher.config().run_length;
        match self.board.check_win(&mut self.state, run_length) {
            Some(GameOutcome::Winner(player)) => {
                info!(game = self.games_started, winner = player.name(), "game won");
            }
            Some(GameOutcome::Draw) => info!(game = self.games_started, "game drawn"),
            None => self.state.switch_turn(),
        }
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.state.is_in_progress() {
            Err(EngineError::GameInProgress)
        } else {
            Ok(())
        }
    }
}
