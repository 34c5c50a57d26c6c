use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Lifecycle of a single game. `Won` and `Drawn` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Won(Player),
    Drawn,
}

/// Whose turn it is and whether the game has been decided.
///
/// Search clones this alongside the board for every hypothetical move, so it
/// stays a small `Copy` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    current_player: Player,
    phase: Phase,
}

impl TurnState {
    /// A game that has not started yet; `first` will move first.
    pub fn new(first: Player) -> Self {
        TurnState {
            current_player: first,
            phase: Phase::NotStarted,
        }
    }

    /// A started game with `player` to move.
    pub fn in_progress(player: Player) -> Self {
        TurnState {
            current_player: player,
            phase: Phase::InProgress,
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::InProgress;
        }
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn opponent(&self) -> Player {
        self.current_player.other()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::Won(_) | Phase::Drawn)
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Won(player) => Some(GameOutcome::Winner(player)),
            Phase::Drawn => Some(GameOutcome::Draw),
            Phase::NotStarted | Phase::InProgress => None,
        }
    }

    /// Hand the move to the other player. No-op unless the game is running.
    pub fn switch_turn(&mut self) {
        if self.is_in_progress() {
            self.current_player = self.current_player.other();
        }
    }

    /// Declare the current mover the winner.
    pub fn declare_win(&mut self) {
        if !self.is_game_over() {
            self.phase = Phase::Won(self.current_player);
        }
    }

    pub fn declare_draw(&mut self) {
        if !self.is_game_over() {
            self.phase = Phase::Drawn;
        }
    }
}
