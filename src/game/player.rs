use serde::{Deserialize, Serialize};

use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        Cell::Occupied(self)
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::First => "First",
            Player::Second => "Second",
        }
    }

    /// Board symbol used by the text format
    pub fn symbol(self) -> char {
        match self {
            Player::First => 'X',
            Player::Second => 'O',
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::First.other(), Player::Second);
        assert_eq!(Player::Second.other(), Player::First);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::First.name(), "First");
        assert_eq!(Player::Second.name(), "Second");
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(Player::First.to_cell(), Cell::Occupied(Player::First));
        assert_ne!(Player::Second.to_cell(), Cell::Empty);
    }
}
