//! Transposition tables: resolved positions mapped to their best move.
//!
//! Every resolved position is written twice, once under its own key and once
//! under the mirrored board's key with the move's column reflected.

use std::collections::HashMap;

use crate::game::{Board, BoardKey, Move, Player};

use super::search::SearchResult;

/// Reflect a move across the board's vertical axis.
pub fn mirror_move(mv: Move, cols: usize) -> Move {
    Move::new(cols - 1 - mv.column, mv.row)
}

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<BoardKey, SearchResult>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &BoardKey) -> Option<SearchResult> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &BoardKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: BoardKey, result: SearchResult) {
        self.entries.insert(key, result);
    }

    /// Record a fully resolved position under `key` (the key of `board`) and
    /// under its mirror image.
    pub fn store_resolved(&mut self, key: BoardKey, board: &Board, result: SearchResult) {
        self.entries
            .insert(board.mirror().key(), result.mirrored(board.cols()));
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One table per player, kept for the whole session.
#[derive(Debug, Clone, Default)]
pub struct TranspositionTables {
    tables: [TranspositionTable; 2],
}

impl TranspositionTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_player(&self, player: Player) -> &TranspositionTable {
        &self.tables[player.index()]
    }

    pub fn for_player_mut(&mut self, player: Player) -> &mut TranspositionTable {
        &mut self.tables[player.index()]
    }

    /// Drop everything learned so far.
    pub fn reset(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }
}
