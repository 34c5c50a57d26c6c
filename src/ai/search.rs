//! Exhaustive depth-first minimax with transposition memoization.
//!
//! Scores are global rather than relative to the mover: [`Score::FirstWins`]
//! is good for [`Player::First`], [`Score::SecondWins`] for
//! [`Player::Second`]. Each node explores its moves in shuffled order and
//! polls a wall-clock deadline on entry and before every sibling. A node that
//! runs out of time yields `None` and is never cached.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::game::{Board, GameOutcome, Move, Player, TurnState, DEFAULT_RUN_LENGTH};

use super::table::{mirror_move, TranspositionTable};

/// Resolved value of a position. Ordered `SecondWins < Draw < FirstWins`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    SecondWins,
    Draw,
    FirstWins,
}

impl Score {
    pub fn win_for(player: Player) -> Score {
        match player {
            Player::First => Score::FirstWins,
            Player::Second => Score::SecondWins,
        }
    }

    pub fn loss_for(player: Player) -> Score {
        Score::win_for(player.other())
    }

    /// Numeric encoding: +1, 0, -1.
    pub fn value(self) -> i8 {
        match self {
            Score::SecondWins => -1,
            Score::Draw => 0,
            Score::FirstWins => 1,
        }
    }

    /// Whether `self` is strictly preferable to `other` for `player`.
    pub fn is_better_for(self, other: Score, player: Player) -> bool {
        match player {
            Player::First => self > other,
            Player::Second => self < other,
        }
    }
}

impl From<GameOutcome> for Score {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Winner(player) => Score::win_for(player),
            GameOutcome::Draw => Score::Draw,
        }
    }
}

/// Best known move for a position, with the depth of the terminal node that
/// decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    pub score: Score,
    pub mv: Move,
    pub plies: u32,
}

impl SearchResult {
    pub fn new(score: Score, mv: Move, plies: u32) -> Self {
        SearchResult { score, mv, plies }
    }

    /// The same result for the column-mirrored board.
    pub fn mirrored(self, cols: usize) -> Self {
        SearchResult {
            mv: mirror_move(self.mv, cols),
            ..self
        }
    }
}

/// Pick the candidate most favorable to `mover`. Among winning candidates the
/// fewest plies wins; among losing ones the most plies. Earlier candidates
/// win ties.
pub fn select_best(candidates: &[SearchResult], mover: Player) -> Option<SearchResult> {
    let mut best = *candidates.first()?;
    for candidate in &candidates[1..] {
        if candidate.score.is_better_for(best.score, mover) {
            best = *candidate;
        }
    }

    let best_score = best.score;
    let same_score = candidates.iter().filter(|c| c.score == best_score);
    if best_score == Score::win_for(mover) {
        for candidate in same_score {
            if candidate.plies < best.plies {
                best = *candidate;
            }
        }
    } else if best_score == Score::loss_for(mover) {
        for candidate in same_score {
            if candidate.plies > best.plies {
                best = *candidate;
            }
        }
    }

    Some(best)
}

/// Counters for one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose moves were enumerated.
    pub expanded: u64,
    /// Nodes answered from the transposition table.
    pub table_hits: u64,
    /// Moves that ended the game immediately.
    pub terminals: u64,
}

/// One depth-first search over a borrowed transposition table.
pub struct Search<'a, R: Rng + ?Sized> {
    table: &'a mut TranspositionTable,
    rng: &'a mut R,
    deadline: Instant,
    trim: bool,
    run_length: usize,
    stats: SearchStats,
}

impl<'a, R: Rng + ?Sized> Search<'a, R> {
    pub fn new(table: &'a mut TranspositionTable, rng: &'a mut R, deadline: Instant) -> Self {
        Search {
            table,
            rng,
            deadline,
            trim: false,
            run_length: DEFAULT_RUN_LENGTH,
            stats: SearchStats::default(),
        }
    }

    /// Stop exploring siblings once a move wins outright for the mover.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_run_length(mut self, run_length: usize) -> Self {
        self.run_length = run_length;
        self
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Resolve `board` for the player to move in `state`.
    ///
    /// Returns `None` if the deadline passes before the position is fully
    /// explored, including when it has already passed on entry, and when no
    /// game is in progress.
    pub fn run(&mut self, board: &Board, state: &TurnState) -> Option<SearchResult> {
        if !state.is_in_progress() || self.expired() {
            return None;
        }
        let result = self.node(board, state, 0);
        trace!(
            expanded = self.stats.expanded,
            table_hits = self.stats.table_hits,
            terminals = self.stats.terminals,
            table_len = self.table.len(),
            resolved = result.is_some(),
            "search finished"
        );
        result
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn node(&mut self, board: &Board, state: &TurnState, plies: u32) -> Option<SearchResult> {
        let key = board.key();
        if let Some(hit) = self.table.get(&key) {
            self.stats.table_hits += 1;
            return Some(hit);
        }
        if self.expired() {
            return None;
        }

        self.stats.expanded += 1;
        let mover = state.current_player();
        let win = Score::win_for(mover);

        let mut moves = board.available_moves();
        moves.shuffle(&mut *self.rng);

        let mut candidates = Vec::with_capacity(moves.len());
        for mv in moves {
            if self.expired() {
                return None;
            }

            let mut child_board = board.clone();
            let mut child_state = *state;
            child_board.place(mv, mover);

            let candidate = match child_board.check_win(&mut child_state, self.run_length) {
                Some(outcome) => {
                    self.stats.terminals += 1;
                    SearchResult::new(Score::from(outcome), mv, plies)
                }
                None => {
                    child_state.switch_turn();
                    let reply = self.node(&child_board, &child_state, plies + 1)?;
                    SearchResult::new(reply.score, mv, reply.plies)
                }
            };
            candidates.push(candidate);

            if self.trim && candidate.score == win {
                break;
            }
        }

        if self.expired() {
            return None;
        }

        let best = select_best(&candidates, mover)?;
        self.table.store_resolved(key, board, best);
        Some(best)
    }
}
