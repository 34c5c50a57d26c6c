use std::fmt;
use std::str::FromStr;

use super::{GameOutcome, Player, TurnState};

pub const DEFAULT_COLS: usize = 7;
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_RUN_LENGTH: usize = 4;

/// Half-directions probed by `check_win` as (column step, row step):
/// up-right, right, down-right, down. Row indices grow toward the floor.
const DIRECTIONS: [(isize, isize); 4] = [(1, -1), (1, 0), (1, 1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

/// Grid index a chip will occupy. Always derived from
/// [`Board::available_moves`] or [`Board::drop_piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub column: usize,
    pub row: usize,
}

impl Move {
    pub fn new(column: usize, row: usize) -> Self {
        Move { column, row }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Column-major serialization of the grid contents, used as the
/// transposition table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey(Box<[u8]>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is outside the board (0..{cols})")]
    InvalidColumn { column: usize, cols: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("board text has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol '{0}'")]
    UnknownSymbol(char),

    #[error("floating chip above empty cell at column {column}, row {row}")]
    FloatingChip { column: usize, row: usize },
}

/// Fixed-size grid addressed as `(column, row)`. Row 0 is the top row;
/// chips fall toward the highest row index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols > 0 && rows > 0, "board dimensions must be non-zero");
        Board {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    /// The classic 7x6 board
    pub fn standard() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn total_cells(&self) -> usize {
        self.cols * self.rows
    }

    fn index(&self, column: usize, row: usize) -> usize {
        column * self.rows + row
    }

    /// Get the cell at a specific position
    pub fn get(&self, column: usize, row: usize) -> Cell {
        self.cells[self.index(column, row)]
    }

    /// Lowest empty row of a column, or `None` if the column is full or
    /// out of range.
    pub fn lowest_empty_row(&self, column: usize) -> Option<usize> {
        if column >= self.cols || self.get(column, 0) != Cell::Empty {
            return None;
        }
        (0..self.rows)
            .rev()
            .find(|&row| self.get(column, row) == Cell::Empty)
    }

    /// Check if a column is full
    pub fn is_column_full(&self, column: usize) -> bool {
        self.lowest_empty_row(column).is_none()
    }

    /// Playable moves, one per non-full column, in ascending column order.
    pub fn available_moves(&self) -> Vec<Move> {
        (0..self.cols)
            .filter_map(|column| {
                self.lowest_empty_row(column)
                    .map(|row| Move::new(column, row))
            })
            .collect()
    }

    /// Set a cell without any legality check. The caller guarantees the
    /// target came from `available_moves`.
    pub fn place(&mut self, mv: Move, player: Player) {
        let idx = self.index(mv.column, mv.row);
        self.cells[idx] = player.to_cell();
    }

    /// Drop a piece in a column, returns the move it became
    pub fn drop_piece(&mut self, column: usize, player: Player) -> Result<Move, MoveError> {
        if column >= self.cols {
            return Err(MoveError::InvalidColumn {
                column,
                cols: self.cols,
            });
        }
        let row = self
            .lowest_empty_row(column)
            .ok_or(MoveError::ColumnFull(column))?;
        let mv = Move::new(column, row);
        self.place(mv, player);
        Ok(mv)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|column| self.is_column_full(column))
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn empty_fraction(&self) -> f64 {
        self.empty_cells() as f64 / self.total_cells() as f64
    }

    /// Positions occupied by `player`, column-major.
    pub fn positions_of(&self, player: Player) -> impl Iterator<Item = Move> + '_ {
        let cell = player.to_cell();
        (0..self.cols).flat_map(move |column| {
            (0..self.rows)
                .filter(move |&row| self.get(column, row) == cell)
                .map(move |row| Move::new(column, row))
        })
    }

    /// Copy of the board with column order reversed.
    pub fn mirror(&self) -> Board {
        let mut cells = Vec::with_capacity(self.cells.len());
        for column in self.cells.chunks(self.rows).rev() {
            cells.extend_from_slice(column);
        }
        Board {
            cols: self.cols,
            rows: self.rows,
            cells,
        }
    }

    pub fn key(&self) -> BoardKey {
        BoardKey(
            self.cells
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => 0,
                    Cell::Occupied(Player::First) => 1,
                    Cell::Occupied(Player::Second) => 2,
                })
                .collect(),
        )
    }

    /// Whether `player` owns a straight run of at least `run_length` cells.
    pub fn has_run(&self, player: Player, run_length: usize) -> bool {
        self.positions_of(player).any(|start| {
            DIRECTIONS
                .iter()
                .any(|&dir| self.run_from(start, dir, player, run_length) >= run_length)
        })
    }

    /// Consecutive `player` cells from `start` along `dir`, capped at `limit`.
    fn run_from(&self, start: Move, (dc, dr): (isize, isize), player: Player, limit: usize) -> usize {
        let cell = player.to_cell();
        let mut count = 1;
        let mut col = start.column as isize;
        let mut row = start.row as isize;
        while count < limit {
            col += dc;
            row += dr;
            if col < 0 || row < 0 || col >= self.cols as isize || row >= self.rows as isize {
                break;
            }
            if self.get(col as usize, row as usize) != cell {
                break;
            }
            count += 1;
        }
        count
    }

    /// Check-and-commit: if the current mover owns a run of `run_length`,
    /// declare them the winner on `state`; otherwise declare a draw once no
    /// moves remain. Returns the outcome recorded on `state`.
    pub fn check_win(&self, state: &mut TurnState, run_length: usize) -> Option<GameOutcome> {
        if state.is_game_over() {
            return state.outcome();
        }
        if self.has_run(state.current_player(), run_length) {
            state.declare_win();
        } else if self.is_full() {
            state.declare_draw();
        }
        state.outcome()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for column in 0..self.cols {
                let symbol = match self.get(column, row) {
                    Cell::Empty => '.',
                    Cell::Occupied(player) => player.symbol(),
                };
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse rows top to bottom: `.` empty, `X` first player, `O` second.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let cols = lines.first().ok_or(ParseBoardError::Empty)?.chars().count();
        if cols == 0 {
            return Err(ParseBoardError::Empty);
        }

        let mut board = Board::new(cols, lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '.' => Cell::Empty,
                    'X' | 'x' => Cell::Occupied(Player::First),
                    'O' | 'o' => Cell::Occupied(Player::Second),
                    other => return Err(ParseBoardError::UnknownSymbol(other)),
                };
                let idx = board.index(column, row);
                board.cells[idx] = cell;
            }
        }

        for column in 0..board.cols {
            let mut seen_chip = false;
            for row in 0..board.rows {
                match board.get(column, row) {
                    Cell::Occupied(_) => seen_chip = true,
                    Cell::Empty if seen_chip => {
                        return Err(ParseBoardError::FloatingChip { column, row });
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fixtures;

    fn first_to_move() -> TurnState {
        TurnState::in_progress(Player::First)
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::standard();
        for column in 0..DEFAULT_COLS {
            for row in 0..DEFAULT_ROWS {
                assert_eq!(board.get(column, row), Cell::Empty);
            }
        }
        assert_eq!(board.empty_cells(), 42);
        assert!((board.empty_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_available_moves_on_empty_board() {
        let board = Board::standard();
        let moves = board.available_moves();
        assert_eq!(moves.len(), 7);
        for (column, mv) in moves.iter().enumerate() {
            assert_eq!(*mv, Move::new(column, 5));
        }
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::standard();

        // Drop first piece in column 3
        let mv = board.drop_piece(3, Player::First).unwrap();
        assert_eq!(mv, Move::new(3, 5)); // Should land at bottom
        assert_eq!(board.get(3, 5), Cell::Occupied(Player::First));

        // Drop second piece in same column
        let mv = board.drop_piece(3, Player::Second).unwrap();
        assert_eq!(mv.row, 4); // Should land on top of first piece
        assert_eq!(board.lowest_empty_row(3), Some(3));
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::standard();

        // Fill column 0
        for _ in 0..DEFAULT_ROWS {
            board.drop_piece(0, Player::First).unwrap();
        }

        assert!(board.is_column_full(0));
        assert_eq!(board.lowest_empty_row(0), None);
        assert_eq!(
            board.drop_piece(0, Player::Second),
            Err(MoveError::ColumnFull(0))
        );
        assert!(board.available_moves().iter().all(|mv| mv.column != 0));
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::standard();
        let before = board.clone();
        assert_eq!(
            board.drop_piece(7, Player::First),
            Err(MoveError::InvalidColumn { column: 7, cols: 7 })
        );
        assert_eq!(board, before);
        assert_eq!(board.lowest_empty_row(7), None);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::standard();
        for column in 0..DEFAULT_COLS {
            for _ in 0..DEFAULT_ROWS {
                board.drop_piece(column, Player::First).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.available_moves().is_empty());
    }

    #[test]
    fn test_place_consumes_one_move_slot() {
        let mut board = Board::standard();
        let mv = board.available_moves()[2];
        board.place(mv, Player::Second);
        assert_eq!(board.get(2, 5), Cell::Occupied(Player::Second));
        assert_eq!(board.available_moves()[2], Move::new(2, 4));
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::standard();
        // Create horizontal line at bottom row
        for column in 0..4 {
            board.drop_piece(column, Player::First).unwrap();
        }
        let mut state = first_to_move();
        assert_eq!(
            board.check_win(&mut state, 4),
            Some(GameOutcome::Winner(Player::First))
        );
        assert!(state.is_game_over());
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::standard();
        // Create vertical line in column 3
        for _ in 0..4 {
            board.drop_piece(3, Player::Second).unwrap();
        }
        let mut state = TurnState::in_progress(Player::Second);
        assert_eq!(
            board.check_win(&mut state, 4),
            Some(GameOutcome::Winner(Player::Second))
        );
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::standard();
        // Create diagonal / pattern
        board.drop_piece(0, Player::First).unwrap();

        board.drop_piece(1, Player::Second).unwrap();
        board.drop_piece(1, Player::First).unwrap();

        board.drop_piece(2, Player::Second).unwrap();
        board.drop_piece(2, Player::Second).unwrap();
        board.drop_piece(2, Player::First).unwrap();

        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::First).unwrap();

        let mut state = first_to_move();
        assert_eq!(
            board.check_win(&mut state, 4),
            Some(GameOutcome::Winner(Player::First))
        );
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::standard();
        // Create diagonal \ pattern
        board.drop_piece(6, Player::First).unwrap();

        board.drop_piece(5, Player::Second).unwrap();
        board.drop_piece(5, Player::First).unwrap();

        board.drop_piece(4, Player::Second).unwrap();
        board.drop_piece(4, Player::Second).unwrap();
        board.drop_piece(4, Player::First).unwrap();

        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::Second).unwrap();
        board.drop_piece(3, Player::First).unwrap();

        let mut state = first_to_move();
        assert_eq!(
            board.check_win(&mut state, 4),
            Some(GameOutcome::Winner(Player::First))
        );
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::standard();
        for column in 0..3 {
            board.drop_piece(column, Player::First).unwrap();
        }
        let mut state = first_to_move();
        assert_eq!(board.check_win(&mut state, 4), None);
        assert!(state.is_in_progress());
    }

    #[test]
    fn test_only_current_mover_is_checked() {
        let mut board = Board::standard();
        for _ in 0..4 {
            board.drop_piece(0, Player::Second).unwrap();
        }
        let mut state = first_to_move();
        assert_eq!(board.check_win(&mut state, 4), None);
    }

    #[test]
    fn test_shorter_run_length() {
        let mut board = Board::standard();
        board.drop_piece(0, Player::First).unwrap();
        board.drop_piece(1, Player::First).unwrap();
        board.drop_piece(2, Player::First).unwrap();
        let mut state = first_to_move();
        assert!(board.check_win(&mut state, 3).is_some());
    }

    #[test]
    fn test_full_board_without_run_is_draw() {
        let board: Board = fixtures::DRAWN.parse().unwrap();
        let mut state = first_to_move();
        assert_eq!(board.check_win(&mut state, 4), Some(GameOutcome::Draw));
        assert_eq!(state.winner(), None);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_mirror_reverses_columns() {
        let mut board = Board::standard();
        board.drop_piece(0, Player::First).unwrap();
        board.drop_piece(2, Player::Second).unwrap();
        let mirrored = board.mirror();
        assert_eq!(mirrored.get(6, 5), Cell::Occupied(Player::First));
        assert_eq!(mirrored.get(4, 5), Cell::Occupied(Player::Second));
        assert_eq!(mirrored.get(0, 5), Cell::Empty);
        assert_eq!(mirrored.mirror(), board);
        // original untouched
        assert_eq!(board.get(0, 5), Cell::Occupied(Player::First));
    }

    #[test]
    fn test_key_is_order_sensitive() {
        let mut left = Board::standard();
        left.drop_piece(0, Player::First).unwrap();
        let right = left.mirror();
        assert_ne!(left.key(), right.key());
        assert_eq!(left.key(), left.clone().key());

        let mut swapped = Board::standard();
        swapped.drop_piece(0, Player::Second).unwrap();
        assert_ne!(left.key(), swapped.key());
    }

    #[test]
    fn test_text_roundtrip() {
        let board: Board = fixtures::ENDGAME.parse().unwrap();
        let reparsed: Board = board.to_string().parse().unwrap();
        assert_eq!(board, reparsed);
        assert_eq!(board.cols(), 7);
        assert_eq!(board.rows(), 6);
        assert_eq!(board.empty_cells(), 6);
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "...\n..".parse::<Board>(),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!("..Z".parse::<Board>(), Err(ParseBoardError::UnknownSymbol('Z')));
        assert_eq!(
            "X..\n...".parse::<Board>(),
            Err(ParseBoardError::FloatingChip { column: 0, row: 1 })
        );
    }
}
