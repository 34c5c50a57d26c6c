//! Hand-checked positions shared by unit tests.

/// Full board, no run of four for either player.
pub const DRAWN: &str = "
XOOXOXO
OXOXXXO
XXOOXOO
OOXOXXX
OOXXOOO
OXXXOXX
";

/// One empty cell at (3, 0); second player completes a vertical four there.
pub const LAST_CELL_WINS: &str = "
OXO.OOO
XXOOXXX
XOXOXOO
OXOOXXX
OOOXOXO
XXXOXXO
";

/// First player to move. Only (2, 2) forces a win (two plies deep);
/// (0, 0), (1, 0) and (6, 0) all lose.
pub const ENDGAME: &str = "
...OXX.
OX.XXOX
OO.OXOO
XOXOOXO
XXOXXXO
OOXXOOX
";

/// First player to move with two options: (3, 1) completes a row of six at
/// once, (0, 1) keeps the game going.
pub const IMMEDIATE_WIN: &str = "
.XO.XOX
.XX.XXX
XOXOXOO
OXOOOXX
OXOXOXO
XOOXOOO
";
