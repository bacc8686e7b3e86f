//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::game::{GameOutcome, Move};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }
}

/// Complete board state including cells and whose turn it is.
///
/// Two states are equal iff both the cells and the player to move are equal,
/// which makes `BoardState` directly usable as a table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first.
    ///
    /// O-first boards are needed whenever the opponent opens: the learning
    /// agent then sees positions where O has one more piece than X.
    ///
    /// # Examples
    ///
    /// ```
    /// use tictactoe_mdp::tictactoe::{BoardState, Player};
    ///
    /// let o_first = BoardState::new_with_player(Player::O);
    /// let after_move = o_first.make_move(4).unwrap();
    /// assert_eq!(after_move.to_move, Player::X);
    /// ```
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: first_player,
        }
    }

    fn parse_cells(chars: &[char], context: &str) -> Result<[Cell; 9], crate::Error> {
        if chars.len() < 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: context.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: context.to_string(),
            })?;
        }

        Ok(cells)
    }

    fn parse_player(player_str: &str, context: &str) -> Result<Player, crate::Error> {
        match player_str {
            "X" => Ok(Player::X),
            "O" => Ok(Player::O),
            _ => Err(crate::Error::InvalidPlayerString {
                player: player_str.to_string(),
                label: context.to_string(),
            }),
        }
    }

    /// Create a board from label format "XXXXXXXXX_P" where P is X or O.
    ///
    /// This is the inverse of [`BoardState::encode`]. Labels that describe
    /// positions which cannot arise in play are rejected.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The label format is invalid (not "board_player")
    /// - The board part is not exactly 9 characters
    /// - Any character is not a valid cell representation
    /// - The player part is not "X" or "O"
    /// - The position is unreachable (see [`BoardState::is_valid`])
    pub fn from_label(label: &str) -> Result<Self, crate::Error> {
        let mut parts = label.trim().split('_');
        let board = parts.next().ok_or_else(|| crate::Error::MissingLabelPart {
            part: "board".to_string(),
            label: label.to_string(),
        })?;
        let to_move_str = parts.next().ok_or_else(|| crate::Error::MissingLabelPart {
            part: "player".to_string(),
            label: label.to_string(),
        })?;

        if parts.next().is_some() || board.chars().count() != 9 {
            return Err(crate::Error::InvalidLabelFormat {
                label: label.to_string(),
                expected: "XXXXXXXXX_P".to_string(),
            });
        }

        let chars: Vec<char> = board.chars().collect();
        let cells = Self::parse_cells(&chars, label)?;
        let to_move = Self::parse_player(to_move_str, label)?;

        let state = BoardState { cells, to_move };
        if !state.is_valid() {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("board label '{label}' does not describe a reachable position"),
            });
        }

        Ok(state)
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Make a move and return a new board state
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState, crate::Error> {
        if self.is_terminal() {
            return Err(crate::Error::GameOver);
        }

        if pos >= 9 || !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = self.to_move.to_cell();
        new_state.to_move = self.to_move.opponent();
        Ok(new_state)
    }

    /// Apply a [`Move`], rejecting moves made out of turn.
    #[must_use = "apply returns a new board state; the original is unchanged"]
    pub fn apply(&self, mv: Move) -> Result<BoardState, crate::Error> {
        if mv.player != self.to_move || !self.is_legal(mv.position) {
            return Err(crate::Error::IllegalAction {
                state: self.encode(),
                position: mv.position,
            });
        }
        self.make_move(mv.position)
    }

    /// Whether `pos` is a playable cell in this state
    pub fn is_legal(&self, pos: usize) -> bool {
        pos < 9 && self.is_empty(pos) && !self.is_terminal()
    }

    /// Get legal positions in this state (empty cells when game not terminal)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Legal actions for the player to move, in ascending cell order
    pub fn legal_actions(&self) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .map(|position| Move::new(position, self.to_move))
            .collect()
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        super::lines::LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.has_won(Player::X) || self.has_won(Player::O) || !self.cells.contains(&Cell::Empty)
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Outcome of a finished game, `None` while play continues
    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(winner) = self.winner() {
            Some(GameOutcome::Win(winner))
        } else if self.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Get a string representation for use as a key, e.g. `XO......._X`
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move.to_char()
        )
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
