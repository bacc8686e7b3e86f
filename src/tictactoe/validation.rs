//! Board state validation logic

use super::{
    board::{BoardState, Cell, Player},
    lines::LineAnalyzer,
};

impl BoardState {
    /// Check if the board state is reachable under Tic-Tac-Toe rules,
    /// with either player opening.
    pub fn is_valid(&self) -> bool {
        let x_count = self.cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = self.cells.iter().filter(|&&c| c == Cell::O).count();
        let diff = x_count as isize - o_count as isize;

        if diff.abs() > 1 {
            return false;
        }

        // The recorded turn must match the piece counts
        let turn_ok = match self.to_move {
            Player::X => diff == 0 || diff == -1,
            Player::O => diff == 0 || diff == 1,
        };
        if !turn_ok {
            return false;
        }

        let x_wins = self.has_won(Player::X);
        let o_wins = self.has_won(Player::O);

        if x_wins && o_wins {
            return false;
        }

        // A winner moved last, so it is their opponent's turn
        if x_wins && self.to_move != Player::O {
            return false;
        }
        if o_wins && self.to_move != Player::X {
            return false;
        }

        // Several winning lines must all have been closed by the final move
        if x_wins && !self.winning_lines_share_cell(Player::X) {
            return false;
        }
        if o_wins && !self.winning_lines_share_cell(Player::O) {
            return false;
        }

        true
    }

    /// Check if all winning lines for a player share at least one cell.
    /// This is necessary for multiple lines to be formed in a single move.
    pub fn winning_lines_share_cell(&self, player: Player) -> bool {
        let lines = LineAnalyzer::completed_lines(&self.cells, player);
        if lines.len() < 2 {
            return true;
        }

        (0..9).any(|pos| lines.iter().all(|line| line.contains(&pos)))
    }
}
