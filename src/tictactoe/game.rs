//! Moves and game outcomes

use serde::{Deserialize, Serialize};

use super::board::Player;

/// A placement of `player`'s piece on cell `position`.
///
/// A move is only meaningful in the context of the state it was enumerated
/// from. Ordering is by position first so that per-state enumeration order is
/// ascending cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

impl Move {
    pub fn new(position: usize, player: Player) -> Self {
        Self { position, player }
    }

    /// Corner, edge or centre
    pub fn kind(&self) -> CellKind {
        CellKind::of(self.position)
    }
}

/// Geometric class of a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Corner,
    Edge,
    Center,
}

impl CellKind {
    pub fn of(position: usize) -> Self {
        match position {
            4 => CellKind::Center,
            0 | 2 | 6 | 8 => CellKind::Corner,
            _ => CellKind::Edge,
        }
    }
}

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_kinds() {
        assert_eq!(CellKind::of(4), CellKind::Center);
        for corner in [0, 2, 6, 8] {
            assert_eq!(CellKind::of(corner), CellKind::Corner);
        }
        for edge in [1, 3, 5, 7] {
            assert_eq!(Move::new(edge, Player::X).kind(), CellKind::Edge);
        }
    }

    #[test]
    fn test_moves_order_by_position() {
        let mut moves = vec![
            Move::new(5, Player::X),
            Move::new(0, Player::X),
            Move::new(3, Player::X),
        ];
        moves.sort();
        let positions: Vec<_> = moves.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 3, 5]);
    }
}
