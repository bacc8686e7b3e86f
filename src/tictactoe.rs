//! Tic-Tac-Toe rules: the state/action provider consumed by the solvers

pub mod board;
pub mod enumeration;
pub mod game;
pub mod lines;
pub mod validation;

pub use board::{BoardState, Cell, Player};
pub use enumeration::decision_states;
pub use game::{CellKind, GameOutcome, Move};
pub use lines::{LineAnalyzer, WINNING_LINES};
