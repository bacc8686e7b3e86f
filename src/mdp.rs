//! Tic-Tac-Toe as a Markov Decision Process
//!
//! The agent's move is followed by the opponent's reply, so one MDP step runs
//! from one agent decision point to the next (or to the end of the game). The
//! opponent's reply is the only source of stochasticity.

pub mod model;
pub mod rewards;

pub use model::{Outcome, TicTacToeMdp, TransitionProb};
pub use rewards::Rewards;

/// Tolerance for the probability mass of a transition set
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;
