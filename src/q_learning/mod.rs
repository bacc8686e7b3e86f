//! Epsilon-greedy Q-learning
//!
//! Model-free TD(0) control against the [`crate::environment`] opponent. The
//! agent never sees the transition model; it learns from sampled outcomes
//! only.
//!
//! ## Update
//!
//! | Successor | Target |
//! |-----------|--------|
//! | non-terminal | `r + γ · max_a' Q(s', a')` |
//! | terminal | `r` |
//!
//! followed by `Q(s,a) ← (1-α)·Q(s,a) + α·target`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tictactoe_mdp::{
//!     config::QLearningConfig,
//!     ports::Solver,
//!     q_learning::QLearningSolver,
//! };
//!
//! let mut solver = QLearningSolver::new(
//!     QLearningConfig::default().with_episodes(10_000).with_seed(42),
//! )?;
//! let policy = solver.train()?;
//! println!("{} states, win rate {:.2}", policy.len(), solver.stats().win_rate());
//! # Ok::<(), tictactoe_mdp::Error>(())
//! ```

pub mod q_table;
pub mod serialization;
pub mod solver;

// Public re-exports
pub use q_table::QTable;
pub use serialization::SavedQTable;
pub use solver::QLearningSolver;
