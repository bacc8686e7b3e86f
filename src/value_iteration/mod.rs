//! Offline value iteration over the full decision-state space
//!
//! The solver owns a [`ValueTable`] initialised to 0.0 for every decision
//! state and runs a fixed budget of sweeps. Each sweep updates states in
//! place, in the table's enumeration order, so later states in a sweep
//! already see the values written earlier in that sweep (Gauss–Seidel rather
//! than synchronous Jacobi updates). Tic-Tac-Toe has bounded depth, so this
//! reaches the same fixed point; with enough sweeps further sweeps change
//! nothing.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tictactoe_mdp::{
//!     config::ValueIterationConfig,
//!     tictactoe::BoardState,
//!     value_iteration::ValueIterationSolver,
//! };
//!
//! let mut solver = ValueIterationSolver::new(ValueIterationConfig::default())?;
//! solver.iterate()?;
//! let policy = solver.extract_policy()?;
//! println!("{:?}", policy.action(&BoardState::new()));
//! # Ok::<(), tictactoe_mdp::Error>(())
//! ```

pub mod solver;
pub mod value_table;

pub use solver::ValueIterationSolver;
pub use value_table::ValueTable;
