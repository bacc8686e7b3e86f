//! Solver port - the capability every policy producer exposes

use crate::{Result, policy::Policy};

/// Solver trait - unified interface for all ways of producing a policy
///
/// Value iteration, Q-learning and the random baseline all implement this
/// trait, so callers dispatch on the capability rather than on a concrete
/// solver type.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_mdp::{
///     config::ValueIterationConfig,
///     ports::Solver,
///     value_iteration::ValueIterationSolver,
/// };
///
/// fn solve_with(solver: &mut dyn Solver) -> tictactoe_mdp::Result<usize> {
///     let policy = solver.train()?;
///     Ok(policy.len())
/// }
///
/// let mut solver = ValueIterationSolver::new(ValueIterationConfig::default())?;
/// let states = solve_with(&mut solver)?;
/// # Ok::<(), tictactoe_mdp::Error>(())
/// ```
pub trait Solver {
    /// Get the solver's name.
    ///
    /// Used for identification in logs and saved metadata.
    fn name(&self) -> &str;

    /// Run the solver to completion and extract its policy.
    ///
    /// # Errors
    ///
    /// Fails loudly on any modelling or table error; there is no partial
    /// result.
    fn train(&mut self) -> Result<Policy>;
}
