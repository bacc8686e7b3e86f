//! Ports (trait boundaries) between the solvers and their surroundings.
//!
//! Solvers are driven through [`Solver`]; training progress is reported
//! through [`TrainingObserver`].

pub mod observer;
pub mod solver;

pub use observer::{EpisodeSummary, TrainingObserver, TrainingStats};
pub use solver::Solver;
