//! CLI infrastructure for the `ttt-mdp` binary
//!
//! Training, evaluating and inspecting policies from the command line. The
//! library does the work; these modules parse arguments, report progress and
//! format output.

pub mod commands;
pub mod output;
