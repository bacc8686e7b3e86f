//! Subcommands of the `ttt-mdp` binary

pub mod evaluate;
pub mod show;
pub mod train;
