//! Tic-Tac-Toe as a Markov Decision Process
//!
//! This crate provides:
//! - Complete Tic-Tac-Toe rules with state validation and enumeration
//! - An MDP model whose transitions include the opponent's reply
//! - Value iteration over the full decision-state space
//! - Epsilon-greedy Q-learning against a sampled opponent
//! - Greedy policy extraction, evaluation and persistence
//!
//! Every solver implements [`ports::Solver`], whose `train` produces a
//! [`policy::Policy`].

pub mod baseline;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluation;
pub mod mdp;
pub mod opponents;
pub mod persistence;
pub mod policy;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod value_iteration;

pub use error::{Error, Result};
pub use policy::Policy;
pub use ports::Solver;
