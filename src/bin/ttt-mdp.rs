//! ttt-mdp CLI - solve Tic-Tac-Toe as a Markov decision process
//!
//! This CLI provides a unified interface for:
//! - Training policies with value iteration, Q-learning or a random baseline
//! - Evaluating saved policies against opponents
//! - Inspecting a saved policy at a given position

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "ttt-mdp")]
#[command(version, about = "Tic-Tac-Toe MDP solvers", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for a policy and save it
    Train(Box<tictactoe_mdp::cli::commands::train::TrainArgs>),

    /// Evaluate a saved policy against an opponent
    Evaluate(tictactoe_mdp::cli::commands::evaluate::EvaluateArgs),

    /// Show a saved policy's move at a board position
    Show(tictactoe_mdp::cli::commands::show::ShowArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Train(args) => tictactoe_mdp::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => tictactoe_mdp::cli::commands::evaluate::execute(args),
        Commands::Show(args) => tictactoe_mdp::cli::commands::show::execute(args),
    }
}
