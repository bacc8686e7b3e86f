//! Show command - inspect a saved policy at one board position

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection, render_board},
    persistence::SavedPolicy,
    q_learning::SavedQTable,
    tictactoe::BoardState,
};

#[derive(Parser, Debug)]
#[command(about = "Show the policy's move at a board position")]
pub struct ShowArgs {
    /// Path to a saved policy
    pub policy: PathBuf,

    /// Board label, e.g. `X...O...._X` (defaults to the empty board, X to move)
    #[arg(long, short = 's', default_value = "........._X")]
    pub state: String,

    /// Saved Q-table to list every action value from
    #[arg(long)]
    pub q_table: Option<PathBuf>,
}

pub fn execute(args: ShowArgs) -> Result<()> {
    let saved = SavedPolicy::load_from_file(&args.policy)
        .with_context(|| format!("Failed to load policy {}", args.policy.display()))?;
    let state = BoardState::from_label(&args.state)?;
    let label = state.encode();

    print_section("Policy");
    print_kv("Algorithm", saved.algorithm.label());
    print_kv("Entries", &format_number(saved.entries.len()));
    if let Some(opponent) = &saved.metadata.opponent {
        print_kv("Opponent", opponent);
    }
    if let Some(saved_at) = &saved.metadata.saved_at {
        print_kv("Saved at", saved_at);
    }

    print_subsection(&format!("State {label}"));
    println!("{}\n", render_board(&state));
    match saved.entry(&label) {
        Some(entry) => {
            print_kv("Move", &entry.position.to_string());
            if let Some(value) = entry.value {
                print_kv("Value", &format!("{value:.4}"));
            }
        }
        None if state.is_terminal() => print_kv("Move", "none (game over)"),
        None => print_kv("Move", "none (not a decision state of this policy)"),
    }

    if let Some(path) = &args.q_table {
        let table = SavedQTable::load_from_file(path)
            .with_context(|| format!("Failed to load Q-table {}", path.display()))?
            .to_table()?;
        print_subsection("Q-values");
        match table.get(&state) {
            Ok(actions) => {
                for (action, value) in actions {
                    print_kv(&format!("Position {}", action.position), &format!("{value:.4}"));
                }
            }
            Err(err) => println!("  {err}"),
        }
    }
    Ok(())
}
