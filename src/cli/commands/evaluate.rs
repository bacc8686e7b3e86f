//! Evaluate command - play a saved policy against an opponent

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        commands::train::parse_player_token,
        output::{format_number, format_rate, print_kv, print_section},
    },
    environment::FirstMover,
    evaluation::{EvaluationResult, evaluate},
    opponents::OpponentKind,
    persistence::SavedPolicy,
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a saved policy")]
pub struct EvaluateArgs {
    /// Path to a saved policy
    pub policy: PathBuf,

    /// Opponent to evaluate against
    #[arg(long, short = 'o', value_enum, default_value = "minimax")]
    pub opponent: OpponentKind,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Random seed (defaults to the training seed + 1)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token the policy controls (defaults to the trained token)
    #[arg(long)]
    pub agent_player: Option<String>,

    /// Who opens each game (defaults to the training setting)
    #[arg(long, value_enum)]
    pub first_mover: Option<FirstMover>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    policy: String,
    algorithm: &'static str,
    opponent: &'static str,
    agent_player: Player,
    first_mover: FirstMover,
    seed: u64,
    result: &'a EvaluationResult,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let saved = SavedPolicy::load_from_file(&args.policy)
        .with_context(|| format!("Failed to load policy {}", args.policy.display()))?;
    let policy = saved.to_policy()?;

    let agent = match &args.agent_player {
        Some(token) => parse_player_token(token, "--agent-player")?,
        None => saved.metadata.agent_player.unwrap_or(Player::X),
    };
    let first_mover = args
        .first_mover
        .or(saved.metadata.first_mover)
        .unwrap_or_default();
    let seed = args
        .seed
        .or_else(|| saved.metadata.seed.map(|seed| seed.wrapping_add(1)))
        .unwrap_or_default();

    let result = evaluate(
        &policy,
        args.opponent.into_boxed_opponent(),
        agent,
        first_mover,
        args.games,
        seed,
    )?;

    print_section(&format!("Evaluation vs {}", args.opponent.label()));
    print_kv("Policy", &args.policy.display().to_string());
    print_kv("Algorithm", saved.algorithm.label());
    print_kv("Agent", &agent.to_char().to_string());
    print_kv("Games", &format_number(result.total_games));
    print_kv("Wins", &format_number(result.wins));
    print_kv("Draws", &format_number(result.draws));
    print_kv("Losses", &format_number(result.losses));
    print_kv("Win rate", &format_rate(result.win_rate));
    print_kv("Draw rate", &format_rate(result.draw_rate));
    print_kv("Loss rate", &format_rate(result.loss_rate));

    if let Some(path) = &args.export {
        let report = EvaluationReport {
            policy: args.policy.display().to_string(),
            algorithm: saved.algorithm.label(),
            opponent: args.opponent.label(),
            agent_player: agent,
            first_mover,
            seed,
            result: &result,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report).context("Failed to write evaluation report")?;
        print_kv("Exported", &path.display().to_string());
    }
    Ok(())
}
