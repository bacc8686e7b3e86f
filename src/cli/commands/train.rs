//! Train command - solve for a policy and save it

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use crate::{
    baseline::RandomSolver,
    cli::output::{ProgressObserver, format_number, format_rate, print_kv, print_section},
    config::{SolverConfig, load_config},
    environment::FirstMover,
    evaluation::evaluate,
    opponents::OpponentKind,
    persistence::{Algorithm, SavedPolicy, TrainingMetadata},
    policy::Policy,
    ports::Solver,
    q_learning::{QLearningSolver, SavedQTable},
    tictactoe::Player,
    value_iteration::ValueIterationSolver,
};

/// Which solver to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverKind {
    /// Offline value iteration against the opponent model
    ValueIteration,
    /// Epsilon-greedy Q-learning from sampled games
    QLearning,
    /// Uniformly random legal moves
    Random,
}

#[derive(Parser, Debug)]
#[command(about = "Solve for a policy and save it")]
pub struct TrainArgs {
    /// Solver to run
    #[arg(value_enum)]
    pub solver: SolverKind,

    /// Where to write the policy
    #[arg(long, short = 'o', default_value = "policy.msgpack")]
    pub output: PathBuf,

    /// JSON solver configuration; flags below override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Opponent to train against
    #[arg(long, value_enum)]
    pub opponent: Option<OpponentKind>,

    /// Which token the agent controls (`x` or `o`)
    #[arg(long)]
    pub agent_player: Option<String>,

    /// Who opens each Q-learning episode
    #[arg(long, value_enum)]
    pub first_mover: Option<FirstMover>,

    /// Discount factor γ
    #[arg(long)]
    pub discount: Option<f64>,

    /// Value-iteration sweeps
    #[arg(long, short = 'k')]
    pub iterations: Option<usize>,

    /// Q-learning rate α
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Q-learning exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Q-learning episodes
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export the policy as JSON too
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Save the learned Q-table (Q-learning only)
    #[arg(long)]
    pub q_table: Option<PathBuf>,

    /// Play this many games against the training opponent afterwards
    #[arg(long, default_value_t = 0)]
    pub validation_games: usize,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

fn build_config(args: &TrainArgs) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SolverConfig::default(),
    };
    let vi = &mut config.value_iteration;
    let q = &mut config.q_learning;

    if let Some(opponent) = args.opponent {
        vi.opponent = opponent;
        q.opponent = opponent;
    }
    if let Some(token) = &args.agent_player {
        let agent = parse_player_token(token, "--agent-player")?;
        vi.agent = agent;
        q.agent = agent;
    }
    if let Some(discount) = args.discount {
        vi.discount = discount;
        q.discount = discount;
    }
    if let Some(iterations) = args.iterations {
        vi.iterations = iterations;
    }
    if let Some(first_mover) = args.first_mover {
        q.first_mover = first_mover;
    }
    if let Some(learning_rate) = args.learning_rate {
        q.learning_rate = learning_rate;
    }
    if let Some(epsilon) = args.epsilon {
        q.epsilon = epsilon;
    }
    if let Some(episodes) = args.episodes {
        q.episodes = episodes;
    }
    if args.seed.is_some() {
        q.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = build_config(&args)?;

    let (saved, policy, agent, opponent) = match args.solver {
        SolverKind::ValueIteration => {
            let vi = config.value_iteration;
            let metadata = TrainingMetadata {
                agent_player: Some(vi.agent),
                opponent: Some(vi.opponent.label().to_string()),
                iterations: Some(vi.iterations),
                discount: Some(vi.discount),
                rewards: Some(vi.rewards),
                ..TrainingMetadata::default()
            };
            let mut solver = ValueIterationSolver::new(vi.clone())?;
            let policy = solver.train()?;
            let saved = SavedPolicy::from_policy(
                &policy,
                Algorithm::ValueIteration,
                metadata.stamped(),
                |state, _| solver.values().get(state).ok(),
            );
            (saved, policy, vi.agent, vi.opponent)
        }
        SolverKind::QLearning => {
            let q = config.q_learning;
            let metadata = TrainingMetadata {
                agent_player: Some(q.agent),
                opponent: Some(q.opponent.label().to_string()),
                first_mover: Some(q.first_mover),
                episodes: Some(q.episodes),
                discount: Some(q.discount),
                rewards: Some(q.rewards),
                seed: q.seed,
                ..TrainingMetadata::default()
            }
            .stamped();

            let mut solver = QLearningSolver::new(q.clone())?;
            if !args.quiet {
                solver = solver.with_observer(Box::new(ProgressObserver::new(q.agent)));
            }
            let policy = solver.train()?;

            let stats = solver.stats();
            print_section("Training");
            print_kv("Episodes", &format_number(stats.episodes));
            print_kv("Win rate", &format_rate(stats.win_rate()));
            print_kv("Draw rate", &format_rate(stats.draw_rate()));
            print_kv("Loss rate", &format_rate(stats.loss_rate()));
            print_kv("Illegal retries", &format_number(stats.illegal_moves));

            if let Some(path) = &args.q_table {
                SavedQTable::from_table(solver.q_table(), metadata.clone())
                    .save_to_file(path)
                    .with_context(|| format!("Failed to save Q-table to {}", path.display()))?;
                print_kv("Q-table", &path.display().to_string());
            }

            let table = solver.q_table();
            let saved = SavedPolicy::from_policy(&policy, Algorithm::QLearning, metadata, |s, a| {
                table.get_value(s, a).ok()
            });
            (saved, policy, q.agent, q.opponent)
        }
        SolverKind::Random => {
            let agent = config.value_iteration.agent;
            let metadata = TrainingMetadata {
                agent_player: Some(agent),
                seed: args.seed,
                ..TrainingMetadata::default()
            };
            let policy = RandomSolver::new(agent, args.seed).train()?;
            let saved =
                SavedPolicy::from_policy(&policy, Algorithm::Random, metadata.stamped(), |_, _| {
                    None
                });
            (saved, policy, agent, config.value_iteration.opponent)
        }
    };

    saved
        .save_to_file(&args.output)
        .with_context(|| format!("Failed to save policy to {}", args.output.display()))?;
    if let Some(path) = &args.json {
        saved
            .export_json(path)
            .with_context(|| format!("Failed to export policy to {}", path.display()))?;
    }

    print_section("Policy");
    print_kv("Algorithm", saved.algorithm.label());
    print_kv("Entries", &format_number(policy.len()));
    print_kv("Unresolved", &format_number(policy.unresolved().len()));
    print_kv("Saved to", &args.output.display().to_string());

    if args.validation_games > 0 {
        report_validation(&policy, agent, opponent, &args)?;
    }
    Ok(())
}

fn report_validation(
    policy: &Policy,
    agent: Player,
    opponent: OpponentKind,
    args: &TrainArgs,
) -> Result<()> {
    let seed = args.seed.map(|seed| seed.wrapping_add(1)).unwrap_or_default();
    let result = evaluate(
        policy,
        opponent.into_boxed_opponent(),
        agent,
        FirstMover::Agent,
        args.validation_games,
        seed,
    )?;
    print_section(&format!("Validation vs {}", opponent.label()));
    print_kv("Games", &format_number(result.total_games));
    print_kv("Win rate", &format_rate(result.win_rate));
    print_kv("Draw rate", &format_rate(result.draw_rate));
    print_kv("Loss rate", &format_rate(result.loss_rate));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(solver: SolverKind) -> TrainArgs {
        TrainArgs {
            solver,
            output: PathBuf::from("policy.msgpack"),
            config: None,
            opponent: None,
            agent_player: None,
            first_mover: None,
            discount: None,
            iterations: None,
            learning_rate: None,
            epsilon: None,
            episodes: None,
            seed: None,
            json: None,
            q_table: None,
            validation_games: 0,
            quiet: true,
        }
    }

    #[test]
    fn test_parse_player_token() {
        assert_eq!(parse_player_token("X", "--agent-player").unwrap(), Player::X);
        assert_eq!(parse_player_token(" second ", "--agent-player").unwrap(), Player::O);
        assert!(parse_player_token("z", "--agent-player").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut train = args(SolverKind::QLearning);
        train.opponent = Some(OpponentKind::Minimax);
        train.agent_player = Some("o".to_string());
        train.epsilon = Some(0.25);
        train.seed = Some(3);
        let config = build_config(&train).unwrap();
        assert_eq!(config.q_learning.opponent, OpponentKind::Minimax);
        assert_eq!(config.value_iteration.agent, Player::O);
        assert_eq!(config.q_learning.epsilon, 0.25);
        assert_eq!(config.q_learning.seed, Some(3));
        assert_eq!(config.q_learning.learning_rate, 0.1);
    }

    #[test]
    fn test_out_of_range_flag_is_rejected() {
        let mut train = args(SolverKind::QLearning);
        train.learning_rate = Some(1.5);
        assert!(build_config(&train).is_err());
    }
}
