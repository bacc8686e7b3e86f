//! Solver configuration.
//!
//! Every configuration type is serde-serialisable with defaults for missing
//! fields, so a JSON file only needs to name what it changes. Builder-style
//! `with_*` methods cover programmatic use.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    environment::FirstMover,
    mdp::Rewards,
    opponents::OpponentKind,
    tictactoe::Player,
};

/// Configuration for offline value iteration.
///
/// # Examples
///
/// ```
/// use tictactoe_mdp::config::ValueIterationConfig;
///
/// let config = ValueIterationConfig::default()
///     .with_discount(0.95)
///     .with_iterations(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    /// Discount factor γ
    pub discount: f64,
    /// Number of sweeps `k`
    pub iterations: usize,
    pub rewards: Rewards,
    /// Token the agent plays
    pub agent: Player,
    /// Opponent model used for the transition probabilities
    pub opponent: OpponentKind,
}

impl ValueIterationConfig {
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_agent(mut self, agent: Player) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_opponent(mut self, opponent: OpponentKind) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("discount", self.discount)?;
        self.rewards.validate()
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            iterations: 10,
            rewards: Rewards::default(),
            agent: Player::X,
            opponent: OpponentKind::Random,
        }
    }
}

/// Configuration for epsilon-greedy Q-learning.
///
/// # Examples
///
/// ```
/// use tictactoe_mdp::config::QLearningConfig;
///
/// let config = QLearningConfig::default()
///     .with_episodes(1_000)
///     .with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount: f64,
    /// Exploration rate ε, in [0, 1]
    pub epsilon: f64,
    /// Number of training episodes
    pub episodes: usize,
    pub rewards: Rewards,
    pub agent: Player,
    pub opponent: OpponentKind,
    /// Who opens each episode
    pub first_mover: FirstMover,
    /// Seed for the run's single random source; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_agent(mut self, agent: Player) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_opponent(mut self, opponent: OpponentKind) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_first_mover(mut self, first_mover: FirstMover) -> Self {
        self.first_mover = first_mover;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "learning rate must lie in (0, 1], got {}",
                    self.learning_rate
                ),
            });
        }
        check_unit_interval("discount", self.discount)?;
        check_unit_interval("epsilon", self.epsilon)?;
        self.rewards.validate()
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.1,
            episodes: 60_000,
            rewards: Rewards::default(),
            agent: Player::X,
            opponent: OpponentKind::Random,
            first_mover: FirstMover::Agent,
            seed: None,
        }
    }
}

/// File-level configuration covering both solvers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub value_iteration: ValueIterationConfig,
    pub q_learning: QLearningConfig,
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        self.value_iteration.validate()?;
        self.q_learning.validate()
    }
}

/// Load and validate a JSON solver configuration
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SolverConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open config {}", path.display()),
        source,
    })?;
    let config: SolverConfig = serde_json::from_reader(BufReader::new(file))?;
    config.validate()?;
    Ok(config)
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("{name} must lie in [0, 1], got {value}"),
        })
    }
}
