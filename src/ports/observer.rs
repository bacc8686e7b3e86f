//! Observer port - abstraction for training observation
//!
//! Observers let callers watch a Q-learning run (progress bars, metrics,
//! test probes) without coupling the training loop to any output format.

use serde::{Deserialize, Serialize};

use crate::{Result, mdp::Outcome, tictactoe::GameOutcome};

/// Summary of one finished training episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Final result of the game, from the board's perspective
    pub outcome: Option<GameOutcome>,
    /// Agent actions applied during the episode
    pub steps: usize,
    /// Sum of rewards received by the agent
    pub total_reward: f64,
    /// Illegal-move reports that were retried
    pub illegal_moves: usize,
}

/// Aggregate statistics for a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub illegal_moves: usize,
    pub updates: usize,
}

impl TrainingStats {
    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.episodes)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.episodes)
    }

    pub fn loss_rate(&self) -> f64 {
        rate(self.losses, self.episodes)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Observer trait for monitoring training
///
/// The methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_step(...)` - After every applied agent action
///    - `on_episode_end(...)`
/// 3. `on_training_end(stats)` - Once at the end
///
/// Every hook defaults to a no-op.
pub trait TrainingObserver {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _outcome: &Outcome) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self, _stats: &TrainingStats) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_handle_empty_run() {
        let stats = TrainingStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.draw_rate(), 0.0);
        assert_eq!(stats.loss_rate(), 0.0);
    }

    #[test]
    fn test_rates() {
        let stats = TrainingStats {
            episodes: 4,
            wins: 2,
            draws: 1,
            losses: 1,
            ..TrainingStats::default()
        };
        assert_eq!(stats.win_rate(), 0.5);
        assert_eq!(stats.draw_rate(), 0.25);
        assert_eq!(stats.loss_rate(), 0.25);
    }
}
