//! Reward attribution

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Rewards for each kind of transition result, from the agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// The agent completed a line
    pub win: f64,
    /// The opponent completed a line
    pub loss: f64,
    /// The board filled up without a winner
    pub draw: f64,
    /// Any non-terminal step
    pub living: f64,
}

impl Rewards {
    pub fn new(win: f64, loss: f64, living: f64, draw: f64) -> Self {
        Self {
            win,
            loss,
            draw,
            living,
        }
    }

    /// Reward for arriving in `state` when the learner plays `agent`
    pub fn for_state(&self, state: &BoardState, agent: Player) -> f64 {
        match state.outcome() {
            Some(GameOutcome::Win(winner)) if winner == agent => self.win,
            Some(GameOutcome::Win(_)) => self.loss,
            Some(GameOutcome::Draw) => self.draw,
            None => self.living,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("win", self.win),
            ("loss", self.loss),
            ("draw", self.draw),
            ("living", self.living),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} reward must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            win: 10.0,
            loss: -10.0,
            draw: 0.0,
            living: 0.0,
        }
    }
}
