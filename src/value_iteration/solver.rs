//! Value-iteration solver

use log::{debug, info};

use super::ValueTable;
use crate::{
    Result,
    config::ValueIterationConfig,
    mdp::TicTacToeMdp,
    policy::{Policy, select_greedy},
    ports::Solver,
    tictactoe::{BoardState, Move, decision_states},
};

/// Fixed-budget value iteration against a known opponent model
pub struct ValueIterationSolver {
    config: ValueIterationConfig,
    mdp: TicTacToeMdp,
    values: ValueTable,
    sweeps_done: usize,
}

impl ValueIterationSolver {
    /// Build the model and a zeroed value table over every decision state
    pub fn new(config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        let mdp = TicTacToeMdp::new(
            config.rewards,
            config.agent,
            config.opponent.into_boxed_opponent(),
        );
        Ok(Self::with_model(config, mdp))
    }

    /// Use an explicit model instead of the one described by `config`
    pub fn with_model(config: ValueIterationConfig, mdp: TicTacToeMdp) -> Self {
        let values = ValueTable::new(decision_states(mdp.agent()));
        Self {
            config,
            mdp,
            values,
            sweeps_done: 0,
        }
    }

    pub fn config(&self) -> &ValueIterationConfig {
        &self.config
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn sweeps_done(&self) -> usize {
        self.sweeps_done
    }

    /// Expected return of playing `action` in `state` and acting on the
    /// current value estimates afterwards:
    /// `Σ p · (r + γ · V(s'))`.
    pub fn action_value(&self, state: &BoardState, action: Move) -> Result<f64> {
        let mut expected = 0.0;
        for transition in self.mdp.transitions(state, action)? {
            let outcome = transition.outcome;
            let next_value = self.values.get(&outcome.next_state)?;
            expected += transition.prob * (outcome.reward + self.config.discount * next_value);
        }
        Ok(expected)
    }

    /// Best action and its expectation, or `None` for a state without moves
    fn best_action(&self, state: &BoardState) -> Result<Option<(Move, f64)>> {
        let mut candidates = Vec::new();
        for action in state.legal_actions() {
            candidates.push((action, self.action_value(state, action)?));
        }
        Ok(select_greedy(candidates))
    }

    /// One in-place sweep over every state; returns the largest change.
    ///
    /// Terminal states are never written and keep their value of 0.0.
    pub fn sweep(&mut self) -> Result<f64> {
        let mut max_delta: f64 = 0.0;
        for index in 0..self.values.len() {
            let state = self.values.states()[index];
            if state.is_terminal() {
                continue;
            }
            let Some((_, value)) = self.best_action(&state)? else {
                continue;
            };
            let old = self.values.get(&state)?;
            max_delta = max_delta.max((value - old).abs());
            self.values.set(&state, value)?;
        }
        self.sweeps_done += 1;
        debug!("sweep {} max delta {max_delta:.6}", self.sweeps_done);
        Ok(max_delta)
    }

    /// Run the configured number of sweeps
    pub fn iterate(&mut self) -> Result<()> {
        for _ in 0..self.config.iterations {
            self.sweep()?;
        }
        Ok(())
    }

    /// One-step expectimax over the current values for every non-terminal
    /// state in the table.
    pub fn extract_policy(&self) -> Result<Policy> {
        let mut policy = Policy::new();
        for &state in self.values.states() {
            if state.is_terminal() {
                continue;
            }
            match self.best_action(&state)? {
                Some((action, _)) => policy.insert(state, action),
                None => policy.mark_unresolved(state),
            }
        }
        Ok(policy)
    }
}

impl Solver for ValueIterationSolver {
    fn name(&self) -> &str {
        "value_iteration"
    }

    fn train(&mut self) -> Result<Policy> {
        info!(
            "value iteration: {} states, {} sweeps, discount {}, opponent {}",
            self.values.len(),
            self.config.iterations,
            self.config.discount,
            self.mdp.opponent().name()
        );
        self.iterate()?;
        let policy = self.extract_policy()?;
        info!(
            "value iteration finished: {} policy entries, {} unresolved",
            policy.len(),
            policy.unresolved().len()
        );
        Ok(policy)
    }
}
