//! Random baseline solver

use log::info;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    policy::Policy,
    ports::Solver,
    tictactoe::{Player, decision_states},
};

/// Picks one uniformly random legal action per decision state.
///
/// Useful as a floor when comparing the learned policies.
pub struct RandomSolver {
    agent: Player,
    rng: StdRng,
}

impl RandomSolver {
    pub fn new(agent: Player, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { agent, rng }
    }
}

impl Solver for RandomSolver {
    fn name(&self) -> &str {
        "random"
    }

    fn train(&mut self) -> Result<Policy> {
        let mut policy = Policy::new();
        for state in decision_states(self.agent) {
            if state.is_terminal() {
                continue;
            }
            match state.legal_actions().choose(&mut self.rng) {
                Some(&action) => policy.insert(state, action),
                None => policy.mark_unresolved(state),
            }
        }
        info!("random policy over {} states", policy.len());
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::BoardState;

    #[test]
    fn test_random_policy_is_complete_and_legal() {
        let policy = RandomSolver::new(Player::O, Some(5)).train().unwrap();
        assert!(policy.is_complete());
        for (state, action) in policy.iter() {
            assert_eq!(state.to_move, Player::O);
            assert_eq!(action.player, Player::O);
            assert!(state.is_legal(action.position));
        }
    }

    #[test]
    fn test_seeded_runs_agree() {
        let a = RandomSolver::new(Player::X, Some(9)).train().unwrap();
        let b = RandomSolver::new(Player::X, Some(9)).train().unwrap();
        assert_eq!(a, b);
        assert!(a.contains(&BoardState::new()));
    }
}
