//! Playing a frozen policy against an opponent

use log::info;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    environment::{Environment, FirstMover, Step, TicTacToeEnvironment},
    mdp::Rewards,
    opponents::Opponent,
    policy::Policy,
    tictactoe::{GameOutcome, Player},
};

/// Results of an evaluation run, from the agent's perspective
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl EvaluationResult {
    fn record(&mut self, outcome: GameOutcome, agent: Player) {
        self.total_games += 1;
        match outcome {
            GameOutcome::Win(winner) if winner == agent => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    fn finish(mut self) -> Self {
        if self.total_games > 0 {
            let total = self.total_games as f64;
            self.win_rate = self.wins as f64 / total;
            self.draw_rate = self.draws as f64 / total;
            self.loss_rate = self.losses as f64 / total;
        }
        self
    }
}

/// Play `games` games of `policy` against `opponent`.
///
/// The policy is never updated. A decision state the policy has no entry for
/// fails with [`Error::MissingPolicyEntry`].
pub fn evaluate(
    policy: &Policy,
    opponent: Box<dyn Opponent>,
    agent: Player,
    first_mover: FirstMover,
    games: usize,
    seed: u64,
) -> Result<EvaluationResult> {
    let opponent_name = opponent.name().to_string();
    let mut env = TicTacToeEnvironment::new(agent, opponent, Rewards::default(), first_mover);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = EvaluationResult::default();

    for _ in 0..games {
        env.reset(&mut rng)?;
        loop {
            let state = env.current_state();
            if let Some(outcome) = state.outcome() {
                result.record(outcome, agent);
                break;
            }
            let action = policy
                .action(&state)
                .ok_or_else(|| Error::MissingPolicyEntry {
                    state: state.encode(),
                })?;
            if let Step::Illegal = env.execute_move(action, &mut rng)? {
                return Err(Error::IllegalAction {
                    state: state.encode(),
                    position: action.position,
                });
            }
        }
    }

    let result = result.finish();
    info!(
        "evaluated {} games against {opponent_name}: {} wins, {} draws, {} losses",
        result.total_games, result.wins, result.draws, result.losses
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        baseline::RandomSolver,
        opponents::{FixedOpponent, MinimaxOpponent, RandomOpponent},
        ports::Solver,
        tictactoe::{BoardState, Move},
    };

    #[test]
    fn test_counts_add_up() {
        let policy = RandomSolver::new(Player::X, Some(1)).train().unwrap();
        let result = evaluate(
            &policy,
            Box::new(RandomOpponent),
            Player::X,
            FirstMover::Alternate,
            200,
            3,
        )
        .unwrap();
        assert_eq!(result.total_games, 200);
        assert_eq!(result.wins + result.draws + result.losses, 200);
        assert!((result.win_rate + result.draw_rate + result.loss_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let mut policy = Policy::new();
        policy.insert(BoardState::new(), Move::new(4, Player::X));
        let err = evaluate(
            &policy,
            Box::new(FixedOpponent::default()),
            Player::X,
            FirstMover::Agent,
            1,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingPolicyEntry { .. }));
    }

    #[test]
    fn test_random_policy_never_beats_minimax() {
        let policy = RandomSolver::new(Player::X, Some(2)).train().unwrap();
        let result = evaluate(
            &policy,
            Box::new(MinimaxOpponent::new()),
            Player::X,
            FirstMover::Agent,
            50,
            4,
        )
        .unwrap();
        assert_eq!(result.wins, 0);
    }
}
