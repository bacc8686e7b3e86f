//! Transition model

use serde::{Deserialize, Serialize};

use super::{PROBABILITY_TOLERANCE, Rewards};
use crate::{
    Error, Result,
    opponents::{Opponent, RandomOpponent},
    tictactoe::{BoardState, Move, Player},
};

/// Result of one agent action once the opponent has replied:
/// `(state, action, reward, next_state)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub state: BoardState,
    pub action: Move,
    pub reward: f64,
    pub next_state: BoardState,
}

/// An outcome together with its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionProb {
    pub outcome: Outcome,
    pub prob: f64,
}

/// The Tic-Tac-Toe MDP seen by the learner playing `agent`
pub struct TicTacToeMdp {
    rewards: Rewards,
    agent: Player,
    opponent: Box<dyn Opponent>,
}

impl TicTacToeMdp {
    pub fn new(rewards: Rewards, agent: Player, opponent: Box<dyn Opponent>) -> Self {
        Self {
            rewards,
            agent,
            opponent,
        }
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn opponent(&self) -> &dyn Opponent {
        self.opponent.as_ref()
    }

    /// All possible outcomes of playing `action` in `state`.
    ///
    /// A move that ends the game is deterministic. Otherwise there is one
    /// transition per opponent reply, weighted by the opponent's distribution.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalAction`] if `state` is terminal, is not the agent's
    ///   turn, or `action` is not legal in it
    /// - [`Error::MalformedTransitionModel`] if the opponent's replies are
    ///   empty, illegal or do not sum to one
    pub fn transitions(&self, state: &BoardState, action: Move) -> Result<Vec<TransitionProb>> {
        if state.to_move != self.agent {
            return Err(Error::IllegalAction {
                state: state.encode(),
                position: action.position,
            });
        }
        let after = state.apply(action)?;

        if after.is_terminal() {
            return Ok(vec![TransitionProb {
                outcome: self.outcome(state, action, after),
                prob: 1.0,
            }]);
        }

        let malformed = |reason: String| Error::MalformedTransitionModel {
            state: state.encode(),
            position: action.position,
            reason,
        };

        let replies = self
            .opponent
            .reply_distribution(&after)
            .map_err(|e| malformed(e.to_string()))?;

        let mut transitions = Vec::with_capacity(replies.len());
        for (reply, prob) in replies {
            if !(prob > 0.0 && prob <= 1.0 + PROBABILITY_TOLERANCE) {
                return Err(malformed(format!("reply {reply} has probability {prob}")));
            }
            let next = after
                .make_move(reply)
                .map_err(|e| malformed(format!("reply {reply} is illegal: {e}")))?;
            transitions.push(TransitionProb {
                outcome: self.outcome(state, action, next),
                prob,
            });
        }

        check_transitions(&transitions).map_err(malformed)?;
        Ok(transitions)
    }

    fn outcome(&self, state: &BoardState, action: Move, next_state: BoardState) -> Outcome {
        Outcome {
            state: *state,
            action,
            reward: self.rewards.for_state(&next_state, self.agent),
            next_state,
        }
    }
}

impl Default for TicTacToeMdp {
    fn default() -> Self {
        Self::new(Rewards::default(), Player::X, Box::new(RandomOpponent))
    }
}

/// A transition set must be non-empty and carry unit probability mass
pub fn check_transitions(transitions: &[TransitionProb]) -> std::result::Result<(), String> {
    if transitions.is_empty() {
        return Err("no transitions".to_string());
    }
    let mass: f64 = transitions.iter().map(|t| t.prob).sum();
    if (mass - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(format!("probabilities sum to {mass}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponents::FixedOpponent;

    fn play(moves: &[usize]) -> BoardState {
        moves
            .iter()
            .fold(BoardState::new(), |board, &pos| board.make_move(pos).unwrap())
    }

    #[test]
    fn test_opening_move_has_eight_replies() {
        let mdp = TicTacToeMdp::default();
        let transitions = mdp
            .transitions(&BoardState::new(), Move::new(4, Player::X))
            .unwrap();
        assert_eq!(transitions.len(), 8);
        for t in &transitions {
            assert_eq!(t.outcome.next_state.to_move, Player::X);
            assert_eq!(t.outcome.next_state.occupied_count(), 2);
            assert_eq!(t.outcome.reward, 0.0);
        }
    }

    #[test]
    fn test_winning_move_is_deterministic() {
        let mdp = TicTacToeMdp::default();
        let state = play(&[0, 3, 1, 4]);
        let transitions = mdp.transitions(&state, Move::new(2, Player::X)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].prob, 1.0);
        assert_eq!(transitions[0].outcome.reward, 10.0);
        assert!(transitions[0].outcome.next_state.is_terminal());
    }

    #[test]
    fn test_losing_reply_gets_loss_reward() {
        let mdp = TicTacToeMdp::new(
            Rewards::default(),
            Player::X,
            Box::new(FixedOpponent::new([5, 0, 1, 2, 3, 4, 6, 7, 8]).unwrap()),
        );
        // O holds 3 and 4; the fixed opponent completes the row at 5
        let state = play(&[0, 3, 8, 4]);
        let transitions = mdp.transitions(&state, Move::new(1, Player::X)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.reward, -10.0);
        assert_eq!(transitions[0].outcome.next_state.winner(), Some(Player::O));
    }

    #[test]
    fn test_rejects_terminal_and_illegal_requests() {
        let mdp = TicTacToeMdp::default();
        let finished = play(&[0, 3, 1, 4, 2]);
        assert!(matches!(
            mdp.transitions(&finished, Move::new(8, Player::X)),
            Err(Error::IllegalAction { .. })
        ));

        let state = play(&[0, 4]);
        assert!(matches!(
            mdp.transitions(&state, Move::new(4, Player::X)),
            Err(Error::IllegalAction { position: 4, .. })
        ));
        assert!(matches!(
            mdp.transitions(&play(&[0]), Move::new(4, Player::O)),
            Err(Error::IllegalAction { .. })
        ));
    }

    #[test]
    fn test_check_transitions_flags_bad_mass() {
        let state = BoardState::new();
        let outcome = Outcome {
            state,
            action: Move::new(0, Player::X),
            reward: 0.0,
            next_state: state,
        };
        let half = TransitionProb { outcome, prob: 0.5 };
        assert!(check_transitions(&[]).is_err());
        assert!(check_transitions(&[half]).is_err());
        assert!(check_transitions(&[half, half]).is_ok());
    }
}
