//! Turn-taking environment for model-free learning
//!
//! The environment applies the agent's move, lets the opponent reply and
//! reports the resulting [`Outcome`]. Its current state is always an agent
//! decision point or a finished game.

use clap::ValueEnum;
use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    mdp::{Outcome, Rewards},
    opponents::{Opponent, RandomOpponent},
    tictactoe::{BoardState, Move, Player},
};

/// Result of asking the environment to apply an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The action was played and the opponent (if the game continued) replied
    Applied(Outcome),
    /// The action is not legal in the current state; nothing changed
    Illegal,
}

/// Who opens a new episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    /// The learning agent always opens
    #[default]
    Agent,
    /// The opponent always opens
    Opponent,
    /// Openings alternate between episodes, starting with the agent
    Alternate,
}

/// Environment interface consumed by model-free solvers
pub trait Environment {
    /// Current decision state (or the terminal state of a finished episode)
    fn current_state(&self) -> BoardState;

    /// Apply `action` and let the environment settle to the next decision
    /// point.
    ///
    /// An illegal action yields [`Step::Illegal`] and leaves the state
    /// untouched.
    fn execute_move(&mut self, action: Move, rng: &mut StdRng) -> Result<Step>;

    /// Start a new episode
    fn reset(&mut self, rng: &mut StdRng) -> Result<()>;
}

/// Tic-Tac-Toe against a fixed opponent strategy
pub struct TicTacToeEnvironment {
    state: BoardState,
    agent: Player,
    opponent: Box<dyn Opponent>,
    rewards: Rewards,
    first_mover: FirstMover,
    episodes_started: usize,
}

impl TicTacToeEnvironment {
    /// Create an environment. Call [`Environment::reset`] before the first
    /// episode so an opponent opening can be played.
    pub fn new(
        agent: Player,
        opponent: Box<dyn Opponent>,
        rewards: Rewards,
        first_mover: FirstMover,
    ) -> Self {
        Self {
            state: BoardState::new_with_player(agent),
            agent,
            opponent,
            rewards,
            first_mover,
            episodes_started: 0,
        }
    }

    /// Swap the opponent strategy; takes effect from the next reply
    pub fn with_opponent(mut self, opponent: Box<dyn Opponent>) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn set_opponent(&mut self, opponent: Box<dyn Opponent>) {
        self.opponent = opponent;
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn opponent(&self) -> &dyn Opponent {
        self.opponent.as_ref()
    }

    fn opener(&self) -> Player {
        let agent_opens = match self.first_mover {
            FirstMover::Agent => true,
            FirstMover::Opponent => false,
            FirstMover::Alternate => self.episodes_started.is_multiple_of(2),
        };
        if agent_opens {
            self.agent
        } else {
            self.agent.opponent()
        }
    }
}

impl Default for TicTacToeEnvironment {
    fn default() -> Self {
        Self::new(
            Player::X,
            Box::new(RandomOpponent),
            Rewards::default(),
            FirstMover::Agent,
        )
    }
}

impl Environment for TicTacToeEnvironment {
    fn current_state(&self) -> BoardState {
        self.state
    }

    fn execute_move(&mut self, action: Move, rng: &mut StdRng) -> Result<Step> {
        let state = self.state;
        if state.to_move != self.agent || action.player != self.agent {
            return Ok(Step::Illegal);
        }
        let Ok(after) = state.apply(action) else {
            debug!(
                "rejected position {} in state {}",
                action.position,
                state.encode()
            );
            return Ok(Step::Illegal);
        };

        let next_state = if after.is_terminal() {
            after
        } else {
            let reply = self.opponent.select_reply(&after, rng)?;
            after.make_move(reply)?
        };

        self.state = next_state;
        Ok(Step::Applied(Outcome {
            state,
            action,
            reward: self.rewards.for_state(&next_state, self.agent),
            next_state,
        }))
    }

    fn reset(&mut self, rng: &mut StdRng) -> Result<()> {
        let opener = self.opener();
        self.episodes_started += 1;

        let mut state = BoardState::new_with_player(opener);
        if opener != self.agent {
            let reply = self.opponent.select_reply(&state, rng)?;
            state = state.make_move(reply)?;
        }
        self.state = state;
        Ok(())
    }
}
