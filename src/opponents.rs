//! Opponent strategies
//!
//! An opponent answers every agent move. The MDP model consumes an opponent as
//! a probability distribution over replies; the environment samples a concrete
//! reply from the same distribution with the run's random source, so both
//! training paths face the same opponent.

use std::collections::HashMap;

use clap::ValueEnum;
use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BoardState, Player},
};

/// Trait for opponent behaviour
pub trait Opponent: Send {
    /// Returns the kind of opponent
    fn kind(&self) -> OpponentKind;

    /// Probability of each reply position in a non-terminal state.
    ///
    /// Probabilities must be positive and sum to 1.
    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(usize, f64)>>;

    /// Draw a concrete reply using the injected random source.
    fn select_reply(&self, state: &BoardState, rng: &mut StdRng) -> Result<usize> {
        let distribution = self.reply_distribution(state)?;
        sample_reply(&distribution, rng).ok_or_else(|| self.no_reply(state))
    }

    fn name(&self) -> &str {
        self.kind().label()
    }

    fn no_reply(&self, state: &BoardState) -> Error {
        Error::NoReplyAvailable {
            opponent: self.name().to_string(),
            state: state.encode(),
        }
    }
}

fn sample_reply(distribution: &[(usize, f64)], rng: &mut StdRng) -> Option<usize> {
    let (last, _) = distribution.last()?;
    let ticket: f64 = rng.random();
    let mut cumulative = 0.0;
    for &(position, prob) in distribution {
        cumulative += prob;
        if ticket < cumulative {
            return Some(position);
        }
    }
    Some(*last)
}

/// Available opponent strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// Uniformly random legal replies
    #[default]
    Random,
    /// Always the first free cell in a fixed preference order
    Fixed,
    /// Perfect play, uniform among optimal replies
    Minimax,
}

impl OpponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Fixed => "fixed",
            OpponentKind::Minimax => "minimax",
        }
    }

    /// Creates a boxed opponent trait object from the kind
    pub fn into_boxed_opponent(self) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent),
            OpponentKind::Fixed => Box::new(FixedOpponent::default()),
            OpponentKind::Minimax => Box::new(MinimaxOpponent::new()),
        }
    }
}

/// Opponent that plays uniformly at random
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOpponent;

impl Opponent for RandomOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Random
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(usize, f64)>> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(self.no_reply(state));
        }
        let prob = 1.0 / moves.len() as f64;
        Ok(moves.into_iter().map(|m| (m, prob)).collect())
    }

    fn select_reply(&self, state: &BoardState, rng: &mut StdRng) -> Result<usize> {
        state
            .legal_moves()
            .choose(rng)
            .copied()
            .ok_or_else(|| self.no_reply(state))
    }
}

/// Deterministic opponent: plays the first empty cell of its preference order
#[derive(Debug, Clone)]
pub struct FixedOpponent {
    preference: [usize; 9],
}

impl FixedOpponent {
    /// `preference` must be a permutation of 0..9
    pub fn new(preference: [usize; 9]) -> Result<Self> {
        let mut seen = [false; 9];
        for &pos in &preference {
            if pos >= 9 || seen[pos] {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "fixed opponent preference {preference:?} is not a permutation of 0..9"
                    ),
                });
            }
            seen[pos] = true;
        }
        Ok(Self { preference })
    }

    fn reply(&self, state: &BoardState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        self.preference.iter().copied().find(|&pos| state.is_empty(pos))
    }
}

impl Default for FixedOpponent {
    fn default() -> Self {
        Self {
            preference: [0, 1, 2, 3, 4, 5, 6, 7, 8],
        }
    }
}

impl Opponent for FixedOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Fixed
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(usize, f64)>> {
        let pos = self.reply(state).ok_or_else(|| self.no_reply(state))?;
        Ok(vec![(pos, 1.0)])
    }

    fn select_reply(&self, state: &BoardState, _rng: &mut StdRng) -> Result<usize> {
        self.reply(state).ok_or_else(|| self.no_reply(state))
    }
}

/// Perfect-play opponent
///
/// The full game is solved once at construction; replies are drawn uniformly
/// from all moves that achieve the minimax value for the player on move.
#[derive(Debug, Clone)]
pub struct MinimaxOpponent {
    optimal_moves: HashMap<BoardState, Vec<usize>>,
}

impl MinimaxOpponent {
    pub fn new() -> Self {
        let mut memo = HashMap::new();
        for first in [Player::X, Player::O] {
            solve(BoardState::new_with_player(first), &mut memo);
        }
        let optimal_moves = memo
            .into_iter()
            .filter(|(_, (_, moves))| !moves.is_empty())
            .map(|(state, (_, moves))| (state, moves))
            .collect();
        Self { optimal_moves }
    }

    /// Minimax-optimal moves for the player on move
    pub fn optimal_moves(&self, state: &BoardState) -> Option<&[usize]> {
        self.optimal_moves.get(state).map(Vec::as_slice)
    }
}

impl Default for MinimaxOpponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Value from X's perspective (+1 X wins, -1 O wins) and the moves achieving it
fn solve(state: BoardState, memo: &mut HashMap<BoardState, (i32, Vec<usize>)>) -> i32 {
    if let Some((value, _)) = memo.get(&state) {
        return *value;
    }

    if state.is_terminal() {
        let value = match state.winner() {
            Some(Player::X) => 1,
            Some(Player::O) => -1,
            None => 0,
        };
        memo.insert(state, (value, Vec::new()));
        return value;
    }

    let mut best_value = match state.to_move {
        Player::X => i32::MIN,
        Player::O => i32::MAX,
    };
    let mut best_moves = Vec::new();

    for mv in state.legal_moves() {
        let Ok(next) = state.make_move(mv) else {
            continue;
        };
        let child = solve(next, memo);
        let better = match state.to_move {
            Player::X => child > best_value,
            Player::O => child < best_value,
        };
        if better {
            best_value = child;
            best_moves.clear();
            best_moves.push(mv);
        } else if child == best_value {
            best_moves.push(mv);
        }
    }

    memo.insert(state, (best_value, best_moves));
    best_value
}

impl Opponent for MinimaxOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Minimax
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(usize, f64)>> {
        let moves = self
            .optimal_moves(state)
            .filter(|moves| !moves.is_empty())
            .ok_or_else(|| self.no_reply(state))?;
        let prob = 1.0 / moves.len() as f64;
        Ok(moves.iter().map(|&m| (m, prob)).collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn play(moves: &[usize]) -> BoardState {
        moves
            .iter()
            .fold(BoardState::new(), |board, &pos| board.make_move(pos).unwrap())
    }

    #[test]
    fn test_random_distribution_is_uniform() {
        let state = play(&[4]);
        let dist = RandomOpponent.reply_distribution(&state).unwrap();
        assert_eq!(dist.len(), 8);
        let total: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(dist.iter().all(|&(_, p)| (p - 0.125).abs() < 1e-12));
    }

    #[test]
    fn test_random_reply_is_legal() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = play(&[0, 4, 8]);
        for _ in 0..50 {
            let reply = RandomOpponent.select_reply(&state, &mut rng).unwrap();
            assert!(state.is_legal(reply));
        }
    }

    #[test]
    fn test_random_has_no_reply_on_terminal() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert!(RandomOpponent.reply_distribution(&state).is_err());
    }

    #[test]
    fn test_fixed_opponent_is_deterministic() {
        let opponent = FixedOpponent::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = play(&[0]);
        assert_eq!(opponent.select_reply(&state, &mut rng).unwrap(), 1);
        assert_eq!(opponent.reply_distribution(&state).unwrap(), vec![(1, 1.0)]);
    }

    #[test]
    fn test_fixed_opponent_rejects_bad_preference() {
        assert!(FixedOpponent::new([0, 0, 1, 2, 3, 4, 5, 6, 7]).is_err());
        assert!(FixedOpponent::new([8, 7, 6, 5, 4, 3, 2, 1, 0]).is_ok());
    }

    #[test]
    fn test_minimax_blocks_immediate_win() {
        let opponent = MinimaxOpponent::new();
        // X threatens the top row, O must block at 2
        let state = play(&[0, 4, 1]);
        assert_eq!(opponent.reply_distribution(&state).unwrap(), vec![(2, 1.0)]);
    }

    #[test]
    fn test_minimax_takes_winning_move() {
        let opponent = MinimaxOpponent::new();
        // O to move with 3-4 filled can win at 5
        let state = play(&[0, 3, 1, 4, 8]);
        let moves = opponent.optimal_moves(&state).unwrap();
        assert!(moves.contains(&5));
    }

    #[test]
    fn test_sampled_reply_respects_distribution_support() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = vec![(2, 0.5), (6, 0.5)];
        for _ in 0..100 {
            let pos = sample_reply(&dist, &mut rng).unwrap();
            assert!(pos == 2 || pos == 6);
        }
        assert_eq!(sample_reply(&[], &mut rng), None);
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [OpponentKind::Random, OpponentKind::Fixed, OpponentKind::Minimax] {
            assert_eq!(kind.into_boxed_opponent().kind(), kind);
        }
    }
}
