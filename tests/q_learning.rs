//! Q-learning behaviour: exploration extremes, illegal-move handling and
//! extraction

mod common;

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use rand::rngs::StdRng;
use tictactoe_mdp::{
    Result, Solver,
    config::QLearningConfig,
    environment::{Environment, FirstMover, Step, TicTacToeEnvironment},
    mdp::{Outcome, Rewards},
    opponents::{FixedOpponent, OpponentKind},
    ports::TrainingObserver,
    q_learning::QLearningSolver,
    tictactoe::{BoardState, Move, Player},
};

/// Records every action the agent applies from the empty board
struct OpeningRecorder {
    openings: Rc<RefCell<HashSet<usize>>>,
}

impl TrainingObserver for OpeningRecorder {
    fn on_step(&mut self, _episode: usize, outcome: &Outcome) -> Result<()> {
        if outcome.state == BoardState::new() {
            self.openings.borrow_mut().insert(outcome.action.position);
        }
        Ok(())
    }
}

/// Reports every other move as illegal without touching the game
struct FlakyEnvironment {
    inner: TicTacToeEnvironment,
    calls: usize,
    rejected: Rc<RefCell<usize>>,
}

impl Environment for FlakyEnvironment {
    fn current_state(&self) -> BoardState {
        self.inner.current_state()
    }

    fn execute_move(&mut self, action: Move, rng: &mut StdRng) -> Result<Step> {
        self.calls += 1;
        if self.calls.is_multiple_of(2) {
            *self.rejected.borrow_mut() += 1;
            return Ok(Step::Illegal);
        }
        self.inner.execute_move(action, rng)
    }

    fn reset(&mut self, rng: &mut StdRng) -> Result<()> {
        self.inner.reset(rng)
    }
}

#[test]
fn test_full_exploration_tries_every_opening() {
    let openings = Rc::new(RefCell::new(HashSet::new()));
    let mut solver = QLearningSolver::new(
        QLearningConfig::default()
            .with_epsilon(1.0)
            .with_episodes(10_000)
            .with_seed(2024),
    )
    .unwrap()
    .with_observer(Box::new(OpeningRecorder {
        openings: Rc::clone(&openings),
    }));
    solver.train().unwrap();

    assert_eq!(*openings.borrow(), (0..9).collect::<HashSet<_>>());
}

#[test]
fn test_pure_exploitation_settles_against_deterministic_opponent() {
    let mut solver = QLearningSolver::new(
        QLearningConfig::default()
            .with_epsilon(0.0)
            .with_learning_rate(1.0)
            .with_opponent(OpponentKind::Fixed)
            .with_first_mover(FirstMover::Agent)
            .with_seed(1),
    )
    .unwrap();

    let mut stable_after = None;
    for episode in 0..5_000 {
        let before = solver.q_table().clone();
        solver.run_episode().unwrap();
        if solver.q_table() == &before {
            stable_after = Some(episode);
            break;
        }
    }
    assert!(stable_after.is_some(), "Q-table never stopped changing");

    let settled = solver.q_table().clone();
    for _ in 0..50 {
        solver.run_episode().unwrap();
        assert_eq!(solver.q_table(), &settled);
    }
}

#[test]
fn test_illegal_reports_are_retried_without_updates() {
    let rejected = Rc::new(RefCell::new(0));
    let env = FlakyEnvironment {
        inner: TicTacToeEnvironment::new(
            Player::X,
            Box::new(FixedOpponent::default()),
            Rewards::default(),
            FirstMover::Agent,
        ),
        calls: 0,
        rejected: Rc::clone(&rejected),
    };
    let mut solver = QLearningSolver::new(
        QLearningConfig::default()
            .with_episodes(300)
            .with_opponent(OpponentKind::Fixed)
            .with_seed(8),
    )
    .unwrap()
    .with_environment(env);

    let policy = solver.train().unwrap();
    let stats = solver.stats();
    assert_eq!(stats.episodes, 300);
    assert_eq!(stats.illegal_moves, *rejected.borrow());
    assert!(stats.illegal_moves > 0);
    assert!(policy.is_complete());
}

#[test]
fn test_extraction_is_idempotent() {
    let mut solver = QLearningSolver::new(
        QLearningConfig::default().with_episodes(2_000).with_seed(5),
    )
    .unwrap();
    let trained = solver.train().unwrap();
    let again = solver.extract_policy().unwrap();
    assert_eq!(trained, again);
    assert_eq!(again.len(), solver.q_table().len());
}

#[test]
fn test_single_legal_action_is_chosen() {
    let mut solver = QLearningSolver::new(
        QLearningConfig::default().with_episodes(500).with_seed(3),
    )
    .unwrap();
    let policy = solver.train().unwrap();
    assert_eq!(
        policy.action(&common::single_action_state()),
        Some(Move::new(8, Player::X))
    );
}

#[test]
fn test_o_agent_with_alternating_openings() {
    let mut solver = QLearningSolver::new(
        QLearningConfig::default()
            .with_agent(Player::O)
            .with_first_mover(FirstMover::Alternate)
            .with_episodes(1_000)
            .with_seed(12),
    )
    .unwrap();
    let policy = solver.train().unwrap();
    assert!(policy.iter().all(|(state, action)| {
        state.to_move == Player::O && action.player == Player::O && state.is_legal(action.position)
    }));
    let stats = solver.stats();
    assert_eq!(stats.wins + stats.draws + stats.losses, 1_000);
}
