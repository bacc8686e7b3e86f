//! Full training runs with the reference parameters

mod common;

use tictactoe_mdp::{
    Solver,
    baseline::RandomSolver,
    config::QLearningConfig,
    environment::FirstMover,
    evaluation::evaluate,
    opponents::OpponentKind,
    q_learning::QLearningSolver,
    tictactoe::{CellKind, Player},
};

fn reference_solver() -> QLearningSolver {
    QLearningSolver::new(
        QLearningConfig::default()
            .with_learning_rate(0.1)
            .with_discount(0.9)
            .with_epsilon(0.1)
            .with_episodes(60_000)
            .with_opponent(OpponentKind::Random)
            .with_seed(42),
    )
    .unwrap()
}

#[test]
fn test_learned_opening_is_center_or_corner() {
    let mut solver = reference_solver();
    let policy = solver.train().unwrap();

    let empty = common::play(&[]);
    let opening = policy.action(&empty).unwrap();
    assert_ne!(opening.kind(), CellKind::Edge, "opened on edge {}", opening.position);

    let values = solver.q_table().get(&empty).unwrap();
    let chosen = values[&opening];
    for (action, &value) in values {
        if action.kind() == CellKind::Edge {
            assert!(chosen >= value, "edge {} beats the opening", action.position);
        }
    }

    // Same seed, same result
    let mut replay = reference_solver();
    assert_eq!(replay.train().unwrap(), policy);

    // The learned policy should clearly beat a random policy against the same opponent
    let learned = evaluate(
        &policy,
        OpponentKind::Random.into_boxed_opponent(),
        Player::X,
        FirstMover::Agent,
        1_000,
        7,
    )
    .unwrap();
    let baseline_policy = RandomSolver::new(Player::X, Some(7)).train().unwrap();
    let baseline = evaluate(
        &baseline_policy,
        OpponentKind::Random.into_boxed_opponent(),
        Player::X,
        FirstMover::Agent,
        1_000,
        7,
    )
    .unwrap();
    assert!(learned.win_rate > baseline.win_rate);
}
