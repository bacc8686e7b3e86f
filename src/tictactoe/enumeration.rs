//! Enumeration of the decision states the solvers initialise their tables with

use std::collections::HashSet;

use super::board::{BoardState, Player};

/// Every state reachable from an empty board, with either player opening,
/// where it is `agent`'s turn or the game is over.
///
/// The order is the depth-first discovery order from the X-first root and then
/// the O-first root; it is deterministic, so solvers sweeping the result in
/// order are reproducible.
pub fn decision_states(agent: Player) -> Vec<BoardState> {
    let mut states = Vec::new();
    let mut seen = HashSet::new();

    for first in [Player::X, Player::O] {
        let mut stack = vec![BoardState::new_with_player(first)];

        while let Some(state) = stack.pop() {
            if !seen.insert(state) {
                continue;
            }

            if state.is_terminal() || state.to_move == agent {
                states.push(state);
            }

            // Reverse so that lower cells are explored first
            for pos in state.legal_moves().into_iter().rev() {
                if let Ok(next) = state.make_move(pos) {
                    stack.push(next);
                }
            }
        }
    }

    states
}

/// Count every distinct state reachable from either opening
pub fn count_reachable_states() -> usize {
    let mut seen = HashSet::new();
    let mut stack = vec![
        BoardState::new_with_player(Player::X),
        BoardState::new_with_player(Player::O),
    ];

    while let Some(state) = stack.pop() {
        if !seen.insert(state) {
            continue;
        }
        for pos in state.legal_moves() {
            if let Ok(next) = state.make_move(pos) {
                stack.push(next);
            }
        }
    }

    seen.len()
}
