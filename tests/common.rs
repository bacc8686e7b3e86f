//! Common helpers for the integration tests.

#![allow(dead_code)]

use tictactoe_mdp::tictactoe::BoardState;

/// Play `moves` in order from the empty X-first board
pub fn play(moves: &[usize]) -> BoardState {
    moves
        .iter()
        .fold(BoardState::new(), |board, &pos| board.make_move(pos).unwrap())
}

/// X to move with only cell 8 free and no line completed:
///
/// ```text
/// X O X
/// X O O
/// O X .
/// ```
pub fn single_action_state() -> BoardState {
    BoardState::from_label("XOXXOOOX._X").unwrap()
}
