//! Deterministic policies and the greedy tie-break they are built with

use std::collections::HashMap;

use log::warn;

use crate::tictactoe::{BoardState, Move};

/// Pick the action with the highest value.
///
/// Ties go to the *last* candidate whose value is `>=` the running best, so
/// among equally valued moves the one enumerated last wins. The first candidate
/// is always accepted, which means a lone action is returned even when its
/// value is not finite.
pub fn select_greedy<I>(candidates: I) -> Option<(Move, f64)>
where
    I: IntoIterator<Item = (Move, f64)>,
{
    let mut best: Option<(Move, f64)> = None;
    for (action, value) in candidates {
        match best {
            Some((_, best_value)) if value < best_value || value.is_nan() => {}
            _ => best = Some((action, value)),
        }
    }
    best
}

/// Mapping from decision state to the action to play there.
///
/// Built once by a solver and never updated incrementally. States the
/// extractor could not resolve are kept in [`Policy::unresolved`] rather than
/// silently dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Policy {
    actions: HashMap<BoardState, Move>,
    unresolved: Vec<BoardState>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: BoardState, action: Move) {
        self.actions.insert(state, action);
    }

    /// Record a state that should have had an action but did not get one
    pub fn mark_unresolved(&mut self, state: BoardState) {
        warn!("no action could be extracted for state {}", state.encode());
        self.unresolved.push(state);
    }

    pub fn action(&self, state: &BoardState) -> Option<Move> {
        self.actions.get(state).copied()
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.actions.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn unresolved(&self) -> &[BoardState] {
        &self.unresolved
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Entries sorted by state label, for stable output
    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &Move)> {
        let mut entries: Vec<_> = self.actions.iter().collect();
        entries.sort_by_key(|(state, _)| state.encode());
        entries.into_iter()
    }
}

impl FromIterator<(BoardState, Move)> for Policy {
    fn from_iter<T: IntoIterator<Item = (BoardState, Move)>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            unresolved: Vec::new(),
        }
    }
}
