//! Q-table implementation for temporal difference learning

use std::collections::{BTreeMap, HashMap};

use crate::{
    Error, Result,
    policy::select_greedy,
    tictactoe::{BoardState, Move},
};

const TABLE_NAME: &str = "Q-table";

/// Q-table mapping (state, action) pairs to Q-values
///
/// Only pairs that were explicitly added exist. Reading a pair that was never
/// added is an error, not an implicit zero, so initialisation gaps surface
/// immediately. Actions within a state are ordered by cell index, which fixes
/// the enumeration order the greedy tie-break depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    q_values: HashMap<BoardState, BTreeMap<Move, f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every legal action of every given state at `q_init`.
    ///
    /// Terminal states have no legal actions and get no entry.
    pub fn initialised<'a, I>(states: I, q_init: f64) -> Self
    where
        I: IntoIterator<Item = &'a BoardState>,
    {
        let mut table = Self::new();
        for state in states {
            for action in state.legal_actions() {
                table.add(*state, action, q_init);
            }
        }
        table
    }

    /// Action values recorded for `state`
    pub fn get(&self, state: &BoardState) -> Result<&BTreeMap<Move, f64>> {
        self.q_values.get(state).ok_or_else(|| Error::UnknownState {
            state: state.encode(),
            table: TABLE_NAME,
        })
    }

    /// Q-value for a state-action pair
    pub fn get_value(&self, state: &BoardState, action: Move) -> Result<f64> {
        self.get(state)?
            .get(&action)
            .copied()
            .ok_or_else(|| Error::UnknownAction {
                state: state.encode(),
                position: action.position,
            })
    }

    /// Set Q-value for a state-action pair, creating the state's entry on
    /// first use
    pub fn add(&mut self, state: BoardState, action: Move, value: f64) {
        self.q_values.entry(state).or_default().insert(action, value);
    }

    /// Greedy action and its value under the shared tie-break
    pub fn greedy_action(&self, state: &BoardState) -> Result<(Move, f64)> {
        select_greedy(self.get(state)?.iter().map(|(&action, &value)| (action, value))).ok_or_else(
            || Error::UnknownState {
                state: state.encode(),
                table: TABLE_NAME,
            },
        )
    }

    /// Maximum Q-value in a state
    pub fn max_value(&self, state: &BoardState) -> Result<f64> {
        self.greedy_action(state).map(|(_, value)| value)
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.q_values.contains_key(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &BoardState> {
        self.q_values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &BTreeMap<Move, f64>)> {
        self.q_values.iter()
    }

    /// Number of states with at least one recorded action
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Total number of (state, action) pairs
    pub fn size(&self) -> usize {
        self.q_values.values().map(BTreeMap::len).sum()
    }
}
