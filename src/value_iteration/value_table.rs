//! State-value table

use std::collections::HashMap;

use crate::{Error, Result, tictactoe::BoardState};

const TABLE_NAME: &str = "value table";

/// Mapping from decision state to its current value estimate.
///
/// The set of states is fixed at construction; lookups and writes for any
/// other state fail with [`Error::UnknownState`] instead of defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    order: Vec<BoardState>,
    values: HashMap<BoardState, f64>,
}

impl ValueTable {
    /// Table with every given state at 0.0, swept in the given order
    pub fn new(states: Vec<BoardState>) -> Self {
        let mut order = Vec::with_capacity(states.len());
        let mut values = HashMap::with_capacity(states.len());
        for state in states {
            if values.insert(state, 0.0).is_none() {
                order.push(state);
            }
        }
        Self { order, values }
    }

    pub fn get(&self, state: &BoardState) -> Result<f64> {
        self.values
            .get(state)
            .copied()
            .ok_or_else(|| unknown(state))
    }

    pub fn set(&mut self, state: &BoardState, value: f64) -> Result<()> {
        let slot = self.values.get_mut(state).ok_or_else(|| unknown(state))?;
        *slot = value;
        Ok(())
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.values.contains_key(state)
    }

    /// States in sweep order
    pub fn states(&self) -> &[BoardState] {
        &self.order
    }

    /// `(state, value)` pairs in sweep order
    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, f64)> {
        self.order
            .iter()
            .map(|state| (state, self.values.get(state).copied().unwrap_or_default()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn unknown(state: &BoardState) -> Error {
    Error::UnknownState {
        state: state.encode(),
        table: TABLE_NAME,
    }
}
