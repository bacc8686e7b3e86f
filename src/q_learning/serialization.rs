//! Serialization support for learned Q-tables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    persistence::{TrainingMetadata, check_version, read_msgpack, write_msgpack},
    q_learning::QTable,
    tictactoe::{BoardState, Move},
};

/// Q-values of one state, keyed by cell index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStateValues {
    pub state: String,
    pub actions: Vec<(usize, f64)>,
}

/// On-disk form of a [`QTable`], for diagnostic inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub metadata: TrainingMetadata,
    pub states: Vec<SavedStateValues>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &QTable, metadata: TrainingMetadata) -> Self {
        let mut states: Vec<SavedStateValues> = table
            .iter()
            .map(|(state, actions)| SavedStateValues {
                state: state.encode(),
                actions: actions
                    .iter()
                    .map(|(action, &value)| (action.position, value))
                    .collect(),
            })
            .collect();
        states.sort_by(|a, b| a.state.cmp(&b.state));
        Self {
            version: Self::VERSION,
            metadata,
            states,
        }
    }

    pub fn to_table(&self) -> Result<QTable> {
        check_version(self.version, Self::VERSION)?;
        let mut table = QTable::new();
        for saved in &self.states {
            let state = BoardState::from_label(&saved.state)?;
            for &(position, value) in &saved.actions {
                table.add(state, Move::new(position, state.to_move), value);
            }
        }
        Ok(table)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_msgpack(path.as_ref(), self, "Q-table")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let saved: Self = read_msgpack(path.as_ref(), "Q-table")?;
        check_version(saved.version, Self::VERSION)?;
        Ok(saved)
    }
}
