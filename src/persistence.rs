//! Saving and loading trained policies
//!
//! Policies are written as versioned MessagePack files. States are stored as
//! board labels (`"XO..X...._O"`) so files stay readable from other tools and
//! independent of the in-memory layout. A JSON export is available for
//! inspection.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    Error, Result,
    environment::FirstMover,
    mdp::Rewards,
    policy::Policy,
    tictactoe::{BoardState, Move, Player},
};

/// Which solver produced a saved artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    ValueIteration,
    QLearning,
    Random,
}

impl Algorithm {
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::ValueIteration => "value-iteration",
            Algorithm::QLearning => "q-learning",
            Algorithm::Random => "random",
        }
    }
}

/// Metadata about how an artifact was trained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Token the agent was trained to control
    pub agent_player: Option<Player>,
    /// Opponent trained (or planned) against
    pub opponent: Option<String>,
    /// Who opened training episodes
    pub first_mover: Option<FirstMover>,
    /// Number of episodes (Q-learning)
    pub episodes: Option<usize>,
    /// Number of sweeps (value iteration)
    pub iterations: Option<usize>,
    pub discount: Option<f64>,
    pub rewards: Option<Rewards>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Seconds since the Unix epoch when saved
    pub saved_at: Option<String>,
}

impl TrainingMetadata {
    pub fn stamped(mut self) -> Self {
        self.saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs().to_string());
        self
    }
}

/// One policy decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub state: String,
    pub position: usize,
    /// State value (value iteration) or greedy Q-value (Q-learning)
    pub value: Option<f64>,
}

/// On-disk form of a [`Policy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    pub algorithm: Algorithm,
    pub metadata: TrainingMetadata,
    pub entries: Vec<PolicyEntry>,
    /// States the solver could not resolve
    pub unresolved: Vec<String>,
}

impl SavedPolicy {
    /// Current save format version
    pub const VERSION: u32 = 1;

    /// Snapshot `policy`, attaching a value to each entry where `value_of`
    /// knows one
    pub fn from_policy<F>(
        policy: &Policy,
        algorithm: Algorithm,
        metadata: TrainingMetadata,
        value_of: F,
    ) -> Self
    where
        F: Fn(&BoardState, Move) -> Option<f64>,
    {
        let entries = policy
            .iter()
            .map(|(state, action)| PolicyEntry {
                state: state.encode(),
                position: action.position,
                value: value_of(state, *action),
            })
            .collect();
        let unresolved = policy.unresolved().iter().map(BoardState::encode).collect();
        Self {
            version: Self::VERSION,
            algorithm,
            metadata,
            entries,
            unresolved,
        }
    }

    /// Rebuild the in-memory policy
    pub fn to_policy(&self) -> Result<Policy> {
        check_version(self.version, Self::VERSION)?;
        let mut policy = Policy::new();
        for entry in &self.entries {
            let state = BoardState::from_label(&entry.state)?;
            let action = Move::new(entry.position, state.to_move);
            if !state.is_legal(entry.position) {
                return Err(Error::IllegalAction {
                    state: entry.state.clone(),
                    position: entry.position,
                });
            }
            policy.insert(state, action);
        }
        for label in &self.unresolved {
            policy.mark_unresolved(BoardState::from_label(label)?);
        }
        Ok(policy)
    }

    /// Entry for a given state label
    pub fn entry(&self, label: &str) -> Option<&PolicyEntry> {
        self.entries.iter().find(|entry| entry.state == label)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_msgpack(path.as_ref(), self, "policy")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let saved: Self = read_msgpack(path.as_ref(), "policy")?;
        check_version(saved.version, Self::VERSION)?;
        Ok(saved)
    }

    /// Pretty-printed JSON export
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

pub(crate) fn check_version(found: u32, expected: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::UnsupportedVersion { found, expected })
    }
}

pub(crate) fn write_msgpack<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    rmp_serde::encode::write(&mut writer, value).map_err(|e| Error::SerializationContext {
        operation: format!("serialize {what}"),
        message: e.to_string(),
    })
}

pub(crate) fn read_msgpack<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open {}", path.display()),
        source,
    })?;
    rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::SerializationContext {
        operation: format!("deserialize {what}"),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_policy() -> Policy {
        let empty = BoardState::new();
        let later = empty.make_move(4).unwrap().make_move(0).unwrap();
        [
            (empty, Move::new(4, Player::X)),
            (later, Move::new(8, Player::X)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_policy_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.msgpack");
        let metadata = TrainingMetadata {
            agent_player: Some(Player::X),
            seed: Some(7),
            ..TrainingMetadata::default()
        }
        .stamped();

        let policy = sample_policy();
        let saved =
            SavedPolicy::from_policy(&policy, Algorithm::ValueIteration, metadata, |_, _| {
                Some(1.5)
            });
        saved.save_to_file(&path).unwrap();

        let loaded = SavedPolicy::load_from_file(&path).unwrap();
        assert_eq!(loaded, saved);
        assert!(loaded.metadata.saved_at.is_some());
        assert_eq!(loaded.to_policy().unwrap(), policy);
        assert_eq!(loaded.entry("........._X").map(|e| e.position), Some(4));
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.msgpack");
        let mut saved = SavedPolicy::from_policy(
            &sample_policy(),
            Algorithm::Random,
            TrainingMetadata::default(),
            |_, _| None,
        );
        saved.version = 99;
        write_msgpack(&path, &saved, "policy").unwrap();

        assert!(matches!(
            SavedPolicy::load_from_file(&path),
            Err(Error::UnsupportedVersion { found: 99, expected: 1 })
        ));
    }

    #[test]
    fn test_illegal_entry_is_rejected() {
        let mut saved = SavedPolicy::from_policy(
            &sample_policy(),
            Algorithm::QLearning,
            TrainingMetadata::default(),
            |_, _| None,
        );
        saved.entries[0].position = 4;
        saved.entries[0].state = "....X...._O".to_string();
        assert!(saved.to_policy().is_err());
    }

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.json");
        let saved = SavedPolicy::from_policy(
            &sample_policy(),
            Algorithm::QLearning,
            TrainingMetadata::default(),
            |_, _| None,
        );
        saved.export_json(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(json["algorithm"], "q_learning");
        assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
    }
}
