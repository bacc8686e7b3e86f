//! Error types for the Tic-Tac-Toe MDP crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid label format '{label}' (expected format: '{expected}')")]
    InvalidLabelFormat { label: String, expected: String },

    #[error("missing {part} in label '{label}'")]
    MissingLabelPart { part: String, label: String },

    #[error("invalid player '{player}' in label '{label}' (expected 'X' or 'O')")]
    InvalidPlayerString { player: String, label: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("illegal action: position {position} is not playable in state '{state}'")]
    IllegalAction { state: String, position: usize },

    #[error("state '{state}' was never initialised in the {table}")]
    UnknownState { state: String, table: &'static str },

    #[error("no Q-value recorded for position {position} in state '{state}'")]
    UnknownAction { state: String, position: usize },

    #[error("malformed transition model for state '{state}', position {position}: {reason}")]
    MalformedTransitionModel {
        state: String,
        position: usize,
        reason: String,
    },

    #[error("policy has no action for decision state '{state}'")]
    MissingPolicyEntry { state: String },

    #[error("opponent '{opponent}' has no reply in state '{state}'")]
    NoReplyAvailable { opponent: String, state: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
