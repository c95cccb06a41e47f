//! Error types
//!
//! The simulation never fails mid-tick. These cover host input (time, names,
//! config files) and commands issued in the wrong lifecycle state.

use thiserror::Error;

/// Fatal loop errors surfaced to the shell
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("frame timestamp is not finite: {0}")]
    InvalidTimestamp(f64),

    #[error("clock went backwards: previous={previous}ms, now={now}ms")]
    ClockWentBackwards { previous: f64, now: f64 },

    #[error("no run in progress")]
    NoActiveRun,

    #[error("a run is already in progress")]
    RunInProgress,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Name(#[from] NameError),
}

/// Player name rejected at start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("player name is empty")]
    Empty,

    #[error("player name is {len} characters, max is {max}")]
    TooLong { len: usize, max: usize },
}

/// Settings could not be loaded or failed validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => SimError::InvalidSettings(msg),
            other => SimError::InvalidSettings(other.to_string()),
        }
    }
}
