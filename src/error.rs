use std::path::PathBuf;

use thiserror::Error;

/// Failures from the remote statistics provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("{what} not found for player {id}")]
    Missing { what: &'static str, id: u32 },
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

/// Roster file problems; these abort the run before any player is processed.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },
    #[error("roster {path} has no 'Player' column (found: {found})")]
    MissingPlayerColumn { path: PathBuf, found: String },
    #[error("failed to write roster {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown milestone metric '{0}'")]
    UnknownMetric(String),
    #[error("milestone thresholds for {metric} must be positive and strictly ascending: {values:?}")]
    Thresholds { metric: String, values: Vec<u32> },
    #[error("milestone metric {0} is listed more than once")]
    DuplicateMetric(String),
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Why one roster entry did not produce a report.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no player matches '{0}'")]
    Unresolved(String),
    #[error("gave up after {attempts} timed out attempts: {source}")]
    ExternalTimeout {
        attempts: u32,
        source: ProviderError,
    },
    #[error(transparent)]
    Unexpected(#[from] ProviderError),
}
