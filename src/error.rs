//! Error types shared across the crate.

use thiserror::Error;

use crate::session::{Action, Phase};

/// Errors surfaced by persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote character lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Remote lookups are switched off (offline mode).
    #[error("remote lookup disabled")]
    Disabled,

    #[error("lookup returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed lookup response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors while reading the embedded curriculum tables.
#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("curriculum file not found: {0}")]
    Missing(String),

    #[error("curriculum file is not valid utf-8: {0}")]
    Encoding(String),

    #[error("curriculum file {file} is malformed: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors emitted by the session controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: Action },
}
