//! Error types for shiftsync.

use thiserror::Error;

/// Errors that can occur while reconciling a schedule with a calendar.
#[derive(Error, Debug)]
pub enum ShiftSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid remote event: {0}")]
    InvalidRemoteEvent(String),

    #[error("Schedule events '{first}' and '{second}' both map to remote id '{remote_id}'")]
    DuplicateRemoteId {
        first: String,
        second: String,
        remote_id: String,
    },

    /// A non-2xx response that the upsert/delete protocol doesn't consume.
    #[error("{method} {url} failed with status {status}: {body}")]
    Request {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Event '{0}' changed on the remote while it was being written")]
    UpsertRace(String),

    #[error("Sync cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ShiftSyncError {
    fn from(e: serde_json::Error) -> Self {
        ShiftSyncError::Serialization(e.to_string())
    }
}

/// Result type alias for shiftsync operations.
pub type ShiftSyncResult<T> = Result<T, ShiftSyncError>;
