//! Core error types for daykeeper-core.
//!
//! Every user-visible failure maps to a variant here; command handlers
//! report these inline and never panic.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::TaskId;

/// Core error type for daykeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The user has not run setup yet.
    #[error("No configuration found. Run setup first.")]
    NotConfigured,

    /// Check-in requested with an empty habit list.
    #[error("No habits configured. Add habits via setup before checking in.")]
    NoHabitsConfigured,

    /// No slot has enough remaining capacity for the task.
    #[error("No slot can fit {requested} minutes. Try a shorter task or complete existing ones.")]
    NoCapacity { requested: u32 },

    /// Task id not present in the schedule (stale selection).
    #[error("Task {id} was not found in today's schedule. It may have changed; try again.")]
    TaskNotFound { id: TaskId },

    /// Attempt to start a task that is already completed.
    #[error("Task {id} is already completed and cannot be started again.")]
    TaskCompleted { id: TaskId },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backing store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Message delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Document-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open document store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Compare-and-swap write lost against a concurrent writer
    #[error("Document '{path}' was modified by a concurrent write")]
    RevisionConflict { path: String },

    /// Document body (de)serialization failed
    #[error("Document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO errors (data directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Start hour outside 0-23
    #[error("Invalid start hour {value}: must be between 0 and 23")]
    InvalidHour { value: u32 },

    /// Task duration of zero minutes
    #[error("Invalid duration {minutes}m: must be greater than zero")]
    InvalidDuration { minutes: u32 },

    /// Required field left empty
    #[error("'{field}' must not be empty")]
    EmptyField { field: &'static str },
}

/// A chat-platform delivery failure (DM rejected, channel unreachable).
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct DeliveryError {
    pub reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
