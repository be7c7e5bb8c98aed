//! Error types for the scheduler API.

use thiserror::Error;

/// Outcome of a rejected scheduler operation.
///
/// Every API call reports synchronously; the tick path never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(u8)]
pub enum SchedError {
    /// The scheduler has not been given a tick source yet.
    #[error("scheduler not initialized")]
    NotInitialized = 1,
    /// The task table already holds `MAX_TASKS` tasks.
    #[error("task table is full")]
    CapacityExceeded = 2,
    /// No live task has the given handle.
    #[error("task not found")]
    NotFound = 3,
    /// Interval outside `1..=MAX_INTERVAL`.
    #[error("interval out of range")]
    InvalidInterval = 4,
    /// Unknown raw mode code.
    #[error("unknown task mode")]
    InvalidMode = 5,
}

/// Result type used throughout the scheduler API.
pub type SchedResult<T = ()> = Result<T, SchedError>;
