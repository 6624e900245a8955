//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`;
//! adapters box their transport errors into [`TallyError::Storage`].

use crate::time::Timestamp;

/// Top-level error type shared by services, ports, and adapters.
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    /// A persisted cell held a value that could not be parsed.
    #[error("Malformed persisted value")]
    Parse(#[from] ParseError),

    /// An event carried a value that must not be applied.
    #[error("Invalid event input")]
    Validation(#[from] ValidationError),

    /// The state store failed to read or write.
    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure to parse the textual representation of a persisted cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not a valid timestamp in any accepted form.
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    /// Not a finite decimal number.
    #[error("invalid decimal number {0:?}")]
    Number(String),

    /// Not a JSON array of numbers.
    #[error("invalid duration list {0:?}")]
    DurationList(String),

    /// Not a `YYYY-MM-DD` date.
    #[error("invalid date {0:?}")]
    Date(String),
}

/// An event input that fails domain invariants.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A cycle cannot end before it started.
    #[error("cycle ends at {ended_at} before it started at {started_at}")]
    CycleEndsBeforeStart {
        started_at: Timestamp,
        ended_at: Timestamp,
    },

    /// Energy reports must be finite and non-negative to keep the lifetime
    /// counter non-decreasing.
    #[error("energy report must be a finite, non-negative number of watt-hours, got {0}")]
    InvalidEnergy(f64),
}
