use thiserror::Error;

/// Core error type shared across casefile crates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A dataset breaks one of the puzzle invariants.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    /// A generator was asked for fewer rows than its fixtures need.
    #[error("{table}: requested {requested} row(s), at least {minimum} required")]
    InsufficientRows {
        table: &'static str,
        requested: usize,
        minimum: usize,
    },
    /// Inputs handed between generators are inconsistent.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for results returned by casefile crates.
pub type Result<T> = std::result::Result<T, Error>;
