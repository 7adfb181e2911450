//! Error types returned by `ElasticHashMap` construction and insertion

use thiserror::Error;

/// Reasons an insertion can be refused.
///
/// A failed insertion never mutates the table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The table already holds `capacity - floor(delta * capacity)` entries.
    #[error("out of space, hash table is full")]
    OutOfSpace,
    /// Capacity was not reached, but every eligible level ran out of probe attempts.
    #[error("failed to insert to hash table")]
    FailedToInsert,
}

/// Invalid construction parameters.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Capacity must be at least one slot
    #[error("capacity must be positive")]
    ZeroCapacity,
    /// Delta must lie in the open interval (0, 1)
    #[error("delta must be in (0, 1), got {0}")]
    InvalidDelta(f64),
    /// The probe constant must be finite and positive
    #[error("probe constant must be finite and positive, got {0}")]
    InvalidProbeConstant(f64),
}

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Construction failed
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Insertion failed
    #[error(transparent)]
    Insert(#[from] InsertError),
}
