//! Error types for ring buffer operations

use crate::ring::reserve::Guard;
use thiserror::Error;

/// Error types for the ring buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Backing storage could not be grown; the buffer is unchanged
    #[error("cannot allocate {requested} bytes of backing storage")]
    OutOfMemory {
        /// Total storage size that was requested
        requested: usize,
    },
    /// A logical index fell outside the stored data
    #[error("index {index} out of range for buffer of length {len}")]
    IndexError {
        /// The index as given by the caller
        index: isize,
        /// Number of bytes stored when the index was checked
        len: usize,
    },
    /// A conflicting reservation is outstanding; retry once it is released
    #[error("the internal buffer cannot be modified at the moment ({0} reservation outstanding)")]
    Reserved(Guard),
    /// An argument was rejected before the operation started
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A search found no match
    #[error("substring not found")]
    NotFound,
}

/// Result type for ring buffer operations
pub type Result<T> = std::result::Result<T, Error>;
