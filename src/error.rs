//! Error taxonomy for bootstrap computations.
//!
//! All failures are surfaced synchronously to the caller; a replicate either
//! fully succeeds or the whole bootstrap call fails. Degenerate inputs are
//! detected before any division so NaN/Inf never leak into downstream
//! statistics.

use thiserror::Error;

/// Errors produced by bootstrap and significance computations.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller input: unknown column names, empty hierarchy, zero
    /// replicate count, mismatched column lengths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input that makes a valid mean impossible: an empty dataset slice or a
    /// hierarchy level with no distinct values.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Statistical operation undefined for the given input, e.g. significance
    /// with fewer than two groups.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateInput(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
