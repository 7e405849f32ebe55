//! Error types for slicing and clustering.

use thiserror::Error;

/// Errors that can occur while slicing, clustering or merging.
#[derive(Debug, Error)]
pub enum SliceError {
    /// The bin search did not settle within its iteration budget.
    #[error(
        "bin search for max distance {max_distance} did not converge after {iterations} iterations \
         (last: {last_bins} bins summing to {last_sum})"
    )]
    DegenerateBinning {
        /// Distance the bins had to cover.
        max_distance: f64,
        /// Iterations spent.
        iterations: usize,
        /// Bin count at the last iteration.
        last_bins: usize,
        /// Width sum at the last iteration.
        last_sum: f64,
    },

    /// Invalid slicing or clustering parameter.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Per-point inputs disagree on the number of points.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Which input was the wrong length.
        what: &'static str,
        /// Number of points.
        expected: usize,
        /// Length found.
        actual: usize,
    },
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;

pub(crate) fn invalid(reason: impl Into<String>) -> SliceError {
    SliceError::InvalidParameter {
        reason: reason.into(),
    }
}

/// Check a per-point input against the point count.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> SliceResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SliceError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}
