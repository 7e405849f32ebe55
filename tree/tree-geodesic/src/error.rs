//! Error types for distance field computation.

use std::fmt;

use thiserror::Error;

/// Result type for distance field operations.
pub type GeodesicResult<T> = Result<T, GeodesicError>;

/// Why a base location was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLocationIssue {
    /// The index is past the end of the cloud.
    OutOfRange {
        /// Number of points in the cloud.
        point_count: usize,
    },
    /// The point exists but was not kept by the downsampler, so it is not a
    /// node of the distance graph.
    NotInGraph,
}

impl fmt::Display for BaseLocationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { point_count } => {
                write!(f, "cloud has {point_count} points")
            }
            Self::NotInGraph => write!(f, "point is not a downsampled representative"),
        }
    }
}

/// Errors that can occur while building the distance field.
#[derive(Debug, Error)]
pub enum GeodesicError {
    /// The cloud (or its downsampled subset) has no points.
    #[error("point cloud is empty")]
    EmptyCloud,

    /// The requested base point cannot be used.
    #[error("invalid base location {index}: {issue}")]
    InvalidBaseLocation {
        /// The rejected index.
        index: usize,
        /// Why it was rejected.
        issue: BaseLocationIssue,
    },

    /// Some points stayed unreachable after the repair budget ran out.
    #[error(
        "graph is disconnected: {} points unreachable from base after {iterations} repair iterations",
        unreachable.len()
    )]
    DisconnectedGraph {
        /// Cloud indices of the unreachable points.
        unreachable: Vec<usize>,
        /// Repair iterations spent before giving up.
        iterations: usize,
    },

    /// Invalid graph parameter.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeodesicError::EmptyCloud;
        assert_eq!(format!("{err}"), "point cloud is empty");

        let err = GeodesicError::InvalidBaseLocation {
            index: 12,
            issue: BaseLocationIssue::OutOfRange { point_count: 10 },
        };
        assert_eq!(
            format!("{err}"),
            "invalid base location 12: cloud has 10 points"
        );

        let err = GeodesicError::DisconnectedGraph {
            unreachable: vec![4, 5],
            iterations: 50,
        };
        assert!(format!("{err}").contains("2 points unreachable"));
    }
}
