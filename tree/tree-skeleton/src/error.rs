//! Error types for the skeleton pipeline.

use thiserror::Error;
use tree_geodesic::GeodesicError;
use tree_slice::SliceError;

use crate::pipeline::PipelineStage;

/// Errors that can stop the pipeline.
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// Parameter validation failed before any work started.
    #[error("invalid {section} parameters: {reason}")]
    InvalidParams {
        /// Which parameter group was rejected.
        section: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The distance field could not be built.
    #[error("distance field: {0}")]
    Geodesic(#[from] GeodesicError),

    /// Slicing or clustering failed.
    #[error("slicing: {0}")]
    Slice(#[from] SliceError),
}

impl SkeletonError {
    /// The last stage the pipeline completed before failing.
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        match self {
            Self::InvalidParams { .. } | Self::Geodesic(_) => PipelineStage::Initialized,
            Self::Slice(SliceError::DegenerateBinning { .. }) => PipelineStage::DistanceComputed,
            Self::Slice(_) => PipelineStage::Sliced,
        }
    }
}

/// Result type for pipeline operations.
pub type SkeletonResult<T> = std::result::Result<T, SkeletonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_stage() {
        let err = SkeletonError::from(GeodesicError::EmptyCloud);
        assert_eq!(format!("{err}"), "distance field: point cloud is empty");
        assert_eq!(err.stage(), PipelineStage::Initialized);

        let err = SkeletonError::from(SliceError::DegenerateBinning {
            max_distance: 0.01,
            iterations: 50,
            last_bins: 1,
            last_sum: 0.02,
        });
        assert!(format!("{err}").starts_with("slicing: "));
        assert_eq!(err.stage(), PipelineStage::DistanceComputed);
    }
}
