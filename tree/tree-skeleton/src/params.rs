//! Pipeline parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tree_geodesic::{ConnectivityPolicy, GraphParams};
use tree_slice::{BinParams, ClusterParams};

use crate::error::{SkeletonError, SkeletonResult};

/// Parameters for a full skeleton run.
///
/// # Example
///
/// ```
/// use tree_skeleton::SkeletonParams;
///
/// let params = SkeletonParams::default().with_base(12).with_min_pts(5);
/// assert_eq!(params.base_location, Some(12));
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonParams {
    /// Neighbour graph and connectivity repair.
    pub graph: GraphParams,

    /// Slice width schedule.
    pub bins: BinParams,

    /// Per-slice clustering.
    pub cluster: ClusterParams,

    /// Index of the base point; the lowest point when `None`.
    pub base_location: Option<usize>,
}

impl SkeletonParams {
    /// Parameters for sparse or downsampled scans.
    ///
    /// Fewer neighbours, coarser slices and a wider clustering radius.
    #[must_use]
    pub fn sparse() -> Self {
        Self {
            graph: GraphParams::sparse(),
            bins: BinParams::coarse(),
            cluster: ClusterParams::default().with_eps(0.05).with_min_pts(5),
            base_location: None,
        }
    }

    /// Set the base point.
    #[must_use]
    pub const fn with_base(mut self, index: usize) -> Self {
        self.base_location = Some(index);
        self
    }

    /// Set the fixed clustering radius.
    #[must_use]
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.cluster = self.cluster.with_eps(eps);
        self
    }

    /// Set the minimum slice and cluster size.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.cluster = self.cluster.with_min_pts(min_pts);
        self
    }

    /// Set the slice width range.
    #[must_use]
    pub fn with_bin_widths(mut self, minbin: f64, maxbin: f64) -> Self {
        self.bins = self.bins.with_widths(minbin, maxbin);
        self
    }

    /// Set how unreachable points are handled.
    #[must_use]
    pub fn with_connectivity(mut self, policy: ConnectivityPolicy) -> Self {
        self.graph = self.graph.with_connectivity(policy);
        self
    }

    /// Replace the graph parameters.
    #[must_use]
    pub fn with_graph(mut self, graph: GraphParams) -> Self {
        self.graph = graph;
        self
    }

    /// Check every parameter group.
    ///
    /// # Errors
    ///
    /// Returns [`SkeletonError::InvalidParams`] naming the first group that
    /// fails its own validation.
    pub fn validate(&self) -> SkeletonResult<()> {
        self.graph
            .validate()
            .map_err(|e| rejected("graph", &e))?;
        self.bins.validate().map_err(|e| rejected("bin", &e))?;
        self.cluster
            .validate()
            .map_err(|e| rejected("cluster", &e))?;
        Ok(())
    }
}

fn rejected(section: &'static str, err: &dyn std::error::Error) -> SkeletonError {
    SkeletonError::InvalidParams {
        section,
        reason: err.to_string(),
    }
}
