//! Distance graph parameters and presets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeodesicError, GeodesicResult};

/// What to do with points the base still cannot reach once the repair budget
/// is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectivityPolicy {
    /// Abort with [`GeodesicError::DisconnectedGraph`] listing the points.
    #[default]
    Fail,
    /// Log a warning and leave the points without a distance; they are
    /// excluded from slicing.
    Exclude,
}

/// Parameters for building the neighbour graph.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphParams {
    /// Neighbours queried per point.
    pub knn: usize,

    /// Nearest neighbours always linked regardless of the distance threshold,
    /// and bridging edges added per component during repair.
    pub kpairs: usize,

    /// Initial neighbour-distance threshold.
    pub nbrs_threshold: f64,

    /// Amount the threshold is widened by per repair iteration.
    pub nbrs_threshold_step: f64,

    /// Repair iterations before giving up on connectivity.
    pub max_repair_iterations: usize,

    /// Lower bound on edge weights so coincident points never form
    /// zero-weight cycles.
    pub min_edge_weight: f64,

    /// Handling of points left unreachable.
    pub connectivity: ConnectivityPolicy,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            knn: 100,
            kpairs: 3,
            nbrs_threshold: 0.2,
            nbrs_threshold_step: 0.1,
            max_repair_iterations: 50,
            min_edge_weight: 1e-9,
            connectivity: ConnectivityPolicy::Fail,
        }
    }
}

impl GraphParams {
    /// Parameters for sparse or small clouds.
    ///
    /// Fewer neighbours per point and a tighter threshold.
    #[must_use]
    pub fn sparse() -> Self {
        Self {
            knn: 20,
            nbrs_threshold: 0.1,
            nbrs_threshold_step: 0.05,
            ..Default::default()
        }
    }

    /// Set the neighbour count.
    #[must_use]
    pub const fn with_knn(mut self, knn: usize) -> Self {
        self.knn = knn;
        self
    }

    /// Set the redundancy count.
    #[must_use]
    pub const fn with_kpairs(mut self, kpairs: usize) -> Self {
        self.kpairs = kpairs;
        self
    }

    /// Set the initial threshold and its relaxation step.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64, step: f64) -> Self {
        self.nbrs_threshold = threshold;
        self.nbrs_threshold_step = step;
        self
    }

    /// Set the repair budget.
    #[must_use]
    pub const fn with_max_repair_iterations(mut self, iterations: usize) -> Self {
        self.max_repair_iterations = iterations;
        self
    }

    /// Set the connectivity policy.
    #[must_use]
    pub const fn with_connectivity(mut self, policy: ConnectivityPolicy) -> Self {
        self.connectivity = policy;
        self
    }

    /// Check that the parameters describe a buildable graph.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidParameter`] if a count is zero, if
    /// `kpairs > knn`, or if a distance is negative or not finite.
    pub fn validate(&self) -> GeodesicResult<()> {
        if self.knn == 0 {
            return Err(invalid("knn must be at least 1"));
        }
        if self.kpairs == 0 || self.kpairs > self.knn {
            return Err(invalid(format!(
                "kpairs must be in 1..={} (got {})",
                self.knn, self.kpairs
            )));
        }
        if !self.nbrs_threshold.is_finite() || self.nbrs_threshold < 0.0 {
            return Err(invalid(format!(
                "nbrs_threshold must be finite and >= 0 (got {})",
                self.nbrs_threshold
            )));
        }
        if !self.nbrs_threshold_step.is_finite() || self.nbrs_threshold_step <= 0.0 {
            return Err(invalid(format!(
                "nbrs_threshold_step must be finite and > 0 (got {})",
                self.nbrs_threshold_step
            )));
        }
        if !self.min_edge_weight.is_finite() || self.min_edge_weight <= 0.0 {
            return Err(invalid(format!(
                "min_edge_weight must be finite and > 0 (got {})",
                self.min_edge_weight
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> GeodesicError {
    GeodesicError::InvalidParameter {
        reason: reason.into(),
    }
}
