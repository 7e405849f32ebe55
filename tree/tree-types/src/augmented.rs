//! Per-point attributes written by the skeleton pipeline.

use crate::point::TreeCloud;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attributes assigned to a single point.
///
/// Every field is `None` until the stage that computes it has run, and stays
/// `None` when that stage excluded the point (unreachable from the base,
/// member of an undersized slice or cluster).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointAttributes {
    /// Shortest-path distance from the base point.
    pub distance_from_base: Option<f64>,
    /// Distance divided by the maximum distance in the cloud.
    pub normalised_distance: Option<f64>,
    /// Slice the point falls into.
    pub slice_id: Option<usize>,
    /// Cluster label within the slice.
    pub centre_id: Option<usize>,
    /// Skeleton node the point belongs to.
    pub node_id: Option<usize>,
}

/// A copy of the input cloud together with its per-point attributes.
///
/// # Example
///
/// ```
/// use tree_types::{AugmentedCloud, TreeCloud};
///
/// let cloud = TreeCloud::from_coords(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
/// let augmented = AugmentedCloud::new(cloud);
/// assert_eq!(augmented.len(), 2);
/// assert!(augmented.attributes(0).and_then(|a| a.slice_id).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AugmentedCloud {
    /// The input cloud.
    pub cloud: TreeCloud,
    /// Attributes, one per point of `cloud`.
    pub attributes: Vec<PointAttributes>,
}

impl AugmentedCloud {
    /// Wraps a cloud with empty attributes.
    #[must_use]
    pub fn new(cloud: TreeCloud) -> Self {
        let attributes = vec![PointAttributes::default(); cloud.len()];
        Self { cloud, attributes }
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if there are no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes of the point at `index`.
    #[must_use]
    pub fn attributes(&self, index: usize) -> Option<&PointAttributes> {
        self.attributes.get(index)
    }

    /// Distance from base of every point.
    #[must_use]
    pub fn distances(&self) -> Vec<Option<f64>> {
        self.attributes.iter().map(|a| a.distance_from_base).collect()
    }

    /// Slice id of every point.
    #[must_use]
    pub fn slice_ids(&self) -> Vec<Option<usize>> {
        self.attributes.iter().map(|a| a.slice_id).collect()
    }

    /// Node id of every point.
    #[must_use]
    pub fn node_ids(&self) -> Vec<Option<usize>> {
        self.attributes.iter().map(|a| a.node_id).collect()
    }

    /// Indices of the points assigned to `node_id`.
    #[must_use]
    pub fn members_of(&self, node_id: usize) -> Vec<usize> {
        self.attributes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.node_id == Some(node_id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of points that ended up without a node.
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.attributes.iter().filter(|a| a.node_id.is_none()).count()
    }
}
