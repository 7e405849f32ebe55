//! Skeleton node table.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A skeleton node: one branch cross-section within a slice.
///
/// The centre is the per-axis median of the member points and
/// `distance_from_base` is the mean of their distances.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonNode {
    /// Slice the cross-section belongs to.
    pub slice_id: usize,
    /// Cluster label within the slice.
    pub centre_id: usize,
    /// Unique node identifier.
    pub node_id: usize,
    /// Per-axis median of the member points.
    pub centre: Point3<f64>,
    /// Mean distance from base of the member points.
    pub distance_from_base: f64,
    /// Number of member points.
    pub n_points: usize,
}

impl SkeletonNode {
    /// X coordinate of the centre.
    #[inline]
    #[must_use]
    pub fn cx(&self) -> f64 {
        self.centre.x
    }

    /// Y coordinate of the centre.
    #[inline]
    #[must_use]
    pub fn cy(&self) -> f64 {
        self.centre.y
    }

    /// Z coordinate of the centre.
    #[inline]
    #[must_use]
    pub fn cz(&self) -> f64 {
        self.centre.z
    }
}

/// Ordered table of skeleton nodes.
///
/// Rows are kept in creation order. Node ids handed out by
/// [`NodeTable::push_node`] equal the table length at insertion, so they are
/// dense until the base merger collapses the slice-0 rows.
///
/// # Example
///
/// ```
/// use tree_types::{NodeTable, Point3};
///
/// let mut table = NodeTable::new();
/// table.push_node(0, 0, Point3::new(0.0, 0.0, 0.0), 0.01, 12);
/// table.push_node(1, 0, Point3::new(0.0, 0.0, 0.1), 0.1, 10);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.in_slice(1).count(), 1);
/// assert_eq!(table.by_node_id(1).map(|n| n.n_points), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeTable {
    nodes: Vec<SkeletonNode>,
}

impl NodeTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node and returns the id it was assigned.
    pub fn push_node(
        &mut self,
        slice_id: usize,
        centre_id: usize,
        centre: Point3<f64>,
        distance_from_base: f64,
        n_points: usize,
    ) -> usize {
        let node_id = self.nodes.len();
        self.nodes.push(SkeletonNode {
            slice_id,
            centre_id,
            node_id,
            centre,
            distance_from_base,
            n_points,
        });
        node_id
    }

    /// Appends a fully-formed node, keeping its node id as is.
    ///
    /// Used for merged rows whose id is inherited from the rows they replace.
    pub fn push_merged(&mut self, node: SkeletonNode) {
        self.nodes.push(node);
    }

    /// Removes every row of `slice_id` and returns them in table order.
    pub fn remove_slice(&mut self, slice_id: usize) -> Vec<SkeletonNode> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nodes)
            .into_iter()
            .partition(|n| n.slice_id == slice_id);
        self.nodes = kept;
        removed
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All rows in table order.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// Iterates over the rows of one slice.
    pub fn in_slice(&self, slice_id: usize) -> impl Iterator<Item = &SkeletonNode> + '_ {
        self.nodes.iter().filter(move |n| n.slice_id == slice_id)
    }

    /// Looks up a row by node id.
    #[must_use]
    pub fn by_node_id(&self, node_id: usize) -> Option<&SkeletonNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    /// Node ids in table order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.node_id).collect()
    }

    /// Total number of member points over all rows.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.nodes.iter().map(|n| n.n_points).sum()
    }

    /// Centres sorted lexicographically by (x, y, z).
    ///
    /// Cluster labels may be permuted by a different clustering
    /// implementation; comparing sorted centres is independent of that.
    #[must_use]
    pub fn canonical_centres(&self) -> Vec<[f64; 3]> {
        let mut centres: Vec<[f64; 3]> = self
            .nodes
            .iter()
            .map(|n| [n.centre.x, n.centre.y, n.centre.z])
            .collect();
        centres.sort_by(|a, b| {
            a[0].total_cmp(&b[0])
                .then(a[1].total_cmp(&b[1]))
                .then(a[2].total_cmp(&b[2]))
        });
        centres
    }
}

impl<'a> IntoIterator for &'a NodeTable {
    type Item = &'a SkeletonNode;
    type IntoIter = std::slice::Iter<'a, SkeletonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_table() -> NodeTable {
        let mut table = NodeTable::new();
        table.push_node(0, 0, Point3::new(0.0, 0.0, 0.0), 0.0, 5);
        table.push_node(0, 1, Point3::new(1.0, 0.0, 0.0), 0.01, 7);
        table.push_node(1, 0, Point3::new(0.0, 0.0, 0.1), 0.1, 10);
        table
    }

    #[test]
    fn push_assigns_dense_ids() {
        let table = sample_table();
        assert_eq!(table.node_ids(), vec![0, 1, 2]);
        assert_eq!(table.total_points(), 22);
    }

    #[test]
    fn remove_slice_keeps_other_rows_in_order() {
        let mut table = sample_table();
        let removed = table.remove_slice(0);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].node_id, 0);
        assert_eq!(removed[1].node_id, 1);
        assert_eq!(table.node_ids(), vec![2]);
    }

    #[test]
    fn push_after_merge_uses_table_length() {
        let mut table = sample_table();
        table.remove_slice(0);
        let merged = SkeletonNode {
            slice_id: 0,
            centre_id: 0,
            node_id: 0,
            centre: Point3::origin(),
            distance_from_base: 0.0,
            n_points: 12,
        };
        table.push_merged(merged);
        assert_eq!(table.node_ids(), vec![2, 0]);
        assert_eq!(table.by_node_id(0).unwrap().n_points, 12);
    }

    #[test]
    fn canonical_centres_are_sorted() {
        let mut table = NodeTable::new();
        table.push_node(0, 0, Point3::new(1.0, 0.0, 0.0), 0.0, 1);
        table.push_node(0, 1, Point3::new(0.0, 2.0, 0.0), 0.0, 1);
        table.push_node(0, 2, Point3::new(0.0, 1.0, 0.0), 0.0, 1);
        let centres = table.canonical_centres();
        assert_eq!(centres[0], [0.0, 1.0, 0.0]);
        assert_eq!(centres[1], [0.0, 2.0, 0.0]);
        assert_eq!(centres[2], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn centre_accessors() {
        let table = sample_table();
        let node = &table.nodes()[2];
        assert_relative_eq!(node.cx(), 0.0);
        assert_relative_eq!(node.cz(), 0.1);
        assert_relative_eq!(node.distance_from_base, 0.1);
    }
}
