//! R-tree point index for neighbour queries.
//!
//! Tree scans put many points on one coordinate: a stem sampled in rings
//! shares a z value per ring, and a straight stem shares x and y along its
//! whole length. The R-tree partitions by point count rather than by
//! coordinate, so these layouts build and query like any other cloud.

// Point indices are stored as u32
#![allow(clippy::cast_possible_truncation)]

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A point stored in the index with its position in the source slice.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    index: u32,
    coords: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.coords[0] - point[0];
        let dy = self.coords[1] - point[1];
        let dz = self.coords[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index over a fixed slice of coordinates.
///
/// Query results name points by their index in the slice the index was
/// built from.
///
/// # Example
///
/// ```
/// use tree_types::PointIndex;
///
/// // A straight stem: every point shares x and y
/// let coords: Vec<[f64; 3]> = (0..100).map(|i| [0.0, 0.0, f64::from(i)]).collect();
/// let index = PointIndex::new(&coords);
///
/// let near = index.nearest(&coords[50], 2, Some(50));
/// assert_eq!(near, vec![(49, 1.0), (51, 1.0)]);
/// assert_eq!(index.within_radius(&coords[0], 2.5).len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-load an index over `coords`.
    #[must_use]
    pub fn new(coords: &[[f64; 3]]) -> Self {
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, &coords)| IndexedPoint { index: i as u32, coords })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if no points are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The `k` points nearest to `query` as `(index, distance)` pairs.
    ///
    /// `exclude` drops one index from the result, normally the query point
    /// itself. Results are sorted by distance with ties broken by index, and
    /// points tied with the k-th distance are resolved the same way, so the
    /// answer does not depend on the tree's traversal order.
    #[must_use]
    pub fn nearest(&self, query: &[f64; 3], k: usize, exclude: Option<usize>) -> Vec<(u32, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut found: Vec<(u32, f64)> = Vec::with_capacity(k + 1);
        let mut cutoff = None;

        for (point, dist_sq) in self.tree.nearest_neighbor_iter_with_distance_2(query) {
            if exclude == Some(point.index as usize) {
                continue;
            }
            match cutoff {
                Some(limit) if dist_sq > limit => break,
                _ => {}
            }
            found.push((point.index, dist_sq));
            if found.len() == k {
                cutoff = Some(dist_sq);
            }
        }

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found.truncate(k);
        found.into_iter().map(|(i, d)| (i, d.sqrt())).collect()
    }

    /// Every point within `radius` of `query`, inclusive, as
    /// `(index, distance)` pairs in no particular order.
    #[must_use]
    pub fn within_radius(&self, query: &[f64; 3], radius: f64) -> Vec<(u32, f64)> {
        self.tree
            .locate_within_distance(*query, radius * radius)
            .map(|point| (point.index, point.distance_2(query).sqrt()))
            .collect()
    }
}
