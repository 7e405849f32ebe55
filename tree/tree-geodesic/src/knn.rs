//! k-nearest-neighbour graph construction.
//!
//! Neighbour queries run against a [`PointIndex`] R-tree, which handles the
//! shared coordinates of stem scans (whole rings at one height, straight
//! stems on one vertical line).

// Point counts stay far below u32::MAX in practice
#![allow(clippy::cast_possible_truncation)]

use rayon::prelude::*;
use tree_types::{PointIndex, TreeCloud};

use crate::adjacency::AdjacencyList;
use crate::params::GraphParams;

/// Up to `k` nearest neighbours of every point, excluding the point itself.
///
/// Lists are sorted by distance, ties broken by index, so the result does not
/// depend on the index's internal traversal order.
pub(crate) fn neighbour_lists(index: &PointIndex, coords: &[[f64; 3]], k: usize) -> Vec<Vec<(u32, f64)>> {
    coords
        .par_iter()
        .enumerate()
        .map(|(i, query)| index.nearest(query, k, Some(i)))
        .collect()
}

/// Build the symmetric neighbour graph.
///
/// Each point is linked to its `kpairs` nearest neighbours unconditionally
/// and to any other of its `knn` nearest neighbours closer than
/// `nbrs_threshold`. Edges are undirected, so a point's degree can exceed
/// `knn` when it appears in other points' lists.
#[must_use]
pub fn build_knn_graph(coords: &[[f64; 3]], params: &GraphParams) -> AdjacencyList {
    let index = PointIndex::new(coords);
    let lists = neighbour_lists(&index, coords, params.knn);
    graph_from_lists(&lists, params)
}

pub(crate) fn graph_from_lists(lists: &[Vec<(u32, f64)>], params: &GraphParams) -> AdjacencyList {
    let edges = lists.iter().enumerate().flat_map(|(i, list)| {
        list.iter()
            .enumerate()
            .filter(|&(rank, &(_, dist))| rank < params.kpairs || dist <= params.nbrs_threshold)
            .map(move |(_, &(j, dist))| (i as u32, j, dist))
    });

    AdjacencyList::from_edges(lists.len(), edges, params.min_edge_weight)
}

/// Distance from every point to its `n`-th nearest neighbour.
///
/// `n = 1` gives the nearest-neighbour spacing of the cloud, a useful guide
/// for the clustering radius. Points with fewer than `n` neighbours report
/// the distance to the farthest neighbour available, or 0 for a single point.
///
/// # Example
///
/// ```
/// use tree_geodesic::nearest_neighbour_distances;
/// use tree_types::TreeCloud;
///
/// let cloud = TreeCloud::from_coords(&[[0.0, 0.0, 0.0], [0.0, 0.0, 0.5], [0.0, 0.0, 2.0]]);
/// let spacing = nearest_neighbour_distances(&cloud, 1);
/// assert!((spacing[0] - 0.5).abs() < 1e-12);
/// assert!((spacing[2] - 1.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn nearest_neighbour_distances(cloud: &TreeCloud, n: usize) -> Vec<f64> {
    if cloud.is_empty() {
        return Vec::new();
    }
    let coords: Vec<[f64; 3]> = cloud.points.iter().map(tree_types::CloudPoint::coords).collect();
    let index = PointIndex::new(&coords);
    let n = n.max(1);

    neighbour_lists(&index, &coords, n)
        .into_iter()
        .map(|list| list.last().map_or(0.0, |&(_, d)| d))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<[f64; 3]> {
        (0..n).map(|i| [0.0, 0.0, i as f64 * spacing]).collect()
    }

    #[test]
    fn neighbour_lists_exclude_self_and_sort() {
        let coords = line(5, 1.0);
        let index = PointIndex::new(&coords);
        let lists = neighbour_lists(&index, &coords, 2);

        assert_eq!(lists[0], vec![(1, 1.0), (2, 2.0)]);
        // Ties at distance 1.0 resolved by index
        assert_eq!(lists[2], vec![(1, 1.0), (3, 1.0)]);
    }

    #[test]
    fn collinear_stem_graph() {
        // 400 points on one vertical line
        let coords = line(400, 0.01);
        let params = GraphParams::default().with_knn(10);
        let graph = build_knn_graph(&coords, &params);

        assert_eq!(graph.vertex_count(), 400);
        assert!(graph.degree(0) >= 3);
        assert!((1..400).all(|i| graph.has_edge(i - 1, i)));
    }

    #[test]
    fn ring_stem_graph() {
        // 100 rings of 12 points, each ring at one height
        let mut coords = Vec::with_capacity(1200);
        for ring in 0..100 {
            for k in 0..12 {
                let a = k as f64 * std::f64::consts::TAU / 12.0;
                coords.push([0.03 * a.cos(), 0.03 * a.sin(), ring as f64 * 0.01]);
            }
        }
        let graph = build_knn_graph(&coords, &GraphParams::default());

        assert_eq!(graph.vertex_count(), 1200);
        // Every point links to the point straight above it
        assert!((0..1188).all(|i| graph.has_edge(i, i + 12)));
    }

    #[test]
    fn threshold_limits_far_edges() {
        // Two pairs far apart: kpairs = 1 keeps only the nearest link
        let coords = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.1], [0.0, 0.0, 5.0], [0.0, 0.0, 5.1]];
        let params = GraphParams::default()
            .with_knn(3)
            .with_kpairs(1)
            .with_threshold(0.2, 0.1);
        let graph = build_knn_graph(&coords, &params);

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(2, 3));
        assert!(!graph.has_edge(1, 2));
    }

    #[test]
    fn kpairs_edges_ignore_threshold() {
        let coords = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 3.0], [0.0, 0.0, 7.0]];
        let params = GraphParams::default()
            .with_knn(2)
            .with_kpairs(1)
            .with_threshold(0.1, 0.1);
        let graph = build_knn_graph(&coords, &params);

        // Every point keeps its nearest neighbour
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn duplicate_points_get_positive_weight() {
        let coords = vec![[0.0; 3], [0.0; 3], [0.0, 0.0, 1.0]];
        let graph = build_knn_graph(&coords, &GraphParams::default().with_knn(2).with_kpairs(1));
        assert!(graph.has_edge(0, 1));
        assert!(graph.neighbors(0).iter().all(|&(_, w)| w > 0.0));
    }

    #[test]
    fn nn_distances_single_point() {
        let cloud = TreeCloud::from_coords(&[[1.0, 2.0, 3.0]]);
        assert_eq!(nearest_neighbour_distances(&cloud, 1), vec![0.0]);
        assert!(nearest_neighbour_distances(&TreeCloud::new(), 1).is_empty());
    }
}
