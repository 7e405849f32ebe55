//! Graph shortest-path distance from the base of a tree point cloud.
//!
//! This crate builds the distance field the skeleton pipeline slices on:
//!
//! - **Neighbour graph** - R-tree k-nearest-neighbour edges, kept when short
//!   or among each point's closest few
//! - **Connectivity repair** - widens the neighbour threshold and bridges
//!   components that cannot reach the base
//! - **Dijkstra's algorithm** - single-source distances and predecessors
//! - **Voxel join** - points dropped by a downsampler inherit the distance of
//!   their voxel's representative
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Algorithm
//!
//! Edge weights are Euclidean distances between points, clamped to a small
//! positive minimum so coincident points never share a zero-length edge. The
//! distance of a point is therefore the length of the shortest hop path
//! through the cloud, which follows branches instead of cutting through air.
//!
//! # Example
//!
//! ```
//! use tree_geodesic::{compute_distance_field, GraphParams};
//! use tree_types::TreeCloud;
//!
//! // An L-shaped stem: up one metre, then sideways
//! let mut coords: Vec<[f64; 3]> = (0..=10).map(|i| [0.0, 0.0, f64::from(i) * 0.1]).collect();
//! coords.extend((1..=10).map(|i| [f64::from(i) * 0.1, 0.0, 1.0]));
//! let cloud = TreeCloud::from_coords(&coords);
//!
//! let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();
//!
//! // The tip is two metres away along the stem, not sqrt(2) through the air
//! assert!((output.field.distance(20) - 2.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod builder;
mod components;
mod dijkstra;
mod distance;
mod error;
mod knn;
mod params;
mod repair;

pub use adjacency::AdjacencyList;
pub use builder::{compute_distance_field, DistanceOutput};
pub use components::UnionFind;
pub use dijkstra::{GeodesicSolver, ShortestPathTree, ShortestPaths};
pub use distance::DistanceField;
pub use error::{BaseLocationIssue, GeodesicError, GeodesicResult};
pub use knn::{build_knn_graph, nearest_neighbour_distances};
pub use params::{ConnectivityPolicy, GraphParams};
pub use repair::RepairReport;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use tree_types::{Point3, TreeCloud};

    /// A stem with two side branches.
    fn forked_tree() -> TreeCloud {
        let mut points: Vec<Point3<f64>> = (0..=20)
            .map(|i| Point3::new(0.0, 0.0, i as f64 * 0.05))
            .collect();
        points.extend((1..=10).map(|i| Point3::new(i as f64 * 0.05, 0.0, 1.0 + i as f64 * 0.05)));
        points.extend((1..=10).map(|i| Point3::new(-(i as f64) * 0.05, 0.0, 1.0 + i as f64 * 0.05)));
        points.into_iter().collect()
    }

    #[test]
    fn branches_are_symmetric() {
        let cloud = forked_tree();
        let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();

        let left = output.field.distance(30);
        let right = output.field.distance(40);
        assert!((left - right).abs() < 1e-9);
        assert!(left > 1.0);
    }

    #[test]
    fn distances_are_non_negative_and_base_is_zero() {
        let cloud = forked_tree();
        let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();

        assert!(output.field.distance(output.base_index).abs() < f64::EPSILON);
        assert!(output.field.iter().all(|(_, d)| d >= 0.0));
        assert_eq!(output.field.reachable_count(), cloud.len());
    }

    #[test]
    fn normalised_field_tops_out_at_one() {
        let cloud = forked_tree();
        let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();
        let norm = output.normalised();

        let (_, top) = norm.farthest_point().unwrap();
        assert!((top - 1.0).abs() < 1e-12);
    }

    #[test]
    fn settle_order_matches_distances() {
        let cloud = forked_tree();
        let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();
        let d: Vec<f64> = output.order.iter().map(|&i| output.field.distance(i)).collect();
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }
}
