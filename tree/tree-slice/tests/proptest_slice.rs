//! Property-based tests for slicing, clustering and merging.
//!
//! Run with: cargo test -p tree-slice -- proptest

use proptest::prelude::*;
use tree_slice::{
    assign_slices, cluster_slices, merge_base_nodes, schedule_bins, BinParams, BinSchedule,
    ChebyshevDbscan, ClusterParams, SliceClustering, SliceError,
};
use tree_types::{NodeTable, Point3};

// =============================================================================
// Strategies
// =============================================================================

/// Valid bin parameters with a width ratio of at most 10.
fn arb_bin_params() -> impl Strategy<Value = BinParams> {
    (0.005..0.05f64, 1.0..10.0f64, 0.0..4.0f64).prop_map(|(minbin, ratio, exponent)| {
        BinParams::default()
            .with_widths(minbin, minbin * ratio)
            .with_exponent(exponent)
    })
}

/// Points scattered in a small box.
fn arb_points(max: usize) -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec(prop::array::uniform3(0.0..0.5f64), 1..max)
        .prop_map(|v| v.into_iter().map(|[x, y, z]| Point3::new(x, y, z)).collect())
}

fn arb_table() -> impl Strategy<Value = NodeTable> {
    prop::collection::vec((0..4usize, prop::array::uniform3(-1.0..1.0f64), 1..50usize), 0..12)
        .prop_map(|rows| {
            let mut table = NodeTable::new();
            for (slice, [x, y, z], n) in rows {
                table.push_node(slice, 0, Point3::new(x, y, z), z.abs(), n);
            }
            table
        })
}

// =============================================================================
// Property Tests: Schedule
// =============================================================================

proptest! {
    /// A converged schedule covers the distance within the 5% window and
    /// keeps every width inside the configured range.
    #[test]
    fn schedule_sum_in_window(params in arb_bin_params(), max_distance in 0.5..5.0f64) {
        match schedule_bins(max_distance, &params) {
            Ok(schedule) => {
                prop_assert!(schedule.total() >= max_distance);
                prop_assert!(schedule.total() < max_distance * 1.05);
                for &w in schedule.widths() {
                    prop_assert!(w >= params.minbin - 1e-12 && w <= params.maxbin + 1e-12);
                }
                prop_assert!(schedule.iterations() <= params.max_iterations);
            }
            Err(SliceError::DegenerateBinning { iterations, .. }) => {
                prop_assert!(iterations <= params.max_iterations);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// Widths never grow away from the base for a positive exponent.
    #[test]
    fn schedule_widths_non_increasing(params in arb_bin_params(), max_distance in 0.5..5.0f64) {
        if let Ok(schedule) = schedule_bins(max_distance, &params) {
            prop_assert!(schedule.widths().windows(2).all(|w| w[0] >= w[1] - 1e-15));
        }
    }

    /// Larger distances never land in earlier slices.
    #[test]
    fn slice_ids_monotone(
        widths in prop::collection::vec(0.01..1.0f64, 1..40),
        distances in prop::collection::vec(0.0..30.0f64, 1..100),
    ) {
        let schedule = BinSchedule::from_widths(widths);
        let mut distances = distances;
        distances.sort_by(f64::total_cmp);
        let ids = assign_slices(&distances.iter().map(|&d| Some(d)).collect::<Vec<_>>(), &schedule);
        let ids: Vec<usize> = ids.into_iter().flatten().collect();
        prop_assert!(ids.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(ids.iter().all(|&s| s <= schedule.len()));
    }
}

// =============================================================================
// Property Tests: Clustering
// =============================================================================

proptest! {
    /// Every accepted node has at least min_pts members, and exactly its
    /// members carry its node id.
    #[test]
    fn accepted_clusters_respect_min_pts(
        points in arb_points(120),
        eps in 0.01..0.2f64,
        min_pts in 1..8usize,
    ) {
        let n = points.len();
        let distances: Vec<Option<f64>> = points.iter().map(|p| Some(p.z)).collect();
        let schedule = BinSchedule::from_widths(vec![0.1; 5]);
        let slices = assign_slices(&distances, &schedule);
        let params = ClusterParams::default().with_eps(eps).with_min_pts(min_pts);

        let out = cluster_slices(&points, &distances, &slices, &schedule, &params, &ChebyshevDbscan).unwrap();

        prop_assert_eq!(out.node_ids.len(), n);
        for node in &out.table {
            prop_assert!(node.n_points >= min_pts);
            let members = out.node_ids.iter().filter(|&&id| id == Some(node.node_id)).count();
            prop_assert_eq!(members, node.n_points);
        }
        // Node ids equal row positions before merging
        let ids = out.table.node_ids();
        prop_assert_eq!(ids, (0..out.table.len()).collect::<Vec<_>>());
    }

    /// Same input, same labels.
    #[test]
    fn dbscan_is_deterministic(points in arb_points(80), eps in 0.01..0.2f64) {
        let a = ChebyshevDbscan.labels(&points, eps);
        let b = ChebyshevDbscan.labels(&points, eps);
        prop_assert_eq!(&a, &b);
        // Labels are dense and first appear in increasing order
        let mut next = 0;
        for &label in &a {
            prop_assert!(label <= next);
            if label == next {
                next += 1;
            }
        }
    }

    /// Points in different labels are farther apart than eps on some axis.
    #[test]
    fn dbscan_separates_by_chebyshev(points in arb_points(60), eps in 0.01..0.2f64) {
        let labels = ChebyshevDbscan.labels(&points, eps);
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d = (points[i] - points[j]).abs().max();
                if d <= eps {
                    prop_assert_eq!(labels[i], labels[j]);
                }
            }
        }
    }
}

// =============================================================================
// Property Tests: Merging
// =============================================================================

proptest! {
    /// After merging there is at most one slice-0 row and no points are lost.
    #[test]
    fn merge_leaves_single_root(table in arb_table()) {
        let before = table.total_points();
        let base_rows = table.in_slice(0).count();
        let outcome = merge_base_nodes(table);

        prop_assert!(outcome.table.in_slice(0).count() <= 1);
        prop_assert_eq!(outcome.table.total_points(), before);
        if base_rows > 1 {
            prop_assert_eq!(outcome.merged_ids.len(), base_rows);
            let root = outcome.table.nodes().last().map(|n| n.node_id);
            prop_assert_eq!(root, outcome.root_id());
        }
    }
}
