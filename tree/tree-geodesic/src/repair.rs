//! Connectivity repair for the neighbour graph.
//!
//! Scans rarely produce a single connected neighbour graph: occlusion leaves
//! gaps along branches and the threshold cuts thin twigs loose. Repair widens
//! the neighbour threshold step by step and bridges every component that
//! cannot reach the base to its nearest foreign points.

// Graph-local indices are u32
#![allow(clippy::cast_possible_truncation)]

use rayon::prelude::*;
use tracing::debug;
use tree_types::PointIndex;

use crate::adjacency::AdjacencyList;
use crate::components::UnionFind;
use crate::params::GraphParams;

/// Summary of the repair loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairReport {
    /// Threshold-widening iterations performed.
    pub iterations: usize,
    /// Bridging edges added to the graph.
    pub bridges_added: usize,
    /// Threshold in effect when the loop stopped.
    pub final_threshold: f64,
    /// Components in the graph before repair.
    pub initial_components: usize,
    /// Components left after repair.
    pub final_components: usize,
}

impl RepairReport {
    /// Returns true if the graph needed no repair.
    #[must_use]
    pub const fn was_connected(&self) -> bool {
        self.initial_components <= 1
    }
}

/// Bridge components until the base's component covers the whole graph or
/// the iteration budget runs out.
///
/// Each iteration widens the threshold by `nbrs_threshold_step`, then for
/// every component without the base picks its `kpairs` shortest edges of
/// length at most the threshold to points outside it. Candidates come from
/// the precomputed neighbour lists first; a component whose lists never leave
/// it falls back to radius queries on the point index.
pub(crate) fn repair_connectivity(
    graph: &mut AdjacencyList,
    index: &PointIndex,
    coords: &[[f64; 3]],
    lists: &[Vec<(u32, f64)>],
    base: usize,
    params: &GraphParams,
) -> RepairReport {
    let total = coords.len();
    let mut uf = UnionFind::from_graph(graph);
    let mut report = RepairReport {
        iterations: 0,
        bridges_added: 0,
        final_threshold: params.nbrs_threshold,
        initial_components: uf.count(),
        final_components: 0,
    };

    while uf.set_size(base) < total && report.iterations < params.max_repair_iterations {
        report.iterations += 1;
        report.final_threshold += params.nbrs_threshold_step;
        let threshold = report.final_threshold;

        let roots = uf.roots();
        let base_root = roots[base];
        let mut detached: Vec<Vec<usize>> = uf
            .groups()
            .into_iter()
            .filter(|(root, _)| *root != base_root)
            .map(|(_, members)| members)
            .collect();
        // Group order from the hash map is arbitrary
        detached.sort_unstable_by_key(|members| members[0]);

        let bridges: Vec<(f64, u32, u32)> = detached
            .par_iter()
            .flat_map_iter(|members| {
                shortest_bridges(members, &roots, index, coords, lists, threshold, params.kpairs)
            })
            .collect();

        let mut added = 0;
        for (length, a, b) in bridges {
            if graph.add_edge(a, b, length) {
                added += 1;
            }
            uf.union(a as usize, b as usize);
        }
        report.bridges_added += added;

        debug!(
            iteration = report.iterations,
            threshold = format!("{threshold:.3}"),
            detached = detached.len(),
            bridges = added,
            "Connectivity repair iteration"
        );
    }

    report.final_components = uf.count();
    report
}

/// Up to `kpairs` shortest edges leaving one component.
fn shortest_bridges(
    members: &[usize],
    roots: &[usize],
    index: &PointIndex,
    coords: &[[f64; 3]],
    lists: &[Vec<(u32, f64)>],
    threshold: f64,
    kpairs: usize,
) -> Vec<(f64, u32, u32)> {
    let own_root = roots[members[0]];

    let mut candidates: Vec<(f64, u32, u32)> = members
        .iter()
        .flat_map(|&i| {
            lists[i]
                .iter()
                .filter(|&&(j, d)| roots[j as usize] != own_root && d <= threshold)
                .map(move |&(j, d)| (d, i as u32, j))
        })
        .collect();

    if candidates.is_empty() {
        candidates = members
            .iter()
            .flat_map(|&i| {
                index
                    .within_radius(&coords[i], threshold)
                    .into_iter()
                    .filter(|&(j, _)| roots[j as usize] != own_root)
                    .map(move |(j, d)| (d, i as u32, j))
            })
            .collect();
    }

    candidates.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });
    candidates.truncate(kpairs);
    candidates
}
