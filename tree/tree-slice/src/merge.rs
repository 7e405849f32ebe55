//! Collapse multiple base nodes into one root.
//!
//! Buttresses, root flare and low forks can split the first slice into
//! several clusters. A skeleton has a single origin, so the slice-0 rows are
//! replaced by their point-weighted average.

use tracing::debug;
use tree_types::{NodeTable, Point3, SkeletonNode};

/// Result of [`merge_base_nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The table with at most one slice-0 row.
    pub table: NodeTable,
    /// Node ids of the rows that were replaced; empty if nothing merged.
    ///
    /// The merged row carries the smallest of them.
    pub merged_ids: Vec<usize>,
}

impl MergeOutcome {
    /// Id of the merged root, if a merge happened.
    #[must_use]
    pub fn root_id(&self) -> Option<usize> {
        self.merged_ids.iter().copied().min()
    }

    /// Id a point labelled with `node_id` should carry after the merge.
    #[must_use]
    pub fn remap(&self, node_id: usize) -> usize {
        match self.root_id() {
            Some(root) if self.merged_ids.contains(&node_id) => root,
            _ => node_id,
        }
    }
}

/// Merge all slice-0 rows into one.
///
/// With two or more slice-0 rows, they are removed and a single row is
/// appended at the end of the table: centre and distance are averages
/// weighted by `n_points`, `n_points` is their sum, `centre_id` is 0 and
/// `node_id` is the smallest id among the merged rows. Ids are not
/// renumbered, so the id sequence has gaps afterwards.
///
/// # Example
///
/// ```
/// use tree_slice::merge_base_nodes;
/// use tree_types::{NodeTable, Point3};
///
/// let mut table = NodeTable::new();
/// table.push_node(0, 0, Point3::new(0.0, 0.0, 0.0), 0.0, 10);
/// table.push_node(0, 1, Point3::new(3.0, 0.0, 0.0), 0.0, 20);
/// table.push_node(1, 0, Point3::new(2.0, 0.0, 1.0), 1.0, 15);
///
/// let outcome = merge_base_nodes(table);
/// assert_eq!(outcome.table.len(), 2);
///
/// let root = outcome.table.nodes().last().unwrap();
/// assert_eq!(root.node_id, 0);
/// assert!((root.cx() - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn merge_base_nodes(mut table: NodeTable) -> MergeOutcome {
    if table.in_slice(0).count() < 2 {
        return MergeOutcome {
            table,
            merged_ids: Vec::new(),
        };
    }

    let rows = table.remove_slice(0);
    let merged = weighted_root(&rows);
    let merged_ids: Vec<usize> = rows.iter().map(|n| n.node_id).collect();

    debug!(
        rows = rows.len(),
        root = merged.node_id,
        n_points = merged.n_points,
        "Merged base nodes"
    );

    table.push_merged(merged);
    MergeOutcome { table, merged_ids }
}

// Point counts fit in f64 exactly for any realistic cloud
#[allow(clippy::cast_precision_loss)]
fn weighted_root(rows: &[SkeletonNode]) -> SkeletonNode {
    let n_points: usize = rows.iter().map(|n| n.n_points).sum();
    let total = n_points as f64;
    let weight = |n: &SkeletonNode| {
        if total > 0.0 {
            n.n_points as f64 / total
        } else {
            1.0 / rows.len() as f64
        }
    };

    let mut centre = Point3::origin();
    let mut distance = 0.0;
    for row in rows {
        let w = weight(row);
        centre.coords += row.centre.coords * w;
        distance += row.distance_from_base * w;
    }

    SkeletonNode {
        slice_id: 0,
        centre_id: 0,
        node_id: rows.iter().map(|n| n.node_id).min().unwrap_or(0),
        centre,
        distance_from_base: distance,
        n_points,
    }
}
