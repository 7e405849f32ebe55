//! Per-slice clustering into branch cross-sections.
//!
//! Each slice of the distance field is split into spatially separate groups,
//! one per branch crossing it. Every group with enough points becomes a
//! skeleton node at the per-axis median of its members.

// Cluster and point counts are small; index items are point indices
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use rayon::prelude::*;
use tracing::{debug, info};
use tree_types::{NodeTable, Point3, PointIndex};

use crate::error::{check_len, SliceResult};
use crate::params::ClusterParams;
use crate::schedule::BinSchedule;

/// Splits the points of one slice into clusters.
///
/// Implementations must label every point and number clusters densely from
/// 0, so the label of a point is its cluster's centre id.
pub trait SliceClustering: Send + Sync {
    /// Cluster label of every point in `points`.
    fn labels(&self, points: &[Point3<f64>], eps: f64) -> Vec<usize>;
}

/// DBSCAN with a single-point core condition under the Chebyshev metric.
///
/// Two points are neighbours when every coordinate differs by at most `eps`,
/// and clusters are the connected groups of that relation. No point is noise.
/// Clusters are numbered in order of their first point, so labels depend only
/// on the input order.
///
/// # Example
///
/// ```
/// use tree_slice::{ChebyshevDbscan, SliceClustering};
/// use tree_types::Point3;
///
/// let points = [
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.02, 0.02, 0.0),
/// ];
/// assert_eq!(ChebyshevDbscan.labels(&points, 0.03), vec![0, 1, 0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevDbscan;

impl SliceClustering for ChebyshevDbscan {
    fn labels(&self, points: &[Point3<f64>], eps: f64) -> Vec<usize> {
        if points.is_empty() {
            return Vec::new();
        }
        let coords: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        let index = PointIndex::new(&coords);
        // The Chebyshev ball of radius eps sits inside the Euclidean ball of eps * sqrt(3)
        let radius = (3.0_f64.sqrt() * eps).mul_add(1.0 + 1e-9, 1e-12);

        let mut labels: Vec<Option<usize>> = vec![None; coords.len()];
        let mut next_label = 0;
        let mut stack = Vec::new();

        for seed in 0..coords.len() {
            if labels[seed].is_some() {
                continue;
            }
            labels[seed] = Some(next_label);
            stack.push(seed);

            while let Some(current) = stack.pop() {
                let here = coords[current];
                for (found, _) in index.within_radius(&here, radius) {
                    let other = found as usize;
                    if labels[other].is_none() && chebyshev(&here, &coords[other]) <= eps {
                        labels[other] = Some(next_label);
                        stack.push(other);
                    }
                }
            }
            next_label += 1;
        }

        labels.into_iter().map(|l| l.unwrap_or(0)).collect()
    }
}

fn chebyshev(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0])
        .abs()
        .max((a[1] - b[1]).abs())
        .max((a[2] - b[2]).abs())
}

/// A non-fatal finding from slice clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SliceDiagnostic {
    /// No point fell into this slice.
    EmptySlice {
        /// The empty slice.
        slice_id: usize,
    },
    /// The slice had fewer than `min_pts` points and was not clustered.
    UndersizedSlice {
        /// The skipped slice.
        slice_id: usize,
        /// Points in the slice.
        n_points: usize,
    },
    /// A cluster had fewer than `min_pts` points and produced no node.
    UndersizedCluster {
        /// Slice of the cluster.
        slice_id: usize,
        /// Label of the cluster within its slice.
        centre_id: usize,
        /// Points in the cluster.
        n_points: usize,
    },
}

impl SliceDiagnostic {
    /// The slice the diagnostic refers to.
    #[must_use]
    pub const fn slice_id(&self) -> usize {
        match self {
            Self::EmptySlice { slice_id }
            | Self::UndersizedSlice { slice_id, .. }
            | Self::UndersizedCluster { slice_id, .. } => *slice_id,
        }
    }
}

/// Nodes and per-point labels produced by [`cluster_slices`].
#[derive(Debug, Clone, Default)]
pub struct ClusterOutput {
    /// One row per accepted cluster, in slice then centre order.
    pub table: NodeTable,
    /// Cluster label of every point in a clustered slice.
    pub centre_ids: Vec<Option<usize>>,
    /// Node of every point in an accepted cluster.
    pub node_ids: Vec<Option<usize>>,
    /// Skipped slices and clusters.
    pub diagnostics: Vec<SliceDiagnostic>,
}

/// Result of clustering one slice, before node ids are known.
struct SliceClusters {
    slice_id: usize,
    labelled: Vec<(usize, usize)>,
    accepted: Vec<Cross>,
    diagnostics: Vec<SliceDiagnostic>,
}

/// An accepted cross-section.
struct Cross {
    centre_id: usize,
    centre: Point3<f64>,
    distance: f64,
    members: Vec<usize>,
}

/// Cluster every slice and emit one node per accepted cluster.
///
/// Slices are visited in ascending id and node ids are assigned in that
/// order, so the table is the same whether slices are clustered in parallel
/// or one by one. A slice with fewer than `min_pts` points is skipped; so is
/// any cluster with fewer than `min_pts` members, although its points keep
/// their centre id.
///
/// # Errors
///
/// - [`SliceError::InvalidParameter`](crate::SliceError::InvalidParameter)
///   if `params` fail validation
/// - [`SliceError::LengthMismatch`](crate::SliceError::LengthMismatch) if
///   `distances` or `slice_ids` differ in length from `positions`
pub fn cluster_slices<C>(
    positions: &[Point3<f64>],
    distances: &[Option<f64>],
    slice_ids: &[Option<usize>],
    schedule: &BinSchedule,
    params: &ClusterParams,
    clustering: &C,
) -> SliceResult<ClusterOutput>
where
    C: SliceClustering + ?Sized,
{
    params.validate()?;
    check_len("distances", positions.len(), distances.len())?;
    check_len("slice ids", positions.len(), slice_ids.len())?;

    let mut output = ClusterOutput {
        centre_ids: vec![None; positions.len()],
        node_ids: vec![None; positions.len()],
        ..Default::default()
    };
    let Some(max_slice) = slice_ids.iter().flatten().copied().max() else {
        return Ok(output);
    };

    let mut slices: Vec<Vec<usize>> = vec![Vec::new(); max_slice + 1];
    for (point, slice) in slice_ids.iter().enumerate() {
        if let Some(s) = slice {
            slices[*s].push(point);
        }
    }

    info!(
        slices = slices.len(),
        points = slices.iter().map(Vec::len).sum::<usize>(),
        min_pts = params.min_pts,
        "Clustering slices"
    );

    let results: Vec<SliceClusters> = slices
        .par_iter()
        .enumerate()
        .map(|(slice_id, members)| {
            let eps = params.eps.radius(slice_width(schedule, slice_id));
            cluster_one(slice_id, members, positions, distances, eps, params.min_pts, clustering)
        })
        .collect();

    for result in results {
        for (point, label) in result.labelled {
            output.centre_ids[point] = Some(label);
        }
        for cross in result.accepted {
            let node_id = output.table.push_node(
                result.slice_id,
                cross.centre_id,
                cross.centre,
                cross.distance,
                cross.members.len(),
            );
            for point in cross.members {
                output.node_ids[point] = Some(node_id);
            }
        }
        for diagnostic in &result.diagnostics {
            debug!(?diagnostic, "Slice skipped");
        }
        output.diagnostics.extend(result.diagnostics);
    }

    info!(
        nodes = output.table.len(),
        skipped = output.diagnostics.len(),
        "Slice clustering complete"
    );

    Ok(output)
}

fn slice_width(schedule: &BinSchedule, slice_id: usize) -> f64 {
    schedule
        .width(slice_id)
        .or_else(|| schedule.widths().last().copied())
        .unwrap_or(0.0)
}

fn cluster_one<C>(
    slice_id: usize,
    members: &[usize],
    positions: &[Point3<f64>],
    distances: &[Option<f64>],
    eps: f64,
    min_pts: usize,
    clustering: &C,
) -> SliceClusters
where
    C: SliceClustering + ?Sized,
{
    let mut result = SliceClusters {
        slice_id,
        labelled: Vec::new(),
        accepted: Vec::new(),
        diagnostics: Vec::new(),
    };

    if members.is_empty() {
        result.diagnostics.push(SliceDiagnostic::EmptySlice { slice_id });
        return result;
    }
    if members.len() < min_pts {
        result.diagnostics.push(SliceDiagnostic::UndersizedSlice {
            slice_id,
            n_points: members.len(),
        });
        return result;
    }

    let points: Vec<Point3<f64>> = members.iter().map(|&i| positions[i]).collect();
    let labels = clustering.labels(&points, eps);
    let n_clusters = labels.iter().max().map_or(0, |&m| m + 1);

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n_clusters];
    for (&point, &label) in members.iter().zip(&labels) {
        groups[label].push(point);
    }
    result.labelled = members.iter().copied().zip(labels).collect();

    for (centre_id, group) in groups.into_iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        if group.len() < min_pts {
            result.diagnostics.push(SliceDiagnostic::UndersizedCluster {
                slice_id,
                centre_id,
                n_points: group.len(),
            });
            continue;
        }
        result.accepted.push(Cross {
            centre_id,
            centre: median_point(&group, positions),
            distance: mean_distance(&group, distances),
            members: group,
        });
    }

    result
}

/// Per-axis median; even counts average the two middle values.
fn median_point(members: &[usize], positions: &[Point3<f64>]) -> Point3<f64> {
    let axis = |k: usize| median(members.iter().map(|&i| positions[i][k]).collect());
    Point3::new(axis(0), axis(1), axis(2))
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn mean_distance(members: &[usize], distances: &[Option<f64>]) -> f64 {
    let known: Vec<f64> = members.iter().filter_map(|&i| distances[i]).collect();
    if known.is_empty() {
        return 0.0;
    }
    known.iter().sum::<f64>() / known.len() as f64
}
