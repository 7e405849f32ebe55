//! The staged skeleton pipeline.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Initialized -> DistanceComputed -> Sliced -> Clustered -> Merged -> Done
//! ```
//!
//! Each stage consumes the previous stage's output and produces a new value;
//! the input cloud is never modified, so repeated runs give identical results.

use std::fmt;

use tracing::{debug, info};
use tree_geodesic::{compute_distance_field, RepairReport, ShortestPathTree};
use tree_slice::{
    assign_slices, cluster_slices, merge_base_nodes, schedule_bins, BinSchedule, ChebyshevDbscan,
    SliceClustering, SliceDiagnostic,
};
use tree_types::{AugmentedCloud, NodeTable, PointAttributes, TreeCloud};

use crate::error::SkeletonResult;
use crate::params::SkeletonParams;

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PipelineStage {
    /// Parameters checked, nothing computed yet.
    Initialized,
    /// Every point has a distance from the base.
    DistanceComputed,
    /// Slice widths chosen and slice ids assigned.
    Sliced,
    /// Slices clustered into nodes.
    Clustered,
    /// Base nodes collapsed into one root.
    Merged,
    /// Output assembled.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialized => "initialized",
            Self::DistanceComputed => "distance computed",
            Self::Sliced => "sliced",
            Self::Clustered => "clustered",
            Self::Merged => "merged",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Output of a complete run.
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// The input points with their distance, slice, centre and node.
    pub cloud: AugmentedCloud,
    /// Skeleton nodes, with at most one node in slice 0.
    pub nodes: NodeTable,
    /// Slice widths used.
    pub schedule: BinSchedule,
    /// Slices and clusters that produced no node.
    pub diagnostics: Vec<SliceDiagnostic>,
    /// What connectivity repair had to do.
    pub repair: RepairReport,
    /// Base point the distances are measured from.
    pub base_index: usize,
    /// Shortest path from the base to every reached point.
    pub paths: ShortestPathTree,
}

impl Skeleton {
    /// Number of skeleton nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node, if slice 0 produced one.
    #[must_use]
    pub fn root(&self) -> Option<&tree_types::SkeletonNode> {
        self.nodes.in_slice(0).next()
    }

    /// Cloud indices of the points belonging to a node.
    #[must_use]
    pub fn members_of(&self, node_id: usize) -> Vec<usize> {
        self.cloud.members_of(node_id)
    }
}

/// Runs the pipeline with a fixed set of parameters and clustering.
///
/// # Example
///
/// ```
/// use tree_skeleton::{SkeletonParams, Skeletonizer};
/// use tree_types::TreeCloud;
///
/// // A one-metre stem, 100 rings of 12 points
/// let mut coords = Vec::new();
/// for ring in 0..100 {
///     for k in 0..12 {
///         let a = f64::from(k) * std::f64::consts::TAU / 12.0;
///         coords.push([0.01 * a.cos(), 0.01 * a.sin(), f64::from(ring) * 0.01]);
///     }
/// }
/// let cloud = TreeCloud::from_coords(&coords);
///
/// let skeleton = Skeletonizer::new(SkeletonParams::default()).run(&cloud).unwrap();
/// assert!(skeleton.node_count() > 10);
/// assert_eq!(skeleton.nodes.in_slice(0).count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Skeletonizer<C = ChebyshevDbscan> {
    params: SkeletonParams,
    clustering: C,
}

impl Skeletonizer {
    /// Create a runner using [`ChebyshevDbscan`].
    #[must_use]
    pub const fn new(params: SkeletonParams) -> Self {
        Self {
            params,
            clustering: ChebyshevDbscan,
        }
    }
}

impl<C: SliceClustering> Skeletonizer<C> {
    /// Replace the clustering implementation.
    #[must_use]
    pub fn with_clustering<D: SliceClustering>(self, clustering: D) -> Skeletonizer<D> {
        Skeletonizer {
            params: self.params,
            clustering,
        }
    }

    /// Parameters this runner was created with.
    #[must_use]
    pub const fn params(&self) -> &SkeletonParams {
        &self.params
    }

    /// Extract the skeleton of `cloud`.
    ///
    /// # Errors
    ///
    /// - [`SkeletonError::InvalidParams`](crate::SkeletonError::InvalidParams)
    ///   if the parameters fail validation
    /// - [`SkeletonError::Geodesic`](crate::SkeletonError::Geodesic) for an
    ///   empty cloud, a bad base location or a graph that stays disconnected
    /// - [`SkeletonError::Slice`](crate::SkeletonError::Slice) if no slice
    ///   schedule fits the distance range
    pub fn run(&self, cloud: &TreeCloud) -> SkeletonResult<Skeleton> {
        let params = &self.params;
        params.validate()?;
        stage(PipelineStage::Initialized, cloud.len());

        let distance = compute_distance_field(cloud, params.base_location, &params.graph)?;
        let distances = distance.field.to_options();
        stage(PipelineStage::DistanceComputed, distance.field.reachable_count());

        let schedule = schedule_bins(distance.field.max_distance(), &params.bins)?;
        let slice_ids = assign_slices(&distances, &schedule);
        stage(PipelineStage::Sliced, schedule.len());

        let positions = cloud.positions();
        let clusters = cluster_slices(
            &positions,
            &distances,
            &slice_ids,
            &schedule,
            &params.cluster,
            &self.clustering,
        )?;
        stage(PipelineStage::Clustered, clusters.table.len());

        let merge = merge_base_nodes(clusters.table);
        let node_ids: Vec<Option<usize>> = clusters
            .node_ids
            .iter()
            .map(|id| id.map(|id| merge.remap(id)))
            .collect();
        if let Some(root) = merge.root_id() {
            debug!(root, merged = merge.merged_ids.len(), "Remapped base node ids");
        }
        stage(PipelineStage::Merged, merge.table.len());

        let normalised = distance.normalised().to_options();
        let attributes = (0..cloud.len())
            .map(|i| PointAttributes {
                distance_from_base: distances[i],
                normalised_distance: normalised[i],
                slice_id: slice_ids[i],
                centre_id: clusters.centre_ids[i],
                node_id: node_ids[i],
            })
            .collect();

        let skeleton = Skeleton {
            cloud: AugmentedCloud {
                cloud: cloud.clone(),
                attributes,
            },
            nodes: merge.table,
            schedule,
            diagnostics: clusters.diagnostics,
            repair: distance.repair,
            base_index: distance.base_index,
            paths: distance.paths,
        };

        info!(
            nodes = skeleton.nodes.len(),
            slices = skeleton.schedule.len(),
            skipped = skeleton.diagnostics.len(),
            unassigned = skeleton.cloud.unassigned_count(),
            "Skeleton extraction complete"
        );
        stage(PipelineStage::Done, skeleton.nodes.len());

        Ok(skeleton)
    }
}

fn stage(stage: PipelineStage, count: usize) {
    debug!(%stage, count, "Pipeline stage reached");
}

/// Extract the skeleton of `cloud` with the default clustering.
///
/// # Errors
///
/// See [`Skeletonizer::run`].
pub fn build_skeleton(cloud: &TreeCloud, params: &SkeletonParams) -> SkeletonResult<Skeleton> {
    Skeletonizer::new(params.clone()).run(cloud)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::SkeletonError;
    use tree_geodesic::{ConnectivityPolicy, GeodesicError};
    use tree_types::Point3;

    /// Rings of `per_ring` points, radius 1 cm, every centimetre up to `height`.
    fn stem(rings: usize, per_ring: usize) -> TreeCloud {
        let mut points = Vec::new();
        for ring in 0..rings {
            for k in 0..per_ring {
                let a = k as f64 * std::f64::consts::TAU / per_ring as f64;
                points.push(Point3::new(0.01 * a.cos(), 0.01 * a.sin(), ring as f64 * 0.01));
            }
        }
        points.into_iter().collect()
    }

    #[test]
    fn stage_order() {
        assert!(PipelineStage::Initialized < PipelineStage::DistanceComputed);
        assert!(PipelineStage::Merged < PipelineStage::Done);
        assert_eq!(PipelineStage::DistanceComputed.to_string(), "distance computed");
    }

    #[test]
    fn stem_has_one_node_per_slice() {
        let cloud = stem(100, 12);
        let skeleton = build_skeleton(&cloud, &SkeletonParams::default()).unwrap();

        assert_eq!(skeleton.cloud.len(), cloud.len());
        for slice in 0..skeleton.schedule.len() {
            assert!(skeleton.nodes.in_slice(slice).count() <= 1);
        }
        assert!(skeleton.root().is_some());
        // Every node's members carry its id
        for node in &skeleton.nodes {
            assert_eq!(skeleton.members_of(node.node_id).len(), node.n_points);
        }
    }

    #[test]
    fn input_is_untouched_and_runs_repeat() {
        let cloud = stem(60, 10);
        let before = cloud.clone();
        let runner = Skeletonizer::new(SkeletonParams::default());

        let a = runner.run(&cloud).unwrap();
        let b = runner.run(&cloud).unwrap();
        assert_eq!(cloud, before);
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.cloud.node_ids(), b.cloud.node_ids());
    }

    #[test]
    fn invalid_params_fail_first() {
        let params = SkeletonParams::default().with_min_pts(0);
        let err = build_skeleton(&TreeCloud::new(), &params).unwrap_err();
        assert!(matches!(err, SkeletonError::InvalidParams { .. }));
        assert_eq!(err.stage(), PipelineStage::Initialized);
    }

    #[test]
    fn empty_cloud() {
        let err = build_skeleton(&TreeCloud::new(), &SkeletonParams::default()).unwrap_err();
        assert!(matches!(err, SkeletonError::Geodesic(GeodesicError::EmptyCloud)));
    }

    #[test]
    fn excluded_points_stay_unassigned() {
        let mut cloud = stem(40, 10);
        // A far clump whose nearest neighbours all lie inside it
        for k in 0..5 {
            cloud.push(Point3::new(50.0, 50.0, 50.0 + k as f64 * 0.01));
        }
        let params = SkeletonParams::default().with_graph(
            tree_geodesic::GraphParams::default()
                .with_max_repair_iterations(2)
                .with_connectivity(ConnectivityPolicy::Exclude),
        );

        let skeleton = build_skeleton(&cloud, &params).unwrap();
        for i in cloud.len() - 5..cloud.len() {
            let stray = skeleton.cloud.attributes(i).unwrap();
            assert!(stray.distance_from_base.is_none());
            assert!(stray.slice_id.is_none());
            assert!(stray.node_id.is_none());
        }
        assert!(skeleton.paths.path_to(cloud.len() - 1).is_none());
    }

    struct SingleCluster;

    impl SliceClustering for SingleCluster {
        fn labels(&self, points: &[Point3<f64>], _eps: f64) -> Vec<usize> {
            vec![0; points.len()]
        }
    }

    #[test]
    fn custom_clustering_is_used() {
        let cloud = stem(50, 12);
        let runner = Skeletonizer::new(SkeletonParams::default()).with_clustering(SingleCluster);
        let skeleton = runner.run(&cloud).unwrap();
        assert!(skeleton.nodes.nodes().iter().all(|n| n.centre_id == 0));
    }
}
