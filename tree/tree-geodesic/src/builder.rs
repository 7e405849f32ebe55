//! Distance field construction from a point cloud.

// Graph-local indices are u32
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use tracing::{debug, info, warn};
use tree_types::{PointIndex, TreeCloud};

use crate::dijkstra::{GeodesicSolver, ShortestPathTree};
use crate::distance::DistanceField;
use crate::error::{BaseLocationIssue, GeodesicError, GeodesicResult};
use crate::knn::{graph_from_lists, neighbour_lists};
use crate::params::{ConnectivityPolicy, GraphParams};
use crate::repair::{repair_connectivity, RepairReport};

/// Everything the distance stage produces, in cloud indices.
#[derive(Debug, Clone)]
pub struct DistanceOutput {
    /// Distance of every cloud point from the base.
    pub field: DistanceField,
    /// Index of the base point that was used.
    pub base_index: usize,
    /// Shortest-path tree rooted at the base.
    pub paths: ShortestPathTree,
    /// Reached graph points in order of non-decreasing distance.
    pub order: Vec<usize>,
    /// What connectivity repair had to do.
    pub repair: RepairReport,
}

impl DistanceOutput {
    /// Distances scaled into `[0, 1]` by the maximum finite distance.
    #[must_use]
    pub fn normalised(&self) -> DistanceField {
        self.field.normalised()
    }
}

/// Compute the shortest-path distance of every point from the base.
///
/// `base` defaults to the lowest point of the cloud. For a downsampled cloud
/// the graph covers the voxel representatives only and every other point
/// takes the distance of the representative sharing its voxel.
///
/// # Errors
///
/// - [`GeodesicError::InvalidParameter`] if `params` fail validation
/// - [`GeodesicError::EmptyCloud`] if the cloud has no graph points
/// - [`GeodesicError::InvalidBaseLocation`] if `base` is out of range or not
///   a representative of a downsampled cloud
/// - [`GeodesicError::DisconnectedGraph`] if repair cannot connect every
///   graph point and the policy is [`ConnectivityPolicy::Fail`]
///
/// # Example
///
/// ```
/// use tree_geodesic::{compute_distance_field, GraphParams};
/// use tree_types::TreeCloud;
///
/// let coords: Vec<[f64; 3]> = (0..20).map(|i| [0.0, 0.0, f64::from(i) * 0.1]).collect();
/// let cloud = TreeCloud::from_coords(&coords);
/// let output = compute_distance_field(&cloud, None, &GraphParams::default()).unwrap();
///
/// assert_eq!(output.base_index, 0);
/// assert!((output.field.distance(19) - 1.9).abs() < 1e-9);
/// ```
pub fn compute_distance_field(
    cloud: &TreeCloud,
    base: Option<usize>,
    params: &GraphParams,
) -> GeodesicResult<DistanceOutput> {
    params.validate()?;

    let graph_points = cloud.graph_indices();
    if graph_points.is_empty() {
        return Err(GeodesicError::EmptyCloud);
    }

    let base_index = match base {
        Some(index) => index,
        None => lowest_graph_point(cloud, &graph_points),
    };
    let local_base = locate_base(cloud, &graph_points, base_index)?;

    info!(
        points = cloud.len(),
        graph_points = graph_points.len(),
        base = base_index,
        knn = params.knn,
        "Computing distance field"
    );

    let coords: Vec<[f64; 3]> = graph_points
        .iter()
        .map(|&i| cloud.points[i].coords())
        .collect();
    let index = PointIndex::new(&coords);
    let lists = neighbour_lists(&index, &coords, params.knn);
    let mut graph = graph_from_lists(&lists, params);
    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Built neighbour graph"
    );

    let repair = repair_connectivity(&mut graph, &index, &coords, &lists, local_base, params);
    if !repair.was_connected() {
        debug!(
            components = repair.initial_components,
            bridges = repair.bridges_added,
            iterations = repair.iterations,
            "Repaired graph connectivity"
        );
    }

    let local = GeodesicSolver::from_adjacency(graph).solve(local_base);

    let mut field = DistanceField::unreached(cloud.len());
    let mut predecessors = vec![None; cloud.len()];
    for (local_idx, &global) in graph_points.iter().enumerate() {
        field.set(global, local.distances.distance(local_idx));
        predecessors[global] = local.predecessors[local_idx].map(|p| graph_points[p as usize]);
    }
    let order: Vec<usize> = local
        .order
        .iter()
        .map(|&v| graph_points[v as usize])
        .collect();

    let unreachable: Vec<usize> = graph_points
        .iter()
        .copied()
        .filter(|&i| !field.distance(i).is_finite())
        .collect();
    if !unreachable.is_empty() {
        match params.connectivity {
            ConnectivityPolicy::Fail => {
                return Err(GeodesicError::DisconnectedGraph {
                    unreachable,
                    iterations: repair.iterations,
                });
            }
            ConnectivityPolicy::Exclude => {
                warn!(
                    unreachable = unreachable.len(),
                    iterations = repair.iterations,
                    "Points unreachable from base, excluded"
                );
            }
        }
    }

    if cloud.is_downsampled() {
        join_voxels(cloud, &mut field, &mut predecessors);
    }

    info!(
        reachable = field.reachable_count(),
        max_distance = format!("{:.3}", field.max_distance()),
        bridges = repair.bridges_added,
        "Distance field complete"
    );

    Ok(DistanceOutput {
        field,
        base_index,
        paths: ShortestPathTree::new(base_index, predecessors),
        order,
        repair,
    })
}

/// Lowest graph point; ties resolve to the lowest index.
fn lowest_graph_point(cloud: &TreeCloud, graph_points: &[usize]) -> usize {
    let mut best = graph_points[0];
    for &i in &graph_points[1..] {
        if cloud.points[i].position.z < cloud.points[best].position.z {
            best = i;
        }
    }
    best
}

/// Graph-local index of the base, or why it cannot be used.
fn locate_base(cloud: &TreeCloud, graph_points: &[usize], index: usize) -> GeodesicResult<usize> {
    if index >= cloud.len() {
        return Err(GeodesicError::InvalidBaseLocation {
            index,
            issue: BaseLocationIssue::OutOfRange {
                point_count: cloud.len(),
            },
        });
    }
    graph_points
        .binary_search(&index)
        .map_err(|_| GeodesicError::InvalidBaseLocation {
            index,
            issue: BaseLocationIssue::NotInGraph,
        })
}

/// Give every non-representative the distance of its voxel's representative.
///
/// When a voxel has several representatives the closest one wins.
fn join_voxels(cloud: &TreeCloud, field: &mut DistanceField, predecessors: &mut [Option<usize>]) {
    let mut voxels: HashMap<u64, (usize, f64)> = HashMap::new();
    for (i, point) in cloud.points.iter().enumerate() {
        let (Some(voxel), true) = (point.voxel_id, point.is_representative()) else {
            continue;
        };
        let d = field.distance(i);
        voxels
            .entry(voxel)
            .and_modify(|best| {
                if d < best.1 {
                    *best = (i, d);
                }
            })
            .or_insert((i, d));
    }

    let mut orphans = 0usize;
    for (i, point) in cloud.points.iter().enumerate() {
        if point.is_representative() {
            continue;
        }
        match point.voxel_id.and_then(|v| voxels.get(&v)) {
            Some(&(rep, d)) if d.is_finite() => {
                field.set(i, d);
                predecessors[i] = Some(rep);
            }
            _ => orphans += 1,
        }
    }
    if orphans > 0 {
        debug!(orphans, "Points without a reachable voxel representative");
    }
}
