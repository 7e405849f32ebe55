//! Single-source shortest paths over the neighbour graph.
//!
//! The base is the only source. Besides distances the search records each
//! vertex's predecessor and the order vertices were settled in, which is the
//! order of non-decreasing distance.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::adjacency::AdjacencyList;
use crate::distance::DistanceField;

/// Dijkstra search over an [`AdjacencyList`].
///
/// Runs in O((V + E) log V).
///
/// # Example
///
/// ```
/// use tree_geodesic::{AdjacencyList, GeodesicSolver};
///
/// let graph = AdjacencyList::from_edges(3, [(0, 1, 1.0), (1, 2, 2.0)], 1e-9);
/// let paths = GeodesicSolver::from_adjacency(graph).solve(0);
///
/// assert!((paths.distances.distance(2) - 3.0).abs() < 1e-12);
/// assert_eq!(paths.predecessors[2], Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct GeodesicSolver {
    graph: AdjacencyList,
}

/// Output of a single-source search, in graph-local indices.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// Distance of every vertex from the source.
    pub distances: DistanceField,
    /// Previous vertex on the shortest path; `None` for the source and for
    /// unreachable vertices.
    pub predecessors: Vec<Option<u32>>,
    /// Reached vertices in the order they were settled.
    pub order: Vec<u32>,
}

impl ShortestPaths {
    fn unreached(vertex_count: usize) -> Self {
        Self {
            distances: DistanceField::unreached(vertex_count),
            predecessors: vec![None; vertex_count],
            order: Vec::new(),
        }
    }
}

/// A tentative distance waiting in the heap.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    vertex: u32,
}

// BinaryHeap is a max-heap: invert the comparison so the nearest vertex pops
// first, and the lower index among equal distances.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then(other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Frontier {}

impl GeodesicSolver {
    /// Wrap a finished graph.
    #[must_use]
    pub const fn from_adjacency(graph: AdjacencyList) -> Self {
        Self { graph }
    }

    /// Distances and predecessors of every vertex from `source`.
    ///
    /// An out-of-range source leaves every vertex unreached.
    #[must_use]
    // Vertex ids are u32 throughout the graph
    #[allow(clippy::cast_possible_truncation)]
    pub fn solve(&self, source: usize) -> ShortestPaths {
        let n = self.graph.vertex_count();
        let mut paths = ShortestPaths::unreached(n);
        if source >= n {
            return paths;
        }

        let mut best = vec![f64::INFINITY; n];
        let mut done = vec![false; n];
        let mut heap = BinaryHeap::new();

        best[source] = 0.0;
        heap.push(Frontier {
            distance: 0.0,
            vertex: source as u32,
        });

        while let Some(Frontier { distance, vertex }) = heap.pop() {
            let v = vertex as usize;
            if done[v] {
                continue;
            }
            done[v] = true;
            paths.order.push(vertex);

            for &(next, weight) in self.graph.neighbors(v) {
                let w = next as usize;
                let through = distance + weight;
                if !done[w] && through < best[w] {
                    best[w] = through;
                    paths.predecessors[w] = Some(vertex);
                    heap.push(Frontier {
                        distance: through,
                        vertex: next,
                    });
                }
            }
        }

        paths.distances = DistanceField::from_distances(best);
        paths
    }
}

/// Shortest-path tree rooted at the base, in cloud indices.
///
/// # Example
///
/// ```
/// use tree_geodesic::ShortestPathTree;
///
/// let tree = ShortestPathTree::new(0, vec![None, Some(0), Some(1), None]);
/// assert_eq!(tree.path_to(2), Some(vec![0, 1, 2]));
/// assert_eq!(tree.path_to(3), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTree {
    base: usize,
    predecessors: Vec<Option<usize>>,
}

impl ShortestPathTree {
    /// Create a tree from per-point predecessors.
    #[must_use]
    pub const fn new(base: usize, predecessors: Vec<Option<usize>>) -> Self {
        Self { base, predecessors }
    }

    /// The root of the tree.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Previous point on the shortest path to `point`.
    #[must_use]
    pub fn parent(&self, point: usize) -> Option<usize> {
        self.predecessors.get(point).copied().flatten()
    }

    /// Point indices from the base to `point`, both inclusive.
    ///
    /// Returns `None` when `point` is not connected to the base.
    #[must_use]
    pub fn path_to(&self, point: usize) -> Option<Vec<usize>> {
        if point >= self.predecessors.len() {
            return None;
        }
        let mut path = vec![point];
        let mut current = point;
        while current != self.base {
            current = self.parent(current)?;
            path.push(current);
            // A cycle would mean corrupt predecessors
            if path.len() > self.predecessors.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}
