//! Weighted neighbour graph over cloud points.
//!
//! Vertices are graph-local indices (positions in the list of points the
//! graph was built from); callers map them back to cloud indices.

use hashbrown::HashSet;

/// Undirected weighted adjacency list.
///
/// Each vertex stores `(neighbour, edge length)` pairs. Every edge is stored
/// once in each direction and weights are never below the minimum the list
/// was created with.
#[derive(Debug, Clone)]
pub struct AdjacencyList {
    /// For each vertex, list of (neighbour index, edge length) pairs.
    neighbors: Vec<Vec<(u32, f64)>>,
    /// Floor applied to every edge weight.
    min_weight: f64,
}

impl AdjacencyList {
    /// Create a graph with `vertex_count` isolated vertices.
    #[must_use]
    pub fn new(vertex_count: usize, min_weight: f64) -> Self {
        Self {
            neighbors: vec![Vec::new(); vertex_count],
            min_weight,
        }
    }

    /// Build a graph from `(a, b, length)` edges.
    ///
    /// Self-loops are dropped and an edge listed from both endpoints is kept
    /// once; the first length seen wins.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_geodesic::AdjacencyList;
    ///
    /// let adj = AdjacencyList::from_edges(3, [(0, 1, 1.0), (1, 0, 1.0), (1, 2, 0.0)], 1e-9);
    /// assert_eq!(adj.edge_count(), 2);
    /// assert!(adj.neighbors(2)[0].1 > 0.0);
    /// ```
    #[must_use]
    pub fn from_edges<I>(vertex_count: usize, edges: I, min_weight: f64) -> Self
    where
        I: IntoIterator<Item = (u32, u32, f64)>,
    {
        let mut graph = Self::new(vertex_count, min_weight);
        let mut seen: HashSet<(u32, u32)> = HashSet::new();

        for (a, b, length) in edges {
            if a == b {
                continue;
            }
            if seen.insert((a.min(b), a.max(b))) {
                graph.push_pair(a, b, length);
            }
        }

        graph
    }

    /// Add an edge between two vertices if it is not already present.
    ///
    /// Returns `true` if the edge was added.
    pub fn add_edge(&mut self, a: u32, b: u32, length: f64) -> bool {
        if a == b || self.has_edge(a, b) {
            return false;
        }
        self.push_pair(a, b, length);
        true
    }

    fn push_pair(&mut self, a: u32, b: u32, length: f64) {
        let weight = length.max(self.min_weight);
        self.neighbors[a as usize].push((b, weight));
        self.neighbors[b as usize].push((a, weight));
    }

    /// Returns true if `a` and `b` are adjacent.
    #[must_use]
    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.neighbors(a as usize).iter().any(|&(n, _)| n == b)
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Get the neighbours of a vertex.
    ///
    /// Returns a slice of (neighbour index, edge length) pairs.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        self.neighbors.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Degree of a vertex.
    #[inline]
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors(vertex).len()
    }

    /// Check if the graph has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        // Each edge is stored twice (once for each direction)
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Iterate over each undirected edge once as `(a, b, weight)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(a, list)| {
            #[allow(clippy::cast_possible_truncation)]
            let a = a as u32;
            list.iter()
                .filter(move |&&(b, _)| a < b)
                .map(move |&(b, w)| (a, b, w))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_deduplicates() {
        let adj = AdjacencyList::from_edges(
            3,
            [(0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.0), (2, 2, 0.5)],
            1e-9,
        );

        assert_eq!(adj.vertex_count(), 3);
        assert_eq!(adj.edge_count(), 2);
        assert_eq!(adj.degree(1), 2);
        assert_eq!(adj.degree(2), 1);
    }

    #[test]
    fn zero_length_edges_get_min_weight() {
        let adj = AdjacencyList::from_edges(2, [(0, 1, 0.0)], 1e-6);
        let (_, w) = adj.neighbors(0)[0];
        assert_eq!(w, 1e-6);
        let (_, w) = adj.neighbors(1)[0];
        assert_eq!(w, 1e-6);
    }

    #[test]
    fn add_edge_rejects_duplicates() {
        let mut adj = AdjacencyList::new(3, 1e-9);
        assert!(adj.add_edge(0, 2, 0.5));
        assert!(!adj.add_edge(2, 0, 0.5));
        assert!(!adj.add_edge(1, 1, 0.5));
        assert_eq!(adj.edge_count(), 1);
        assert!(adj.has_edge(2, 0));
    }

    #[test]
    fn edges_listed_once() {
        let adj = AdjacencyList::from_edges(4, [(0, 1, 1.0), (2, 1, 1.0), (3, 0, 1.0)], 1e-9);
        let mut edges: Vec<_> = adj.edges().map(|(a, b, _)| (a, b)).collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2)]);
    }

    #[test]
    fn out_of_range_vertex_has_no_neighbors() {
        let adj = AdjacencyList::new(1, 1e-9);
        assert!(adj.neighbors(5).is_empty());
        assert!(!adj.is_empty());
    }
}
