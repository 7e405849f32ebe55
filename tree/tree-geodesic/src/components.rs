//! Connected components of the neighbour graph.

use hashbrown::HashMap;

use crate::adjacency::AdjacencyList;

/// Union-Find (Disjoint-Set Union) data structure.
///
/// Tracks which graph vertices are connected while bridges are added during
/// connectivity repair.
#[derive(Debug, Clone)]
pub struct UnionFind {
    /// Parent pointers (index of parent, or self if root).
    parent: Vec<usize>,
    /// Rank for union by rank optimization.
    rank: Vec<usize>,
    /// Set size, valid at roots.
    size: Vec<usize>,
}

impl UnionFind {
    /// Create a new union-find with n singleton sets.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            size: vec![1; n],
        }
    }

    /// Create a union-find whose sets are the components of `graph`.
    #[must_use]
    pub fn from_graph(graph: &AdjacencyList) -> Self {
        let mut uf = Self::new(graph.vertex_count());
        for (a, b, _) in graph.edges() {
            uf.union(a as usize, b as usize);
        }
        uf
    }

    /// Find the root of the set containing element x, with path compression.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Union the sets containing x and y, using union by rank.
    ///
    /// Returns `true` if two different sets were joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        let (child, root) = match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => (root_x, root_y),
            std::cmp::Ordering::Greater => (root_y, root_x),
            std::cmp::Ordering::Equal => {
                self.rank[root_x] += 1;
                (root_y, root_x)
            }
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        true
    }

    /// Size of the set containing x.
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// Root of every element.
    pub fn roots(&mut self) -> Vec<usize> {
        (0..self.parent.len()).map(|i| self.find(i)).collect()
    }

    /// Members of every set, keyed by root. Members are in ascending order.
    pub fn groups(&mut self) -> HashMap<usize, Vec<usize>> {
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            groups.entry(root).or_default().push(i);
        }
        groups
    }

    /// Number of disjoint sets.
    pub fn count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&i| self.find(i) == i).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find_path_compression() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(2, 3);
        uf.union(3, 4);

        let root = uf.find(0);
        for i in 1..5 {
            assert_eq!(uf.find(i), root);
        }
        assert_eq!(uf.set_size(4), 5);
        assert_eq!(uf.count(), 1);
    }

    #[test]
    fn test_union_same_set() {
        let mut uf = UnionFind::new(3);
        assert!(uf.union(0, 1));
        assert!(!uf.union(1, 0));
        assert_eq!(uf.count(), 2);
    }

    #[test]
    fn test_from_graph() {
        let graph = AdjacencyList::from_edges(5, [(0, 1, 1.0), (3, 4, 1.0)], 1e-9);
        let mut uf = UnionFind::from_graph(&graph);

        assert_eq!(uf.count(), 3);
        assert_eq!(uf.set_size(0), 2);
        assert_eq!(uf.set_size(2), 1);

        let groups = uf.groups();
        let root = uf.find(3);
        assert_eq!(groups.get(&root).unwrap(), &vec![3, 4]);
    }
}
