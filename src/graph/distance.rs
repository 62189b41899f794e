//! Hop-distance oracle: BFS from a single source, or all pairs at once

use super::Graph;
use ndarray::{Array2, ArrayView1};
use std::collections::VecDeque;

/// Distance value for nodes unreachable from the source
pub const UNREACHABLE: u32 = u32::MAX;

/// Shortest-path hop distances from `source` to every node, unit edge
/// weight. Unreachable nodes get [`UNREACHABLE`].
pub fn bfs_distances(graph: &Graph, source: usize) -> Vec<u32> {
    let mut dist = vec![UNREACHABLE; graph.len()];
    dist[source] = 0;

    let mut queue = VecDeque::with_capacity(graph.len());
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        for &v in graph.neighbors(u) {
            if dist[v] == UNREACHABLE {
                dist[v] = dist[u] + 1;
                queue.push_back(v);
            }
        }
    }

    dist
}

/// Dense all-pairs hop-distance table, one BFS per source.
///
/// Computed once per layout invocation and held for the whole simulation.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    dist: Array2<u32>,
}

impl DistanceMatrix {
    /// Run a BFS from every node and collect the results
    pub fn compute(graph: &Graph) -> Self {
        let n = graph.len();
        let mut dist = Array2::from_elem((n, n), UNREACHABLE);
        for i in 0..n {
            let row = bfs_distances(graph, i);
            for (j, &d) in row.iter().enumerate() {
                dist[[i, j]] = d;
            }
        }
        DistanceMatrix { dist }
    }

    /// Hop distance from `i` to `j`
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.dist[[i, j]]
    }

    /// All distances from source `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, u32> {
        self.dist.row(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn path_graph(n: usize) -> Graph {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = Graph::new();
        g.append_nodes(n, 100.0, &mut rng);
        for i in 1..n {
            g.connect(i - 1, i);
        }
        g
    }

    #[test]
    fn test_path_distances() {
        let g = path_graph(5);
        let dist = bfs_distances(&g, 0);
        assert_eq!(dist, vec![0, 1, 2, 3, 4]);

        let dist = bfs_distances(&g, 2);
        assert_eq!(dist, vec![2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_unreachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = Graph::new();
        g.append_nodes(3, 100.0, &mut rng);
        g.connect(0, 1);

        let dist = bfs_distances(&g, 0);
        assert_eq!(dist, vec![0, 1, UNREACHABLE]);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let g = path_graph(6);
        let m = DistanceMatrix::compute(&g);
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.row(0)[5], 5);
    }
}
