//! Classic whole-graph generators: Erdős–Rényi and random trees

use crate::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How a new tree node chooses the existing node it attaches to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentMode {
    /// Uniformly among all existing nodes
    Uniform,
    /// Proportionally to current degree (preferential attachment)
    Preferential,
}

/// Build an Erdős–Rényi graph G(n, p) with uniform random initial positions
/// in [0, width)². Every unordered pair is connected with probability `p`,
/// scanned in lexicographic order.
pub fn random_graph<R: Rng>(n: usize, p: f64, width: f64, rng: &mut R) -> Graph {
    let mut graph = Graph::new();
    graph.append_nodes(n, width, rng);

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < p {
                graph.connect(i, j);
            }
        }
    }

    graph
}

/// Seeded convenience wrapper around [`random_graph`]
pub fn random_graph_seeded(n: usize, p: f64, width: f64, seed: u64) -> Graph {
    random_graph(n, p, width, &mut StdRng::seed_from_u64(seed))
}

/// Build a random tree of `n` nodes: node i (1 ≤ i < n) attaches to an
/// earlier node chosen per `mode`. The chosen node is recorded as the
/// parent, and ends up first in the new node's adjacency list.
pub fn random_tree<R: Rng>(n: usize, mode: AttachmentMode, width: f64, rng: &mut R) -> Graph {
    let mut graph = Graph::new();
    graph.append_nodes(n, width, rng);

    for i in 1..n {
        let target = match mode {
            AttachmentMode::Uniform => rng.gen_range(0..i),
            AttachmentMode::Preferential => preferential_target(&graph, i, rng),
        };
        graph.connect(i, target);
        graph.node_mut(i).parent = Some(target);
    }

    graph
}

/// Seeded convenience wrapper around [`random_tree`]
pub fn random_tree_seeded(n: usize, mode: AttachmentMode, width: f64, seed: u64) -> Graph {
    random_tree(n, mode, width, &mut StdRng::seed_from_u64(seed))
}

/// Pick an attachment target among nodes [0, i) with probability
/// proportional to degree. Falls back to node i−1 while the degree sum is
/// still zero (i.e. for the very first edge).
fn preferential_target<R: Rng>(graph: &Graph, i: usize, rng: &mut R) -> usize {
    let degree_sum: usize = (0..i).map(|j| graph.degree(j)).sum();
    if degree_sum == 0 {
        return i - 1;
    }

    let r = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for j in 0..i {
        cumulative += graph.degree(j) as f64 / degree_sum as f64;
        if r < cumulative {
            return j;
        }
    }
    i - 1
}
