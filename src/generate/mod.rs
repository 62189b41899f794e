//! Random graph and tree generators.
//!
//! The classic generators build a whole graph in one call; the binary and
//! n-ary growth engines add one growth unit per call and are driven here by
//! thin seeded loops. All of them take an explicit random generator so that
//! identical seeds reproduce identical structures.

mod binary;
mod classic;
mod nary;

pub use binary::{grow_binary_step, random_binary_tree};
pub use classic::{
    random_graph, random_graph_seeded, random_tree, random_tree_seeded, AttachmentMode,
};
pub use nary::{grow_nary_step, random_nary_tree};

use crate::Graph;

/// Add one to the leaf count of every strict ancestor of `node`, root
/// included. Called after each leaf attachment: one growth step adds exactly
/// one net leaf to every subtree on the path.
pub(crate) fn bump_ancestor_sizes(graph: &mut Graph, node: usize) {
    let mut current = graph.node(node).parent();
    while let Some(ancestor) = current {
        graph.node_mut(ancestor).size += 1;
        current = graph.node(ancestor).parent();
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::Graph;

    /// Recount leaves of the subtree rooted at `node` by recursive descent
    pub(crate) fn leaf_count(graph: &Graph, node: usize) -> usize {
        let children = graph.children(node);
        if children.is_empty() {
            1
        } else {
            children.iter().map(|&c| leaf_count(graph, c)).sum()
        }
    }

    /// Assert the full tree invariant: every node's stored size matches a
    /// recursive recount, every non-root node's parent is recorded and is
    /// the first entry of its adjacency list, and adjacency is symmetric.
    pub(crate) fn assert_tree_invariants(graph: &Graph) {
        for i in 0..graph.len() {
            assert_eq!(
                graph.node(i).size(),
                leaf_count(graph, i),
                "leaf count mismatch at node {}",
                i
            );
            match graph.node(i).parent() {
                Some(p) => {
                    assert_eq!(graph.neighbors(i)[0], p, "parent not first at node {}", i);
                    assert!(graph.neighbors(p).contains(&i));
                }
                None => assert_eq!(i, 0, "non-root node {} has no parent", i),
            }
            for &v in graph.neighbors(i) {
                assert!(graph.neighbors(v).contains(&i), "asymmetric edge {}-{}", i, v);
            }
        }
    }
}
