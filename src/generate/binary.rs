//! Stochastic binary tree growth: one "cherry" per step.
//!
//! Each step performs a weighted random descent from the root, choosing
//! between the two subtrees at every internal node from their leaf counts,
//! and replaces the leaf it lands on by an internal node with two fresh
//! leaf children.

use super::bump_ancestor_sizes;
use crate::{Graph, Result, SylvaError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROOT: usize = 0;

/// Probability of descending into the first child when its subtree holds
/// `a` leaves and its sibling's holds `b`.
fn first_child_weight(a: f64, b: f64) -> f64 {
    (a + 1.0) * (2.0 * a + 1.0) * (a + 3.0 * b + 3.0)
        / ((a + b + 1.0) * (a + b + 2.0) * (2.0 * (a + b) + 3.0))
}

/// Add exactly one cherry (two new leaves replacing one existing leaf) to a
/// tree previously built by this engine, choosing the leaf by weighted
/// random descent from the root.
///
/// A single-node tree short-circuits directly into leaf attachment. New
/// leaves get uniform random positions in [0, width)².
///
/// Fails fast if the graph is empty, if a visited node has exactly one
/// child, or if the stored leaf counts are inconsistent — the graph is not
/// mutated by a failing step.
pub fn grow_binary_step<R: Rng>(graph: &mut Graph, width: f64, rng: &mut R) -> Result<()> {
    if graph.is_empty() {
        return Err(SylvaError::InvalidTree("cannot grow an empty graph".into()));
    }

    let mut current = ROOT;
    loop {
        let children = graph.children(current);
        match children.len() {
            0 => break,
            2 => {
                let a = graph.node(children[0]).size();
                let b = graph.node(children[1]).size();
                if a + b != graph.node(current).size() {
                    return Err(SylvaError::InvalidTree(format!(
                        "leaf counts at node {} do not sum: {} + {} != {}",
                        current,
                        a,
                        b,
                        graph.node(current).size()
                    )));
                }
                let c = first_child_weight(a as f64, b as f64);
                current = if rng.gen::<f64>() < c {
                    children[0]
                } else {
                    children[1]
                };
            }
            k => {
                return Err(SylvaError::InvalidTree(format!(
                    "node {} has {} children; binary growth requires 0 or 2",
                    current, k
                )));
            }
        }
    }

    attach_cherry(graph, current, width, rng);
    Ok(())
}

/// Turn leaf `at` into an internal node with two fresh leaf children and
/// propagate the net +1 leaf count up to the root.
fn attach_cherry<R: Rng>(graph: &mut Graph, at: usize, width: f64, rng: &mut R) {
    for _ in 0..2 {
        let leaf = graph.push_node(rng.gen::<f64>() * width, rng.gen::<f64>() * width);
        graph.connect(leaf, at);
        graph.node_mut(leaf).parent = Some(at);
        graph.node_mut(leaf).size = 1;
    }
    graph.node_mut(at).size = 2;
    bump_ancestor_sizes(graph, at);
}

/// Build a random binary tree with exactly `leaves` leaves (and
/// 2·`leaves` − 1 nodes): a single-node seed followed by `leaves` − 1
/// growth steps.
pub fn random_binary_tree(leaves: usize, width: f64, seed: u64) -> Result<Graph> {
    if leaves == 0 {
        return Err(SylvaError::InvalidParameter(
            "leaf count must be at least 1".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    graph.append_nodes(1, width, &mut rng);
    for _ in 1..leaves {
        grow_binary_step(&mut graph, width, &mut rng)?;
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::test_util::assert_tree_invariants;
    use proptest::prelude::*;

    #[test]
    fn test_first_step_seeds_a_cherry() {
        let g = random_binary_tree(2, 100.0, 0).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g.node(0).size(), 2);
        assert_eq!(g.children(0), vec![1, 2]);
        assert_eq!(g.node(1).parent(), Some(0));
        assert_eq!(g.node(2).parent(), Some(0));
        assert_eq!(g.node(1).size(), 1);
    }

    #[test]
    fn test_descent_weight_is_balanced_for_equal_subtrees() {
        assert!((first_child_weight(1.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((first_child_weight(4.0, 4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shape_after_many_steps() {
        let g = random_binary_tree(40, 100.0, 12).unwrap();
        assert_eq!(g.len(), 79);
        assert_eq!(g.node(0).size(), 40);
        assert_tree_invariants(&g);
        // every internal node has exactly two children
        for i in 0..g.len() {
            let k = g.children(i).len();
            assert!(k == 0 || k == 2);
        }
    }

    #[test]
    fn test_determinism() {
        let g = random_binary_tree(25, 100.0, 77).unwrap();
        let h = random_binary_tree(25, 100.0, 77).unwrap();
        assert_eq!(g, h);
    }

    #[test]
    fn test_rejects_foreign_graphs() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(1);

        let mut g = Graph::new();
        assert!(grow_binary_step(&mut g, 100.0, &mut rng).is_err());

        // a unary chain is not a binary-growth tree
        let mut g = Graph::new();
        g.append_nodes(2, 100.0, &mut rng);
        g.connect(1, 0);
        g.node_mut(1).parent = Some(0);
        assert!(grow_binary_step(&mut g, 100.0, &mut rng).is_err());
    }

    proptest! {
        #[test]
        fn prop_leaf_counts_hold(leaves in 2usize..40, seed in any::<u64>()) {
            let g = random_binary_tree(leaves, 100.0, seed).unwrap();
            prop_assert_eq!(g.len(), 2 * leaves - 1);
            prop_assert_eq!(g.node(0).size(), leaves);
            assert_tree_invariants(&g);
        }
    }
}
