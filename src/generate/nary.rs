//! Alpha-parameterized n-ary tree growth.
//!
//! One leaf is added per step (two when the descent bottoms out at a
//! childless node). At every branch point the engine either inserts the new
//! leaf directly as a child — each of the k+1 insertion positions carrying
//! the same aggregate weight — or recurses into one child chosen by a weight
//! built from all sibling subtree leaf counts. The shape parameter alpha in
//! (1, 2) biases growth toward already-large subtrees as it increases.

use super::bump_ancestor_sizes;
use crate::graph::reserve_pow2;
use crate::{Graph, Result, SylvaError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROOT: usize = 0;

/// Outcome of the weighted choice at one visited node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Descent {
    /// The node is childless: attach a leaf pair here
    AttachHere,
    /// Insert the new leaf as a direct child at this position
    InsertAt(usize),
    /// Recurse into the child at this position
    Recurse(usize),
}

/// Decide what to do at `node`: insert a new leaf among its children, or
/// descend into one of them.
fn choose<R: Rng>(graph: &Graph, node: usize, alpha: f64, rng: &mut R) -> Result<Descent> {
    let children = graph.children(node);
    let k = children.len();
    if k == 0 {
        return Ok(Descent::AttachHere);
    }

    let f = graph.node(node).size() as f64;
    let sizes: Vec<f64> = children
        .iter()
        .map(|&c| graph.node(c).size() as f64)
        .collect();
    let sum: f64 = sizes.iter().sum();
    let sum_sq: f64 = sizes.iter().map(|s| s * s).sum();

    if sum != f {
        return Err(SylvaError::InvalidTree(format!(
            "leaf counts at node {} do not sum: {} != {}",
            node, sum, f
        )));
    }
    if sum_sq > f * f {
        return Err(SylvaError::InvalidTree(format!(
            "leaf counts at node {} are corrupted: sum of squares exceeds square",
            node
        )));
    }

    let denom = (alpha * f - 1.0) * (k as f64 + 1.0) * (f - 1.0) * f;
    if denom == 0.0 {
        return Err(SylvaError::InvalidParameter(format!(
            "degenerate insertion weight at node {} (alpha = {}, f = {})",
            node, alpha, f
        )));
    }

    let r = rng.gen::<f64>();

    // k+1 insertion positions, all carrying the same weight
    let slot = (k as f64 - alpha) * (f * f - sum_sq) / denom;
    let mut cumulative = 0.0;
    for j in 0..=k {
        cumulative += slot;
        if r < cumulative {
            return Ok(Descent::InsertAt(j));
        }
    }

    // otherwise recurse into one child, weighted by its subtree profile
    for (j, &fj) in sizes.iter().enumerate() {
        let rest_sum = sum - fj;
        let rest_sq = sum_sq - fj * fj;
        // ordered pairs of distinct children other than j
        let pairs = rest_sum * rest_sum - rest_sq;
        let numer = (alpha * fj - 1.0)
            * ((fj - 1.0) * fj * (fj + 1.0)
                + 3.0 * fj * (fj + 1.0) * (f - fj)
                + pairs * (1.0 + fj));
        let pj = numer / ((alpha * f - 1.0) * (1.0 + fj) * (f - 1.0) * f);
        cumulative += pj;
        if r < cumulative {
            return Ok(Descent::Recurse(j));
        }
    }

    // floating-point slack: the weights sum to 1 in exact arithmetic
    Ok(Descent::Recurse(k - 1))
}

/// Add one leaf to a tree previously grown by this engine (two when the
/// descent reaches a childless node), using the alpha-weighted descent.
///
/// `alpha` must lie strictly in (1, 2). Fails fast on an empty graph or on
/// inconsistent leaf-count annotations; the graph is not mutated by a
/// failing step.
pub fn grow_nary_step<R: Rng>(graph: &mut Graph, alpha: f64, width: f64, rng: &mut R) -> Result<()> {
    if !(1.0 < alpha && alpha < 2.0) {
        return Err(SylvaError::InvalidParameter(format!(
            "alpha must lie strictly between 1 and 2, got {}",
            alpha
        )));
    }
    if graph.is_empty() {
        return Err(SylvaError::InvalidTree("cannot grow an empty graph".into()));
    }

    let mut current = ROOT;
    loop {
        match choose(graph, current, alpha, rng)? {
            Descent::AttachHere => {
                for _ in 0..2 {
                    let leaf = new_leaf(graph, current, width, rng);
                    reserve_pow2(&mut graph.node_mut(current).neighbors, 1);
                    graph.node_mut(current).neighbors.push(leaf);
                }
                graph.node_mut(current).size = 2;
                bump_ancestor_sizes(graph, current);
                return Ok(());
            }
            Descent::InsertAt(position) => {
                let leaf = new_leaf(graph, current, width, rng);
                let index = child_insert_index(graph, current, position);
                reserve_pow2(&mut graph.node_mut(current).neighbors, 1);
                graph.node_mut(current).neighbors.insert(index, leaf);
                graph.node_mut(current).size += 1;
                bump_ancestor_sizes(graph, current);
                return Ok(());
            }
            Descent::Recurse(position) => {
                current = graph.children(current)[position];
            }
        }
    }
}

/// Create a fresh leaf linked back to `parent` (the parent's adjacency is
/// left to the caller, which controls the insertion position).
fn new_leaf<R: Rng>(graph: &mut Graph, parent: usize, width: f64, rng: &mut R) -> usize {
    let leaf = graph.push_node(rng.gen::<f64>() * width, rng.gen::<f64>() * width);
    reserve_pow2(&mut graph.node_mut(leaf).neighbors, 1);
    graph.node_mut(leaf).neighbors.push(parent);
    graph.node_mut(leaf).parent = Some(parent);
    graph.node_mut(leaf).size = 1;
    leaf
}

/// Index into the parent's adjacency list at which a child inserted at
/// child-position `position` must land, skipping the parent's own parent
/// entry and preserving child order.
fn child_insert_index(graph: &Graph, parent: usize, position: usize) -> usize {
    let grandparent = graph.node(parent).parent();
    let mut seen = 0;
    for (i, &nb) in graph.neighbors(parent).iter().enumerate() {
        if Some(nb) == grandparent {
            continue;
        }
        if seen == position {
            return i;
        }
        seen += 1;
    }
    graph.neighbors(parent).len()
}

/// Build a random n-ary tree with exactly `leaves` leaves: a single-node
/// seed followed by `leaves` − 1 growth steps.
pub fn random_nary_tree(leaves: usize, alpha: f64, width: f64, seed: u64) -> Result<Graph> {
    if leaves == 0 {
        return Err(SylvaError::InvalidParameter(
            "leaf count must be at least 1".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    graph.append_nodes(1, width, &mut rng);
    for _ in 1..leaves {
        grow_nary_step(&mut graph, alpha, width, &mut rng)?;
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::test_util::{assert_tree_invariants, leaf_count};
    use proptest::prelude::*;

    #[test]
    fn test_seed_step_attaches_pair() {
        let g = random_nary_tree(2, 1.5, 100.0, 3).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g.node(0).size(), 2);
        assert_eq!(g.children(0).len(), 2);
        assert_tree_invariants(&g);
    }

    #[test]
    fn test_leaf_target_reached() {
        for seed in 0..5 {
            let g = random_nary_tree(30, 1.5, 100.0, seed).unwrap();
            assert_eq!(g.node(0).size(), 30);
            assert_eq!(leaf_count(&g, 0), 30);
            assert_tree_invariants(&g);
        }
    }

    #[test]
    fn test_internal_nodes_keep_at_least_two_children() {
        let g = random_nary_tree(60, 1.9, 100.0, 21).unwrap();
        for i in 0..g.len() {
            let k = g.children(i).len();
            assert!(k == 0 || k >= 2, "node {} has exactly one child", i);
        }
    }

    #[test]
    fn test_alpha_validation() {
        assert!(random_nary_tree(10, 1.0, 100.0, 0).is_err());
        assert!(random_nary_tree(10, 2.0, 100.0, 0).is_err());
        assert!(random_nary_tree(10, 0.5, 100.0, 0).is_err());
        assert!(random_nary_tree(10, 1.000001, 100.0, 0).is_ok());
    }

    #[test]
    fn test_determinism() {
        let g = random_nary_tree(45, 1.3, 100.0, 1234).unwrap();
        let h = random_nary_tree(45, 1.3, 100.0, 1234).unwrap();
        assert_eq!(g, h);
    }

    #[test]
    fn test_rejects_corrupted_sizes() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(0);
        let mut g = random_nary_tree(5, 1.5, 100.0, 6).unwrap();
        g.node_mut(0).size = 1000;
        assert!(grow_nary_step(&mut g, 1.5, 100.0, &mut rng).is_err());
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_across_alpha(
            leaves in 2usize..35,
            alpha in 1.01f64..1.99,
            seed in any::<u64>(),
        ) {
            let g = random_nary_tree(leaves, alpha, 100.0, seed).unwrap();
            prop_assert_eq!(g.node(0).size(), leaves);
            assert_tree_invariants(&g);
        }
    }
}
