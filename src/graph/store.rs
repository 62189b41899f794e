//! Node and graph store: the mutable substrate for generators and layout

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reserve capacity for `additional` more elements, rounding the capacity up
/// to the next power of two that fits the required length.
pub(crate) fn reserve_pow2<T>(v: &mut Vec<T>, additional: usize) {
    let required = v.len() + additional;
    if required > v.capacity() {
        v.reserve_exact(required.next_power_of_two() - v.len());
    }
}

/// A graph node: position, accumulated displacement and adjacency.
///
/// The `parent` and `size` fields are only meaningful for nodes produced by
/// one of the tree-growth engines; `size` is the number of leaves in the
/// subtree rooted at this node (a childless node counts itself).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Accumulated displacement, reset every layout iteration
    #[serde(skip)]
    pub(crate) dx: f64,
    /// Accumulated displacement, reset every layout iteration
    #[serde(skip)]
    pub(crate) dy: f64,
    pub(crate) neighbors: Vec<usize>,
    pub(crate) parent: Option<usize>,
    pub(crate) size: usize,
}

impl Node {
    fn new(id: usize, x: f64, y: f64) -> Self {
        Node {
            id,
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            neighbors: Vec::new(),
            parent: None,
            size: 0,
        }
    }

    /// Identifier of the node (its dense index in the graph)
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of neighbors
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbor identifiers, in append order
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Parent identifier, `None` for the root or for non-tree nodes
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Leaf count of the subtree rooted here (tree-growth graphs only)
    pub fn size(&self) -> usize {
        self.size
    }
}

/// An undirected graph owning its nodes.
///
/// Edges are stored redundantly: an edge (u, v) appears as v in u's adjacency
/// list and as u in v's. Construction code performs no duplicate-edge or
/// self-loop checks; callers must not request them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum::<usize>() / 2
    }

    /// The node with the given identifier
    ///
    /// Panics if `id` is out of bounds.
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: usize) -> &mut Node {
        &mut self.nodes[id]
    }

    /// All nodes, in identifier order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Degree of a node
    pub fn degree(&self, id: usize) -> usize {
        self.nodes[id].degree()
    }

    /// Neighbor identifiers of a node, in append order
    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.nodes[id].neighbors
    }

    /// Children of a tree node: its neighbors minus its parent, in
    /// attachment order. For non-tree nodes this is simply the adjacency.
    pub fn children(&self, id: usize) -> Vec<usize> {
        let parent = self.nodes[id].parent;
        self.nodes[id]
            .neighbors
            .iter()
            .copied()
            .filter(|&v| Some(v) != parent)
            .collect()
    }

    /// Append one node at the given position, returning its identifier
    pub(crate) fn push_node(&mut self, x: f64, y: f64) -> usize {
        let id = self.nodes.len();
        reserve_pow2(&mut self.nodes, 1);
        self.nodes.push(Node::new(id, x, y));
        id
    }

    /// Grow the node collection by `count` nodes, each at an independent
    /// uniform random position in [0, width) × [0, width), with zero
    /// displacement and empty adjacency.
    pub fn append_nodes<R: Rng>(&mut self, count: usize, width: f64, rng: &mut R) {
        reserve_pow2(&mut self.nodes, count);
        for _ in 0..count {
            let x = rng.gen::<f64>() * width;
            let y = rng.gen::<f64>() * width;
            self.push_node(x, y);
        }
    }

    /// Connect nodes `u` and `v` with an undirected edge: v is appended to
    /// u's adjacency and u to v's. Amortized O(1).
    pub fn connect(&mut self, u: usize, v: usize) {
        reserve_pow2(&mut self.nodes[u].neighbors, 1);
        self.nodes[u].neighbors.push(v);
        reserve_pow2(&mut self.nodes[v].neighbors, 1);
        self.nodes[v].neighbors.push(u);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_append_nodes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Graph::new();
        g.append_nodes(10, 50.0, &mut rng);

        assert_eq!(g.len(), 10);
        assert_eq!(g.edge_count(), 0);
        for (i, node) in g.nodes().iter().enumerate() {
            assert_eq!(node.id(), i);
            assert!(node.x >= 0.0 && node.x < 50.0);
            assert!(node.y >= 0.0 && node.y < 50.0);
            assert_eq!(node.degree(), 0);
            assert_eq!(node.parent(), None);
            assert_eq!(node.size(), 0);
        }
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Graph::new();
        g.append_nodes(4, 10.0, &mut rng);
        g.connect(0, 1);
        g.connect(0, 2);
        g.connect(2, 3);

        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.neighbors(1), &[0]);
        assert_eq!(g.neighbors(2), &[0, 3]);
        assert_eq!(g.neighbors(3), &[2]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_children_excludes_parent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Graph::new();
        g.append_nodes(4, 10.0, &mut rng);
        g.connect(1, 0);
        g.node_mut(1).parent = Some(0);
        g.connect(1, 2);
        g.connect(1, 3);

        assert_eq!(g.children(1), vec![2, 3]);
        assert_eq!(g.children(0), vec![1]);
    }

    #[test]
    fn test_reserve_pow2_rounds_up() {
        let mut v: Vec<usize> = Vec::new();
        reserve_pow2(&mut v, 3);
        assert!(v.capacity() >= 4);
        v.extend([1, 2, 3]);
        reserve_pow2(&mut v, 3);
        assert!(v.capacity() >= 8);
    }
}
