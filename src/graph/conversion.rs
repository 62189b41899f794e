//! Conversion between the native graph store and `petgraph`

use super::Graph;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Convert a graph to a `petgraph` undirected graph.
///
/// Node weights carry positions; each undirected edge is added exactly once.
pub fn to_petgraph(graph: &Graph) -> UnGraph<(f64, f64), ()> {
    let mut pg = UnGraph::with_capacity(graph.len(), graph.edge_count());
    for node in graph.nodes() {
        pg.add_node((node.x, node.y));
    }
    for u in 0..graph.len() {
        for &v in graph.neighbors(u) {
            if v > u {
                pg.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
            }
        }
    }
    pg
}

/// Convert a `petgraph` undirected graph with position weights back into the
/// native store. Adjacency follows petgraph's edge iteration order.
pub fn from_petgraph(pg: &UnGraph<(f64, f64), ()>) -> Graph {
    let mut graph = Graph::new();
    for idx in pg.node_indices() {
        let (x, y) = pg[idx];
        graph.push_node(x, y);
    }
    for edge in pg.edge_references() {
        graph.connect(edge.source().index(), edge.target().index());
    }
    graph
}
