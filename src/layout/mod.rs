//! Force-directed layout: Barnes–Hut repulsion, exact edge attraction,
//! centering gravity and a simulated-annealing cooling schedule.

mod quadtree;

pub use quadtree::QuadTree;

use crate::graph::DistanceMatrix;
use crate::{Graph, Result};

/// Fraction of the bounding-box span added as margin on every side
const BOX_MARGIN: f64 = 0.05;

/// Configuration for [`spring_layout`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Iteration budget; the loop may stop earlier on convergence
    pub max_iterations: usize,
    /// Barnes–Hut far-field criterion
    pub theta: f64,
    /// Multiplicative temperature decay per iteration
    pub cooling: f64,
    /// Strength of the pull toward the bounding-box center
    pub gravity: f64,
    /// Exponent applied to topological distance when attenuating repulsion
    pub repulsion_exponent: i32,
    /// Displacements below this magnitude are not applied
    pub min_displacement: f64,
    /// The layout has converged once the largest applied displacement of an
    /// iteration falls below this threshold
    pub tolerance: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            max_iterations: 100,
            theta: 0.5,
            cooling: 0.95,
            gravity: 0.01,
            repulsion_exponent: 2,
            min_displacement: 0.01,
            tolerance: 0.1,
        }
    }
}

impl LayoutOptions {
    /// Default options with the given iteration budget
    pub fn new(max_iterations: usize) -> Self {
        LayoutOptions {
            max_iterations,
            ..Default::default()
        }
    }

    /// Set the Barnes–Hut far-field criterion
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set the gravity strength
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the cooling factor
    pub fn with_cooling(mut self, cooling: f64) -> Self {
        self.cooling = cooling;
        self
    }

    /// Set the topological-distance exponent
    pub fn with_repulsion_exponent(mut self, exponent: i32) -> Self {
        self.repulsion_exponent = exponent;
        self
    }
}

/// Compute a 2-D force-directed layout, mutating node positions in place.
///
/// Hop distances between all node pairs are precomputed once and used to
/// attenuate repulsion between graph-distant nodes. Each iteration rebuilds
/// the quadtree over the current bounding box, accumulates repulsion,
/// attraction and gravity into per-node displacements, applies them capped
/// by the current temperature, and cools. Returns normally both on
/// convergence and on iteration exhaustion; fails only when coincident node
/// positions make the spatial index degenerate.
pub fn spring_layout(graph: &mut Graph, options: &LayoutOptions) -> Result<()> {
    if graph.is_empty() {
        return Ok(());
    }

    let distances = DistanceMatrix::compute(graph);
    let n = graph.len();
    let mut quadtree = QuadTree::new(0.0, 0.0, 0.0);
    let mut temperature = -1.0;

    for _ in 0..options.max_iterations {
        for i in 0..n {
            let node = graph.node_mut(i);
            node.dx = 0.0;
            node.dy = 0.0;
        }

        // bounding box with margin; the box also fixes this iteration's
        // characteristic edge length k
        let (min_x, max_x, min_y, max_y) = bounding_box(graph);
        let span = (max_x - min_x).max(max_y - min_y);
        let side = span * (1.0 + 2.0 * BOX_MARGIN);
        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        let k = side / (n as f64).sqrt();

        quadtree.reset(center_x, center_y, side);
        for i in 0..n {
            let node = graph.node(i);
            quadtree.insert(i, node.x, node.y)?;
        }

        // repulsion, approximated through the quadtree
        for i in 0..n {
            let (tx, ty) = (graph.node(i).x, graph.node(i).y);
            let (fx, fy) = quadtree.repulsion(
                i,
                tx,
                ty,
                options.theta,
                k,
                distances.row(i),
                options.repulsion_exponent,
            );
            let node = graph.node_mut(i);
            node.dx += fx;
            node.dy += fy;
        }

        // exact attraction along every edge, magnitude dist²/k
        for u in 0..n {
            for index in 0..graph.degree(u) {
                let v = graph.neighbors(u)[index];
                if v <= u {
                    continue;
                }
                let dx = graph.node(v).x - graph.node(u).x;
                let dy = graph.node(v).y - graph.node(u).y;
                let dist = (dx * dx + dy * dy).sqrt();
                // dx/dist · dist²/k collapses to dx·dist/k
                let fx = dx * dist / k;
                let fy = dy * dist / k;
                let nu = graph.node_mut(u);
                nu.dx += fx;
                nu.dy += fy;
                let nv = graph.node_mut(v);
                nv.dx -= fx;
                nv.dy -= fy;
            }
        }

        // gravity toward the box center
        for i in 0..n {
            let node = graph.node_mut(i);
            node.dx += (center_x - node.x) * options.gravity * k;
            node.dy += (center_y - node.y) * options.gravity * k;
        }

        if temperature < 0.0 {
            temperature = 10.0 * k;
        }

        // apply displacements, capped by temperature
        let mut max_delta = 0.0f64;
        for i in 0..n {
            let node = graph.node_mut(i);
            let disp = (node.dx * node.dx + node.dy * node.dy).sqrt();
            if disp > options.min_displacement {
                let applied = disp.min(temperature);
                node.x += node.dx / disp * applied;
                node.y += node.dy / disp * applied;
                max_delta = max_delta.max(applied);
            }
        }

        temperature *= options.cooling;
        if max_delta < options.tolerance {
            break;
        }
    }

    Ok(())
}

fn bounding_box(graph: &Graph) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for node in graph.nodes() {
        min_x = min_x.min(node.x);
        max_x = max_x.max(node.x);
        min_y = min_y.min(node.y);
        max_y = max_y.max(node.y);
    }
    (min_x, max_x, min_y, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn path_graph(n: usize, seed: u64) -> Graph {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut g = Graph::new();
        g.append_nodes(n, 100.0, &mut rng);
        for i in 1..n {
            g.connect(i - 1, i);
        }
        g
    }

    #[test]
    fn test_empty_and_single_node() {
        let mut g = Graph::new();
        spring_layout(&mut g, &LayoutOptions::new(10)).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let mut g = Graph::new();
        g.append_nodes(1, 100.0, &mut rng);
        let before = (g.node(0).x, g.node(0).y);
        spring_layout(&mut g, &LayoutOptions::new(10)).unwrap();
        assert_eq!((g.node(0).x, g.node(0).y), before);
    }

    #[test]
    fn test_path_converges_within_budget() {
        // identical positions under a larger budget mean the loop broke on
        // convergence, not on exhaustion
        let mut g = path_graph(5, 11);
        let mut h = g.clone();
        spring_layout(&mut g, &LayoutOptions::new(200)).unwrap();
        spring_layout(&mut h, &LayoutOptions::new(300)).unwrap();
        for i in 0..5 {
            assert_eq!(g.node(i).x, h.node(i).x);
            assert_eq!(g.node(i).y, h.node(i).y);
        }
    }

    #[test]
    fn test_positions_stay_finite() {
        let mut g = crate::generate::random_nary_tree(40, 1.5, 100.0, 3).unwrap();
        spring_layout(&mut g, &LayoutOptions::new(100)).unwrap();
        for node in g.nodes() {
            assert!(node.x.is_finite());
            assert!(node.y.is_finite());
        }
    }

    #[test]
    fn test_determinism() {
        let mut g = crate::generate::random_graph_seeded(30, 0.15, 100.0, 21);
        let mut h = g.clone();
        let opts = LayoutOptions::new(80);
        spring_layout(&mut g, &opts).unwrap();
        spring_layout(&mut h, &opts).unwrap();
        assert_eq!(g, h);
    }

    #[test]
    fn test_neighbors_end_up_closer_than_average() {
        let mut g = path_graph(8, 4);
        spring_layout(&mut g, &LayoutOptions::new(150)).unwrap();

        let d = |a: usize, b: usize| {
            let dx = g.node(a).x - g.node(b).x;
            let dy = g.node(a).y - g.node(b).y;
            (dx * dx + dy * dy).sqrt()
        };
        let edge_mean = (0..7).map(|i| d(i, i + 1)).sum::<f64>() / 7.0;
        let mut pair_sum = 0.0;
        let mut pairs = 0;
        for a in 0..8 {
            for b in (a + 1)..8 {
                pair_sum += d(a, b);
                pairs += 1;
            }
        }
        assert!(edge_mean < pair_sum / pairs as f64);
    }
}
