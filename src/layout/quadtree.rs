//! Region quadtree with center-of-mass aggregation for Barnes–Hut repulsion.
//!
//! Cells live in an arena addressed by index and the whole arena is reset
//! (capacity kept) at every layout iteration. Each cell is either empty,
//! holds one point, or is subdivided into four equal quadrants.

use crate::{Result, SylvaError};
use ndarray::ArrayView1;

/// Stabilizing epsilon added to every distance
const DIST_EPS: f64 = 1e-4;

/// Cells smaller than this can only arise from coincident points
const MIN_CELL_SIDE: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellState {
    Empty,
    /// One point: the graph node index it belongs to
    Leaf(usize),
    /// Four child cells, in NW, NE, SW, SE order
    Internal([usize; 4]),
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    cx: f64,
    cy: f64,
    side: f64,
    mass: usize,
    mx: f64,
    my: f64,
    state: CellState,
}

impl Cell {
    fn new(cx: f64, cy: f64, side: f64) -> Self {
        Cell {
            cx,
            cy,
            side,
            mass: 0,
            mx: 0.0,
            my: 0.0,
            state: CellState::Empty,
        }
    }

    /// Quadrant index for a point, matching the NW, NE, SW, SE child order.
    /// Points exactly on a bisector go east/north.
    fn quadrant(&self, x: f64, y: f64) -> usize {
        let east = x >= self.cx;
        let north = y >= self.cy;
        match (north, east) {
            (true, false) => 0,
            (true, true) => 1,
            (false, false) => 2,
            (false, true) => 3,
        }
    }
}

/// A two-dimensional region quadtree over node positions.
///
/// Built fresh each layout iteration and fully discarded (or reset) at
/// iteration end; holds node indices, never references into the graph.
pub struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    /// Create a quadtree covering the square centered at (cx, cy) with the
    /// given side length
    pub fn new(cx: f64, cy: f64, side: f64) -> Self {
        QuadTree {
            cells: vec![Cell::new(cx, cy, side)],
        }
    }

    /// Clear the arena and re-root it over a new square, keeping the
    /// allocated capacity
    pub fn reset(&mut self, cx: f64, cy: f64, side: f64) {
        self.cells.clear();
        self.cells.push(Cell::new(cx, cy, side));
    }

    /// Total mass (number of inserted points)
    pub fn mass(&self) -> usize {
        self.cells[0].mass
    }

    /// Center of mass of all inserted points
    pub fn center_of_mass(&self) -> (f64, f64) {
        (self.cells[0].mx, self.cells[0].my)
    }

    /// Insert the point (x, y) carrying graph node index `id`.
    ///
    /// Coincident points cannot be separated by subdivision and are
    /// reported as an error once the cell side underflows.
    pub fn insert(&mut self, id: usize, x: f64, y: f64) -> Result<()> {
        self.insert_into(0, id, x, y)
    }

    fn insert_into(&mut self, cell: usize, id: usize, x: f64, y: f64) -> Result<()> {
        match self.cells[cell].state {
            CellState::Empty => {
                let c = &mut self.cells[cell];
                c.state = CellState::Leaf(id);
                c.mass = 1;
                c.mx = x;
                c.my = y;
                Ok(())
            }
            CellState::Leaf(occupant) => {
                if self.cells[cell].side < MIN_CELL_SIDE {
                    return Err(SylvaError::CoincidentPoints(x, y));
                }
                // a leaf's center of mass is its single point
                let (ox, oy) = (self.cells[cell].mx, self.cells[cell].my);
                self.merge_mass(cell, x, y);
                let children = self.subdivide(cell);
                let old_quadrant = self.cells[cell].quadrant(ox, oy);
                self.insert_into(children[old_quadrant], occupant, ox, oy)?;
                let new_quadrant = self.cells[cell].quadrant(x, y);
                self.insert_into(children[new_quadrant], id, x, y)
            }
            CellState::Internal(children) => {
                self.merge_mass(cell, x, y);
                let quadrant = self.cells[cell].quadrant(x, y);
                self.insert_into(children[quadrant], id, x, y)
            }
        }
    }

    /// Fold one more point into a cell's running mass and center of mass
    fn merge_mass(&mut self, cell: usize, x: f64, y: f64) {
        let c = &mut self.cells[cell];
        let mass = c.mass as f64;
        c.mx = (c.mx * mass + x) / (mass + 1.0);
        c.my = (c.my * mass + y) / (mass + 1.0);
        c.mass += 1;
    }

    /// Split a cell into four equal empty quadrants
    fn subdivide(&mut self, cell: usize) -> [usize; 4] {
        let Cell { cx, cy, side, .. } = self.cells[cell];
        let half = side / 2.0;
        let offset = half / 2.0;
        let first = self.cells.len();
        self.cells.push(Cell::new(cx - offset, cy + offset, half)); // NW
        self.cells.push(Cell::new(cx + offset, cy + offset, half)); // NE
        self.cells.push(Cell::new(cx - offset, cy - offset, half)); // SW
        self.cells.push(Cell::new(cx + offset, cy - offset, half)); // SE
        let children = [first, first + 1, first + 2, first + 3];
        self.cells[cell].state = CellState::Internal(children);
        children
    }

    /// Accumulated Barnes–Hut repulsion on the node `target` at (tx, ty).
    ///
    /// Far cells (side/distance < theta) and single-point cells act as one
    /// pseudo-body of their total mass at their center of mass; near
    /// aggregates recurse into their quadrants. Repulsion from a single
    /// point is attenuated by its topological distance to the target,
    /// raised to `exponent`.
    pub fn repulsion(
        &self,
        target: usize,
        tx: f64,
        ty: f64,
        theta: f64,
        k: f64,
        topo_row: ArrayView1<'_, u32>,
        exponent: i32,
    ) -> (f64, f64) {
        self.cell_repulsion(0, target, tx, ty, theta, k, topo_row, exponent)
    }

    #[allow(clippy::too_many_arguments)]
    fn cell_repulsion(
        &self,
        cell: usize,
        target: usize,
        tx: f64,
        ty: f64,
        theta: f64,
        k: f64,
        topo_row: ArrayView1<'_, u32>,
        exponent: i32,
    ) -> (f64, f64) {
        let c = &self.cells[cell];
        if c.mass == 0 {
            return (0.0, 0.0);
        }
        if c.state == CellState::Leaf(target) {
            return (0.0, 0.0);
        }

        let dx = c.mx - tx;
        let dy = c.my - ty;
        let dist = (dx * dx + dy * dy).sqrt() + DIST_EPS;

        let single = matches!(c.state, CellState::Leaf(_));
        if c.side / dist < theta || single {
            let topo = match c.state {
                CellState::Leaf(occupant) => topo_row[occupant].max(1) as f64,
                _ => 1.0,
            };
            let force = k * k * c.mass as f64 / (dist * topo.powi(exponent));
            (-dx / dist * force, -dy / dist * force)
        } else {
            match c.state {
                CellState::Internal(children) => {
                    let mut total = (0.0, 0.0);
                    for &child in &children {
                        let (fx, fy) =
                            self.cell_repulsion(child, target, tx, ty, theta, k, topo_row, exponent);
                        total.0 += fx;
                        total.1 += fy;
                    }
                    total
                }
                // empty and single-point cells were handled above
                _ => (0.0, 0.0),
            }
        }
    }
}
