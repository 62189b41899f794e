//! Rendering of laid-out graphs to PNG files (feature `viz`)

use crate::{Graph, Result, SylvaError};
use plotters::prelude::*;

const EDGE_COLOR: RGBColor = RGBColor(128, 128, 128);
const NODE_COLOR: RGBColor = RGBColor(135, 206, 235);

/// Draw a graph to a PNG file: edges as grey segments, nodes as filled
/// circles, axes spanning the graph's bounding box.
pub fn render_png(graph: &Graph, path: &str, width: u32, height: u32) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (min_x, max_x, min_y, max_y) = padded_bounds(graph);
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)
        .map_err(render_err)?;

    for u in 0..graph.len() {
        for &v in graph.neighbors(u) {
            if v > u {
                let segment = vec![
                    (graph.node(u).x, graph.node(u).y),
                    (graph.node(v).x, graph.node(v).y),
                ];
                chart
                    .draw_series(LineSeries::new(segment, &EDGE_COLOR))
                    .map_err(render_err)?;
            }
        }
    }

    chart
        .draw_series(
            graph
                .nodes()
                .iter()
                .map(|n| Circle::new((n.x, n.y), 4, NODE_COLOR.filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn padded_bounds(graph: &Graph) -> (f64, f64, f64, f64) {
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
    if graph.is_empty() {
        return (-1.0, 1.0, -1.0, 1.0);
    }
    let pad = (max_x - min_x).max(max_y - min_y).max(1.0) * 0.05;
    (min_x - pad, max_x + pad, min_y - pad, max_y + pad)
}

fn render_err<E: std::fmt::Display>(e: E) -> SylvaError {
    SylvaError::RenderError(e.to_string())
}
