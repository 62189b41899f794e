//! Graph persistence: the plain-text edge-list format and JSON helpers

use super::Graph;
use crate::{Result, SylvaError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Write a graph to a file in the plain-text format.
///
/// First line `<nodeCount> <edgeCount>`; then one `<x> <y>` line per node in
/// identifier order; then one `<u> <v>` line per undirected edge with u < v,
/// each edge exactly once.
pub fn write_graph<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<()> {
    write_to(graph, BufWriter::new(File::create(path)?))
}

/// Write a graph to any writer in the plain-text format
pub fn write_to<W: Write>(graph: &Graph, mut writer: W) -> Result<()> {
    writeln!(writer, "{} {}", graph.len(), graph.edge_count())?;
    for node in graph.nodes() {
        writeln!(writer, "{} {}", node.x, node.y)?;
    }
    for u in 0..graph.len() {
        for &v in graph.neighbors(u) {
            if v > u {
                writeln!(writer, "{} {}", u, v)?;
            }
        }
    }
    Ok(())
}

/// Read a graph from a file in the plain-text format.
///
/// Either the file parses into a fully populated graph or the load fails
/// entirely; no partial recovery is attempted.
pub fn read_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    read_from(BufReader::new(File::open(path)?))
}

/// Read a graph from any buffered reader in the plain-text format
pub fn read_from<R: BufRead>(reader: R) -> Result<Graph> {
    let mut lines = reader.lines();

    let header = next_line(&mut lines, "header")?;
    let (n, m): (usize, usize) = parse_pair(&header, "header")?;

    let mut graph = Graph::new();
    for i in 0..n {
        let line = next_line(&mut lines, "node line")?;
        let (x, y): (f64, f64) = parse_pair(&line, &format!("node {}", i))?;
        graph.push_node(x, y);
    }

    for e in 0..m {
        let line = next_line(&mut lines, "edge line")?;
        let (u, v): (usize, usize) = parse_pair(&line, &format!("edge {}", e))?;
        if u >= v {
            return Err(SylvaError::MalformedFile(format!(
                "edge {} endpoints out of order: {} {}",
                e, u, v
            )));
        }
        if v >= n {
            return Err(SylvaError::MalformedFile(format!(
                "edge {} endpoint {} exceeds node count {}",
                e, v, n
            )));
        }
        graph.connect(u, v);
    }

    Ok(graph)
}

fn next_line<B: BufRead>(lines: &mut std::io::Lines<B>, what: &str) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(SylvaError::MalformedFile(format!("missing {}", what))),
    }
}

fn parse_pair<T: FromStr>(line: &str, what: &str) -> Result<(T, T)> {
    let mut fields = line.split_whitespace();
    let a = fields.next().and_then(|s| s.parse().ok());
    let b = fields.next().and_then(|s| s.parse().ok());
    match (a, b, fields.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(SylvaError::MalformedFile(format!(
            "expected two values in {}: {:?}",
            what, line
        ))),
    }
}

/// Save any serializable value to a JSON file
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Load a value from a JSON file
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}
