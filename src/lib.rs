//! # Sylva: random trees, random graphs, spring layouts
//!
//! This library generates random graph structures under several stochastic
//! models and computes 2-D force-directed layouts for them.
//!
//! ## Features
//!
//! - **Graph store**: adjacency-list graphs with stable dense indices
//! - **Generators**: Erdős–Rényi graphs, uniform and preferential-attachment
//!   random trees, stochastic binary ("cherry") growth, and alpha-parameterized
//!   n-ary growth driven by subtree leaf counts
//! - **Layout**: Barnes–Hut approximated spring embedding with topological
//!   repulsion attenuation, gravity and simulated-annealing cooling
//! - **I/O**: a plain-text graph format plus JSON serialization
//! - **Interop**: conversion to and from `petgraph`
//!
//! All randomized entry points take an explicit random generator (or a seed),
//! so identical seeds reproduce identical graphs and layouts.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Graph data structures, distances and persistence
pub mod graph;

/// Random graph and tree generators
pub mod generate;

/// Force-directed layout and its spatial index
pub mod layout;

/// Rendering of laid-out graphs to image files
#[cfg(feature = "viz")]
pub mod viz;

// Re-export commonly used types
pub use graph::{bfs_distances, DistanceMatrix, Graph, Node};
pub use generate::{random_binary_tree, random_graph, random_nary_tree, random_tree, AttachmentMode};
pub use layout::{spring_layout, LayoutOptions};

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum SylvaError {
    /// The graph is not a tree produced by a growth engine, or its
    /// leaf-count annotations are inconsistent
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// A caller-supplied parameter is outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A persisted graph file could not be parsed
    #[error("Malformed graph file: {0}")]
    MalformedFile(String),

    /// Two coincident points were inserted into the spatial index
    #[error("Coincident points near ({0}, {1})")]
    CoincidentPoints(f64, f64),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Rendering error
    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, SylvaError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        generate::{
            grow_binary_step, grow_nary_step, random_binary_tree, random_graph, random_nary_tree,
            random_tree, AttachmentMode,
        },
        graph::{bfs_distances, read_graph, write_graph, DistanceMatrix, Graph, Node},
        layout::{spring_layout, LayoutOptions, QuadTree},
        Result, SylvaError,
    };
}
