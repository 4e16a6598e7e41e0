#![forbid(unsafe_code)]

//! Headless layout and highlight core for service topology graphs.
//!
//! Layouts are pure functions from a [`Graph`] snapshot to one [`Point`] per leaf node. The
//! highlight engine maps a hovered or selected element to a per-element [`Highlight`] state.
//! The two never call each other.

pub mod algo;
pub mod bbox;
pub mod error;
pub mod graph;
pub mod highlight;

pub use algo::{
    Algorithm, BoxLayoutOptions, BreadthFirstOptions, CellHint, ConcentricOptions, GridOptions,
    HierarchicalOptions, Hook, NodeContext, PostOptions, Size,
};
pub use bbox::{BoundingBox, BoxSpec};
pub use error::{Error, Result};
pub use graph::{
    BoxType, DEFAULT_NODE_SIZE, Edge, Graph, GraphIndex, GridShape, LayoutResult, Node, NodeType,
    Point, Topology,
};
pub use highlight::{ElementRef, Highlight, Highlighter, Partition, partition};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Headless layout entry point. The graph is validated first; every valid graph (empty,
/// disconnected or cyclic included) lays out without error.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    graph.validate()?;
    let index = GraphIndex::new(graph);
    algo::run(&index, algorithm)
}
