#![forbid(unsafe_code)]

//! Rank-based layered layout for compound directed graphs.
//!
//! The pipeline follows the classic Sugiyama/dagre shape: break cycles, assign ranks, split long
//! edges, order each rank to reduce crossings, then assign coordinates with Brandes-Köpf.

pub mod acyclic;
pub mod coordinate_system;
pub mod graph;
pub mod greedy_fas;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;

pub use graph::{Edge, EdgeLabel, LayerGraph, MAX_MINLEN, NodeLabel};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

/// Pins the Brandes-Köpf result to one of the four candidate alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acyclicer {
    #[default]
    Dfs,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerOptions {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub align: Option<Align>,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            edgesep: 10.0,
            ranksep: 50.0,
            align: None,
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
        }
    }
}

/// Final geometry of one input node. `x`/`y` are the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `None` for clusters.
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Every input node in insertion order, clusters included.
    pub nodes: IndexMap<String, NodeGeometry>,
    pub width: f64,
    pub height: f64,
}

/// Lays out `input` without mutating it.
///
/// Self-loops and edges incident to clusters are ignored. Empty clusters are treated as leaves.
pub fn layout(input: &LayerGraph, opts: &LayerOptions) -> Layout {
    let mut g = input.clone();
    let real_nodes = g.node_count();
    if real_nodes == 0 {
        return Layout::default();
    }

    let keep: Vec<bool> = g
        .edges()
        .iter()
        .map(|e| e.v != e.w && g.is_leaf(e.v) && g.is_leaf(e.w))
        .collect();
    g.retain_edges(&keep);

    tracing::debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        rankdir = ?opts.rankdir,
        ranker = ?opts.ranker,
        "strata layout"
    );

    coordinate_system::adjust(&mut g, opts.rankdir);
    acyclic::run(&mut g, opts.acyclicer);
    rank::rank(&mut g, opts.ranker);
    normalize::run(&mut g);
    order::order(&mut g);
    position::position(&mut g, opts);
    coordinate_system::undo(&mut g, opts.rankdir);

    build_layout(&g, real_nodes)
}

fn build_layout(g: &LayerGraph, real_nodes: usize) -> Layout {
    let leaves: Vec<usize> = (0..real_nodes).filter(|&ix| g.is_leaf(ix)).collect();

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &ix in &leaves {
        let n = g.label(ix);
        let (x, y) = (n.x.unwrap_or(0.0), n.y.unwrap_or(0.0));
        min_x = min_x.min(x - n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    }

    let mut nodes: IndexMap<String, NodeGeometry> = IndexMap::with_capacity(real_nodes);
    for ix in 0..real_nodes {
        let n = g.label(ix);
        if g.is_leaf(ix) {
            nodes.insert(
                g.id(ix).to_string(),
                NodeGeometry {
                    x: n.x.unwrap_or(0.0) - min_x,
                    y: n.y.unwrap_or(0.0) - min_y,
                    width: n.width,
                    height: n.height,
                    rank: n.rank,
                },
            );
        } else {
            nodes.insert(g.id(ix).to_string(), cluster_hull(g, ix, min_x, min_y));
        }
    }

    Layout {
        nodes,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

fn cluster_hull(g: &LayerGraph, cluster: usize, dx: f64, dy: f64) -> NodeGeometry {
    let mut x1 = f64::INFINITY;
    let mut y1 = f64::INFINITY;
    let mut x2 = f64::NEG_INFINITY;
    let mut y2 = f64::NEG_INFINITY;
    let mut stack: Vec<usize> = g.children(cluster).to_vec();
    while let Some(ix) = stack.pop() {
        if !g.is_leaf(ix) {
            stack.extend_from_slice(g.children(ix));
            continue;
        }
        let n = g.label(ix);
        if n.dummy {
            continue;
        }
        let (x, y) = (n.x.unwrap_or(0.0) - dx, n.y.unwrap_or(0.0) - dy);
        x1 = x1.min(x - n.width / 2.0);
        y1 = y1.min(y - n.height / 2.0);
        x2 = x2.max(x + n.width / 2.0);
        y2 = y2.max(y + n.height / 2.0);
    }
    if !x1.is_finite() {
        return NodeGeometry {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rank: None,
        };
    }
    NodeGeometry {
        x: (x1 + x2) / 2.0,
        y: (y1 + y2) / 2.0,
        width: x2 - x1,
        height: y2 - y1,
        rank: None,
    }
}
