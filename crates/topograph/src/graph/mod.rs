//! Topology data model: nodes, edges, and the positions layouts produce.

mod index;
pub mod wire;

pub use index::{GraphIndex, Topology};

use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width and height given to nodes whose size is not known.
pub const DEFAULT_NODE_SIZE: f64 = 40.0;

fn default_size() -> f64 {
    DEFAULT_NODE_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Aggregate,
    App,
    Box,
    Service,
    #[default]
    Unknown,
    Workload,
}

/// What a group node boxes together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    App,
    Cluster,
    Namespace,
}

impl BoxType {
    pub fn as_str(self) -> &'static str {
        match self {
            BoxType::App => "app",
            BoxType::Cluster => "cluster",
            BoxType::Namespace => "namespace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    /// Label extent, only counted when a layout asks for label-inclusive dimensions.
    #[serde(default)]
    pub label_width: f64,
    #[serde(default)]
    pub label_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_type: Option<BoxType>,
    #[serde(default)]
    pub locked: bool,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            width: DEFAULT_NODE_SIZE,
            height: DEFAULT_NODE_SIZE,
            label_width: 0.0,
            label_height: 0.0,
            namespace: None,
            app: None,
            service: None,
            workload: None,
            node_type: NodeType::Unknown,
            box_type: None,
            locked: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = Some(workload.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Marks the node as a group of the given kind.
    pub fn boxed(mut self, box_type: BoxType) -> Self {
        self.node_type = NodeType::Box;
        self.box_type = Some(box_type);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// `{namespace}.{workload > service > app > id}`, the key rows are sorted by.
    pub fn sort_name(&self) -> String {
        let name = self
            .workload
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.service.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| self.app.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.id);
        format!("{}.{}", self.namespace.as_deref().unwrap_or(""), name)
    }

    /// Width and height used for overlap avoidance. Labels sit below the node.
    pub fn layout_size(&self, include_labels: bool) -> (f64, f64) {
        if include_labels {
            (
                self.width.max(self.label_width),
                self.height + self.label_height,
            )
        } else {
            (self.width, self.height)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight: None,
            min_length: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge with a generated id (`e{n}`).
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        let id = format!("e{}", self.edges.len());
        self.edges.push(Edge::new(id, source, target));
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids: FxHashSet<&str> = FxHashSet::default();
        for n in &self.nodes {
            if !ids.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode { id: n.id.clone() });
            }
        }
        for e in &self.edges {
            if !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()) {
                return Err(Error::MissingEndpoint {
                    edge_id: e.id.clone(),
                });
            }
        }

        let parent_of: FxHashMap<&str, &str> = self
            .nodes
            .iter()
            .filter_map(|n| n.parent.as_deref().map(|p| (n.id.as_str(), p)))
            .collect();
        for n in &self.nodes {
            let Some(parent) = n.parent.as_deref() else {
                continue;
            };
            if !ids.contains(parent) {
                return Err(Error::UnknownParent {
                    id: n.id.clone(),
                    parent: parent.to_string(),
                });
            }
            let mut cur = parent;
            for _ in 0..self.nodes.len() {
                if cur == n.id {
                    return Err(Error::ParentCycle { id: n.id.clone() });
                }
                match parent_of.get(cur) {
                    Some(next) => cur = next,
                    None => break,
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rows and columns a grid layout settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridShape>,
}
