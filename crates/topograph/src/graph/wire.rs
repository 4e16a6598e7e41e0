//! Topology documents as the console backend serves them.
//!
//! Two shapes are accepted: the element envelope
//! `{"elements": {"nodes": [{"data": {...}}], "edges": [{"data": {...}}]}}` and the plain serde
//! form of [`Graph`]. Envelope nodes carry no geometry, so they get a caller-chosen size.

use super::{BoxType, Edge, Graph, Node, NodeType};
use crate::Result;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Elements {
    #[serde(default)]
    nodes: Vec<Wrapped<NodeData>>,
    #[serde(default)]
    edges: Vec<Wrapped<EdgeData>>,
}

#[derive(Debug, Deserialize)]
struct Wrapped<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeData {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    workload: Option<String>,
    #[serde(default)]
    node_type: Option<NodeType>,
    #[serde(default)]
    is_box: Option<BoxType>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EdgeData {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    min_length: Option<u32>,
}

/// Parses either document shape. Envelope nodes without an explicit size get `default_size`.
pub fn from_json(json: &str, default_size: (f64, f64)) -> Result<Graph> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    let elements = value.get_mut("elements").map(serde_json::Value::take);
    let graph = match elements {
        Some(elements) => from_elements(serde_json::from_value(elements)?, default_size),
        None => serde_json::from_value(value)?,
    };
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "decoded topology"
    );
    Ok(graph)
}

fn from_elements(elements: Elements, (width, height): (f64, f64)) -> Graph {
    let nodes = elements
        .nodes
        .into_iter()
        .map(|Wrapped { data }| {
            let node_type = match (data.node_type, data.is_box) {
                (Some(t), _) => t,
                (None, Some(_)) => NodeType::Box,
                (None, None) => NodeType::Unknown,
            };
            Node {
                width: data.width.unwrap_or(width),
                height: data.height.unwrap_or(height),
                parent: data.parent.filter(|p| !p.is_empty()),
                namespace: data.namespace,
                app: data.app,
                service: data.service,
                workload: data.workload,
                node_type,
                box_type: data.is_box,
                ..Node::new(data.id)
            }
        })
        .collect();
    let edges = elements
        .edges
        .into_iter()
        .map(|Wrapped { data }| Edge {
            weight: data.weight,
            min_length: data.min_length,
            ..Edge::new(data.id, data.source, data.target)
        })
        .collect();
    Graph { nodes, edges }
}
