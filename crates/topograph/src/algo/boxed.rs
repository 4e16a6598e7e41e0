//! Box-aware composite layout.
//!
//! Boxes are collapsed innermost type first: the contents of every `app` box are laid out on
//! their own, their offsets from the center of their hull are recorded and the box takes the
//! hull's size. Edges touching the contents are redirected to the box, then the contents are
//! removed. `namespace` and `cluster` boxes follow. The default layout runs over what remains and
//! contents are restored outermost first at their box's position plus their offset.

use super::Algorithm;
use crate::bbox::BoundingBox;
use crate::error::Result;
use crate::graph::{BoxType, Edge, Graph, GraphIndex, LayoutResult, Node, Point, Topology};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

const INNER_TO_OUTER: [BoxType; 3] = [BoxType::App, BoxType::Namespace, BoxType::Cluster];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxLayoutOptions {
    /// Runs over the collapsed graph and over any box type without its own layout.
    pub default_layout: Box<Algorithm>,
    pub app_box_layout: Option<Box<Algorithm>>,
    pub namespace_box_layout: Option<Box<Algorithm>>,
    pub cluster_box_layout: Option<Box<Algorithm>>,
}

impl Default for BoxLayoutOptions {
    fn default() -> Self {
        Self {
            default_layout: Box::default(),
            app_box_layout: None,
            namespace_box_layout: None,
            cluster_box_layout: None,
        }
    }
}

impl BoxLayoutOptions {
    pub fn with_default(algorithm: Algorithm) -> Self {
        Self {
            default_layout: Box::new(algorithm),
            ..Self::default()
        }
    }

    fn for_box(&self, box_type: BoxType) -> &Algorithm {
        let specific = match box_type {
            BoxType::App => &self.app_box_layout,
            BoxType::Namespace => &self.namespace_box_layout,
            BoxType::Cluster => &self.cluster_box_layout,
        };
        specific.as_deref().unwrap_or(&self.default_layout)
    }
}

/// Replaces edges into boxed nodes with edges into their boxes. Keys persist across box types so
/// a pair is only ever generated once.
#[derive(Debug, Default)]
struct SyntheticEdges {
    next_id: usize,
    generated: FxHashSet<(String, String)>,
}

impl SyntheticEdges {
    fn edge(&mut self, source: String, target: String) -> Option<Edge> {
        if source == target || !self.generated.insert((source.clone(), target.clone())) {
            return None;
        }
        let id = format!("synthetic-edge-{}", self.next_id);
        self.next_id += 1;
        Some(Edge::new(id, source, target))
    }
}

/// The working copy: nodes keyed by id so removals keep the remaining order.
struct Working {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Working {
    fn new(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|n| {
                let mut n = n.clone();
                n.locked = false;
                (n.id.clone(), n)
            })
            .collect();
        Self {
            nodes,
            edges: graph.edges.clone(),
        }
    }

    /// Every node below `root`, in working order.
    fn descendants(&self, root: &str) -> Vec<String> {
        self.nodes
            .values()
            .filter(|n| self.ancestors(&n.id).any(|a| a == root))
            .map(|n| n.id.clone())
            .collect()
    }

    fn ancestors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut cur = self.nodes.get(id).and_then(|n| n.parent.as_deref());
        std::iter::from_fn(move || {
            let id = cur?;
            cur = self.nodes.get(id).and_then(|n| n.parent.as_deref());
            Some(id)
        })
    }

    fn graph(&self) -> Graph {
        Graph {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.clone(),
        }
    }
}

/// One collapsed box: where its children sit relative to the box center.
struct Collapsed {
    box_id: String,
    offsets: Vec<(String, Point)>,
}

pub(crate) fn layout(index: &GraphIndex<'_>, opts: &BoxLayoutOptions) -> Result<LayoutResult> {
    let mut work = Working::new(index.graph());
    let mut synthetic = SyntheticEdges::default();
    let mut collapsed: Vec<Collapsed> = Vec::new();

    for box_type in INNER_TO_OUTER {
        let algorithm = opts.for_box(box_type);
        let mut boxes: Vec<(usize, String)> = work
            .nodes
            .values()
            .filter(|n| n.box_type == Some(box_type))
            .map(|n| (work.ancestors(&n.id).count(), n.id.clone()))
            .collect();
        // Deepest first, so a box nested in a box of the same type is already collapsed.
        boxes.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, box_id) in boxes {
            let members = work.descendants(&box_id);
            if members.is_empty() {
                continue;
            }
            let removed: FxHashSet<&str> = members.iter().map(String::as_str).collect();
            let sub = Graph {
                nodes: members
                    .iter()
                    .filter_map(|m| work.nodes.get(m))
                    .map(|n| Node {
                        parent: n.parent.clone().filter(|p| p != &box_id),
                        ..n.clone()
                    })
                    .collect(),
                edges: work
                    .edges
                    .iter()
                    .filter(|e| {
                        removed.contains(e.source.as_str()) && removed.contains(e.target.as_str())
                    })
                    .cloned()
                    .collect(),
            };
            let inner = crate::layout(&sub, algorithm)?;

            let hull = BoundingBox::hull(sub.nodes.iter().filter_map(|n| {
                inner
                    .positions
                    .get(&n.id)
                    .map(|&p| (p, n.width, n.height))
            }));
            let center = hull.center();
            let offsets = sub
                .nodes
                .iter()
                .filter_map(|n| {
                    inner
                        .positions
                        .get(&n.id)
                        .map(|p| (n.id.clone(), Point::new(p.x - center.x, p.y - center.y)))
                })
                .collect();

            let normalize = |id: &str| {
                if removed.contains(id) {
                    box_id.clone()
                } else {
                    id.to_string()
                }
            };
            let mut kept = Vec::with_capacity(work.edges.len());
            let mut added = Vec::new();
            for e in work.edges.drain(..) {
                let touches_source = removed.contains(e.source.as_str());
                let touches_target = removed.contains(e.target.as_str());
                if touches_source || touches_target {
                    added.extend(synthetic.edge(normalize(&e.source), normalize(&e.target)));
                } else {
                    kept.push(e);
                }
            }
            kept.extend(added);
            work.edges = kept;

            work.nodes.retain(|id, _| !removed.contains(id.as_str()));
            if let Some(b) = work.nodes.get_mut(&box_id) {
                if !hull.is_empty() {
                    b.width = hull.width;
                    b.height = hull.height;
                }
                b.label_width = 0.0;
                b.label_height = 0.0;
            }
            tracing::trace!(box_id = %box_id, box_type = box_type.as_str(), "box collapsed");
            collapsed.push(Collapsed { box_id, offsets });
        }
    }

    let outer = crate::layout(&work.graph(), &opts.default_layout)?;
    let mut absolute: FxHashMap<String, Point> = outer.positions.into_iter().collect();
    for c in collapsed.iter().rev() {
        let Some(&base) = absolute.get(&c.box_id) else {
            continue;
        };
        for (child, offset) in &c.offsets {
            absolute.insert(child.clone(), Point::new(base.x + offset.x, base.y + offset.y));
        }
    }

    tracing::debug!(boxes = collapsed.len(), "box layout restored");
    let positions = index
        .leaves()
        .filter(|&ix| !index.node(ix).locked)
        .filter_map(|ix| {
            let id = index.node_id(ix);
            absolute.get(id).map(|&p| (id.to_string(), p))
        })
        .collect();
    Ok(LayoutResult {
        positions,
        grid: outer.grid,
    })
}
