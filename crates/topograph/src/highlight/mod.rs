//! Hover and selection highlighting.
//!
//! [`partition`] is the pure computation: given a focal element it flags the causally related
//! part of the topology. [`Highlighter`] keeps the hover/selection state a console needs and
//! recomputes the partition from scratch on every change.

use crate::graph::{BoxType, Topology};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    Neutral,
    Highlighted,
    Unhighlighted,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Node(String),
    Edge(String),
}

impl ElementRef {
    pub fn node(id: impl Into<String>) -> Self {
        ElementRef::Node(id.into())
    }

    pub fn edge(id: impl Into<String>) -> Self {
        ElementRef::Edge(id.into())
    }
}

/// One flag per node and per edge, by topology index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub nodes: Vec<Highlight>,
    pub edges: Vec<Highlight>,
}

impl Partition {
    pub fn neutral<T: Topology + ?Sized>(topo: &T) -> Self {
        Self {
            nodes: vec![Highlight::Neutral; topo.node_count()],
            edges: vec![Highlight::Neutral; topo.edge_count()],
        }
    }

    pub fn node(&self, ix: usize) -> Highlight {
        self.nodes.get(ix).copied().unwrap_or_default()
    }

    pub fn edge(&self, ix: usize) -> Highlight {
        self.edges.get(ix).copied().unwrap_or_default()
    }

    /// True when nothing is flagged.
    pub fn is_clear(&self) -> bool {
        self.nodes
            .iter()
            .chain(&self.edges)
            .all(|h| *h == Highlight::Neutral)
    }

    pub fn count(&self, state: Highlight) -> usize {
        self.nodes
            .iter()
            .chain(&self.edges)
            .filter(|h| **h == state)
            .count()
    }

    pub fn highlighted_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        indices(&self.nodes, Highlight::Highlighted)
    }

    pub fn highlighted_edges(&self) -> impl Iterator<Item = usize> + '_ {
        indices(&self.edges, Highlight::Highlighted)
    }
}

fn indices(flags: &[Highlight], state: Highlight) -> impl Iterator<Item = usize> + '_ {
    flags
        .iter()
        .enumerate()
        .filter(move |(_, h)| **h == state)
        .map(|(ix, _)| ix)
}

/// Elements reached so far, as membership flags.
struct Reach {
    nodes: Vec<bool>,
    edges: Vec<bool>,
}

impl Reach {
    fn new<T: Topology + ?Sized>(topo: &T) -> Self {
        Self {
            nodes: vec![false; topo.node_count()],
            edges: vec![false; topo.edge_count()],
        }
    }

    /// Walks edges against (`upstream`) or along their direction from `start`, marking every
    /// edge crossed and node reached.
    fn walk<T: Topology + ?Sized>(&mut self, topo: &T, start: usize, upstream: bool) {
        let mut seen = vec![false; topo.node_count()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        self.nodes[start] = true;
        while let Some(v) = queue.pop_front() {
            let edges = if upstream {
                topo.incoming(v)
            } else {
                topo.outgoing(v)
            };
            for &e in edges {
                let (s, t) = topo.endpoints(e);
                let next = if upstream { s } else { t };
                self.edges[e] = true;
                self.nodes[next] = true;
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    fn close_ancestors<T: Topology + ?Sized>(&mut self, topo: &T) {
        let reached: Vec<usize> = (0..self.nodes.len()).filter(|&ix| self.nodes[ix]).collect();
        for ix in reached {
            for a in topo.ancestors(ix) {
                self.nodes[a] = true;
            }
        }
    }

    /// Reached elements highlighted, everything else unhighlighted.
    fn into_partition(self) -> Partition {
        let flag = |reached: bool| {
            if reached {
                Highlight::Highlighted
            } else {
                Highlight::Unhighlighted
            }
        };
        Partition {
            nodes: self.nodes.into_iter().map(flag).collect(),
            edges: self.edges.into_iter().map(flag).collect(),
        }
    }
}

/// Flags for `focus`. No focus, or an id the topology does not know, leaves everything neutral.
pub fn partition<T: Topology + ?Sized>(topo: &T, focus: Option<&ElementRef>) -> Partition {
    let Some(focus) = focus else {
        return Partition::neutral(topo);
    };
    let mut reach = Reach::new(topo);
    match focus {
        ElementRef::Node(id) => {
            let Some(node) = topo.find_node(id) else {
                return Partition::neutral(topo);
            };
            match topo.box_type(node) {
                Some(BoxType::App) => {
                    for &child in topo.children(node) {
                        reach.walk(topo, child, true);
                        reach.walk(topo, child, false);
                    }
                }
                Some(_) => return box_only(topo, node),
                None if !topo.is_leaf(node) => return box_only(topo, node),
                None => {
                    reach.walk(topo, node, true);
                    reach.walk(topo, node, false);
                }
            }
        }
        ElementRef::Edge(id) => {
            let Some(edge) = topo.find_edge(id) else {
                return Partition::neutral(topo);
            };
            let (s, t) = topo.endpoints(edge);
            if s >= topo.node_count() || t >= topo.node_count() {
                return Partition::neutral(topo);
            }
            reach.edges[edge] = true;
            reach.walk(topo, s, true);
            reach.walk(topo, t, false);
        }
    }
    reach.close_ancestors(topo);
    let partition = reach.into_partition();
    tracing::trace!(
        highlighted = partition.count(Highlight::Highlighted),
        "highlight partition"
    );
    partition
}

/// A box other than an app box: the box and its ancestors, nothing dimmed.
fn box_only<T: Topology + ?Sized>(topo: &T, node: usize) -> Partition {
    let mut partition = Partition::neutral(topo);
    partition.nodes[node] = Highlight::Highlighted;
    for a in topo.ancestors(node) {
        partition.nodes[a] = Highlight::Highlighted;
    }
    partition
}

/// Hover and selection state. A selection wins over hovering until it is cleared.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    selected: Option<ElementRef>,
    hovered: Option<ElementRef>,
    partition: Partition,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&ElementRef> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&ElementRef> {
        self.hovered.as_ref()
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Clicking an element selects it; clicking nothing clears the selection and every flag.
    /// Clicking the selected element again changes nothing. Returns whether the flags changed.
    pub fn on_click<T: Topology + ?Sized>(&mut self, topo: &T, target: Option<ElementRef>) -> bool {
        if target.is_some() && target == self.selected {
            return false;
        }
        self.hovered = None;
        self.selected = target;
        self.refresh(topo, self.selected.clone())
    }

    /// Ignored while something is selected.
    pub fn on_mouse_in<T: Topology + ?Sized>(&mut self, topo: &T, target: ElementRef) -> bool {
        if self.selected.is_some() {
            return false;
        }
        self.hovered = Some(target);
        self.refresh(topo, self.hovered.clone())
    }

    /// Clears the flags when leaving the hovered element with nothing selected.
    pub fn on_mouse_out<T: Topology + ?Sized>(&mut self, topo: &T, target: &ElementRef) -> bool {
        if self.selected.is_some() || self.hovered.as_ref() != Some(target) {
            return false;
        }
        self.hovered = None;
        self.refresh(topo, None)
    }

    fn refresh<T: Topology + ?Sized>(&mut self, topo: &T, focus: Option<ElementRef>) -> bool {
        let next = partition(topo, focus.as_ref());
        let changed = next != self.partition;
        self.partition = next;
        changed
    }
}
