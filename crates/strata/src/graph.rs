//! Compound directed multigraph used by the layering pipeline.
//!
//! Nodes and edges are addressed by dense indices. Nodes with children ("clusters") never take
//! part in ranking or ordering; they only constrain where their descendants may sit.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Set on the virtual nodes that `normalize` inserts along long edges.
    pub dummy: bool,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Largest rank span an edge can demand. Larger `minlen` values are clamped to it.
pub const MAX_MINLEN: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: u32,
    pub weight: f64,
    pub reversed: bool,
}

impl EdgeLabel {
    /// `minlen` as a rank difference, clamped to [`MAX_MINLEN`].
    pub fn rank_span(&self) -> i32 {
        self.minlen.min(MAX_MINLEN) as i32
    }
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub v: usize,
    pub w: usize,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    ids: Vec<String>,
    labels: Vec<NodeLabel>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    index: FxHashMap<String, usize>,
    edges: Vec<Edge>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl LayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node or replaces the label of an existing one. Returns the node index.
    pub fn set_node(&mut self, id: impl Into<String>, label: NodeLabel) -> usize {
        let id = id.into();
        if let Some(&ix) = self.index.get(&id) {
            self.labels[ix] = label;
            return ix;
        }
        let ix = self.ids.len();
        self.index.insert(id.clone(), ix);
        self.ids.push(id);
        self.labels.push(label);
        self.parents.push(None);
        self.children.push(Vec::new());
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        ix
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        match self.index.get(id) {
            Some(&ix) => ix,
            None => self.set_node(id, NodeLabel::default()),
        }
    }

    /// Places `child` inside `parent`. Requests that would make a node its own ancestor are
    /// ignored.
    pub fn set_parent(&mut self, child: &str, parent: &str) {
        let c = self.ensure_node(child);
        let p = self.ensure_node(parent);
        if c == p || self.ancestors(p).contains(&c) {
            return;
        }
        if let Some(old) = self.parents[c].take() {
            self.children[old].retain(|&x| x != c);
        }
        self.parents[c] = Some(p);
        self.children[p].push(c);
    }

    pub(crate) fn set_parent_ix(&mut self, child: usize, parent: Option<usize>) {
        if let Some(old) = self.parents[child].take() {
            self.children[old].retain(|&x| x != child);
        }
        if let Some(p) = parent {
            self.parents[child] = Some(p);
            self.children[p].push(child);
        }
    }

    /// Adds a directed edge, creating missing endpoints with an empty label.
    pub fn set_edge(&mut self, v: &str, w: &str, label: EdgeLabel) -> usize {
        let v = self.ensure_node(v);
        let w = self.ensure_node(w);
        self.add_edge_ix(v, w, label)
    }

    pub(crate) fn add_edge_ix(&mut self, v: usize, w: usize, label: EdgeLabel) -> usize {
        let e = self.edges.len();
        self.edges.push(Edge { v, w, label });
        self.out_adj[v].push(e);
        self.in_adj[w].push(e);
        e
    }

    /// Adds one edge per consecutive pair of `ids`.
    pub fn set_path(&mut self, ids: &[&str]) {
        for pair in ids.windows(2) {
            self.set_edge(pair[0], pair[1], EdgeLabel::default());
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id(&self, ix: usize) -> &str {
        &self.ids[ix]
    }

    pub fn node(&self, id: &str) -> Option<&NodeLabel> {
        self.node_ix(id).map(|ix| &self.labels[ix])
    }

    pub fn label(&self, ix: usize) -> &NodeLabel {
        &self.labels[ix]
    }

    pub fn label_mut(&mut self, ix: usize) -> &mut NodeLabel {
        &mut self.labels[ix]
    }

    pub fn parent(&self, ix: usize) -> Option<usize> {
        self.parents[ix]
    }

    pub fn children(&self, ix: usize) -> &[usize] {
        &self.children[ix]
    }

    pub fn is_leaf(&self, ix: usize) -> bool {
        self.children[ix].is_empty()
    }

    /// Every node without children, in insertion order.
    pub fn leaves(&self) -> Vec<usize> {
        (0..self.ids.len()).filter(|&ix| self.is_leaf(ix)).collect()
    }

    /// Cluster chain of `ix`, outermost first. `ix` itself is not included.
    pub fn ancestors(&self, ix: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cur = self.parents[ix];
        while let Some(p) = cur {
            chain.push(p);
            cur = self.parents[p];
        }
        chain.reverse();
        chain
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, e: usize) -> &Edge {
        &self.edges[e]
    }

    pub fn out_edges(&self, ix: usize) -> &[usize] {
        &self.out_adj[ix]
    }

    pub fn in_edges(&self, ix: usize) -> &[usize] {
        &self.in_adj[ix]
    }

    pub fn successors(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        self.out_adj[ix].iter().map(|&e| self.edges[e].w)
    }

    pub fn predecessors(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        self.in_adj[ix].iter().map(|&e| self.edges[e].v)
    }

    /// Flips an edge in place and toggles its `reversed` flag.
    pub fn reverse_edge(&mut self, e: usize) {
        let Edge { v, w, .. } = self.edges[e];
        self.out_adj[v].retain(|&x| x != e);
        self.in_adj[w].retain(|&x| x != e);
        let edge = &mut self.edges[e];
        edge.v = w;
        edge.w = v;
        edge.label.reversed = !edge.label.reversed;
        self.out_adj[w].push(e);
        self.in_adj[v].push(e);
    }

    /// Keeps the edges for which `keep[e]` is true. Edge indices are reassigned.
    pub(crate) fn retain_edges(&mut self, keep: &[bool]) {
        let edges = std::mem::take(&mut self.edges);
        for adj in self.out_adj.iter_mut().chain(self.in_adj.iter_mut()) {
            adj.clear();
        }
        for (e, edge) in edges.into_iter().enumerate() {
            if keep.get(e).copied().unwrap_or(false) {
                self.add_edge_ix(edge.v, edge.w, edge.label);
            }
        }
    }

    /// A fresh id with the given prefix that does not collide with any existing node.
    pub(crate) fn unique_id(&self, prefix: &str, counter: &mut usize) -> String {
        loop {
            let candidate = format!("{prefix}{counter}");
            *counter += 1;
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
