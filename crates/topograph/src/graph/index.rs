use super::{BoxType, Edge, Graph, Node};
use rustc_hash::FxHashMap;

/// The queries the highlight engine needs from a topology, addressed by dense indices.
///
/// Rendering-library adapters implement this at the system boundary; [`GraphIndex`] is the
/// in-crate implementation over a [`Graph`].
pub trait Topology {
    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn node_id(&self, node: usize) -> &str;
    fn edge_id(&self, edge: usize) -> &str;
    fn find_node(&self, id: &str) -> Option<usize>;
    fn find_edge(&self, id: &str) -> Option<usize>;
    fn parent(&self, node: usize) -> Option<usize>;
    fn children(&self, node: usize) -> &[usize];
    fn incoming(&self, node: usize) -> &[usize];
    fn outgoing(&self, node: usize) -> &[usize];
    /// `(source, target)` of an edge.
    fn endpoints(&self, edge: usize) -> (usize, usize);
    fn box_type(&self, node: usize) -> Option<BoxType>;

    fn is_leaf(&self, node: usize) -> bool {
        self.children(node).is_empty()
    }

    /// Parent chain of `node`, innermost first. `node` itself is not included.
    fn ancestors(&self, node: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            if chain.contains(&p) || chain.len() > self.node_count() {
                break;
            }
            chain.push(p);
            cur = self.parent(p);
        }
        chain
    }
}

/// Per-invocation lookup tables over a borrowed [`Graph`].
///
/// Dangling references (unknown parents or endpoints) are skipped, so an index can be built for
/// any graph; layouts validate before indexing.
#[derive(Debug, Clone)]
pub struct GraphIndex<'a> {
    graph: &'a Graph,
    node_ix: FxHashMap<&'a str, usize>,
    edge_ix: FxHashMap<&'a str, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
    endpoints: Vec<(usize, usize)>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        let n = graph.nodes.len();
        let mut node_ix: FxHashMap<&'a str, usize> = FxHashMap::default();
        for (ix, node) in graph.nodes.iter().enumerate() {
            node_ix.entry(node.id.as_str()).or_insert(ix);
        }

        let mut parent = vec![None; n];
        let mut children = vec![Vec::new(); n];
        for (ix, node) in graph.nodes.iter().enumerate() {
            let Some(p) = node.parent.as_deref().and_then(|p| node_ix.get(p).copied()) else {
                continue;
            };
            if p != ix {
                parent[ix] = Some(p);
                children[p].push(ix);
            }
        }

        let mut edge_ix: FxHashMap<&'a str, usize> = FxHashMap::default();
        let mut out_edges = vec![Vec::new(); n];
        let mut in_edges = vec![Vec::new(); n];
        let mut endpoints = Vec::with_capacity(graph.edges.len());
        for (ix, edge) in graph.edges.iter().enumerate() {
            edge_ix.entry(edge.id.as_str()).or_insert(ix);
            let (Some(&s), Some(&t)) = (
                node_ix.get(edge.source.as_str()),
                node_ix.get(edge.target.as_str()),
            ) else {
                endpoints.push((usize::MAX, usize::MAX));
                continue;
            };
            out_edges[s].push(ix);
            in_edges[t].push(ix);
            endpoints.push((s, t));
        }

        Self {
            graph,
            node_ix,
            edge_ix,
            parent,
            children,
            out_edges,
            in_edges,
            endpoints,
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn node(&self, ix: usize) -> &'a Node {
        &self.graph.nodes[ix]
    }

    pub fn edge(&self, ix: usize) -> &'a Edge {
        &self.graph.edges[ix]
    }

    /// Leaf (non-parent) nodes in input order.
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.graph.nodes.len()).filter(|&ix| self.children[ix].is_empty())
    }

    /// Edges whose endpoints both resolved.
    pub fn resolved_edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.endpoints
            .iter()
            .enumerate()
            .filter(|(_, (s, _))| *s != usize::MAX)
            .map(|(e, &(s, t))| (e, s, t))
    }

    pub fn indegree(&self, ix: usize) -> usize {
        self.in_edges[ix].len()
    }

    pub fn outdegree(&self, ix: usize) -> usize {
        self.out_edges[ix].len()
    }

    /// Incident edge count; a self-loop counts twice.
    pub fn degree(&self, ix: usize) -> usize {
        self.indegree(ix) + self.outdegree(ix)
    }
}

impl Topology for GraphIndex<'_> {
    fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.graph.edges.len()
    }

    fn node_id(&self, node: usize) -> &str {
        &self.graph.nodes[node].id
    }

    fn edge_id(&self, edge: usize) -> &str {
        &self.graph.edges[edge].id
    }

    fn find_node(&self, id: &str) -> Option<usize> {
        self.node_ix.get(id).copied()
    }

    fn find_edge(&self, id: &str) -> Option<usize> {
        self.edge_ix.get(id).copied()
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.parent[node]
    }

    fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    fn incoming(&self, node: usize) -> &[usize] {
        &self.in_edges[node]
    }

    fn outgoing(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    fn endpoints(&self, edge: usize) -> (usize, usize) {
        self.endpoints[edge]
    }

    fn box_type(&self, node: usize) -> Option<BoxType> {
        self.graph.nodes[node].box_type
    }
}
