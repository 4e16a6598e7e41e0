//! Rank helpers: the simplified per-component graph, longest-path, slack.

use crate::LayerGraph;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RankEdge {
    pub v: usize,
    pub w: usize,
    pub minlen: i32,
    pub weight: f64,
}

/// One connected component with multi-edges collapsed (weights summed, largest `minlen` kept).
/// Node indices are local; `nodes[local]` maps back to the layer graph.
#[derive(Debug, Clone)]
pub(crate) struct RankGraph {
    pub nodes: Vec<usize>,
    pub edges: Vec<RankEdge>,
    pub out: Vec<Vec<usize>>,
    pub inn: Vec<Vec<usize>>,
    pair: FxHashMap<(usize, usize), usize>,
}

impl RankGraph {
    pub fn build(g: &LayerGraph, members: &[usize]) -> Self {
        let local: FxHashMap<usize, usize> =
            members.iter().enumerate().map(|(i, &ix)| (ix, i)).collect();
        let mut rg = Self {
            nodes: members.to_vec(),
            edges: Vec::new(),
            out: vec![Vec::new(); members.len()],
            inn: vec![Vec::new(); members.len()],
            pair: FxHashMap::default(),
        };
        for (lv, &v) in members.iter().enumerate() {
            for &e in g.out_edges(v) {
                let edge = g.edge(e);
                let Some(&lw) = local.get(&edge.w) else {
                    continue;
                };
                if lv == lw {
                    continue;
                }
                let minlen = edge.label.rank_span();
                match rg.pair.get(&(lv, lw)) {
                    Some(&re) => {
                        let slot = &mut rg.edges[re];
                        slot.weight += edge.label.weight;
                        slot.minlen = slot.minlen.max(minlen);
                    }
                    None => {
                        let re = rg.edges.len();
                        rg.edges.push(RankEdge {
                            v: lv,
                            w: lw,
                            minlen,
                            weight: edge.label.weight,
                        });
                        rg.out[lv].push(re);
                        rg.inn[lw].push(re);
                        rg.pair.insert((lv, lw), re);
                    }
                }
            }
        }
        rg
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_between(&self, v: usize, w: usize) -> Option<usize> {
        self.pair.get(&(v, w)).copied()
    }

    /// Outgoing then incoming edges of `v`.
    pub fn node_edges(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.out[v].iter().chain(self.inn[v].iter()).copied()
    }

    pub fn slack(&self, ranks: &[i32], e: usize) -> i32 {
        let edge = &self.edges[e];
        ranks[edge.w] - ranks[edge.v] - edge.minlen
    }
}

/// Sinks get rank 0; every other node sits `minlen` above its tightest successor.
pub(crate) fn longest_path(rg: &RankGraph) -> Vec<i32> {
    let n = rg.len();
    let mut indegree: Vec<usize> = rg.inn.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut topo: Vec<usize> = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    while let Some(v) = queue.pop_front() {
        topo.push(v);
        placed[v] = true;
        for &e in &rg.out[v] {
            let w = rg.edges[e].w;
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    // Only reachable when the caller skipped cycle breaking.
    topo.extend((0..n).filter(|&v| !placed[v]));

    let mut ranks = vec![0i32; n];
    let mut done = vec![false; n];
    for &v in topo.iter().rev() {
        let mut rank: Option<i32> = None;
        for &e in &rg.out[v] {
            let edge = &rg.edges[e];
            if !done[edge.w] {
                continue;
            }
            let candidate = ranks[edge.w] - edge.minlen;
            rank = Some(rank.map_or(candidate, |r| r.min(candidate)));
        }
        ranks[v] = rank.unwrap_or(0);
        done[v] = true;
    }
    ranks
}
