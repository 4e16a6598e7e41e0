//! Ranking algorithms (network simplex, tight tree, longest path).
//!
//! Each connected component is ranked on its own and normalized so its smallest rank is 0.
//! Ranks are only assigned to leaves.

mod feasible_tree;
mod network_simplex;
mod util;

use crate::{LayerGraph, Ranker};
use std::collections::VecDeque;

pub(crate) use util::RankGraph;

pub fn rank(g: &mut LayerGraph, ranker: Ranker) {
    for members in components(g) {
        let rg = RankGraph::build(g, &members);
        let mut ranks = util::longest_path(&rg);
        match ranker {
            Ranker::LongestPath => {}
            Ranker::TightTree => {
                let _ = feasible_tree::feasible_tree(&rg, &mut ranks);
            }
            Ranker::NetworkSimplex => network_simplex::network_simplex(&rg, &mut ranks),
        }
        let min = ranks.iter().copied().min().unwrap_or(0);
        for (local, &ix) in rg.nodes.iter().enumerate() {
            g.label_mut(ix).rank = Some(ranks[local] - min);
        }
    }
}

/// Weakly connected components over leaves, each listed in ascending node index.
pub fn components(g: &LayerGraph) -> Vec<Vec<usize>> {
    let n = g.node_count();
    let mut seen = vec![false; n];
    let mut out: Vec<Vec<usize>> = Vec::new();
    for start in 0..n {
        if seen[start] || !g.is_leaf(start) {
            continue;
        }
        seen[start] = true;
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            for u in g.successors(v).chain(g.predecessors(v)) {
                if !seen[u] && g.is_leaf(u) {
                    seen[u] = true;
                    members.push(u);
                    queue.push_back(u);
                }
            }
        }
        members.sort_unstable();
        out.push(members);
    }
    out
}

/// `rank(w) - rank(v) - minlen` for edge `e`. Missing ranks count as 0.
pub fn slack(g: &LayerGraph, e: usize) -> i32 {
    let edge = g.edge(e);
    let v_rank = g.label(edge.v).rank.unwrap_or(0);
    let w_rank = g.label(edge.w).rank.unwrap_or(0);
    w_rank - v_rank - edge.label.rank_span()
}
