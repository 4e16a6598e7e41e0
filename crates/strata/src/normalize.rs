//! Splits edges spanning more than one rank into chains of zero-size dummy nodes.
//!
//! After this pass every edge connects adjacent ranks, which ordering and positioning rely on.

use crate::{EdgeLabel, LayerGraph, NodeLabel};

/// Returns the dummy chains that were inserted, one per long edge, in rank order.
pub fn run(g: &mut LayerGraph) -> Vec<Vec<usize>> {
    let long: Vec<usize> = (0..g.edge_count())
        .filter(|&e| span(g, e) > 1)
        .collect();
    if long.is_empty() {
        return Vec::new();
    }

    let mut keep = vec![true; g.edge_count()];
    for &e in &long {
        keep[e] = false;
    }
    let long_edges: Vec<_> = long.iter().map(|&e| g.edge(e).clone()).collect();
    g.retain_edges(&keep);

    let mut counter = 0usize;
    let mut chains: Vec<Vec<usize>> = Vec::with_capacity(long_edges.len());
    for edge in long_edges {
        let v_rank = g.label(edge.v).rank.unwrap_or(0);
        let w_rank = g.label(edge.w).rank.unwrap_or(0);
        let parent = common_cluster(g, edge.v, edge.w);
        let link = EdgeLabel {
            minlen: 1,
            weight: edge.label.weight,
            reversed: edge.label.reversed,
        };

        let mut chain = Vec::with_capacity((w_rank - v_rank - 1) as usize);
        let mut prev = edge.v;
        for rank in (v_rank + 1)..w_rank {
            let id = g.unique_id("_d", &mut counter);
            let dummy = g.set_node(
                id,
                NodeLabel {
                    rank: Some(rank),
                    dummy: true,
                    ..Default::default()
                },
            );
            g.set_parent_ix(dummy, parent);
            g.add_edge_ix(prev, dummy, link.clone());
            chain.push(dummy);
            prev = dummy;
        }
        g.add_edge_ix(prev, edge.w, link);
        chains.push(chain);
    }
    tracing::trace!(chains = chains.len(), "normalize: split long edges");
    chains
}

fn span(g: &LayerGraph, e: usize) -> i32 {
    let edge = g.edge(e);
    match (g.label(edge.v).rank, g.label(edge.w).rank) {
        (Some(a), Some(b)) => b - a,
        _ => 0,
    }
}

/// Innermost cluster containing both `v` and `w`.
fn common_cluster(g: &LayerGraph, v: usize, w: usize) -> Option<usize> {
    let a = g.ancestors(v);
    let b = g.ancestors(w);
    a.iter()
        .zip(b.iter())
        .take_while(|(x, y)| x == y)
        .last()
        .map(|(x, _)| *x)
}
