//! Break cycles by reversing a feedback arc set (FAS).
//!
//! The DFS variant is the default; the greedy variant weighs edges and usually reverses fewer of
//! them on dense graphs.

use crate::{Acyclicer, LayerGraph};

/// Reverses a feedback arc set so the graph becomes acyclic. Returns the reversed edge indices.
pub fn run(g: &mut LayerGraph, acyclicer: Acyclicer) -> Vec<usize> {
    let fas = match acyclicer {
        Acyclicer::Greedy => crate::greedy_fas::greedy_fas(g),
        Acyclicer::Dfs => dfs_fas(g),
    };
    let fas: Vec<usize> = fas
        .into_iter()
        .filter(|&e| g.edge(e).v != g.edge(e).w)
        .collect();
    for &e in &fas {
        g.reverse_edge(e);
    }
    if !fas.is_empty() {
        tracing::trace!(reversed = fas.len(), "acyclic: reversed feedback arcs");
    }
    fas
}

/// Restores every edge that `run` reversed.
pub fn undo(g: &mut LayerGraph) {
    let reversed: Vec<usize> = (0..g.edge_count())
        .filter(|&e| g.edge(e).label.reversed)
        .collect();
    for e in reversed {
        g.reverse_edge(e);
    }
}

fn dfs_fas(g: &LayerGraph) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        OnStack,
        Done,
    }

    let n = g.node_count();
    let mut mark = vec![Mark::New; n];
    let mut fas: Vec<usize> = Vec::new();
    // (node, next out-edge cursor)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if mark[start] != Mark::New {
            continue;
        }
        mark[start] = Mark::OnStack;
        stack.push((start, 0));
        while let Some(frame) = stack.last_mut() {
            let (v, cursor) = *frame;
            let out = g.out_edges(v);
            if cursor >= out.len() {
                mark[v] = Mark::Done;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let e = out[cursor];
            let w = g.edge(e).w;
            if v == w {
                continue;
            }
            match mark[w] {
                Mark::OnStack => fas.push(e),
                Mark::New => {
                    mark[w] = Mark::OnStack;
                    stack.push((w, 0));
                }
                Mark::Done => {}
            }
        }
    }
    fas
}
