//! Brandes-Köpf horizontal coordinate assignment.
//!
//! Four candidate alignments are computed (up/down x left/right). The narrowest one anchors the
//! others, and the final coordinate is the average of the two median candidates unless an explicit
//! alignment is requested.

use crate::{Align, LayerGraph, LayerOptions};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

type Conflicts = FxHashSet<(usize, usize)>;

pub fn position_x(g: &LayerGraph, layering: &[Vec<usize>], opts: &LayerOptions) -> Vec<f64> {
    let n = g.node_count();
    let conflicts = find_type1_conflicts(g, layering);

    // Candidate order: ul, ur, dl, dr.
    let mut candidates: Vec<Vec<f64>> = Vec::with_capacity(4);
    for down in [false, true] {
        let mut adjusted: Vec<Vec<usize>> = if down {
            layering.iter().rev().cloned().collect()
        } else {
            layering.to_vec()
        };
        for right in [false, true] {
            if right {
                for layer in adjusted.iter_mut() {
                    layer.reverse();
                }
            }
            let root = vertical_alignment(g, &adjusted, &conflicts, down);
            let mut xs = horizontal_compaction(g, &adjusted, &root, opts);
            if right {
                for x in xs.iter_mut() {
                    *x = -*x;
                }
            }
            candidates.push(xs);
            if right {
                for layer in adjusted.iter_mut() {
                    layer.reverse();
                }
            }
        }
    }

    let nodes: Vec<usize> = layering.iter().flatten().copied().collect();
    let smallest = smallest_width(g, &nodes, &candidates);
    align_coordinates(&nodes, &mut candidates, smallest);
    balance(n, &nodes, &candidates, opts.align)
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (dummy to dummy).
/// Stored as `(min, max)` node pairs.
fn find_type1_conflicts(g: &LayerGraph, layering: &[Vec<usize>]) -> Conflicts {
    let mut conflicts = Conflicts::default();
    let order = |v: usize| g.label(v).order.unwrap_or(0);
    for pair in layering.windows(2) {
        let (prev, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;
        let last = layer.len().saturating_sub(1);
        for (i, &v) in layer.iter().enumerate() {
            let inner = inner_segment_source(g, v);
            let k1 = inner.map(order).unwrap_or(prev.len());
            if inner.is_none() && i != last {
                continue;
            }
            for &scan in &layer[scan_pos..=i] {
                for u in g.predecessors(scan) {
                    let u_pos = order(u);
                    let both_dummy = g.label(u).dummy && g.label(scan).dummy;
                    if (u_pos < k0 || k1 < u_pos) && !both_dummy {
                        conflicts.insert((u.min(scan), u.max(scan)));
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
    conflicts
}

fn inner_segment_source(g: &LayerGraph, v: usize) -> Option<usize> {
    if !g.label(v).dummy {
        return None;
    }
    g.predecessors(v).find(|&u| g.label(u).dummy)
}

fn has_conflict(conflicts: &Conflicts, v: usize, w: usize) -> bool {
    conflicts.contains(&(v.min(w), v.max(w)))
}

/// Aligns each node with a median neighbor in the previous (adjusted) layer. Returns the block
/// root of every node.
fn vertical_alignment(
    g: &LayerGraph,
    layering: &[Vec<usize>],
    conflicts: &Conflicts,
    down: bool,
) -> Vec<usize> {
    let n = g.node_count();
    let mut root: Vec<usize> = (0..n).collect();
    let mut align: Vec<usize> = (0..n).collect();
    let mut pos = vec![0usize; n];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for &v in layer {
            // Same-rank neighbors (zero `minlen`) never share a block with `v`.
            let rank = g.label(v).rank;
            let adjacent = |w: &usize| match (rank, g.label(*w).rank) {
                (Some(a), Some(b)) => (a - b).abs() == 1,
                _ => false,
            };
            let mut ws: Vec<usize> = if down {
                g.successors(v).filter(adjacent).collect()
            } else {
                g.predecessors(v).filter(adjacent).collect()
            };
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&w| pos[w]);
            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;
            for &w in &ws[lo..=hi] {
                let ahead = prev_idx.is_none_or(|p| p < pos[w]);
                if align[v] == v && ahead && !has_conflict(conflicts, v, w) {
                    align[w] = v;
                    root[v] = root[w];
                    align[v] = root[v];
                    prev_idx = Some(pos[w]);
                }
            }
        }
    }
    root
}

fn separation(g: &LayerGraph, v: usize, u: usize, opts: &LayerOptions) -> f64 {
    let (a, b) = (g.label(v), g.label(u));
    let gap = |dummy: bool| if dummy { opts.edgesep } else { opts.nodesep };
    a.width / 2.0 + gap(a.dummy) / 2.0 + gap(b.dummy) / 2.0 + b.width / 2.0
}

/// Places blocks as far left as their separation constraints allow, then pulls each block right
/// toward its successors where there is slack.
fn horizontal_compaction(
    g: &LayerGraph,
    layering: &[Vec<usize>],
    root: &[usize],
    opts: &LayerOptions,
) -> Vec<f64> {
    // Block graph: one node per block root, an edge between neighboring blocks in a layer.
    let mut order: Vec<usize> = Vec::new();
    let mut seen: FxHashSet<usize> = FxHashSet::default();
    let mut weights: FxHashMap<(usize, usize), f64> = FxHashMap::default();
    let mut out: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut inn: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for layer in layering {
        let mut prev: Option<usize> = None;
        for &v in layer {
            let v_root = root[v];
            if seen.insert(v_root) {
                order.push(v_root);
            }
            if let Some(u) = prev {
                let u_root = root[u];
                let sep = separation(g, v, u, opts);
                match weights.get_mut(&(u_root, v_root)) {
                    Some(w) => *w = w.max(sep),
                    None => {
                        weights.insert((u_root, v_root), sep);
                        out.entry(u_root).or_default().push(v_root);
                        inn.entry(v_root).or_default().push(u_root);
                    }
                }
            }
            prev = Some(v);
        }
    }

    let topo = topological(&order, &out, &inn);
    let mut xs: FxHashMap<usize, f64> = FxHashMap::default();
    for &b in &topo {
        let x = inn
            .get(&b)
            .into_iter()
            .flatten()
            .map(|&u| xs.get(&u).copied().unwrap_or(0.0) + weights[&(u, b)])
            .fold(0.0f64, f64::max);
        xs.insert(b, x);
    }
    for &b in topo.iter().rev() {
        let min = out
            .get(&b)
            .into_iter()
            .flatten()
            .map(|&w| xs.get(&w).copied().unwrap_or(0.0) - weights[&(b, w)])
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            let x = xs.entry(b).or_insert(0.0);
            *x = x.max(min);
        }
    }

    let mut result = vec![0.0; g.node_count()];
    for layer in layering {
        for &v in layer {
            result[v] = xs.get(&root[v]).copied().unwrap_or(0.0);
        }
    }
    result
}

fn topological(
    order: &[usize],
    out: &FxHashMap<usize, Vec<usize>>,
    inn: &FxHashMap<usize, Vec<usize>>,
) -> Vec<usize> {
    let mut indegree: FxHashMap<usize, usize> = order
        .iter()
        .map(|&b| (b, inn.get(&b).map_or(0, Vec::len)))
        .collect();
    let mut queue: VecDeque<usize> = order
        .iter()
        .copied()
        .filter(|b| indegree[b] == 0)
        .collect();
    let mut topo = Vec::with_capacity(order.len());
    while let Some(b) = queue.pop_front() {
        topo.push(b);
        for &w in out.get(&b).into_iter().flatten() {
            if let Some(d) = indegree.get_mut(&w) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(w);
                }
            }
        }
    }
    if topo.len() < order.len() {
        // A cyclic block graph means alignment went wrong; keep every block placed.
        tracing::warn!("brandes-köpf: block graph is cyclic");
        let placed: FxHashSet<usize> = topo.iter().copied().collect();
        topo.extend(order.iter().copied().filter(|b| !placed.contains(b)));
    }
    topo
}

fn width_of(g: &LayerGraph, nodes: &[usize], xs: &[f64]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in nodes {
        let half = g.label(v).width / 2.0;
        min = min.min(xs[v] - half);
        max = max.max(xs[v] + half);
    }
    max - min
}

fn smallest_width(g: &LayerGraph, nodes: &[usize], candidates: &[Vec<f64>]) -> usize {
    let mut best = 0usize;
    let mut best_width = f64::INFINITY;
    for (i, xs) in candidates.iter().enumerate() {
        let w = width_of(g, nodes, xs);
        if w < best_width {
            best_width = w;
            best = i;
        }
    }
    best
}

fn extent(nodes: &[usize], xs: &[f64]) -> (f64, f64) {
    nodes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(xs[v]), hi.max(xs[v]))
    })
}

/// Shifts left candidates to share the anchor's minimum and right candidates its maximum.
fn align_coordinates(nodes: &[usize], candidates: &mut [Vec<f64>], anchor: usize) {
    let (anchor_min, anchor_max) = extent(nodes, &candidates[anchor]);
    for (i, xs) in candidates.iter_mut().enumerate() {
        if i == anchor {
            continue;
        }
        let (min, max) = extent(nodes, xs);
        let left = i % 2 == 0;
        let delta = if left { anchor_min - min } else { anchor_max - max };
        if delta != 0.0 && delta.is_finite() {
            for &v in nodes {
                xs[v] += delta;
            }
        }
    }
}

fn balance(n: usize, nodes: &[usize], candidates: &[Vec<f64>], align: Option<Align>) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for &v in nodes {
        out[v] = match align {
            Some(a) => {
                let i = match a {
                    Align::UL => 0,
                    Align::UR => 1,
                    Align::DL => 2,
                    Align::DR => 3,
                };
                candidates[i][v]
            }
            None => {
                let mut vals = [
                    candidates[0][v],
                    candidates[1][v],
                    candidates[2][v],
                    candidates[3][v],
                ];
                vals.sort_by(f64::total_cmp);
                (vals[1] + vals[2]) / 2.0
            }
        };
    }
    out
}
