//! Crossing reduction.
//!
//! Layers are swept alternately downward (barycenter over predecessors) and upward (barycenter
//! over successors). The best layering seen is kept; the loop stops after four sweeps without
//! improvement. Members of the same cluster always stay contiguous within a layer.

use crate::LayerGraph;
use indexmap::IndexMap;

pub fn order(g: &mut LayerGraph) {
    let max_rank = (0..g.node_count())
        .filter(|&v| g.is_leaf(v))
        .filter_map(|v| g.label(v).rank)
        .max();
    let Some(max_rank) = max_rank else {
        return;
    };
    let ancestors: Vec<Vec<usize>> = (0..g.node_count()).map(|v| g.ancestors(v)).collect();

    let mut layering = init_order(g, max_rank as usize);
    let no_bc = vec![None; g.node_count()];
    for layer in layering.iter_mut() {
        *layer = sort_group(&ancestors, layer, 0, &no_bc, false).vs;
    }
    assign(g, &layering);

    let mut best = layering.clone();
    let mut best_cc = f64::INFINITY;
    let mut i = 0usize;
    let mut last_best = 0usize;
    while last_best < 4 {
        let down = i % 2 == 1;
        let bias_right = i % 4 >= 2;
        sweep(g, &ancestors, &mut layering, down, bias_right);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = layering.clone();
        }
        i += 1;
        last_best += 1;
    }
    tracing::trace!(sweeps = i, crossings = best_cc, "order: done");
    assign(g, &best);
}

/// Leaves grouped by rank and sorted by `order`.
pub fn layers(g: &LayerGraph) -> Vec<Vec<usize>> {
    let mut out: Vec<Vec<usize>> = Vec::new();
    for v in 0..g.node_count() {
        if !g.is_leaf(v) {
            continue;
        }
        let Some(rank) = g.label(v).rank else {
            continue;
        };
        let rank = rank.max(0) as usize;
        if out.len() <= rank {
            out.resize_with(rank + 1, Vec::new);
        }
        out[rank].push(v);
    }
    for layer in out.iter_mut() {
        layer.sort_by_key(|&v| g.label(v).order.unwrap_or(usize::MAX));
    }
    out
}

/// Weighted number of edge crossings between adjacent layers (Barth, Jünger & Mutzel).
pub fn cross_count(g: &LayerGraph, layering: &[Vec<usize>]) -> f64 {
    let pos = index_of(g.node_count(), layering);
    let mut layer_of = vec![usize::MAX; g.node_count()];
    for (r, layer) in layering.iter().enumerate() {
        for &v in layer {
            layer_of[v] = r;
        }
    }
    let mut cc = 0.0;
    for (r, pair) in layering.windows(2).enumerate() {
        let (north, south) = (&pair[0], &pair[1]);
        let mut first_index = 1usize;
        while first_index < south.len() {
            first_index <<= 1;
        }
        let mut tree = vec![0.0f64; 2 * first_index - 1];
        first_index -= 1;

        for &v in north {
            let mut entries: Vec<(usize, f64)> = g
                .out_edges(v)
                .iter()
                .map(|&e| g.edge(e))
                .filter(|edge| layer_of[edge.w] == r + 1)
                .map(|edge| (pos[edge.w], edge.label.weight))
                .collect();
            entries.sort_by_key(|&(p, _)| p);
            for (p, weight) in entries {
                let mut index = p + first_index;
                tree[index] += weight;
                let mut weight_sum = 0.0;
                while index > 0 {
                    if index % 2 == 1 {
                        weight_sum += tree[index + 1];
                    }
                    index = (index - 1) >> 1;
                    tree[index] += weight;
                }
                cc += weight * weight_sum;
            }
        }
    }
    cc
}

fn init_order(g: &LayerGraph, max_rank: usize) -> Vec<Vec<usize>> {
    let mut layering: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    let mut starts: Vec<usize> = (0..g.node_count())
        .filter(|&v| g.is_leaf(v) && g.label(v).rank.is_some())
        .collect();
    starts.sort_by_key(|&v| g.label(v).rank);

    let mut visited = vec![false; g.node_count()];
    let mut stack: Vec<usize> = Vec::new();
    for start in starts {
        stack.push(start);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            if let Some(rank) = g.label(v).rank {
                layering[rank.max(0) as usize].push(v);
            }
            let succ: Vec<usize> = g.successors(v).collect();
            stack.extend(succ.into_iter().rev());
        }
    }
    layering
}

fn index_of(n: usize, layering: &[Vec<usize>]) -> Vec<usize> {
    let mut pos = vec![usize::MAX; n];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }
    pos
}

fn assign(g: &mut LayerGraph, layering: &[Vec<usize>]) {
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            g.label_mut(v).order = Some(i);
        }
    }
}

fn sweep(
    g: &LayerGraph,
    ancestors: &[Vec<usize>],
    layering: &mut [Vec<usize>],
    down: bool,
    bias_right: bool,
) {
    let n = g.node_count();
    let ranks: Vec<usize> = if down {
        (1..layering.len()).collect()
    } else {
        (0..layering.len().saturating_sub(1)).rev().collect()
    };
    for r in ranks {
        let fixed = if down { r - 1 } else { r + 1 };
        let fixed_pos = index_of(n, std::slice::from_ref(&layering[fixed]));

        let mut bc: Vec<Option<(f64, f64)>> = vec![None; n];
        for &v in &layering[r] {
            let incident = if down { g.in_edges(v) } else { g.out_edges(v) };
            let mut sum = 0.0;
            let mut weight = 0.0;
            for &e in incident {
                let edge = g.edge(e);
                let other = if down { edge.v } else { edge.w };
                let p = fixed_pos[other];
                if p == usize::MAX {
                    continue;
                }
                sum += edge.label.weight * p as f64;
                weight += edge.label.weight;
            }
            if weight > 0.0 {
                bc[v] = Some((sum / weight, weight));
            }
        }
        layering[r] = sort_group(ancestors, &layering[r], 0, &bc, bias_right).vs;
    }
}

struct Entry {
    vs: Vec<usize>,
    i: usize,
    barycenter: Option<f64>,
    weight: f64,
}

/// Orders `members` (all sharing the same ancestors above `depth`, in current layer order),
/// keeping each nested cluster together as one entry whose barycenter is the weighted mean of its
/// members. Entry indices are local to `members`.
fn sort_group(
    ancestors: &[Vec<usize>],
    members: &[usize],
    depth: usize,
    bc: &[Option<(f64, f64)>],
    bias_right: bool,
) -> Entry {
    let mut entries: Vec<Entry> = Vec::new();
    // cluster -> (first local index, members)
    let mut groups: IndexMap<usize, (usize, Vec<usize>)> = IndexMap::new();
    for (i, &v) in members.iter().enumerate() {
        match ancestors[v].get(depth) {
            Some(&cluster) => groups.entry(cluster).or_insert_with(|| (i, Vec::new())).1.push(v),
            None => entries.push(Entry {
                vs: vec![v],
                i,
                barycenter: bc[v].map(|(b, _)| b),
                weight: bc[v].map(|(_, w)| w).unwrap_or(0.0),
            }),
        }
    }
    for (_, (i, group)) in groups {
        let mut sub = sort_group(ancestors, &group, depth + 1, bc, bias_right);
        sub.i = i;
        entries.push(sub);
    }
    sort_entries(entries, bias_right)
}

fn sort_entries(entries: Vec<Entry>, bias_right: bool) -> Entry {
    let (mut sortable, mut unsortable): (Vec<Entry>, Vec<Entry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let (x, y) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
        x.total_cmp(&y).then_with(|| {
            if bias_right {
                b.i.cmp(&a.i)
            } else {
                a.i.cmp(&b.i)
            }
        })
    });

    let min_i = sortable
        .iter()
        .chain(unsortable.iter())
        .map(|e| e.i)
        .min()
        .unwrap_or(0);
    let mut vs: Vec<usize> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = 0usize;
    consume_unsortable(&mut vs, &mut unsortable, &mut index);
    for entry in sortable {
        index += entry.vs.len();
        vs.extend(entry.vs);
        if let Some(b) = entry.barycenter {
            sum += b * entry.weight;
            weight += entry.weight;
        }
        consume_unsortable(&mut vs, &mut unsortable, &mut index);
    }
    // Anything left over sits past every sortable entry.
    while let Some(last) = unsortable.pop() {
        vs.extend(last.vs);
    }

    Entry {
        vs,
        i: min_i,
        barycenter: (weight > 0.0).then(|| sum / weight),
        weight,
    }
}

fn consume_unsortable(vs: &mut Vec<usize>, unsortable: &mut Vec<Entry>, index: &mut usize) {
    while unsortable.last().is_some_and(|last| last.i <= *index) {
        if let Some(last) = unsortable.pop() {
            *index += 1;
            vs.extend(last.vs);
        }
    }
}
