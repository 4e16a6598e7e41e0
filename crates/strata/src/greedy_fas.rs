//! Greedy feedback arc set selection (Eades, Lin & Smyth).
//!
//! Multi-edges are aggregated by summing their weights. Sinks and sources are peeled off first;
//! when neither exists the node with the largest `out - in` weight is removed and its remaining
//! incoming edges join the feedback set.

use crate::LayerGraph;
use rustc_hash::FxHashMap;

struct Peel {
    alive: Vec<bool>,
    in_count: Vec<usize>,
    out_count: Vec<usize>,
    in_w: Vec<i64>,
    out_w: Vec<i64>,
    in_pairs: Vec<Vec<(usize, i64)>>,
    out_pairs: Vec<Vec<(usize, i64)>>,
}

impl Peel {
    fn remove(&mut self, v: usize) {
        self.alive[v] = false;
        for &(w, wt) in &self.out_pairs[v] {
            if self.alive[w] {
                self.in_count[w] -= 1;
                self.in_w[w] -= wt;
            }
        }
        for &(u, wt) in &self.in_pairs[v] {
            if self.alive[u] {
                self.out_count[u] -= 1;
                self.out_w[u] -= wt;
            }
        }
    }

    fn find(&self, pred: impl Fn(usize) -> bool) -> Option<usize> {
        (0..self.alive.len()).find(|&v| self.alive[v] && pred(v))
    }
}

pub fn greedy_fas(g: &LayerGraph) -> Vec<usize> {
    let n = g.node_count();
    if n <= 1 {
        return Vec::new();
    }

    // Aggregated (v, w) -> weight, keeping first-seen order for determinism.
    let mut pair_w: FxHashMap<(usize, usize), i64> = FxHashMap::default();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for edge in g.edges() {
        if edge.v == edge.w {
            continue;
        }
        let w = edge.label.weight;
        let w = if w.is_finite() { w.round() as i64 } else { 0 };
        let key = (edge.v, edge.w);
        let slot = pair_w.entry(key).or_insert_with(|| {
            pairs.push(key);
            0
        });
        *slot += w;
    }

    let mut peel = Peel {
        alive: vec![true; n],
        in_count: vec![0; n],
        out_count: vec![0; n],
        in_w: vec![0; n],
        out_w: vec![0; n],
        in_pairs: vec![Vec::new(); n],
        out_pairs: vec![Vec::new(); n],
    };
    for &(v, w) in &pairs {
        let wt = pair_w[&(v, w)];
        peel.out_pairs[v].push((w, wt));
        peel.in_pairs[w].push((v, wt));
        peel.out_count[v] += 1;
        peel.in_count[w] += 1;
        peel.out_w[v] += wt;
        peel.in_w[w] += wt;
    }

    let mut fas_pairs: Vec<(usize, usize)> = Vec::new();
    for _ in 0..n {
        if let Some(v) = peel.find(|v| peel.out_count[v] == 0) {
            peel.remove(v);
            continue;
        }
        if let Some(v) = peel.find(|v| peel.in_count[v] == 0) {
            peel.remove(v);
            continue;
        }
        let Some(v) = (0..n)
            .filter(|&v| peel.alive[v])
            .max_by_key(|&v| (peel.out_w[v] - peel.in_w[v], std::cmp::Reverse(v)))
        else {
            break;
        };
        for &(u, _) in &peel.in_pairs[v] {
            if peel.alive[u] {
                fas_pairs.push((u, v));
            }
        }
        peel.remove(v);
    }

    // Expand aggregated pairs back into the concrete multi-edges.
    let mut fas: Vec<usize> = Vec::new();
    for (u, v) in fas_pairs {
        fas.extend(
            g.out_edges(u)
                .iter()
                .copied()
                .filter(|&e| g.edge(e).w == v),
        );
    }
    fas
}
