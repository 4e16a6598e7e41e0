//! Network simplex ranking (Gansner et al.).
//!
//! Starts from a feasible tight tree and repeatedly swaps a tree edge with a negative cut value
//! for the non-tree edge of minimum slack that reconnects the two halves.

use super::RankGraph;
use super::feasible_tree::{Tree, feasible_tree};

struct TreeState {
    parent: Vec<Option<usize>>,
    low: Vec<usize>,
    lim: Vec<usize>,
    cut: Vec<f64>,
    preorder: Vec<usize>,
}

impl TreeState {
    fn new(n: usize) -> Self {
        Self {
            parent: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0.0; n],
            preorder: Vec::with_capacity(n),
        }
    }

    /// Recomputes parents, low/lim numbering, and cut values from root 0.
    fn recompute(&mut self, rg: &RankGraph, tree: &Tree) {
        let n = rg.len();
        self.parent.fill(None);
        self.preorder.clear();
        let mut postorder: Vec<usize> = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut next_lim = 1usize;

        // (node, neighbor cursor)
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        visited[0] = true;
        self.low[0] = next_lim;
        self.preorder.push(0);
        while let Some(frame) = stack.last_mut() {
            let (v, cursor) = *frame;
            if cursor >= tree.adj[v].len() {
                self.lim[v] = next_lim;
                next_lim += 1;
                postorder.push(v);
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let w = tree.adj[v][cursor];
            if visited[w] {
                continue;
            }
            visited[w] = true;
            self.parent[w] = Some(v);
            self.low[w] = next_lim;
            self.preorder.push(w);
            stack.push((w, 0));
        }

        for &v in &postorder {
            if self.parent[v].is_some() {
                self.cut[v] = self.cut_value(rg, tree, v);
            }
        }
    }

    /// Cut value of the tree edge between `child` and its parent.
    fn cut_value(&self, rg: &RankGraph, tree: &Tree, child: usize) -> f64 {
        let Some(parent) = self.parent[child] else {
            return 0.0;
        };
        let (child_is_tail, tree_edge) = match rg.edge_between(child, parent) {
            Some(e) => (true, e),
            None => match rg.edge_between(parent, child) {
                Some(e) => (false, e),
                None => return 0.0,
            },
        };

        let mut cut = rg.edges[tree_edge].weight;
        for e in rg.node_edges(child) {
            let edge = &rg.edges[e];
            let is_out = edge.v == child;
            let other = if is_out { edge.w } else { edge.v };
            if other == parent {
                continue;
            }
            let points_to_head = is_out == child_is_tail;
            cut += if points_to_head {
                edge.weight
            } else {
                -edge.weight
            };
            if tree.has_edge(child, other) {
                let other_cut = self.cut[other];
                cut += if points_to_head {
                    -other_cut
                } else {
                    other_cut
                };
            }
        }
        cut
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.parent.len()).find(|&v| self.parent[v].is_some() && self.cut[v] < 0.0)
    }

    fn is_descendant(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    fn enter_edge(&self, rg: &RankGraph, ranks: &[i32], child: usize) -> Option<usize> {
        let parent = self.parent[child]?;
        let (v, w) = if rg.edge_between(child, parent).is_some() {
            (child, parent)
        } else {
            (parent, child)
        };

        // The tail side is whichever endpoint roots the smaller subtree.
        let (tail, flip) = if self.lim[v] > self.lim[w] {
            (w, true)
        } else {
            (v, false)
        };

        rg.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| {
                flip == self.is_descendant(edge.v, tail)
                    && flip != self.is_descendant(edge.w, tail)
            })
            .min_by_key(|&(e, _)| rg.slack(ranks, e))
            .map(|(e, _)| e)
    }

    fn update_ranks(&self, rg: &RankGraph, ranks: &mut [i32]) {
        for &v in self.preorder.iter().skip(1) {
            let Some(p) = self.parent[v] else {
                continue;
            };
            if let Some(e) = rg.edge_between(v, p) {
                ranks[v] = ranks[p] - rg.edges[e].minlen;
            } else if let Some(e) = rg.edge_between(p, v) {
                ranks[v] = ranks[p] + rg.edges[e].minlen;
            }
        }
    }
}

pub(crate) fn network_simplex(rg: &RankGraph, ranks: &mut [i32]) {
    let n = rg.len();
    if n <= 1 {
        return;
    }

    let mut tree = feasible_tree(rg, ranks);
    let mut state = TreeState::new(n);
    state.recompute(rg, &tree);

    let max_iters = 10 * (n + rg.edges.len()) + 100;
    let mut iters = 0usize;
    while let Some(child) = state.leave_edge() {
        if iters >= max_iters {
            tracing::warn!(iters, "network simplex hit its iteration cap");
            break;
        }
        iters += 1;
        let Some(enter) = state.enter_edge(rg, ranks, child) else {
            break;
        };
        let Some(parent) = state.parent[child] else {
            break;
        };
        tree.remove(child, parent);
        tree.add(rg.edges[enter].v, rg.edges[enter].w);
        state.recompute(rg, &tree);
        state.update_ranks(rg, ranks);
    }
    tracing::trace!(nodes = n, iters, "network simplex done");
}
