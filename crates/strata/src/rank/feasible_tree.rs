//! Feasible (tight) spanning tree construction.
//!
//! Grows a tree of tight edges (slack 0) from the first node. When the tree stops growing, the
//! incident edge with minimum slack is made tight by shifting every tree node's rank.

use super::RankGraph;

#[derive(Debug, Clone)]
pub(crate) struct Tree {
    pub adj: Vec<Vec<usize>>,
}

impl Tree {
    fn new(n: usize) -> Self {
        Self {
            adj: vec![Vec::new(); n],
        }
    }

    pub fn add(&mut self, v: usize, w: usize) {
        self.adj[v].push(w);
        self.adj[w].push(v);
    }

    pub fn remove(&mut self, v: usize, w: usize) {
        self.adj[v].retain(|&x| x != w);
        self.adj[w].retain(|&x| x != v);
    }

    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.adj[v].contains(&w)
    }
}

pub(crate) fn feasible_tree(rg: &RankGraph, ranks: &mut [i32]) -> Tree {
    let n = rg.len();
    let mut tree = Tree::new(n);
    if n == 0 {
        return tree;
    }
    let mut in_tree = vec![false; n];
    let mut members: Vec<usize> = vec![0];
    in_tree[0] = true;

    loop {
        grow_tight(rg, ranks, &mut tree, &mut in_tree, &mut members);
        if members.len() >= n {
            break;
        }
        let Some(e) = rg
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| in_tree[edge.v] != in_tree[edge.w])
            .min_by_key(|&(e, _)| rg.slack(ranks, e))
            .map(|(e, _)| e)
        else {
            break;
        };
        let slack = rg.slack(ranks, e);
        let delta = if in_tree[rg.edges[e].v] { slack } else { -slack };
        for &m in &members {
            ranks[m] += delta;
        }
    }
    tree
}

fn grow_tight(
    rg: &RankGraph,
    ranks: &[i32],
    tree: &mut Tree,
    in_tree: &mut [bool],
    members: &mut Vec<usize>,
) {
    let mut stack: Vec<usize> = members.iter().rev().copied().collect();
    while let Some(v) = stack.pop() {
        for e in rg.node_edges(v) {
            let edge = rg.edges[e];
            let other = if edge.v == v { edge.w } else { edge.v };
            if in_tree[other] || rg.slack(ranks, e) != 0 {
                continue;
            }
            in_tree[other] = true;
            members.push(other);
            tree.add(v, other);
            stack.push(other);
        }
    }
}
