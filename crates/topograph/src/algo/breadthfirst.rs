//! Rows by breadth-first depth.
//!
//! Every leaf that no edge points at is a root. A multi-source BFS over outgoing edges assigns each
//! reached leaf a depth; depth `d` becomes row `d`. Leaves the search never reaches (members of
//! source-less cycles) are orphans and lead the first row. Rows are sorted by
//! [`Node::sort_name`](crate::Node::sort_name) and stacked top to bottom; a row much longer than
//! the number of rows wraps into a small grid of sub-rows.

use super::{Placement, PostOptions};
use crate::graph::{GraphIndex, Point, Topology};
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreadthFirstOptions {
    /// Horizontal gap between neighbouring cells of a row.
    pub avoid_overlap_padding: f64,
    pub node_dimensions_include_labels: bool,
    #[serde(flatten)]
    pub post: PostOptions,
}

impl Default for BreadthFirstOptions {
    fn default() -> Self {
        Self {
            avoid_overlap_padding: 10.0,
            node_dimensions_include_labels: false,
            post: PostOptions::default(),
        }
    }
}

pub(crate) fn layout(index: &GraphIndex<'_>, opts: &BreadthFirstOptions) -> Placement {
    let mut placement: Placement = vec![None; index.node_count()];
    let rows = rows(index);
    if rows.is_empty() {
        return placement;
    }

    let size = |ix: usize| {
        index
            .node(ix)
            .layout_size(opts.node_dimensions_include_labels)
    };
    let row_max: Vec<(f64, f64)> = rows
        .iter()
        .map(|row| {
            row.iter().fold((0.0f64, 0.0f64), |(w, h), &ix| {
                let (nw, nh) = size(ix);
                (w.max(nw), h.max(nh))
            })
        })
        .collect();

    let row_count = rows.len();
    let mut y = 0.0;
    for (i, row) in rows.iter().enumerate() {
        let overflow = row.len() >= 2 * row_count;
        let split = (row.len() as f64).sqrt().round() as usize;

        let mut x = 0.0;
        let mut line_max_h = 0.0f64;
        let mut tallest_line = 0.0f64;
        let mut split_j = 0usize;
        for (j, &ix) in row.iter().enumerate() {
            let h = size(ix).1;
            if overflow && split_j > split {
                x = 0.0;
                y += (line_max_h / 2.0).round();
                let next_h = row[j..].iter().map(|&n| size(n).1).fold(0.0f64, f64::max);
                y += (next_h / 2.0).round();
                split_j = 0;
                line_max_h = 0.0;
            }
            line_max_h = line_max_h.max(h);
            tallest_line = tallest_line.max(line_max_h);
            placement[ix] = Some(Point::new(x, y));
            x += row_max[i].0 + opts.avoid_overlap_padding;
            split_j += 1;
        }

        // A wrapped row is as tall as its tallest sub-row.
        let bottom = if overflow { tallest_line } else { row_max[i].1 };
        y += (bottom / 2.0).round();
        if let Some(&(_, next_h)) = row_max.get(i + 1) {
            y += (next_h / 2.0).round();
        }
    }

    tracing::trace!(rows = row_count, "breadthfirst rows");
    placement
}

/// Leaf rows by BFS depth, each sorted by name, orphans prepended to the first row.
fn rows(index: &GraphIndex<'_>) -> Vec<Vec<usize>> {
    let n = index.node_count();
    let mut targeted = vec![false; n];
    for (_, _, t) in index.resolved_edges() {
        targeted[t] = true;
    }

    let mut depth: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for root in index.leaves().filter(|&ix| !targeted[ix]) {
        depth[root] = Some(0);
        queue.push_back((root, 0));
    }

    let mut rows: Vec<Vec<usize>> = Vec::new();
    while let Some((v, d)) = queue.pop_front() {
        if index.is_leaf(v) {
            if rows.len() <= d {
                rows.resize_with(d + 1, Vec::new);
            }
            rows[d].push(v);
        }
        for &e in index.outgoing(v) {
            let (_, w) = index.endpoints(e);
            if depth[w].is_none() {
                depth[w] = Some(d + 1);
                queue.push_back((w, d + 1));
            }
        }
    }
    rows.retain(|row| !row.is_empty());
    for row in &mut rows {
        row.sort_by_cached_key(|&ix| index.node(ix).sort_name());
    }

    let orphans: Vec<usize> = index.leaves().filter(|&ix| depth[ix].is_none()).collect();
    if !orphans.is_empty() {
        match rows.first_mut() {
            Some(first) => {
                first.splice(0..0, orphans);
            }
            None => rows.push(orphans),
        }
    }
    rows
}
