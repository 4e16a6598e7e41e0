//! Near-square grid packing.

use super::{CellFn, Hook, Placement, PostOptions, Size, SortFn, resolve_box};
use crate::bbox::BoxSpec;
use crate::graph::{GraphIndex, GridShape, Node, Point, Topology};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// A manual cell request. A missing row (or column) takes the first free one in the given
/// column (or row). Out-of-range values are used as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CellHint {
    pub row: Option<i64>,
    pub col: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    pub bounding_box: Option<BoxSpec>,
    pub viewport: Size,
    pub avoid_overlap: bool,
    pub avoid_overlap_padding: f64,
    pub node_dimensions_include_labels: bool,
    /// Packs cells as tightly as node sizes allow instead of filling the box.
    pub condense: bool,
    pub rows: Option<usize>,
    #[serde(alias = "columns")]
    pub cols: Option<usize>,
    #[serde(skip)]
    pub position: Option<Hook<CellFn>>,
    #[serde(skip)]
    pub sort: Option<Hook<SortFn>>,
    #[serde(flatten)]
    pub post: PostOptions,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            bounding_box: None,
            viewport: Size::default(),
            avoid_overlap: true,
            avoid_overlap_padding: 10.0,
            node_dimensions_include_labels: false,
            condense: false,
            rows: None,
            cols: None,
            position: None,
            sort: None,
            post: PostOptions::default(),
        }
    }
}

impl GridOptions {
    pub fn with_position(
        mut self,
        f: impl Fn(&Node) -> Option<CellHint> + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<CellFn> = Arc::new(f);
        self.position = Some(Hook(f));
        self
    }

    pub fn with_sort(
        mut self,
        f: impl Fn(&Node, &Node) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<SortFn> = Arc::new(f);
        self.sort = Some(Hook(f));
        self
    }
}

/// Picks `(rows, cols)` for `cells` nodes in a `w × h` box.
pub(crate) fn shape(
    cells: usize,
    w: f64,
    h: f64,
    rows: Option<usize>,
    cols: Option<usize>,
) -> GridShape {
    let splits = (cells as f64 * h / w).sqrt();
    let mut r = splits.round() as usize;
    let mut c = (w / h * splits).round() as usize;

    match (rows, cols) {
        (Some(pr), Some(pc)) => return GridShape { rows: pr, cols: pc },
        (Some(pr), None) => {
            let pr = pr.max(1);
            return GridShape {
                rows: pr,
                cols: cells.div_ceil(pr),
            };
        }
        (None, Some(pc)) => {
            let pc = pc.max(1);
            return GridShape {
                rows: cells.div_ceil(pc),
                cols: pc,
            };
        }
        (None, None) => {}
    }

    // Ties between the sides resolve to rows.
    fn set_small(r: &mut usize, c: &mut usize, val: usize) {
        if (*r).min(*c) == *r {
            *r = val;
        } else {
            *c = val;
        }
    }
    fn set_large(r: &mut usize, c: &mut usize, val: usize) {
        if (*r).max(*c) == *r {
            *r = val;
        } else {
            *c = val;
        }
    }

    if r * c > cells {
        let sm = r.min(c);
        let lg = r.max(c);
        if (sm - 1) * lg >= cells {
            set_small(&mut r, &mut c, sm - 1);
        } else if (lg - 1) * sm >= cells {
            set_large(&mut r, &mut c, lg - 1);
        }
    } else {
        while r * c < cells {
            let sm = r.min(c);
            let lg = r.max(c);
            if (lg + 1) * sm >= cells {
                set_large(&mut r, &mut c, lg + 1);
            } else {
                set_small(&mut r, &mut c, sm + 1);
            }
        }
    }
    GridShape { rows: r, cols: c }
}

pub(crate) fn layout(index: &GraphIndex<'_>, opts: &GridOptions) -> (Placement, Option<GridShape>) {
    let mut placement: Placement = vec![None; index.node_count()];
    let mut nodes: Vec<usize> = index.leaves().collect();
    if let Some(sort) = &opts.sort {
        nodes.sort_by(|&a, &b| sort(index.node(a), index.node(b)));
    }

    let bb = resolve_box(opts.bounding_box.as_ref(), opts.viewport);
    if bb.is_degenerate() {
        let origin = bb.origin();
        for ix in nodes {
            placement[ix] = Some(origin);
        }
        return (placement, None);
    }

    let grid = shape(nodes.len(), bb.width, bb.height, opts.rows, opts.cols);
    if nodes.is_empty() {
        return (placement, Some(grid));
    }

    let (mut cell_w, mut cell_h) = if opts.condense {
        (0.0, 0.0)
    } else {
        (
            bb.width / grid.cols.max(1) as f64,
            bb.height / grid.rows.max(1) as f64,
        )
    };
    if opts.avoid_overlap {
        for &ix in &nodes {
            let (w, h) = index
                .node(ix)
                .layout_size(opts.node_dimensions_include_labels);
            cell_w = cell_w.max(w + opts.avoid_overlap_padding);
            cell_h = cell_h.max(h + opts.avoid_overlap_padding);
        }
    }

    let mut used: FxHashSet<(i64, i64)> = FxHashSet::default();
    let mut manual: Vec<Option<(i64, i64)>> = vec![None; index.node_count()];
    if let Some(position) = &opts.position {
        for &ix in &nodes {
            let Some(hint) = position(index.node(ix)) else {
                continue;
            };
            let cell = match (hint.row, hint.col) {
                (None, None) => continue,
                (Some(row), Some(col)) => (row, col),
                (Some(row), None) => {
                    let mut col = 0;
                    while used.contains(&(row, col)) {
                        col += 1;
                    }
                    (row, col)
                }
                (None, Some(col)) => {
                    let mut row = 0;
                    while used.contains(&(row, col)) {
                        row += 1;
                    }
                    (row, col)
                }
            };
            manual[ix] = Some(cell);
            used.insert(cell);
        }
    }

    let cols = grid.cols.max(1) as i64;
    let (mut row, mut col) = (0i64, 0i64);
    let center = |(r, c): (i64, i64)| {
        Point::new(
            c as f64 * cell_w + cell_w / 2.0 + bb.x1,
            r as f64 * cell_h + cell_h / 2.0 + bb.y1,
        )
    };
    for &ix in &nodes {
        if index.node(ix).locked {
            continue;
        }
        let cell = match manual[ix] {
            Some(cell) => cell,
            None => {
                while used.contains(&(row, col)) {
                    col += 1;
                    if col >= cols {
                        col = 0;
                        row += 1;
                    }
                }
                let cell = (row, col);
                used.insert(cell);
                col += 1;
                if col >= cols {
                    col = 0;
                    row += 1;
                }
                cell
            }
        };
        placement[ix] = Some(center(cell));
    }

    tracing::trace!(rows = grid.rows, cols = grid.cols, "grid shape");
    (placement, Some(grid))
}
