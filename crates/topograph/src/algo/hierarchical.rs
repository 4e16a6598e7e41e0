//! Ranked layers via `strata`.

use super::{Hook, MinLenFn, Placement, PostOptions, WeightFn};
use crate::bbox::{BoundingBox, BoxSpec};
use crate::graph::{Edge, GraphIndex, Point, Topology};
use serde::Deserialize;
use std::sync::Arc;
use strata::{Acyclicer, Align, EdgeLabel, LayerGraph, LayerOptions, NodeLabel, RankDir, Ranker};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalOptions {
    /// When set, ranked coordinates are stretched to fill this box.
    pub bounding_box: Option<BoxSpec>,
    pub node_sep: f64,
    pub edge_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
    pub align: Option<Align>,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,
    pub node_dimensions_include_labels: bool,
    #[serde(skip)]
    pub min_len: Option<Hook<MinLenFn>>,
    #[serde(skip)]
    pub edge_weight: Option<Hook<WeightFn>>,
    #[serde(flatten)]
    pub post: PostOptions,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        let layer = LayerOptions::default();
        Self {
            bounding_box: None,
            node_sep: layer.nodesep,
            edge_sep: layer.edgesep,
            rank_sep: layer.ranksep,
            rank_dir: layer.rankdir,
            align: layer.align,
            acyclicer: layer.acyclicer,
            ranker: layer.ranker,
            node_dimensions_include_labels: false,
            min_len: None,
            edge_weight: None,
            post: PostOptions::default(),
        }
    }
}

impl HierarchicalOptions {
    pub fn with_min_len(mut self, f: impl Fn(&Edge) -> u32 + Send + Sync + 'static) -> Self {
        let f: Arc<MinLenFn> = Arc::new(f);
        self.min_len = Some(Hook(f));
        self
    }

    pub fn with_edge_weight(mut self, f: impl Fn(&Edge) -> f64 + Send + Sync + 'static) -> Self {
        let f: Arc<WeightFn> = Arc::new(f);
        self.edge_weight = Some(Hook(f));
        self
    }

    fn layer_options(&self) -> LayerOptions {
        LayerOptions {
            rankdir: self.rank_dir,
            nodesep: self.node_sep,
            edgesep: self.edge_sep,
            ranksep: self.rank_sep,
            align: self.align,
            acyclicer: self.acyclicer,
            ranker: self.ranker,
        }
    }
}

/// The ranking graph: every node sized, containment mirrored, and only leaf-to-leaf edges.
fn layer_graph(index: &GraphIndex<'_>, opts: &HierarchicalOptions) -> LayerGraph {
    let mut g = LayerGraph::new();
    for ix in 0..index.node_count() {
        let node = index.node(ix);
        let (w, h) = node.layout_size(opts.node_dimensions_include_labels);
        g.set_node(node.id.as_str(), NodeLabel::sized(w, h));
    }
    for ix in 0..index.node_count() {
        if let Some(p) = index.parent(ix) {
            g.set_parent(index.node_id(ix), index.node_id(p));
        }
    }
    for (e, s, t) in index.resolved_edges() {
        if !index.is_leaf(s) || !index.is_leaf(t) {
            continue;
        }
        let edge = index.edge(e);
        let minlen = match &opts.min_len {
            Some(min_len) => min_len(edge),
            None => edge.min_length.unwrap_or(1),
        }
        .min(strata::MAX_MINLEN);
        let weight = match &opts.edge_weight {
            Some(edge_weight) => edge_weight(edge),
            None => edge.weight.unwrap_or(1.0),
        };
        g.set_edge(
            index.node_id(s),
            index.node_id(t),
            EdgeLabel {
                minlen,
                weight,
                reversed: false,
            },
        );
    }
    g
}

pub(crate) fn layout(index: &GraphIndex<'_>, opts: &HierarchicalOptions) -> Placement {
    let mut placement: Placement = vec![None; index.node_count()];
    let g = layer_graph(index, opts);
    let ranked = strata::layout(&g, &opts.layer_options());

    let leaves: Vec<(usize, Point)> = index
        .leaves()
        .filter_map(|ix| {
            ranked
                .nodes
                .get(index.node_id(ix))
                .map(|geo| (ix, Point::new(geo.x, geo.y)))
        })
        .collect();

    let target = opts
        .bounding_box
        .as_ref()
        .map(|spec| BoundingBox::resolve(Some(spec)))
        .filter(|bb| !bb.is_empty());
    match target {
        Some(bb) => {
            let hull = BoundingBox::hull(leaves.iter().map(|&(_, p)| (p, 0.0, 0.0)));
            let pct = |v: f64, lo: f64, extent: f64| {
                if extent == 0.0 { 0.0 } else { (v - lo) / extent }
            };
            for (ix, p) in leaves {
                placement[ix] = Some(Point::new(
                    bb.x1 + pct(p.x, hull.x1, hull.width) * bb.width,
                    bb.y1 + pct(p.y, hull.y1, hull.height) * bb.height,
                ));
            }
        }
        None => {
            for (ix, p) in leaves {
                placement[ix] = Some(p);
            }
        }
    }

    tracing::trace!(width = ranked.width, height = ranked.height, "hierarchical extent");
    placement
}
