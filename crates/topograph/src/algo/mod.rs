pub mod boxed;
pub mod breadthfirst;
pub mod concentric;
pub mod grid;
pub mod hierarchical;

pub use boxed::BoxLayoutOptions;
pub use breadthfirst::BreadthFirstOptions;
pub use concentric::ConcentricOptions;
pub use grid::{CellHint, GridOptions};
pub use hierarchical::HierarchicalOptions;

use crate::bbox::{BoundingBox, BoxSpec};
use crate::error::Result;
use crate::graph::{Edge, GraphIndex, LayoutResult, Node, Point, Topology};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One computed center per node index; `None` means the layout left the node alone.
pub(crate) type Placement = Vec<Option<Point>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Algorithm {
    /// Rows by breadth-first depth from traffic sources, long rows split into sub-rows.
    #[serde(alias = "kiali-breadthfirst")]
    BreadthFirst(BreadthFirstOptions),
    /// Near-square grid packing with optional row/column pinning.
    Grid(GridOptions),
    /// Rings by score, highest score nearest the center.
    Concentric(ConcentricOptions),
    /// Ranked layers from the `strata` layering engine.
    #[serde(alias = "dagre")]
    Hierarchical(HierarchicalOptions),
    /// Lays out box contents per box type, then the collapsed graph.
    #[serde(rename = "box", alias = "box-layout")]
    Box(BoxLayoutOptions),
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BreadthFirst(_) => "breadthfirst",
            Algorithm::Grid(_) => "grid",
            Algorithm::Concentric(_) => "concentric",
            Algorithm::Hierarchical(_) => "hierarchical",
            Algorithm::Box(_) => "box",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Hierarchical(HierarchicalOptions::default())
    }
}

/// A shareable callback. Skipped by serde; set through the option builders.
pub struct Hook<F: ?Sized>(pub Arc<F>);

impl<F: ?Sized> Clone for Hook<F> {
    fn clone(&self) -> Self {
        Hook(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

impl<F: ?Sized> std::ops::Deref for Hook<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

pub type ScoreFn = dyn Fn(&NodeContext<'_>) -> f64 + Send + Sync;
pub type LevelWidthFn = dyn Fn(&[NodeContext<'_>]) -> f64 + Send + Sync;
pub type CellFn = dyn Fn(&Node) -> Option<CellHint> + Send + Sync;
pub type SortFn = dyn Fn(&Node, &Node) -> Ordering + Send + Sync;
pub type MinLenFn = dyn Fn(&Edge) -> u32 + Send + Sync;
pub type WeightFn = dyn Fn(&Edge) -> f64 + Send + Sync;
pub type TransformFn = dyn Fn(&Node, Point) -> Point + Send + Sync;

/// A node plus the connectivity figures scoring callbacks usually need.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub node: &'a Node,
    pub degree: usize,
    pub indegree: usize,
    pub outdegree: usize,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(index: &GraphIndex<'a>, ix: usize) -> Self {
        Self {
            node: index.node(ix),
            degree: index.degree(ix),
            indegree: index.indegree(ix),
            outdegree: index.outdegree(ix),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Stand-in for the rendering surface when no bounding box is given.
impl Default for Size {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Applied to every layout's raw positions: scale about the positions' center, then transform.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostOptions {
    pub spacing_factor: f64,
    #[serde(skip)]
    pub transform: Option<Hook<TransformFn>>,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            spacing_factor: 1.0,
            transform: None,
        }
    }
}

impl PostOptions {
    pub fn with_transform(
        mut self,
        f: impl Fn(&Node, Point) -> Point + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<TransformFn> = Arc::new(f);
        self.transform = Some(Hook(f));
        self
    }
}

/// The requested box, or the viewport when none was given.
pub(crate) fn resolve_box(spec: Option<&BoxSpec>, viewport: Size) -> BoundingBox {
    match spec {
        Some(spec) => BoundingBox::resolve(Some(spec)),
        None => BoundingBox::from_size(0.0, 0.0, viewport.width, viewport.height),
    }
}

pub(crate) fn run(index: &GraphIndex<'_>, algorithm: &Algorithm) -> Result<LayoutResult> {
    tracing::debug!(
        algorithm = algorithm.name(),
        nodes = index.node_count(),
        edges = index.edge_count(),
        "layout"
    );
    let result = match algorithm {
        Algorithm::BreadthFirst(opts) => {
            finish(index, breadthfirst::layout(index, opts), &opts.post)
        }
        Algorithm::Grid(opts) => {
            let (placement, shape) = grid::layout(index, opts);
            LayoutResult {
                grid: shape,
                ..finish(index, placement, &opts.post)
            }
        }
        Algorithm::Concentric(opts) => finish(index, concentric::layout(index, opts), &opts.post),
        Algorithm::Hierarchical(opts) => {
            finish(index, hierarchical::layout(index, opts), &opts.post)
        }
        Algorithm::Box(opts) => boxed::layout(index, opts)?,
    };
    tracing::trace!(positions = result.positions.len(), "layout done");
    Ok(result)
}

/// Keeps non-locked leaves, applies the spacing factor and the transform callback.
pub(crate) fn finish(
    index: &GraphIndex<'_>,
    placement: Placement,
    post: &PostOptions,
) -> LayoutResult {
    let placed: Vec<(usize, Point)> = placement
        .into_iter()
        .enumerate()
        .filter_map(|(ix, p)| p.map(|p| (ix, p)))
        .filter(|&(ix, _)| index.is_leaf(ix) && !index.node(ix).locked)
        .collect();

    let scale = post.spacing_factor;
    let center = if scale != 1.0 && scale > 0.0 {
        let hull = BoundingBox::hull(placed.iter().map(|&(_, p)| (p, 0.0, 0.0)));
        Some(hull.center())
    } else {
        None
    };

    let mut positions = BTreeMap::new();
    for (ix, p) in placed {
        let p = match center {
            Some(c) => Point::new(c.x + (p.x - c.x) * scale, c.y + (p.y - c.y) * scale),
            None => p,
        };
        let p = match &post.transform {
            Some(transform) => transform(index.node(ix), p),
            None => p,
        };
        positions.insert(index.node(ix).id.clone(), p);
    }
    LayoutResult {
        positions,
        grid: None,
    }
}
