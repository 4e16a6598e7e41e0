//! Concentric rings by score.
//!
//! Leaves are scored, sorted by descending score and cut into levels whenever a score drifts more
//! than `levelWidth` from the first score of the current level. Level 0 sits at the center; each
//! further level gets a ring at least `minDist` further out and wide enough that neighbours on
//! the ring stay `minDist` apart.

use super::{Hook, LevelWidthFn, NodeContext, Placement, PostOptions, ScoreFn, Size, resolve_box};
use crate::bbox::BoxSpec;
use crate::graph::{GraphIndex, Point, Topology};
use serde::Deserialize;
use std::f64::consts::PI;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConcentricOptions {
    pub bounding_box: Option<BoxSpec>,
    pub viewport: Size,
    /// Radians; the default puts the first node of each ring at twelve o'clock.
    pub start_angle: f64,
    /// Angle covered by each ring. Defaults to a full turn minus one step.
    pub sweep: Option<f64>,
    pub clockwise: bool,
    pub equidistant: bool,
    pub min_node_spacing: f64,
    pub avoid_overlap: bool,
    pub node_dimensions_include_labels: bool,
    #[serde(skip)]
    pub concentric: Option<Hook<ScoreFn>>,
    #[serde(skip)]
    pub level_width: Option<Hook<LevelWidthFn>>,
    #[serde(flatten)]
    pub post: PostOptions,
}

impl Default for ConcentricOptions {
    fn default() -> Self {
        Self {
            bounding_box: None,
            viewport: Size::default(),
            start_angle: 3.0 / 2.0 * PI,
            sweep: None,
            clockwise: true,
            equidistant: false,
            min_node_spacing: 10.0,
            avoid_overlap: true,
            node_dimensions_include_labels: false,
            concentric: None,
            level_width: None,
            post: PostOptions::default(),
        }
    }
}

impl ConcentricOptions {
    /// Replaces the default score (degree).
    pub fn with_score(
        mut self,
        f: impl Fn(&NodeContext<'_>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<ScoreFn> = Arc::new(f);
        self.concentric = Some(Hook(f));
        self
    }

    /// Replaces the default level width (max degree / 4).
    pub fn with_level_width(
        mut self,
        f: impl Fn(&[NodeContext<'_>]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<LevelWidthFn> = Arc::new(f);
        self.level_width = Some(Hook(f));
        self
    }
}

struct Level {
    members: Vec<usize>,
    first_score: f64,
    d_theta: f64,
    r: f64,
}

pub(crate) fn layout(index: &GraphIndex<'_>, opts: &ConcentricOptions) -> Placement {
    let mut placement: Placement = vec![None; index.node_count()];
    let leaves: Vec<usize> = index.leaves().collect();
    if leaves.is_empty() {
        return placement;
    }

    let bb = resolve_box(opts.bounding_box.as_ref(), opts.viewport);
    if bb.is_degenerate() {
        let origin = bb.origin();
        for &ix in &leaves {
            placement[ix] = Some(origin);
        }
        return placement;
    }
    let center = bb.center();

    let nodes: Vec<NodeContext<'_>> = leaves
        .iter()
        .map(|&ix| NodeContext::new(index, ix))
        .collect();
    let mut scored: Vec<(usize, f64)> = nodes
        .iter()
        .zip(&leaves)
        .map(|(ctx, &ix)| {
            let score = match &opts.concentric {
                Some(score) => score(ctx),
                None => ctx.degree as f64,
            };
            (ix, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let max_node_size = nodes.iter().fold(0.0f64, |m, ctx| {
        let (w, h) = ctx
            .node
            .layout_size(opts.node_dimensions_include_labels);
        m.max(w).max(h)
    });
    let level_width = match &opts.level_width {
        Some(level_width) => level_width(&nodes[..]),
        None => nodes.iter().map(|ctx| ctx.degree).max().unwrap_or(0) as f64 / 4.0,
    };

    let mut levels: Vec<Level> = Vec::new();
    for (ix, score) in scored {
        match levels.last_mut() {
            Some(level) if (level.first_score - score).abs() <= level_width => {
                level.members.push(ix);
            }
            _ => levels.push(Level {
                members: vec![ix],
                first_score: score,
                d_theta: 0.0,
                r: 0.0,
            }),
        }
    }

    let mut min_dist = max_node_size + opts.min_node_spacing;
    if !opts.avoid_overlap {
        let first_multi = usize::from(levels[0].members.len() > 1);
        let max_r = bb.width.min(bb.height) / 2.0 - min_dist;
        let r_step = max_r / (levels.len() + first_multi) as f64;
        min_dist = min_dist.min(r_step).max(0.0);
    }

    let mut r = 0.0f64;
    for level in &mut levels {
        let len = level.members.len();
        let sweep = opts
            .sweep
            .unwrap_or(2.0 * PI - 2.0 * PI / len as f64);
        level.d_theta = sweep / len.saturating_sub(1).max(1) as f64;
        if len > 1 && opts.avoid_overlap {
            let dcos = level.d_theta.cos() - 1.0;
            let dsin = level.d_theta.sin();
            let chord = dcos * dcos + dsin * dsin;
            if chord > f64::EPSILON {
                r = r.max((min_dist * min_dist / chord).sqrt());
            }
        }
        level.r = r;
        r += min_dist;
    }

    if opts.equidistant {
        let max_delta = levels
            .windows(2)
            .map(|pair| pair[1].r - pair[0].r)
            .fold(0.0f64, f64::max);
        let base = levels[0].r;
        for (i, level) in levels.iter_mut().enumerate() {
            level.r = base + max_delta * i as f64;
        }
    }

    let dir = if opts.clockwise { 1.0 } else { -1.0 };
    for level in &levels {
        for (j, &ix) in level.members.iter().enumerate() {
            let theta = opts.start_angle + dir * level.d_theta * j as f64;
            placement[ix] = Some(Point::new(
                center.x + level.r * theta.cos(),
                center.y + level.r * theta.sin(),
            ));
        }
    }

    tracing::trace!(levels = levels.len(), min_dist, "concentric levels");
    placement
}
