//! Rank-direction handling.
//!
//! The pipeline always lays out top-to-bottom. `adjust` rotates node sizes into that frame and
//! `undo` maps coordinates back into the requested direction.

use crate::{LayerGraph, RankDir};

pub fn adjust(g: &mut LayerGraph, rankdir: RankDir) {
    if matches!(rankdir, RankDir::LR | RankDir::RL) {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayerGraph, rankdir: RankDir) {
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        for ix in 0..g.node_count() {
            let n = g.label_mut(ix);
            n.y = n.y.map(|y| -y);
        }
    }
    if matches!(rankdir, RankDir::LR | RankDir::RL) {
        for ix in 0..g.node_count() {
            let n = g.label_mut(ix);
            std::mem::swap(&mut n.x, &mut n.y);
        }
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayerGraph) {
    for ix in 0..g.node_count() {
        let n = g.label_mut(ix);
        std::mem::swap(&mut n.width, &mut n.height);
    }
}
