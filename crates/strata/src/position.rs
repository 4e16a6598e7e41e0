//! Coordinate assignment.
//!
//! `y` stacks ranks using each rank's tallest node plus `ranksep`. `x` comes from Brandes-Köpf.

pub mod bk;

use crate::{LayerGraph, LayerOptions};

pub fn position(g: &mut LayerGraph, opts: &LayerOptions) {
    let layering = crate::order::layers(g);
    position_y(g, &layering, opts.ranksep);
    let xs = bk::position_x(g, &layering, opts);
    for layer in &layering {
        for &v in layer {
            g.label_mut(v).x = Some(xs[v]);
        }
    }
}

fn position_y(g: &mut LayerGraph, layering: &[Vec<usize>], ranksep: f64) {
    let mut prev_y = 0.0;
    for layer in layering {
        let max_height = layer
            .iter()
            .map(|&v| g.label(v).height)
            .fold(0.0f64, f64::max);
        prev_y += max_height / 2.0;
        for &v in layer {
            g.label_mut(v).y = Some(prev_y);
        }
        prev_y += max_height / 2.0 + ranksep;
    }
}
