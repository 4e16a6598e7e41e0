//! Property tests for the layered pipeline on random DAGs.

use proptest::prelude::*;
use strata::{Acyclicer, EdgeLabel, LayerGraph, LayerOptions, NodeLabel, Ranker, layout};

fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..14).prop_flat_map(|n| {
        let edge = (0..n, 0..n).prop_filter_map("forward edges only", |(a, b)| {
            (a < b).then_some((a, b))
        });
        (Just(n), prop::collection::vec(edge, 0..24))
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> LayerGraph {
    let mut g = LayerGraph::new();
    for i in 0..n {
        g.set_node(format!("n{i}"), NodeLabel::sized(30.0 + i as f64, 20.0));
    }
    for &(a, b) in edges {
        g.set_edge(&format!("n{a}"), &format!("n{b}"), EdgeLabel::default());
    }
    g
}

proptest! {
    #[test]
    fn edges_point_down_the_ranks((n, edges) in dag_strategy(), ranker in prop_oneof![
        Just(Ranker::NetworkSimplex),
        Just(Ranker::TightTree),
        Just(Ranker::LongestPath),
    ]) {
        let g = build(n, &edges);
        let opts = LayerOptions { ranker, ..Default::default() };
        let out = layout(&g, &opts);
        prop_assert_eq!(out.nodes.len(), n);
        for &(a, b) in &edges {
            let (v, w) = (out.nodes[&format!("n{a}")], out.nodes[&format!("n{b}")]);
            prop_assert!(w.rank.unwrap() > v.rank.unwrap());
            prop_assert!(w.y > v.y);
        }
    }

    #[test]
    fn coordinates_are_finite_and_translated((n, edges) in dag_strategy(), greedy in any::<bool>()) {
        let g = build(n, &edges);
        let acyclicer = if greedy { Acyclicer::Greedy } else { Acyclicer::Dfs };
        let opts = LayerOptions { acyclicer, ..Default::default() };
        let out = layout(&g, &opts);
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        for node in out.nodes.values() {
            prop_assert!(node.x.is_finite() && node.y.is_finite());
            prop_assert!(node.rank.unwrap() >= 0);
            min_x = min_x.min(node.x - node.width / 2.0);
            min_y = min_y.min(node.y - node.height / 2.0);
        }
        prop_assert!(min_x.abs() < 1e-6);
        prop_assert!(min_y.abs() < 1e-6);
    }
}
