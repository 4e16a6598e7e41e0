use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use strata::{EdgeLabel, LayerGraph, LayerOptions, NodeLabel, Ranker, rank};

fn build_dag(name: &str, node_count: usize, fanout: usize) -> LayerGraph {
    let mut g = LayerGraph::new();
    let ids: Vec<String> = (0..node_count).map(|i| format!("{name}_n{i}")).collect();
    for id in &ids {
        g.set_node(id.clone(), NodeLabel::sized(40.0, 20.0));
    }

    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        g.set_edge(
            &ids[i],
            &ids[i + 1],
            EdgeLabel {
                weight: 2.0,
                ..Default::default()
            },
        );
    }

    // Extra forward edges to create crossing pressure.
    for i in 0..node_count {
        for k in 2..=(fanout + 1) {
            let to = i + k;
            if to >= node_count {
                break;
            }
            g.set_edge(&ids[i], &ids[to], EdgeLabel::default());
        }
        let to = i + 10;
        if to < node_count {
            g.set_edge(
                &ids[i],
                &ids[to],
                EdgeLabel {
                    minlen: 2,
                    weight: 0.5,
                    ..Default::default()
                },
            );
        }
    }
    g
}

fn bench_network_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_simplex");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_50_f3", 50usize, 3usize),
        ("dag_200_f4", 200usize, 4usize),
    ];

    for (name, nodes, fanout) in cases {
        let g = build_dag(name, nodes, fanout);
        group.bench_with_input(BenchmarkId::new("rank", name), &g, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    rank::rank(black_box(&mut g), Ranker::NetworkSimplex);
                    black_box(g.node_count());
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("layout", name), &g, |b, g| {
            b.iter(|| black_box(strata::layout(black_box(g), &LayerOptions::default())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_network_simplex);
criterion_main!(benches);
