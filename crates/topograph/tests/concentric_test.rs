use std::f64::consts::PI;
use topograph::{Algorithm, BoxSpec, ConcentricOptions, Graph, LayoutResult, Node, Point, layout};

const EPS: f64 = 1e-9;

fn concentric(g: &Graph, opts: ConcentricOptions) -> LayoutResult {
    layout(g, &Algorithm::Concentric(opts)).unwrap()
}

fn boxed(w: f64, h: f64) -> ConcentricOptions {
    ConcentricOptions {
        bounding_box: Some(BoxSpec::sized(0.0, 0.0, w, h)),
        ..Default::default()
    }
}

fn star() -> Graph {
    let mut g = Graph::new();
    g.add_node(Node::new("hub"));
    for i in 0..4 {
        let id = format!("l{i}");
        g.add_node(Node::new(id.clone()));
        g.add_edge("hub", id);
    }
    g
}

fn dist(p: Point, c: Point) -> f64 {
    ((p.x - c.x).powi(2) + (p.y - c.y).powi(2)).sqrt()
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
}

#[test]
fn highest_degree_sits_in_the_middle() {
    let out = concentric(&star(), boxed(400.0, 400.0));
    let center = Point::new(200.0, 200.0);
    assert!(close(out.positions["hub"], center));
    for i in 0..4 {
        let p = out.positions[&format!("l{i}")];
        assert!((dist(p, center) - 50.0).abs() < EPS);
    }
}

#[test]
fn rings_start_at_twelve_o_clock_and_run_clockwise() {
    let out = concentric(&star(), boxed(400.0, 400.0));
    assert!(close(out.positions["l0"], Point::new(200.0, 150.0)));
    assert!(close(out.positions["l1"], Point::new(250.0, 200.0)));
    assert!(close(out.positions["l2"], Point::new(200.0, 250.0)));
    assert!(close(out.positions["l3"], Point::new(150.0, 200.0)));
}

#[test]
fn counter_clockwise_mirrors_the_ring() {
    let cw = concentric(&star(), boxed(400.0, 400.0));
    let ccw = concentric(
        &star(),
        ConcentricOptions {
            clockwise: false,
            ..boxed(400.0, 400.0)
        },
    );
    let (a, b) = (cw.positions["l1"], ccw.positions["l1"]);
    assert!((a.x - 200.0 + (b.x - 200.0)).abs() < EPS);
    assert!((a.y - b.y).abs() < EPS);
}

/// One center node, a crowded ring of eight, and one outer node.
fn crowded() -> (Graph, ConcentricOptions) {
    let mut g = Graph::new();
    g.add_node(Node::new("c"));
    for i in 0..8 {
        g.add_node(Node::new(format!("r{i}")));
    }
    g.add_node(Node::new("o"));
    let opts = boxed(1000.0, 1000.0)
        .with_score(|ctx| match ctx.node.id.as_str() {
            "c" => 10.0,
            "o" => 0.0,
            _ => 5.0,
        })
        .with_level_width(|_| 1.0);
    (g, opts)
}

fn radii(out: &LayoutResult) -> [f64; 3] {
    let center = Point::new(500.0, 500.0);
    [
        dist(out.positions["c"], center),
        dist(out.positions["r0"], center),
        dist(out.positions["o"], center),
    ]
}

#[test]
fn crowded_rings_grow_past_min_dist() {
    let (g, opts) = crowded();
    let out = concentric(&g, opts);
    let [r0, r1, r2] = radii(&out);
    let chord = 2.0 - 2.0 * (PI / 4.0).cos();
    let r_min = (50.0f64 * 50.0 / chord).sqrt();

    assert!(r0.abs() < EPS);
    assert!((r1 - r_min).abs() < 1e-6);
    assert!((r2 - (r_min + 50.0)).abs() < 1e-6);
    for i in 0..8 {
        let p = out.positions[&format!("r{i}")];
        assert!((dist(p, Point::new(500.0, 500.0)) - r1).abs() < 1e-6);
    }
}

#[test]
fn equidistant_rings_share_the_largest_gap() {
    let (g, opts) = crowded();
    let out = concentric(
        &g,
        ConcentricOptions {
            equidistant: true,
            ..opts
        },
    );
    let [r0, r1, r2] = radii(&out);
    assert!(r1 > r0);
    assert!(((r1 - r0) - (r2 - r1)).abs() < 1e-6);
}

#[test]
fn without_overlap_avoidance_levels_fit_the_box() {
    let (g, opts) = crowded();
    let out = concentric(
        &g,
        ConcentricOptions {
            avoid_overlap: false,
            ..opts
        },
    );
    let [r0, r1, r2] = radii(&out);
    assert!(r0 <= r1 && r1 <= r2);
    assert!(r2 <= 500.0);
}

#[test]
fn degenerate_box_places_everything_at_its_origin() {
    let opts = ConcentricOptions {
        bounding_box: Some(BoxSpec::sized(3.0, 4.0, 100.0, 0.0)),
        ..Default::default()
    };
    let out = concentric(&star(), opts);
    assert_eq!(out.positions.len(), 5);
    assert!(out.positions.values().all(|p| *p == Point::new(3.0, 4.0)));
}

#[test]
fn empty_graph_is_a_no_op() {
    assert!(concentric(&Graph::new(), ConcentricOptions::default())
        .positions
        .is_empty());
}

#[test]
fn viewport_center_is_used_without_a_box() {
    let mut g = Graph::new();
    g.add_node(Node::new("only"));
    let out = concentric(&g, ConcentricOptions::default());
    assert!(close(out.positions["only"], Point::new(400.0, 300.0)));
}
