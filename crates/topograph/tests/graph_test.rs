use topograph::graph::wire;
use topograph::{
    Algorithm, BoundingBox, BoxSpec, BoxType, Edge, Error, Graph, GraphIndex, Node, NodeType,
    Point, Topology, layout,
};

#[test]
fn duplicate_node_ids_are_rejected() {
    let mut g = Graph::new();
    g.add_node(Node::new("a")).add_node(Node::new("a"));
    assert!(matches!(g.validate(), Err(Error::DuplicateNode { id }) if id == "a"));
    assert!(layout(&g, &Algorithm::default()).is_err());
}

#[test]
fn edges_need_both_endpoints() {
    let mut g = Graph::new();
    g.add_node(Node::new("a"));
    g.edges.push(Edge::new("dangling", "a", "ghost"));
    assert!(matches!(
        layout(&g, &Algorithm::default()),
        Err(Error::MissingEndpoint { edge_id }) if edge_id == "dangling"
    ));
}

#[test]
fn parents_must_exist() {
    let mut g = Graph::new();
    g.add_node(Node::new("a").with_parent("nowhere"));
    assert!(matches!(
        g.validate(),
        Err(Error::UnknownParent { id, parent }) if id == "a" && parent == "nowhere"
    ));
}

#[test]
fn parent_cycles_are_rejected() {
    let mut g = Graph::new();
    g.add_node(Node::new("a").with_parent("b"))
        .add_node(Node::new("b").with_parent("a"));
    assert!(matches!(g.validate(), Err(Error::ParentCycle { .. })));
}

#[test]
fn empty_graphs_lay_out_under_every_algorithm() {
    for name in ["breadthfirst", "grid", "concentric", "hierarchical", "box"] {
        let algo: Algorithm =
            serde_json::from_value(serde_json::json!({ "name": name })).unwrap();
        assert_eq!(algo.name(), name);
        let out = layout(&Graph::new(), &algo).unwrap();
        assert!(out.positions.is_empty(), "{name}");
    }
}

#[test]
fn index_answers_structural_queries() {
    let mut g = Graph::new();
    g.add_node(Node::new("outer"))
        .add_node(Node::new("inner").with_parent("outer"))
        .add_node(Node::new("a").with_parent("inner"))
        .add_node(Node::new("b"))
        .add_edge("a", "b")
        .add_edge("b", "a")
        .add_edge("a", "a");
    let index = GraphIndex::new(&g);
    let a = index.find_node("a").unwrap();
    let outer = index.find_node("outer").unwrap();
    let inner = index.find_node("inner").unwrap();

    assert_eq!(index.ancestors(a), vec![inner, outer]);
    assert_eq!(index.children(outer), &[inner]);
    assert!(index.is_leaf(a));
    assert!(!index.is_leaf(inner));
    assert_eq!(index.degree(a), 4);
    assert_eq!(index.outgoing(a).len(), 2);
    assert_eq!(index.leaves().count(), 2);
    let b = index.find_node("b").unwrap();
    assert_eq!(index.find_edge("e1").map(|e| index.endpoints(e)), Some((b, a)));
}

#[test]
fn sort_name_prefers_workload_then_service_then_app() {
    assert_eq!(Node::new("id").sort_name(), ".id");
    assert_eq!(Node::new("id").with_app("ap").sort_name(), ".ap");
    assert_eq!(
        Node::new("id")
            .with_namespace("bookinfo")
            .with_app("ap")
            .with_service("svc")
            .sort_name(),
        "bookinfo.svc"
    );
    assert_eq!(
        Node::new("id")
            .with_namespace("bookinfo")
            .with_service("svc")
            .with_workload("wk")
            .sort_name(),
        "bookinfo.wk"
    );
}

#[test]
fn envelope_documents_decode_ids_parents_and_boxes() {
    let doc = r#"{
        "elements": {
            "nodes": [
                {"data": {"id": "ns-box", "namespace": "bookinfo", "isBox": "namespace"}},
                {"data": {"id": "n1", "parent": "ns-box", "namespace": "bookinfo",
                          "workload": "reviews-v1", "nodeType": "workload"}},
                {"data": {"id": "n2", "parent": "", "nodeType": "service", "width": 60}}
            ],
            "edges": [
                {"data": {"id": "e-1", "source": "n2", "target": "n1"}}
            ]
        }
    }"#;
    let g = wire::from_json(doc, (30.0, 20.0)).unwrap();
    assert_eq!(g.nodes.len(), 3);
    assert_eq!(g.nodes[0].box_type, Some(BoxType::Namespace));
    assert_eq!(g.nodes[0].node_type, NodeType::Box);
    assert_eq!(g.nodes[1].parent.as_deref(), Some("ns-box"));
    assert_eq!(g.nodes[1].node_type, NodeType::Workload);
    assert_eq!(g.nodes[1].workload.as_deref(), Some("reviews-v1"));
    assert_eq!((g.nodes[1].width, g.nodes[1].height), (30.0, 20.0));
    assert_eq!(g.nodes[2].parent, None);
    assert_eq!((g.nodes[2].width, g.nodes[2].height), (60.0, 20.0));
    assert_eq!(g.edges[0].id, "e-1");
    assert_eq!((g.edges[0].source.as_str(), g.edges[0].target.as_str()), ("n2", "n1"));
    g.validate().unwrap();
}

#[test]
fn plain_documents_use_the_graph_form() {
    let doc = r#"{"nodes": [{"id": "a"}, {"id": "b", "locked": true}], "edges": [
        {"id": "x", "source": "a", "target": "b", "minLength": 2}
    ]}"#;
    let g = wire::from_json(doc, (1.0, 1.0)).unwrap();
    assert_eq!(g.nodes[0].width, topograph::DEFAULT_NODE_SIZE);
    assert!(g.nodes[1].locked);
    assert_eq!(g.edges[0].min_length, Some(2));
}

#[test]
fn malformed_documents_report_json_errors() {
    assert!(matches!(wire::from_json("{", (1.0, 1.0)), Err(Error::Json(_))));
    assert!(matches!(
        wire::from_json(r#"{"elements": {"nodes": [{"data": {}}]}}"#, (1.0, 1.0)),
        Err(Error::Json(_))
    ));
}

#[test]
fn bounding_boxes_resolve_corners_or_sizes() {
    let bb = BoundingBox::resolve(Some(&BoxSpec::corners(1.0, 2.0, 11.0, 22.0)));
    assert_eq!((bb.width, bb.height), (10.0, 20.0));

    let bb = BoundingBox::resolve(Some(&BoxSpec::sized(1.0, 2.0, 10.0, 20.0)));
    assert_eq!((bb.x2, bb.y2), (11.0, 22.0));
    assert_eq!(bb.center(), Point::new(6.0, 12.0));

    assert_eq!(BoundingBox::resolve(None), BoundingBox::EMPTY);
    assert_eq!(
        BoundingBox::resolve(Some(&BoxSpec::corners(5.0, 5.0, 1.0, 1.0))),
        BoundingBox::EMPTY
    );
    assert_eq!(
        BoundingBox::resolve(Some(&BoxSpec::sized(0.0, 0.0, -1.0, 5.0))),
        BoundingBox::EMPTY
    );
    let zero = BoundingBox::resolve(Some(&BoxSpec::sized(3.0, 4.0, 0.0, 5.0)));
    assert!(zero.is_degenerate());
    assert_eq!(zero.origin(), Point::new(3.0, 4.0));
}

#[test]
fn hull_covers_every_rectangle() {
    let hull = BoundingBox::hull([
        (Point::new(0.0, 0.0), 10.0, 10.0),
        (Point::new(20.0, 5.0), 4.0, 2.0),
    ]);
    assert_eq!(hull.x1, -5.0);
    assert_eq!(hull.x2, 22.0);
    assert_eq!(hull.y1, -5.0);
    assert_eq!(hull.y2, 6.0);
    assert!(BoundingBox::hull(Vec::<(Point, f64, f64)>::new()).is_empty());
}
