use topograph::{
    BoxType, ElementRef, Graph, GraphIndex, Highlight, Highlighter, Node, Partition, Topology,
    partition,
};

/// `d -> a -> b -> c` where `a`, `b` live in app box `app`, which sits with `c` in namespace box
/// `ns`. `x -> y` is unrelated.
fn topology() -> Graph {
    let mut g = Graph::new();
    g.add_node(Node::new("ns").boxed(BoxType::Namespace))
        .add_node(Node::new("app").boxed(BoxType::App).with_parent("ns"))
        .add_node(Node::new("a").with_parent("app"))
        .add_node(Node::new("b").with_parent("app"))
        .add_node(Node::new("c").with_parent("ns"))
        .add_node(Node::new("d"))
        .add_node(Node::new("x"))
        .add_node(Node::new("y"))
        .add_edge("d", "a")
        .add_edge("a", "b")
        .add_edge("b", "c")
        .add_edge("x", "y");
    g
}

fn ids<T: Topology>(topo: &T, part: &Partition, state: Highlight) -> (Vec<String>, Vec<String>) {
    let mut nodes: Vec<String> = (0..topo.node_count())
        .filter(|&ix| part.node(ix) == state)
        .map(|ix| topo.node_id(ix).to_string())
        .collect();
    let mut edges: Vec<String> = (0..topo.edge_count())
        .filter(|&ix| part.edge(ix) == state)
        .map(|ix| topo.edge_id(ix).to_string())
        .collect();
    nodes.sort();
    edges.sort();
    (nodes, edges)
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn hovering_a_leaf_highlights_its_causal_chain() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("c")));

    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["a", "app", "b", "c", "d", "ns"]));
    assert_eq!(edges, strings(&["e0", "e1", "e2"]));

    let (nodes, edges) = ids(&index, &part, Highlight::Unhighlighted);
    assert_eq!(nodes, strings(&["x", "y"]));
    assert_eq!(edges, strings(&["e3"]));
    assert_eq!(part.count(Highlight::Neutral), 0);
}

#[test]
fn a_middle_node_reaches_both_ways() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("b")));
    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["a", "app", "b", "c", "d", "ns"]));
    assert_eq!(edges, strings(&["e0", "e1", "e2"]));
}

#[test]
fn a_source_node_reaches_only_downstream() {
    let mut g = topology();
    g.add_node(Node::new("z")).add_edge("z", "b");
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("c")));
    let (nodes, _) = ids(&index, &part, Highlight::Highlighted);
    assert!(nodes.contains(&"z".to_string()));

    let part = partition(&index, Some(&ElementRef::node("d")));
    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert!(!nodes.contains(&"z".to_string()));
    assert!(!edges.contains(&"e4".to_string()));
}

#[test]
fn an_edge_highlights_upstream_of_its_source_and_downstream_of_its_target() {
    let mut g = topology();
    g.add_node(Node::new("z")).add_edge("z", "b");
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::edge("e1")));
    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["a", "app", "b", "c", "d", "ns"]));
    assert_eq!(edges, strings(&["e0", "e1", "e2"]));
    let z = index.find_node("z").unwrap();
    assert_eq!(part.node(z), Highlight::Unhighlighted);
}

#[test]
fn an_app_box_highlights_its_members_chains() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("app")));
    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["a", "app", "b", "c", "d", "ns"]));
    assert_eq!(edges, strings(&["e0", "e1", "e2"]));
    let (nodes, _) = ids(&index, &part, Highlight::Unhighlighted);
    assert_eq!(nodes, strings(&["x", "y"]));
}

#[test]
fn other_boxes_highlight_themselves_and_their_ancestors_only() {
    let mut g = topology();
    g.add_node(Node::new("cluster").boxed(BoxType::Cluster));
    g.nodes[0].parent = Some("cluster".into());
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("ns")));

    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["cluster", "ns"]));
    assert!(edges.is_empty());
    assert_eq!(part.count(Highlight::Unhighlighted), 0);
}

#[test]
fn unknown_or_missing_focus_leaves_everything_neutral() {
    let g = topology();
    let index = GraphIndex::new(&g);
    assert!(partition(&index, None).is_clear());
    assert!(partition(&index, Some(&ElementRef::node("nope"))).is_clear());
    assert!(partition(&index, Some(&ElementRef::edge("nope"))).is_clear());
}

#[test]
fn highlighted_nodes_are_closed_under_ancestors() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let focuses = (0..index.node_count())
        .map(|ix| ElementRef::node(index.node_id(ix)))
        .chain((0..index.edge_count()).map(|ix| ElementRef::edge(index.edge_id(ix))));
    for focus in focuses {
        let part = partition(&index, Some(&focus));
        for ix in part.highlighted_nodes() {
            for a in index.ancestors(ix) {
                assert_eq!(part.node(a), Highlight::Highlighted, "{focus:?}");
            }
        }
    }
}

#[test]
fn cycles_terminate() {
    let mut g = Graph::new();
    g.add_node(Node::new("a"))
        .add_node(Node::new("b"))
        .add_node(Node::new("c"))
        .add_edge("a", "b")
        .add_edge("b", "a");
    let index = GraphIndex::new(&g);
    let part = partition(&index, Some(&ElementRef::node("a")));
    let (nodes, edges) = ids(&index, &part, Highlight::Highlighted);
    assert_eq!(nodes, strings(&["a", "b"]));
    assert_eq!(edges, strings(&["e0", "e1"]));
}

#[test]
fn hover_in_and_out_clears_the_flags() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let mut h = Highlighter::new();

    assert!(h.on_mouse_in(&index, ElementRef::node("c")));
    assert!(!h.partition().is_clear());
    assert!(!h.on_mouse_out(&index, &ElementRef::node("x")));
    assert!(!h.partition().is_clear());
    assert!(h.on_mouse_out(&index, &ElementRef::node("c")));
    assert!(h.partition().is_clear());
    assert!(h.hovered().is_none());
}

#[test]
fn selection_wins_over_hover() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let mut h = Highlighter::new();

    assert!(h.on_click(&index, Some(ElementRef::node("x"))));
    let selected = h.partition().clone();
    assert!(!h.on_mouse_in(&index, ElementRef::node("c")));
    assert_eq!(h.partition(), &selected);
    assert!(!h.on_mouse_out(&index, &ElementRef::node("c")));
    assert!(!h.on_click(&index, Some(ElementRef::node("x"))));
    assert_eq!(h.selected(), Some(&ElementRef::node("x")));

    assert!(h.on_click(&index, None));
    assert!(h.partition().is_clear());
    assert!(h.selected().is_none());
}

#[test]
fn selection_replaces_a_hover() {
    let g = topology();
    let index = GraphIndex::new(&g);
    let mut h = Highlighter::new();
    h.on_mouse_in(&index, ElementRef::node("c"));
    h.on_click(&index, Some(ElementRef::edge("e3")));
    assert!(h.hovered().is_none());
    let x = index.find_node("x").unwrap();
    assert_eq!(h.partition().node(x), Highlight::Highlighted);
    let c = index.find_node("c").unwrap();
    assert_eq!(h.partition().node(c), Highlight::Unhighlighted);
}
