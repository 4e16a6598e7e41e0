use serde_json::{Value, json};
use std::fs;

const CHAIN: &str = r#"{"nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}], "edges": [
    {"id": "e0", "source": "a", "target": "b"},
    {"id": "e1", "source": "b", "target": "c"}
]}"#;

const MESH: &str = r#"{"elements": {
    "nodes": [
        {"data": {"id": "ns", "namespace": "bookinfo", "isBox": "namespace"}},
        {"data": {"id": "app", "parent": "ns", "app": "reviews", "isBox": "app"}},
        {"data": {"id": "a", "parent": "app", "workload": "reviews-v1", "nodeType": "workload"}},
        {"data": {"id": "b", "parent": "app", "workload": "reviews-v2", "nodeType": "workload"}},
        {"data": {"id": "c", "parent": "ns", "service": "ratings", "nodeType": "service"}},
        {"data": {"id": "d", "nodeType": "workload"}},
        {"data": {"id": "x"}},
        {"data": {"id": "y"}}
    ],
    "edges": [
        {"data": {"id": "e0", "source": "d", "target": "a"}},
        {"data": {"id": "e1", "source": "a", "target": "b"}},
        {"data": {"id": "e2", "source": "b", "target": "c"}},
        {"data": {"id": "e3", "source": "x", "target": "y"}}
    ]
}}"#;

fn cli() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo_bin!("topograph"))
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn layout_reads_a_file_argument() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("chain.json");
    fs::write(&input, CHAIN).expect("write input");

    let output = cli()
        .args([
            "layout",
            "--algorithm",
            "breadthfirst",
            input.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"positions": {
            "a": {"x": 0.0, "y": 0.0},
            "b": {"x": 0.0, "y": 40.0},
            "c": {"x": 0.0, "y": 80.0}
        }})
    );
}

#[test]
fn layout_reads_stdin_and_reports_the_grid_shape() {
    let output = cli()
        .args(["layout", "--config", r#"{"name": "grid", "rows": 1}"#])
        .write_stdin(MESH)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["grid"], json!({"rows": 1, "cols": 6}));
    let positions = value["positions"].as_object().expect("positions");
    assert_eq!(
        positions.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["a", "b", "c", "d", "x", "y"]
    );
}

#[test]
fn algorithm_flag_overrides_the_config_name() {
    let output = cli()
        .args([
            "--algorithm",
            "concentric",
            "--config",
            r#"{"name": "grid", "boundingBox": {"x1": 0, "y1": 0, "w": 400, "h": 400}}"#,
            "-",
        ])
        .write_stdin(r#"{"nodes": [{"id": "only"}]}"#)
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"positions": {"only": {"x": 200.0, "y": 200.0}}})
    );
}

#[test]
fn out_writes_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("positions.json");

    cli()
        .args(["layout", "--pretty", "--out", out.to_string_lossy().as_ref()])
        .write_stdin(CHAIN)
        .assert()
        .success()
        .stdout("");

    let text = fs::read_to_string(&out).expect("read output");
    assert!(text.contains('\n'));
    let value: Value = serde_json::from_str(&text).expect("JSON");
    assert_eq!(value["positions"].as_object().map(|p| p.len()), Some(3));
}

#[test]
fn hovering_a_node_lists_its_chain() {
    let output = cli()
        .args(["highlight", "--hover", "c"])
        .write_stdin(MESH)
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "selected": null,
            "hovered": {"kind": "node", "id": "c"},
            "highlighted": {
                "nodes": ["ns", "app", "a", "b", "c", "d"],
                "edges": ["e0", "e1", "e2"]
            },
            "unhighlighted": {"nodes": ["x", "y"], "edges": ["e3"]}
        })
    );
}

#[test]
fn a_selected_edge_wins_over_the_hover() {
    let output = cli()
        .args(["highlight", "--edge", "--hover", "e1", "--select", "e3"])
        .write_stdin(MESH)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["selected"], json!({"kind": "edge", "id": "e3"}));
    assert_eq!(value["hovered"], Value::Null);
    assert_eq!(
        value["highlighted"],
        json!({"nodes": ["x", "y"], "edges": ["e3"]})
    );
}

#[test]
fn no_focus_highlights_nothing() {
    let output = cli()
        .arg("highlight")
        .write_stdin(MESH)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["highlighted"], json!({"nodes": [], "edges": []}));
    assert_eq!(value["unhighlighted"], json!({"nodes": [], "edges": []}));
}

#[test]
fn unknown_flags_are_usage_errors() {
    cli()
        .arg("--bogus")
        .assert()
        .code(2);
    cli()
        .args(["--node-size", "wide"])
        .assert()
        .code(2);
}

#[test]
fn bad_input_and_config_fail_with_code_one() {
    cli().write_stdin("{").assert().code(1);
    cli()
        .args(["--algorithm", "spiral"])
        .write_stdin(CHAIN)
        .assert()
        .code(1);
    cli()
        .args(["--config", "[1, 2]"])
        .write_stdin(CHAIN)
        .assert()
        .code(1);
    cli()
        .write_stdin(r#"{"nodes": [{"id": "a"}, {"id": "a"}]}"#)
        .assert()
        .code(1);
}
