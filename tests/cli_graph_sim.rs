use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "simkern-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn done_line(stdout: &str) -> Option<&str> {
    stdout.lines().find(|line| line.starts_with("done @ "))
}

const PING_PONG: &str = r#"
{
    "core_tick": "1ps",
    "components": [
        { "name": "a", "type": "demo.Pinger", "params": { "rounds": "3" } },
        { "name": "b", "type": "demo.Ponger" }
    ],
    "links": [
        { "name": "wire", "latency": "10ns",
          "left":  { "component": "a", "port": "out" },
          "right": { "component": "b", "port": "in" } }
    ]
}
"#;

#[test]
fn graph_sim_runs_ping_pong_until_exit() {
    let dir = unique_temp_dir("graph-sim");
    let graph = dir.join("graph.json");
    fs::write(&graph, PING_PONG).expect("write graph");

    let output = Command::new(env!("CARGO_BIN_EXE_graph_sim"))
        .args(["--graph", graph.to_str().unwrap()])
        .output()
        .expect("run graph_sim");
    assert!(
        output.status.success(),
        "graph_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        done_line(&stdout),
        Some("done @ 61ns components=2 stopped=true exit_refs=0"),
        "stdout={stdout}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn graph_sim_until_stops_early() {
    let dir = unique_temp_dir("graph-sim-until");
    let graph = dir.join("graph.json");
    fs::write(&graph, PING_PONG).expect("write graph");

    let output = Command::new(env!("CARGO_BIN_EXE_graph_sim"))
        .args(["--graph", graph.to_str().unwrap(), "--until-ns", "30"])
        .output()
        .expect("run graph_sim");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        done_line(&stdout),
        Some("done @ 30ns components=2 stopped=false exit_refs=1"),
        "stdout={stdout}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn graph_sim_fails_on_unknown_element() {
    let dir = unique_temp_dir("graph-sim-bad");
    let graph = dir.join("graph.json");
    fs::write(
        &graph,
        r#"{ "components": [ { "name": "x", "type": "demo.Nothing" } ] }"#,
    )
    .expect("write graph");

    let output = Command::new(env!("CARGO_BIN_EXE_graph_sim"))
        .args(["--graph", graph.to_str().unwrap()])
        .output()
        .expect("run graph_sim");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("demo.Nothing"));

    let _ = fs::remove_dir_all(&dir);
}
