use serde_json::Value;
use std::process::Command;

fn eli_info(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_eli_info"))
        .args(args)
        .output()
        .expect("run eli_info");
    assert!(
        output.status.success(),
        "eli_info failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn eli_info_prints_the_demo_library() {
    let stdout = eli_info(&[]);
    assert!(stdout.starts_with("library : demo\n"), "stdout={stdout}");
    assert!(stdout.contains("    Multiplier: "));
    assert!(stdout.contains("      factor: Multiplier applied to each input (<required>)"));
    assert!(stdout.contains("    Interface: demo.Reducer"));
}

#[test]
fn eli_info_json_lists_every_descriptor() {
    let stdout = eli_info(&["--json"]);
    let v: Value = serde_json::from_str(&stdout).expect("parse json");
    let arr = v.as_array().expect("json array");
    assert_eq!(arr.len(), 5);

    let strategy = |name: &str| {
        arr.iter()
            .find(|e| e.get("name").and_then(|n| n.as_str()) == Some(name))
            .and_then(|e| e.get("strategy"))
            .and_then(|s| s.as_str())
            .map(str::to_string)
    };
    assert_eq!(strategy("Adder").as_deref(), Some("constructor"));
    assert_eq!(strategy("Multiplier").as_deref(), Some("custom_factory"));
    assert_eq!(strategy("Accumulator").as_deref(), Some("constructor"));
}

#[test]
fn eli_info_rejects_unknown_library() {
    let output = Command::new(env!("CARGO_BIN_EXE_eli_info"))
        .args(["--library", "nope"])
        .output()
        .expect("run eli_info");
    assert!(!output.status.success());
}
