use std::{fs, path::Path, process::Command};

const BIN: &str = env!("CARGO_BIN_EXE_marvel-stats");

#[test]
fn missing_input_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(BIN)
        .current_dir(dir.path())
        .args(["does_not_exist.graphml", "--plot"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let reported = stderr
        .lines()
        .find_map(|line| line.strip_prefix("ERROR: GraphML not found at "))
        .unwrap_or_else(|| panic!("unexpected stderr: {stderr}"));

    assert!(Path::new(reported).is_absolute());
    assert!(reported.ends_with("does_not_exist.graphml"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn prints_report() {
    let graphml = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/avengers.graphml");

    let output = Command::new(BIN)
        .arg(&graphml)
        .args(["--top", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("=== Basic Statistics ===\nNodes: 10\n"));
    assert!(stdout.contains("\nTop PageRank:\n1. Captain America: "));
}
