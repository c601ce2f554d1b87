use std::{fs, path::Path};

use clap::Parser;
use marvelstats::{app, cli::Args, Error};

fn testdata(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
        .display()
        .to_string()
}

fn run(argv: &[&str]) -> anyhow::Result<String> {
    let args = Args::try_parse_from(std::iter::once("marvel-stats").chain(argv.iter().copied()))?;
    let mut out = Vec::new();
    app::run(&args, &mut out)?;

    Ok(String::from_utf8(out)?)
}

#[test]
fn report_only() {
    let report = run(&[&testdata("avengers.graphml"), "--top", "3"]).unwrap();

    // The self-loop is gone and the reversed duplicate collapsed.
    assert!(report.contains("Nodes: 10\nEdges: 29\nDensity: 0.644444\nConnected: false\n"));
    assert!(report.contains(
        "=== Top by Degree (most interactions) ===\n1. Captain America: 8\n2. Black Widow: 7\n3. Hawkeye: 7\n"
    ));
    assert!(report.contains("Top Degree Centrality:\n1. Captain America: 0.888889\n"));
    assert!(report.contains("Top Eigenvector Centrality:\n1. Captain America: "));
    assert!(!report.contains("Wrote"));
}

#[test]
fn plots_fall_back_to_max_core() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("avengers").display().to_string();

    let report = run(&[
        &testdata("avengers.graphml"),
        "--plot",
        "--k",
        "100",
        "--prefix",
        &prefix,
    ])
    .unwrap();

    let full = format!("{prefix}_full.png");
    let core = format!("{prefix}_kcore7.png");

    assert!(report.contains(&format!("Wrote {full}\n")));
    assert!(report.contains("[Note] Requested k too high; using max k=7\n"));
    assert!(report.ends_with(&format!("Wrote {core}\n")));
    assert!(Path::new(&full).exists());
    assert!(Path::new(&core).exists());
}

#[test]
fn plots_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let render = |name: &str| {
        let prefix = dir.path().join(name).display().to_string();
        run(&[
            &testdata("avengers.graphml"),
            "--plot",
            "--k",
            "3",
            "--seed",
            "7",
            "--prefix",
            &prefix,
        ])
        .unwrap();
        fs::read(format!("{prefix}_full.png")).unwrap()
    };

    assert_eq!(render("first"), render("second"));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does_not_exist.graphml");
    let prefix = dir.path().join("out").display().to_string();

    let err = run(&[&missing.display().to_string(), "--plot", "--prefix", &prefix]).unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::NotFound(path)) => {
            assert_eq!(path, &dir.path().canonicalize().unwrap().join("does_not_exist.graphml"))
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
