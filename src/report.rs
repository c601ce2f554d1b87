//! The text report: size, density, connectivity and centrality rankings.

use std::{collections::HashMap, fmt::Display, hash::Hash, io::Write, time::Instant};

use crate::{graph::Graph, ranking::top_n, PageRankConfig, Result};

/// Iteration cap of the eigenvector centrality power iteration.
pub const EIGENVECTOR_MAX_ITERATIONS: usize = 1000;
/// Per-node tolerance of the eigenvector centrality power iteration.
pub const EIGENVECTOR_TOLERANCE: f64 = 1e-6;

/// Writes the report for `graph`, listing `top` nodes per ranking.
///
/// Sections appear in a fixed order. A failure in any of them aborts the report, except for
/// eigenvector centrality which is replaced by a one-line notice.
///
/// # Examples
///
/// ```
/// use marvelstats::edge::Edge;
/// use marvelstats::graph::Graph;
/// use marvelstats::report::write_report;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("A", "B"));
/// graph.insert(Edge::new("B", "C"));
/// graph.insert(Edge::new("C", "D"));
///
/// let mut out = Vec::new();
/// write_report(&graph, 2, &mut out).unwrap();
///
/// let report = String::from_utf8(out).unwrap();
/// assert!(report.contains("Density: 0.500000\nConnected: true\n"));
/// ```
pub fn write_report<T, W>(graph: &Graph<T>, top: usize, out: &mut W) -> Result<()>
where
    T: Clone + Eq + Hash + Ord + Display,
    W: Write,
{
    writeln!(out, "=== Basic Statistics ===")?;
    writeln!(out, "Nodes: {}", graph.vertex_count())?;
    writeln!(out, "Edges: {}", graph.edge_count())?;
    writeln!(out, "Density: {:.6}", graph.density())?;
    writeln!(out, "Connected: {}", graph.is_connected())?;

    let degree = graph.degree_centrality();
    writeln!(out, "\n=== Top by Degree (most interactions) ===")?;
    for (i, (node, value)) in top_n(&degree, top).iter().enumerate() {
        writeln!(out, "{}. {node}: {value}", i + 1)?;
    }

    writeln!(out, "\n=== Centralities (popularity/influence) ===")?;

    let start = Instant::now();
    let scores = graph.normalized_degree_centrality();
    tracing::debug!(elapsed = ?start.elapsed(), "degree centrality");
    write_section(out, "Top Degree Centrality:", &scores, top)?;

    let start = Instant::now();
    let scores = graph.closeness_centrality();
    tracing::debug!(elapsed = ?start.elapsed(), "closeness centrality");
    write_section(out, "Top Closeness Centrality:", &scores, top)?;

    let start = Instant::now();
    let scores = graph.betweenness_centrality(true);
    tracing::debug!(elapsed = ?start.elapsed(), "betweenness centrality");
    write_section(out, "Top Betweenness Centrality:", &scores, top)?;

    let start = Instant::now();
    let scores = graph.pagerank(PageRankConfig::default())?;
    tracing::debug!(elapsed = ?start.elapsed(), "pagerank");
    write_section(out, "Top PageRank:", &scores, top)?;

    match graph.eigenvector_centrality(EIGENVECTOR_MAX_ITERATIONS, EIGENVECTOR_TOLERANCE) {
        Ok(scores) => write_section(out, "Top Eigenvector Centrality:", &scores, top)?,
        Err(e) => {
            tracing::warn!(error = %e, "eigenvector centrality skipped");
            writeln!(out, "\n[Eigenvector centrality skipped: {e}]")?;
        }
    }

    Ok(())
}

fn write_section<T, W>(out: &mut W, title: &str, scores: &HashMap<T, f64>, top: usize) -> Result<()>
where
    T: Clone + Ord + Display,
    W: Write,
{
    writeln!(out, "\n{title}")?;
    for (i, (node, value)) in top_n(scores, top).iter().enumerate() {
        writeln!(out, "{}. {node}: {value:.6}", i + 1)?;
    }

    Ok(())
}
