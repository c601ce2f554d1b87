//! Marvelstats computes descriptive statistics and centrality rankings for social networks stored
//! as GraphML, and can plot the network and its k-core.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure: a simple undirected
//! graph with attributes on nodes and edges. It can be built by hand from
//! [`Edge`](edge::Edge) instances or read from a GraphML file with [`graphml`]. Once
//! constructed, various measurements can be computed.
//!
//! ```rust
//! use marvelstats::edge::Edge;
//! use marvelstats::graph::Graph;
//! use marvelstats::ranking::top_n;
//!
//! // Construct the graph instance.
//! let mut graph = Graph::new();
//!
//! // Insert some interactions, note the IDs can be any type that is `Clone + Eq + Hash + Ord`.
//! graph.insert(Edge::new("Iron Man", "Captain America"));
//! graph.insert(Edge::new("Iron Man", "Thor"));
//! graph.insert(Edge::new("Thor", "Loki"));
//!
//! // Compute some metrics on the graph.
//! assert_eq!(graph.density(), 0.5);
//! assert!(graph.is_connected());
//!
//! let betweenness = graph.betweenness_centrality(true);
//! let best = top_n(&betweenness, 2);
//! assert_eq!(best[0].0, "Iron Man");
//! assert_eq!(best[1].0, "Thor");
//! ```

mod betweenness;
mod closeness;
mod eigenvector;
mod error;
mod pagerank;

pub mod app;
pub mod cli;
pub mod edge;
pub mod graph;
pub mod graphml;
pub mod kcore;
pub mod layout;
pub mod plot;
pub mod ranking;
pub mod report;

pub use error::{Error, Result};
pub use pagerank::PageRankConfig;
