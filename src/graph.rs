//! A module for working with attributed undirected graphs.

use std::{
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    fmt,
    hash::Hash,
};

use crate::{
    betweenness::compute_betweenness, closeness::compute_closeness, edge::Edge,
    eigenvector::compute_eigenvector, pagerank::compute_pagerank, PageRankConfig, Result,
};

/// The edge attribute read as a weight by PageRank and the spring layout.
pub const WEIGHT: &str = "weight";

/// A typed attribute value, as declared by a GraphML key.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// Returns the value as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Attributes attached to a node or an edge.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A simple undirected graph: no self-loops and at most one edge per pair of nodes.
///
/// Nodes are kept sorted by `T`'s implementation of `Ord`. Every per-node vector computed
/// internally follows that order, which keeps the results reproducible between runs.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The nodes and their attributes.
    nodes: BTreeMap<T, Attributes>,
    /// The edges and their attributes.
    edges: HashMap<Edge<T>, Attributes>,
}

impl<T> Default for Graph<T>
where
    T: Clone + Eq + Hash + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    T: Clone + Eq + Hash + Ord,
{
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use marvelstats::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// assert_eq!(graph.vertex_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            nodes: Default::default(),
            edges: Default::default(),
        }
    }

    /// Adds a node, merging the attributes into any the node already has.
    pub fn add_node(&mut self, node: T, attributes: Attributes) {
        self.nodes.entry(node).or_default().extend(attributes);
    }

    /// Inserts an edge without attributes, see [`Graph::insert_with`].
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        self.insert_with(edge, Attributes::new())
    }

    /// Inserts an edge and returns whether the pair of nodes wasn't joined before.
    ///
    /// Missing endpoints are added with no attributes. Inserting an existing pair, in either
    /// orientation, replaces its attributes. Self-loops are never inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use marvelstats::edge::Edge;
    /// use marvelstats::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert!(graph.insert(Edge::new("a", "b")));
    /// assert!(!graph.insert(Edge::new("b", "a")));
    /// assert!(!graph.insert(Edge::new("a", "a")));
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn insert_with(&mut self, edge: Edge<T>, attributes: Attributes) -> bool {
        if edge.is_loop() {
            return false;
        }

        self.nodes.entry(edge.source().clone()).or_default();
        self.nodes.entry(edge.target().clone()).or_default();

        self.edges.insert(edge, attributes).is_none()
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains_key(edge)
    }

    /// Checks if the graph contains a node.
    pub fn contains_node(&self, node: &T) -> bool {
        self.nodes.contains_key(node)
    }

    /// Returns the attributes of a node.
    pub fn node_attributes(&self, node: &T) -> Option<&Attributes> {
        self.nodes.get(node)
    }

    /// Returns the attributes of an edge.
    pub fn edge_attributes(&self, edge: &Edge<T>) -> Option<&Attributes> {
        self.edges.get(edge)
    }

    /// Iterates the nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.nodes.keys()
    }

    /// Iterates the edges and their attributes, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (&Edge<T>, &Attributes)> {
        self.edges.iter()
    }

    /// Returns the vertex count of the graph, isolated nodes included.
    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges. Graphs with less than two nodes have a density of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use marvelstats::edge::Edge;
    /// use marvelstats::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// assert_eq!(graph.density(), 0.0);
    ///
    /// graph.insert(Edge::new("a", "b"));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("a", "c"));
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        if vc < 2.0 {
            return 0.0;
        }

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }

    /// Returns the number of connected components.
    pub fn connected_components(&self) -> usize {
        let indices = self.indices();
        let mut seen = vec![false; indices.len()];
        let mut components = 0;

        for start in 0..indices.len() {
            if seen[start] {
                continue;
            }

            components += 1;
            seen[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &next in &indices[current] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        components
    }

    /// Returns whether the graph is made of exactly one connected component. The null graph has
    /// no components and isn't connected.
    pub fn is_connected(&self) -> bool {
        self.connected_components() == 1
    }

    /// Returns a mapping of nodes to their degree (number of interactions) in the graph.
    pub fn degree_centrality(&self) -> HashMap<T, u32> {
        self.scores(self.indices().iter().map(|n| n.len() as u32))
    }

    /// Returns a mapping of nodes to their degree divided by the highest possible degree, `n - 1`.
    ///
    /// In a graph of a single node that node is given a centrality of 1.
    pub fn normalized_degree_centrality(&self) -> HashMap<T, f64> {
        let n = self.vertex_count();
        if n <= 1 {
            return self.scores(std::iter::repeat(1.0));
        }

        let scale = 1.0 / (n - 1) as f64;
        self.scores(self.indices().iter().map(|neighbours| neighbours.len() as f64 * scale))
    }

    /// Returns a mapping of nodes to their closeness centrality, the inverse of their average
    /// distance to the nodes they can reach, scaled by the share of the graph they reach.
    pub fn closeness_centrality(&self) -> HashMap<T, f64> {
        self.scores(compute_closeness(&self.indices()))
    }

    /// Returns a mapping of nodes to their betweenness centrality, the share of shortest paths
    /// between other nodes passing through them.
    ///
    /// ```text
    /// B(v) = sum (shortest paths between s and t through v / total num of shortest paths
    /// between s and t)
    /// ```
    pub fn betweenness_centrality(&self, normalize: bool) -> HashMap<T, f64> {
        self.scores(compute_betweenness(&self.indices(), normalize))
    }

    /// Returns a mapping of nodes to their PageRank, using the `weight` edge attribute when it is
    /// numeric and 1 otherwise.
    pub fn pagerank(&self, config: PageRankConfig) -> Result<HashMap<T, f64>> {
        Ok(self.scores(compute_pagerank(&self.weighted_indices(), config)?))
    }

    /// Returns a mapping of nodes to their eigenvector centrality (the relative importance of
    /// the node), normalized to unit length.
    ///
    /// Fails for the null graph, for graphs without edges and when the power iteration doesn't
    /// converge within `max_iterations`.
    pub fn eigenvector_centrality(
        &self,
        max_iterations: usize,
        tolerance: f64,
    ) -> Result<HashMap<T, f64>> {
        Ok(self.scores(compute_eigenvector(
            &self.indices(),
            max_iterations,
            tolerance,
        )?))
    }

    /// Returns the subgraph induced by `keep`: those nodes and every edge between two of them,
    /// attributes included.
    pub fn subgraph(&self, keep: &HashSet<T>) -> Self {
        let nodes = self
            .nodes
            .iter()
            .filter(|(node, _)| keep.contains(*node))
            .map(|(node, attributes)| (node.clone(), attributes.clone()))
            .collect();

        let edges = self
            .edges
            .iter()
            .filter(|(edge, _)| keep.contains(edge.source()) && keep.contains(edge.target()))
            .map(|(edge, attributes)| (edge.clone(), attributes.clone()))
            .collect();

        Self { nodes, edges }
    }

    /// Adjacency lists, indexed by each node's position in the sorted node set. Neighbours are
    /// sorted too.
    pub(crate) fn indices(&self) -> Vec<Vec<usize>> {
        self.weighted_indices()
            .into_iter()
            .map(|neighbours| neighbours.into_iter().map(|(j, _)| j).collect())
            .collect()
    }

    /// Adjacency lists with the weight of each edge, see [`Graph::indices`].
    pub(crate) fn weighted_indices(&self) -> Vec<Vec<(usize, f64)>> {
        let index: HashMap<&T, usize> = self.nodes.keys().enumerate().map(|(i, n)| (n, i)).collect();
        let mut lists = vec![Vec::new(); self.nodes.len()];

        for (edge, attributes) in &self.edges {
            // Safety: both endpoints were added to the node set when the edge was inserted.
            let i = index[edge.source()];
            let j = index[edge.target()];
            let weight = attributes
                .get(WEIGHT)
                .and_then(AttrValue::as_f64)
                .unwrap_or(1.0);

            lists[i].push((j, weight));
            lists[j].push((i, weight));
        }

        for neighbours in &mut lists {
            neighbours.sort_unstable_by_key(|(j, _)| *j);
        }

        lists
    }

    /// Maps nodes, in order, to a per-node vector of values.
    fn scores<V>(&self, values: impl IntoIterator<Item = V>) -> HashMap<T, V> {
        self.nodes.keys().cloned().zip(values).collect()
    }
}
