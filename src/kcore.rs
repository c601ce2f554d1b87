//! Core decomposition and k-core extraction.
//!
//! A node's core number is the largest `k` such that it belongs to a subgraph where every node
//! has at least `k` neighbours within that subgraph.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::graph::Graph;

/// Bucket-based peeling from Batagelj and Zaversnik, "An O(m) Algorithm for Cores
/// Decomposition of Networks". Returns core numbers in index order.
fn compute_core_numbers(indices: &[Vec<usize>]) -> Vec<u32> {
    let n = indices.len();
    let mut degree: Vec<usize> = indices.iter().map(Vec::len).collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // bin[d] is where the nodes of current degree d start in `order`.
    let mut bin = vec![0usize; max_degree + 1];
    for &d in &degree {
        bin[d] += 1;
    }
    let mut start = 0;
    for slot in bin.iter_mut() {
        let count = *slot;
        *slot = start;
        start += count;
    }

    let mut order = vec![0usize; n];
    let mut position = vec![0usize; n];
    {
        let mut next = bin.clone();
        for v in 0..n {
            position[v] = next[degree[v]];
            order[position[v]] = v;
            next[degree[v]] += 1;
        }
    }

    for i in 0..n {
        let v = order[i];
        for &u in &indices[v] {
            if degree[u] > degree[v] {
                // Move u to the front of its bucket, then shrink the bucket past it.
                let du = degree[u];
                let pu = position[u];
                let pw = bin[du];
                let w = order[pw];
                if u != w {
                    order[pu] = w;
                    order[pw] = u;
                    position[u] = pw;
                    position[w] = pu;
                }
                bin[du] += 1;
                degree[u] -= 1;
            }
        }
    }

    degree.into_iter().map(|d| d as u32).collect()
}

/// Returns the core number of every node.
///
/// # Examples
///
/// ```
/// use marvelstats::edge::Edge;
/// use marvelstats::graph::Graph;
/// use marvelstats::kcore::core_numbers;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "c"));
/// graph.insert(Edge::new("c", "a"));
/// graph.insert(Edge::new("c", "d"));
///
/// let cores = core_numbers(&graph);
/// assert_eq!(cores["a"], 2);
/// assert_eq!(cores["d"], 1);
/// ```
pub fn core_numbers<T>(graph: &Graph<T>) -> HashMap<T, u32>
where
    T: Clone + Eq + Hash + Ord,
{
    graph
        .nodes()
        .cloned()
        .zip(compute_core_numbers(&graph.indices()))
        .collect()
}

/// Returns the k-core: the subgraph induced by the nodes whose core number is at least `k`.
/// The result is empty when no such node exists.
pub fn k_core<T>(graph: &Graph<T>, k: u32) -> Graph<T>
where
    T: Clone + Eq + Hash + Ord,
{
    k_core_from(graph, &core_numbers(graph), k)
}

fn k_core_from<T>(graph: &Graph<T>, cores: &HashMap<T, u32>, k: u32) -> Graph<T>
where
    T: Clone + Eq + Hash + Ord,
{
    let keep: HashSet<T> = cores
        .iter()
        .filter(|&(_, &core)| core >= k)
        .map(|(node, _)| node.clone())
        .collect();

    graph.subgraph(&keep)
}

/// A k-core together with the `k` it was extracted at.
#[derive(Clone, Debug)]
pub struct KCore<T> {
    pub k: u32,
    pub graph: Graph<T>,
    /// Whether the requested `k` had an empty core and the maximum core number was used.
    pub fell_back: bool,
}

/// Extracts the k-core, falling back to the largest `k` with a non-empty core when the requested
/// one is empty.
///
/// The null graph has no cores: it yields an empty core at `k = 0`.
pub fn k_core_with_fallback<T>(graph: &Graph<T>, k: u32) -> KCore<T>
where
    T: Clone + Eq + Hash + Ord,
{
    let cores = core_numbers(graph);
    let core = k_core_from(graph, &cores, k);
    if core.vertex_count() > 0 {
        return KCore {
            k,
            graph: core,
            fell_back: false,
        };
    }

    let max_k = cores.values().copied().max().unwrap_or(0);
    tracing::warn!(requested = k, used = max_k, "k-core is empty, using the maximum core");

    KCore {
        k: max_k,
        graph: k_core_from(graph, &cores, max_k),
        fell_back: true,
    }
}

#[cfg(test)]
mod tests {
    use crate::edge::Edge;
    use crate::graph::Attributes;

    use super::*;

    fn complete(names: &[&'static str]) -> Graph<&'static str> {
        let mut graph = Graph::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                graph.insert(Edge::new(*a, *b));
            }
        }
        graph
    }

    #[test]
    fn core_numbers_of_clique_with_tail() {
        let mut graph = complete(&["a", "b", "c", "d"]);
        graph.insert(Edge::new("d", "e"));
        graph.insert(Edge::new("e", "f"));
        graph.add_node("g", Attributes::new());

        let cores = core_numbers(&graph);

        for node in ["a", "b", "c", "d"] {
            assert_eq!(cores[node], 3);
        }
        assert_eq!(cores["e"], 1);
        assert_eq!(cores["f"], 1);
        assert_eq!(cores["g"], 0);
    }

    #[test]
    fn k_core_keeps_dense_part() {
        let mut graph = complete(&["a", "b", "c", "d"]);
        graph.insert(Edge::new("d", "e"));

        let core = k_core(&graph, 3);

        assert_eq!(core.vertex_count(), 4);
        assert_eq!(core.edge_count(), 6);
        assert!(!core.contains_node(&"e"));

        assert_eq!(k_core(&graph, 4).vertex_count(), 0);
    }

    #[test]
    fn fallback_to_max_core() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut graph = complete(&names);
        graph.insert(Edge::new("h", "tail"));

        let kcore = k_core_with_fallback(&graph, 100);

        assert!(kcore.fell_back);
        assert_eq!(kcore.k, 7);
        assert_eq!(kcore.graph.vertex_count(), 8);
    }

    #[test]
    fn fallback_is_logged_as_warning() {
        use std::{
            io,
            sync::{Arc, Mutex},
        };

        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let logs = Arc::new(Mutex::new(Vec::new()));
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || Capture(sink.clone()))
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let graph = complete(&["a", "b", "c"]);
        let kcore = tracing::subscriber::with_default(subscriber, || k_core_with_fallback(&graph, 5));
        assert!(kcore.fell_back);

        let logs = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("k-core is empty"), "{logs}");
    }

    #[test]
    fn no_fallback_when_core_exists() {
        let graph = complete(&["a", "b", "c"]);
        let kcore = k_core_with_fallback(&graph, 2);

        assert!(!kcore.fell_back);
        assert_eq!(kcore.k, 2);
        assert_eq!(kcore.graph.vertex_count(), 3);
    }

    #[test]
    fn null_graph() {
        let graph: Graph<&str> = Graph::new();
        let kcore = k_core_with_fallback(&graph, 5);

        assert_eq!(kcore.k, 0);
        assert_eq!(kcore.graph.vertex_count(), 0);
    }

    #[test]
    fn edgeless_graph() {
        let mut graph = Graph::new();
        graph.add_node("a", Attributes::new());
        graph.add_node("b", Attributes::new());

        let kcore = k_core_with_fallback(&graph, 20);

        assert!(kcore.fell_back);
        assert_eq!(kcore.k, 0);
        assert_eq!(kcore.graph.vertex_count(), 2);
    }
}
