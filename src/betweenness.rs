//! A module for computing betweenness centrality.

use std::collections::VecDeque;

/// This is an implementation of Ulrik Brandes's
/// A Faster Algorithm for Betweenness Centrality
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// page 10, "Algorithm 1: Betweenness centrality in unweighted graphs"
///
/// Accumulates the dependencies of every other node on paths starting at `index`.
fn betweenness_for_node(index: usize, indices: &[Vec<usize>], betweenness_count: &mut [f64]) {
    let num_nodes = indices.len();

    let mut sigma: Vec<f64> = vec![0.0; num_nodes];
    let mut distance: Vec<Option<usize>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut delta: Vec<f64> = vec![0.0; num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stack: Vec<usize> = Vec::with_capacity(num_nodes);

    sigma[index] = 1.0;
    distance[index] = Some(0);
    queue.push_back(index);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        // Every queued node has been assigned a distance.
        let next = distance[v].unwrap_or_default() + 1;

        for &w in &indices[v] {
            if distance[w].is_none() {
                distance[w] = Some(next);
                queue.push_back(w);
            }
            if distance[w] == Some(next) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    // Nodes come off the stack in order of non-increasing distance from the source.
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != index {
            betweenness_count[w] += delta[w];
        }
    }
}

/// Computes the betweenness of every node from the adjacency lists of an undirected graph.
///
/// Every unordered pair is visited from both of its ends, so raw counts are halved. Normalized
/// scores are divided by `(n - 1)(n - 2)` instead, which is `2 / ((n - 1)(n - 2))` per pair.
/// Graphs with two nodes or less can't have intermediaries and are left unscaled.
pub fn compute_betweenness(indices: &[Vec<usize>], normalize: bool) -> Vec<f64> {
    let num_nodes = indices.len();
    let mut betweenness_count: Vec<f64> = vec![0.0; num_nodes];

    for index in 0..num_nodes {
        betweenness_for_node(index, indices, &mut betweenness_count);
    }

    let divisor: f64 = if !normalize {
        2.0
    } else if num_nodes > 2 {
        ((num_nodes - 1) * (num_nodes - 2)) as f64
    } else {
        1.0
    };

    for count in betweenness_count.iter_mut() {
        *count /= divisor;
    }

    betweenness_count
}
