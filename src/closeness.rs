//! A module for computing closeness centrality.

use std::collections::VecDeque;

/// Breadth-first search from `index`, returning the number of reachable nodes (itself included)
/// and the sum of their distances.
fn closeness_for_node(index: usize, indices: &[Vec<usize>]) -> (usize, usize) {
    let num_nodes = indices.len();

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut deltas: Vec<Option<usize>> = vec![None; num_nodes];

    deltas[index] = Some(0);
    queue.push_back(index);

    let mut reachable = 1;
    let mut total_path_length = 0;

    while let Some(current) = queue.pop_front() {
        let next = deltas[current].unwrap_or_default() + 1;
        for &j in &indices[current] {
            if deltas[j].is_none() {
                deltas[j] = Some(next);
                queue.push_back(j);
                reachable += 1;
                total_path_length += next;
            }
        }
    }

    (reachable, total_path_length)
}

/// Computes the closeness of every node, scaled by the fraction of the graph it can reach
/// (Wasserman and Faust) so that nodes in small components don't score artificially high.
pub fn compute_closeness(indices: &[Vec<usize>]) -> Vec<f64> {
    let num_nodes = indices.len();

    (0..num_nodes)
        .map(|index| {
            let (reachable, total) = closeness_for_node(index, indices);
            if total == 0 || num_nodes <= 1 {
                return 0.0;
            }

            let others = (reachable - 1) as f64;
            (others / total as f64) * (others / (num_nodes - 1) as f64)
        })
        .collect()
}
