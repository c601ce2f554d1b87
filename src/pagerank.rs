//! PageRank centrality.

use nalgebra::DVector;

use crate::{Error, Result};

/// Parameters of the PageRank power iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following an edge rather than teleporting.
    pub damping: f64,
    pub max_iterations: usize,
    /// Per-node tolerance: iteration stops once the L1 change is below `n * tolerance`.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Weighted PageRank over weighted adjacency lists.
///
/// Each node splits its mass among its neighbours proportionally to the edge weights. Nodes
/// without outgoing weight are dangling and spread their mass uniformly, as does teleportation.
pub fn compute_pagerank(neighbours: &[Vec<(usize, f64)>], config: PageRankConfig) -> Result<Vec<f64>> {
    let n = neighbours.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let n_f64 = n as f64;
    let out_weight: Vec<f64> = neighbours
        .iter()
        .map(|edges| edges.iter().map(|(_, w)| w).sum())
        .collect();

    let mut scores = DVector::from_element(n, 1.0 / n_f64);
    let teleport = (1.0 - config.damping) / n_f64;

    for iteration in 1..=config.max_iterations {
        let dangling_sum: f64 = out_weight
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w == 0.0)
            .map(|(i, _)| scores[i])
            .sum();

        let mut next = DVector::from_element(n, teleport + config.damping * dangling_sum / n_f64);
        for (u, edges) in neighbours.iter().enumerate() {
            if out_weight[u] == 0.0 {
                continue;
            }
            let share = config.damping * scores[u] / out_weight[u];
            for &(v, w) in edges {
                next[v] += share * w;
            }
        }

        let diff = (&next - &scores).lp_norm(1);
        scores = next;

        if diff < n_f64 * config.tolerance {
            tracing::debug!(iteration, diff, "pagerank converged");
            return Ok(scores.iter().copied().collect());
        }
    }

    Err(Error::Convergence {
        algorithm: "PageRank",
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unweighted(adjacency: &[&[usize]]) -> Vec<Vec<(usize, f64)>> {
        adjacency
            .iter()
            .map(|row| row.iter().map(|&v| (v, 1.0)).collect())
            .collect()
    }

    #[test]
    fn sums_to_one() {
        let g = unweighted(&[&[1], &[0, 2], &[1, 3], &[2]]);
        let scores = compute_pagerank(&g, PageRankConfig::default()).unwrap();

        let total: f64 = scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "sum={total}");
        assert!((scores[0] - scores[3]).abs() < 1e-9);
        assert!((scores[1] - scores[2]).abs() < 1e-9);
        assert!(scores[1] > scores[0]);
    }

    #[test]
    fn heavier_edges_attract_more_mass() {
        // 0 is tied to 1 with weight 3 and to 2 with weight 1.
        let g = vec![vec![(1, 3.0), (2, 1.0)], vec![(0, 3.0)], vec![(0, 1.0)]];
        let scores = compute_pagerank(&g, PageRankConfig::default()).unwrap();

        assert!(scores[1] > scores[2], "{scores:?}");
    }

    #[test]
    fn isolated_nodes_are_uniform() {
        let scores = compute_pagerank(&[vec![], vec![]], PageRankConfig::default()).unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| (s - 0.5).abs() < 1e-12));
    }

    #[test]
    fn empty_graph() {
        assert!(compute_pagerank(&[], PageRankConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn reports_non_convergence() {
        let g = unweighted(&[&[1], &[0, 2], &[1]]);
        let config = PageRankConfig {
            max_iterations: 1,
            tolerance: 1e-12,
            ..Default::default()
        };

        assert!(matches!(
            compute_pagerank(&g, config),
            Err(Error::Convergence { iterations: 1, .. })
        ));
    }
}
