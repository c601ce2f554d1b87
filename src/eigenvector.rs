//! Eigenvector centrality by power iteration.

use nalgebra::DVector;

use crate::{Error, Result};

/// Iterates `x <- (A + I) x`, normalized to unit length, from the uniform vector.
///
/// Adding the identity shifts the spectrum without changing the eigenvectors, which keeps the
/// iteration from oscillating on bipartite graphs. Converged once the L1 change drops below
/// `n * tolerance`.
pub fn compute_eigenvector(
    indices: &[Vec<usize>],
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>> {
    let n = indices.len();
    if n == 0 {
        return Err(Error::NullGraph);
    }
    if indices.iter().all(Vec::is_empty) {
        return Err(Error::NoEdges);
    }

    let mut x = DVector::from_element(n, 1.0 / n as f64);

    for iteration in 1..=max_iterations {
        let mut next = x.clone();
        for (u, neighbours) in indices.iter().enumerate() {
            for &v in neighbours {
                next[v] += x[u];
            }
        }

        // The shifted matrix keeps every component positive, so the norm is never zero.
        next.normalize_mut();

        let diff = (&next - &x).lp_norm(1);
        x = next;

        if diff < n as f64 * tolerance {
            tracing::debug!(iteration, "eigenvector centrality converged");
            return Ok(x.iter().copied().collect());
        }
    }

    Err(Error::Convergence {
        algorithm: "eigenvector centrality",
        iterations: max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star() {
        // 0 is the hub of 1 and 2.
        let indices = vec![vec![1, 2], vec![0], vec![0]];
        let x = compute_eigenvector(&indices, 1000, 1e-9).unwrap();

        assert!((x[0] - 2f64.sqrt() / 2.0).abs() < 1e-6, "{x:?}");
        assert!((x[1] - 0.5).abs() < 1e-6);
        assert!((x[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unit_length() {
        let indices = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        let x = compute_eigenvector(&indices, 1000, 1e-6).unwrap();

        let norm: f64 = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn undefined_graphs() {
        assert!(matches!(
            compute_eigenvector(&[], 1000, 1e-6),
            Err(Error::NullGraph)
        ));
        assert!(matches!(
            compute_eigenvector(&[vec![], vec![]], 1000, 1e-6),
            Err(Error::NoEdges)
        ));
    }

    #[test]
    fn reports_non_convergence() {
        let indices = vec![vec![1, 2], vec![0], vec![0]];

        assert!(matches!(
            compute_eigenvector(&indices, 2, 1e-12),
            Err(Error::Convergence { iterations: 2, .. })
        ));
    }
}
