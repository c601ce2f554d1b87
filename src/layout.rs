//! Force-directed node placement.

use std::{collections::BTreeMap, hash::Hash};

use nalgebra::{Point2, Vector2};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::graph::Graph;

/// Node positions, shared between every plot of a run.
pub type Layout<T> = BTreeMap<T, Point2<f64>>;

/// Number of simulation steps.
pub const ITERATIONS: usize = 50;
/// Mean displacement below which the simulation stops early.
const THRESHOLD: f64 = 1e-4;
/// Distances are clamped to this to keep repulsion finite.
const MIN_DISTANCE: f64 = 0.01;

/// Computes a Fruchterman-Reingold layout.
///
/// Starting positions are drawn uniformly from the unit square using `seed`, so the same seed
/// and graph always produce the same layout. Edge attraction is scaled by the `weight`
/// attribute. The result is centred on the origin with coordinates in `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use marvelstats::edge::Edge;
/// use marvelstats::graph::Graph;
/// use marvelstats::layout::spring_layout;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "c"));
///
/// assert_eq!(spring_layout(&graph, 42), spring_layout(&graph, 42));
/// ```
pub fn spring_layout<T>(graph: &Graph<T>, seed: u64) -> Layout<T>
where
    T: Clone + Eq + Hash + Ord,
{
    let n = graph.vertex_count();
    if n <= 1 {
        return graph.nodes().map(|node| (node.clone(), Point2::origin())).collect();
    }

    let neighbours = graph.weighted_indices();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<Vector2<f64>> = (0..n)
        .map(|_| Vector2::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    // Optimal distance between nodes.
    let k = (1.0 / n as f64).sqrt();

    // The temperature caps how far a node moves in one step and cools down linearly.
    let (low, high) = bounds(&positions);
    let mut temperature = (high - low).max() * 0.1;
    let cooling = temperature / (ITERATIONS + 1) as f64;

    let mut displacement = vec![Vector2::zeros(); n];
    for iteration in 0..ITERATIONS {
        for (i, d) in displacement.iter_mut().enumerate() {
            *d = Vector2::zeros();

            // Every pair repels.
            for (j, other) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let delta = positions[i] - other;
                let distance = delta.norm().max(MIN_DISTANCE);
                *d += delta * (k * k / (distance * distance));
            }

            // Neighbours attract.
            for &(j, weight) in &neighbours[i] {
                let delta = positions[i] - positions[j];
                let distance = delta.norm().max(MIN_DISTANCE);
                *d -= delta * (weight * distance / k);
            }
        }

        let mut moved = 0.0;
        for (position, d) in positions.iter_mut().zip(&displacement) {
            let length = match d.norm() {
                l if l < MIN_DISTANCE => 0.1,
                l => l,
            };
            let step = d * (temperature / length);
            moved += step.norm_squared();
            *position += step;
        }
        temperature -= cooling;

        if moved.sqrt() / (n as f64) < THRESHOLD {
            tracing::debug!(iteration, "layout settled early");
            break;
        }
    }

    rescale(&mut positions);

    graph
        .nodes()
        .cloned()
        .zip(positions.into_iter().map(Point2::from))
        .collect()
}

fn bounds(positions: &[Vector2<f64>]) -> (Vector2<f64>, Vector2<f64>) {
    positions.iter().fold(
        (
            Vector2::repeat(f64::INFINITY),
            Vector2::repeat(f64::NEG_INFINITY),
        ),
        |(low, high), p| (low.inf(p), high.sup(p)),
    )
}

/// Centres the positions on the origin and scales them so the largest coordinate is 1.
fn rescale(positions: &mut [Vector2<f64>]) {
    let mean = positions.iter().sum::<Vector2<f64>>() / positions.len() as f64;

    let mut limit: f64 = 0.0;
    for position in positions.iter_mut() {
        *position -= mean;
        limit = limit.max(position.amax());
    }

    if limit > 0.0 {
        for position in positions.iter_mut() {
            *position /= limit;
        }
    }
}
