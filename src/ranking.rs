//! Top-N selection over per-node scores.

use std::collections::HashMap;

use itertools::Itertools;

/// Returns the `n` best `(node, score)` pairs: highest score first, ties broken by ascending
/// node. Fewer entries are returned when there are less than `n` nodes.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use marvelstats::ranking::top_n;
///
/// let degrees = HashMap::from([("D", 1), ("C", 2), ("B", 2), ("A", 1)]);
///
/// assert_eq!(top_n(&degrees, 3), vec![("B", 2), ("C", 2), ("A", 1)]);
/// ```
pub fn top_n<T, V>(scores: &HashMap<T, V>, n: usize) -> Vec<(T, V)>
where
    T: Clone + Ord,
    V: Copy + Into<f64>,
{
    scores
        .iter()
        .sorted_by(|(a, x), (b, y)| {
            let (x, y): (f64, f64) = ((**x).into(), (**y).into());
            y.total_cmp(&x).then_with(|| a.cmp(b))
        })
        .take(n)
        .map(|(node, score)| (node.clone(), *score))
        .collect()
}
