//! A module for working with undirected edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// A pair of nodes joined by an interaction. Edges don't have a direction, despite the
/// `source`-`target` nomenclature used: `(a, b)` and `(b, a)` compare and hash equal.
#[derive(Clone, Debug, Eq)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use marvelstats::edge::Edge;
    ///
    /// let edge = Edge::new("Thor", "Loki");
    /// assert_eq!(edge, Edge::new("Loki", "Thor"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the first node of the edge, in insertion orientation.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the second node of the edge, in insertion orientation.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether both ends are the same node.
    ///
    /// # Examples
    ///
    /// ```
    /// use marvelstats::edge::Edge;
    ///
    /// assert!(Edge::new("a", "a").is_loop());
    /// assert!(!Edge::new("a", "b").is_loop());
    /// ```
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (&self.source, &self.target);

        // The smaller end always goes first so (a, b) and (b, a) land in the same bucket.
        match a.cmp(b) {
            Ordering::Greater => {
                b.hash(state);
                a.hash(state);
            }
            _ => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}
