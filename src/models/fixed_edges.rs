//! Edges that every tour must keep.

use std::collections::HashSet;

use super::{Tour, TourError};

/// A set of undirected edges that no operator may break.
///
/// Supplied once by the host (e.g. from a TSPLIB `FIXED_EDGES_SECTION`)
/// and never changed afterwards. Lookups are orientation-independent.
///
/// # Examples
///
/// ```
/// use u_tour::models::FixedEdges;
///
/// let fixed = FixedEdges::new(5, [(3, 1)]).unwrap();
/// assert!(fixed.contains(1, 3));
/// assert!(fixed.contains(3, 1));
/// assert!(!fixed.contains(1, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedEdges {
    edges: HashSet<(usize, usize)>,
}

#[inline]
pub(crate) fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl FixedEdges {
    /// Validates and stores the given edges for an instance of `len` nodes.
    pub fn new<I>(len: usize, edges: I) -> Result<Self, TourError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut set = HashSet::new();
        for (a, b) in edges {
            if a >= len || b >= len {
                return Err(TourError::FixedEdgeOutOfRange { a, b, len });
            }
            if a == b {
                return Err(TourError::FixedSelfLoop { node: a });
            }
            set.insert(edge_key(a, b));
        }
        Ok(Self { edges: set })
    }

    /// An empty set: every edge may be broken.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if the edge `a - b` is fixed.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        !self.edges.is_empty() && self.edges.contains(&edge_key(a, b))
    }

    /// Number of fixed edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no edge is fixed.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The smallest fixed edge as `(low, high)`; anchors tour normalization.
    pub fn smallest(&self) -> Option<(usize, usize)> {
        self.edges.iter().copied().min()
    }

    /// Iterates over the fixed edges as `(low, high)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Returns `true` if at least one fixed edge occurs in the tour.
    pub fn any_in(&self, tour: &Tour) -> bool {
        tour.edges().any(|(a, b)| self.contains(a, b))
    }

    /// Returns `true` if every fixed edge occurs in the tour.
    pub fn all_in(&self, tour: &Tour) -> bool {
        tour.edges().filter(|&(a, b)| self.contains(a, b)).count() == self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = FixedEdges::new(4, [(0, 4)]).unwrap_err();
        assert_eq!(err, TourError::FixedEdgeOutOfRange { a: 0, b: 4, len: 4 });
    }

    #[test]
    fn test_new_rejects_self_loop() {
        let err = FixedEdges::new(4, [(2, 2)]).unwrap_err();
        assert_eq!(err, TourError::FixedSelfLoop { node: 2 });
    }

    #[test]
    fn test_duplicates_collapse() {
        let fixed = FixedEdges::new(4, [(0, 1), (1, 0)]).unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed.smallest(), Some((0, 1)));
    }

    #[test]
    fn test_any_and_all_in() {
        let tour = Tour::new(vec![0, 1, 2, 3, 4]).unwrap();
        let fixed = FixedEdges::new(5, [(4, 0), (2, 1)]).unwrap();
        assert!(fixed.any_in(&tour));
        assert!(fixed.all_in(&tour));

        let fixed = FixedEdges::new(5, [(0, 2), (1, 2)]).unwrap();
        assert!(fixed.any_in(&tour));
        assert!(!fixed.all_in(&tour));
    }

    #[test]
    fn test_none_is_empty() {
        let fixed = FixedEdges::none();
        assert!(fixed.is_empty());
        assert!(!fixed.contains(0, 1));
        assert_eq!(fixed.smallest(), None);
    }
}
