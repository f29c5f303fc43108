//! Shared read-only inputs of every operator.

use crate::distance::EdgeWeight;
use crate::models::{FixedEdges, Tour};

/// Gains at or below this threshold count as "no improvement".
pub const GAIN_EPSILON: f64 = 1e-10;

/// The instance an operator works against: edge weights and fixed edges.
///
/// Passed explicitly to every operator and to the Lin-Kernighan engine;
/// nothing in this crate keeps instance data in global state.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::local_search::SearchContext;
/// use u_tour::models::{FixedEdges, Tour};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let fixed = FixedEdges::none();
/// let ctx = SearchContext::new(&dm, &fixed);
/// assert!((ctx.tour_length(&Tour::identity(4)) - 4.0).abs() < 1e-10);
/// ```
pub struct SearchContext<'a, W: ?Sized> {
    weights: &'a W,
    fixed: &'a FixedEdges,
}

impl<W: ?Sized> Clone for SearchContext<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: ?Sized> Copy for SearchContext<'_, W> {}

impl<'a, W: EdgeWeight + ?Sized> SearchContext<'a, W> {
    /// Bundles the weight oracle and the fixed edges.
    pub fn new(weights: &'a W, fixed: &'a FixedEdges) -> Self {
        Self { weights, fixed }
    }

    /// The weight oracle.
    pub fn weights(&self) -> &'a W {
        self.weights
    }

    /// The fixed edges.
    pub fn fixed(&self) -> &'a FixedEdges {
        self.fixed
    }

    /// Weight of the edge between nodes `a` and `b`.
    #[inline]
    pub fn weight(&self, a: usize, b: usize) -> f64 {
        self.weights.weight(a, b)
    }

    /// Returns `true` if the edge between nodes `a` and `b` is fixed.
    #[inline]
    pub fn is_fixed(&self, a: usize, b: usize) -> bool {
        self.fixed.contains(a, b)
    }

    /// Full length of `tour`, recomputed from scratch.
    pub fn tour_length(&self, tour: &Tour) -> f64 {
        tour.length(self.weights)
    }
}
