//! The edge weight oracle.

/// Weight of the edge between two nodes.
///
/// Implementations must be pure and deterministic: the same pair always
/// yields the same weight. All operators in this crate assume a symmetric
/// oracle (`weight(a, b) == weight(b, a)`).
///
/// Out-of-range node indices are a malformed-instance condition; the
/// oracle is free to panic and this crate does not recover from it.
pub trait EdgeWeight {
    /// Weight of the edge `a - b`.
    fn weight(&self, a: usize, b: usize) -> f64;

    /// Number of nodes the oracle knows about.
    fn dimension(&self) -> usize;
}

impl<W: EdgeWeight + ?Sized> EdgeWeight for &W {
    #[inline]
    fn weight(&self, a: usize, b: usize) -> f64 {
        (**self).weight(a, b)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Wraps a host lookup function as an [`EdgeWeight`].
///
/// Useful when the instance is held by the host (e.g. a parsed TSPLIB
/// problem with its own 1-based indexing): the closure performs the
/// offset translation.
///
/// # Examples
///
/// ```
/// use u_tour::distance::{EdgeWeight, FnWeight};
///
/// // 1-based host lookup behind a 0-based oracle
/// let host = |i: usize, j: usize| ((i as f64) - (j as f64)).abs();
/// let w = FnWeight::new(4, move |a, b| host(a + 1, b + 1));
/// assert_eq!(w.weight(0, 3), 3.0);
/// assert_eq!(w.dimension(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct FnWeight<F> {
    dimension: usize,
    f: F,
}

impl<F: Fn(usize, usize) -> f64> FnWeight<F> {
    /// Creates an oracle over `dimension` nodes backed by `f`.
    pub fn new(dimension: usize, f: F) -> Self {
        Self { dimension, f }
    }
}

impl<F: Fn(usize, usize) -> f64> EdgeWeight for FnWeight<F> {
    #[inline]
    fn weight(&self, a: usize, b: usize) -> f64 {
        (self.f)(a, b)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
