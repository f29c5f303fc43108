//! Dense edge weight table for tours over `0..n`.

use super::EdgeWeight;

/// Edge weights for `n` nodes, one row per source node.
///
/// Supports both Euclidean distance computation from node coordinates
/// and explicit distance specification (e.g. a parsed TSPLIB
/// `EXPLICIT` section, already shifted to 0-based node indices).
///
/// # Examples
///
/// ```
/// use u_tour::distance::{DistanceMatrix, EdgeWeight};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.weight(2, 0) - 10.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    weights: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// An `n`-node table with every weight zero.
    pub fn new(n: usize) -> Self {
        Self { weights: vec![0.0; n * n], size: n }
    }

    /// Computes a Euclidean distance matrix from node coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::from_fn(points.len(), |i, j| {
            let dx = points[i].0 - points[j].0;
            let dy = points[i].1 - points[j].1;
            (dx * dx + dy * dy).sqrt()
        })
    }

    /// Computes a Euclidean distance matrix rounded to the nearest integer,
    /// the way TSPLIB `EUC_2D` instances define their weights.
    pub fn from_points_rounded(points: &[(f64, f64)]) -> Self {
        let exact = Self::from_points(points);
        Self {
            weights: exact.weights.into_iter().map(f64::round).collect(),
            size: exact.size,
        }
    }

    /// Evaluates `f(from, to)` for every off-diagonal pair; the diagonal stays zero.
    pub fn from_fn<F: Fn(usize, usize) -> f64>(n: usize, f: F) -> Self {
        let weights = (0..n * n)
            .map(|slot| {
                let (from, to) = (slot / n, slot % n);
                if from == to { 0.0 } else { f(from, to) }
            })
            .collect();
        Self { weights, size: n }
    }

    /// Wraps explicit row-major weights; `None` unless there are exactly `n * n`.
    pub fn from_data(n: usize, weights: Vec<f64>) -> Option<Self> {
        (weights.len() == n * n).then_some(Self { weights, size: n })
    }

    #[inline]
    fn slot(&self, from: usize, to: usize) -> usize {
        from * self.size + to
    }

    /// Weight of the edge leaving `from` toward `to`.
    ///
    /// # Panics
    ///
    /// Panics if either node is `>= n`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        assert!(
            from < self.size && to < self.size,
            "node index out of range: ({from}, {to}) for {} nodes",
            self.size
        );
        self.weights[self.slot(from, to)]
    }

    /// Overwrites one direction of an edge.
    pub fn set(&mut self, from: usize, to: usize, weight: f64) {
        let slot = self.slot(from, to);
        self.weights[slot] = weight;
    }

    /// Sets both directions of an edge at once.
    pub fn set_symmetric(&mut self, a: usize, b: usize, weight: f64) {
        self.set(a, b, weight);
        self.set(b, a, weight);
    }

    /// Node count `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `w(a, b)` and `w(b, a)` agree within `tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.size).all(|a| {
            ((a + 1)..self.size).all(|b| (self.get(a, b) - self.get(b, a)).abs() <= tol)
        })
    }
}

impl EdgeWeight for DistanceMatrix {
    #[inline]
    fn weight(&self, a: usize, b: usize) -> f64 {
        self.get(a, b)
    }

    fn dimension(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)])
    }

    #[test]
    fn test_euclidean_triangle() {
        let dm = triangle();
        assert_eq!(dm.size(), 3);
        let perimeter = dm.get(0, 1) + dm.get(1, 2) + dm.get(2, 0);
        assert!((perimeter - 18.0).abs() < 1e-10);
        assert_eq!(dm.get(2, 2), 0.0);
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_rounded_weights() {
        let dm = DistanceMatrix::from_points_rounded(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        // sqrt(2) -> 1, sqrt(8) -> 3
        assert_eq!(dm.weight(0, 1), 1.0);
        assert_eq!(dm.weight(2, 0), 3.0);
    }

    #[test]
    fn test_explicit_weights() {
        let weights = vec![0.0, 2.0, 9.0, 2.0, 0.0, 4.0, 9.0, 4.0, 0.0];
        let dm = DistanceMatrix::from_data(3, weights).expect("3x3");
        assert_eq!(dm.weight(1, 2), 4.0);
        assert_eq!(dm.dimension(), 3);
        assert!(DistanceMatrix::from_data(3, vec![0.0; 8]).is_none());
    }

    #[test]
    fn test_from_fn_skips_diagonal() {
        let dm = DistanceMatrix::from_fn(4, |a, b| (a + b) as f64);
        assert_eq!(dm.get(3, 3), 0.0);
        assert_eq!(dm.get(1, 3), 4.0);
    }

    #[test]
    fn test_one_way_edge_breaks_symmetry() {
        let mut dm = DistanceMatrix::new(3);
        dm.set_symmetric(0, 2, 6.0);
        assert!(dm.is_symmetric(1e-10));
        dm.set(2, 1, 1.5);
        assert_eq!(dm.get(1, 2), 0.0);
        assert!(!dm.is_symmetric(1e-10));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        DistanceMatrix::new(2).get(0, 2);
    }
}
