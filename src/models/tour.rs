//! The tour: a cyclic permutation of node indices.

use crate::distance::EdgeWeight;

use super::{FixedEdges, TourError};

/// Smallest number of nodes accepted by [`Tour::new`].
pub const MIN_TOUR_LEN: usize = 3;

/// A cyclic permutation of the nodes `0..n`.
///
/// Position `i` is adjacent to position `(i + 1) mod n`; these adjacencies
/// are the tour's edges. Operators mutate a tour in place and always leave
/// it a permutation.
///
/// # Examples
///
/// ```
/// use u_tour::models::Tour;
///
/// let tour = Tour::new(vec![2, 0, 3, 1]).unwrap();
/// assert_eq!(tour.len(), 4);
/// assert_eq!(tour.node(0), 2);
/// assert_eq!(tour.edge_at(3), (1, 2));
/// assert!(Tour::new(vec![0, 1, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tour {
    nodes: Vec<usize>,
}

impl Tour {
    /// Creates a tour, checking that `nodes` is a permutation of `0..n`.
    pub fn new(nodes: Vec<usize>) -> Result<Self, TourError> {
        check_permutation(&nodes)?;
        Ok(Self { nodes })
    }

    /// The tour `0, 1, …, n-1`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is below [`MIN_TOUR_LEN`].
    pub fn identity(n: usize) -> Self {
        assert!(n >= MIN_TOUR_LEN, "tour needs at least {} nodes", MIN_TOUR_LEN);
        Self {
            nodes: (0..n).collect(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: tours have at least [`MIN_TOUR_LEN`] nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Consumes the tour, returning the node sequence.
    pub fn into_nodes(self) -> Vec<usize> {
        self.nodes
    }

    /// The node at `position`.
    #[inline]
    pub fn node(&self, position: usize) -> usize {
        self.nodes[position]
    }

    /// The node at `position` taken modulo the tour length.
    #[inline]
    pub fn node_wrapped(&self, position: usize) -> usize {
        self.nodes[position % self.nodes.len()]
    }

    #[inline]
    pub(crate) fn set_node(&mut self, position: usize, node: usize) {
        self.nodes[position] = node;
    }

    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
    }

    /// Position following `position`.
    #[inline]
    pub fn next_pos(&self, position: usize) -> usize {
        (position + 1) % self.nodes.len()
    }

    /// Position preceding `position`.
    #[inline]
    pub fn prev_pos(&self, position: usize) -> usize {
        (position + self.nodes.len() - 1) % self.nodes.len()
    }

    /// The edge leaving `position`: `(node(position), node(position + 1))`.
    #[inline]
    pub fn edge_at(&self, position: usize) -> (usize, usize) {
        (self.nodes[position], self.nodes[self.next_pos(position)])
    }

    /// Returns `true` if the edge leaving `position` is fixed.
    #[inline]
    pub fn is_fixed_at(&self, position: usize, fixed: &FixedEdges) -> bool {
        let (a, b) = self.edge_at(position);
        fixed.contains(a, b)
    }

    /// Iterates over all `n` edges in tour order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.nodes.len()).map(move |i| self.edge_at(i))
    }

    /// Total length of the closed tour.
    pub fn length<W: EdgeWeight + ?Sized>(&self, weights: &W) -> f64 {
        self.edges().map(|(a, b)| weights.weight(a, b)).sum()
    }

    /// Replaces the node sequence with a new permutation.
    pub(crate) fn replace_nodes(&mut self, nodes: Vec<usize>) {
        debug_assert_eq!(nodes.len(), self.nodes.len());
        debug_assert!(check_permutation(&nodes).is_ok(), "replacement is not a permutation");
        self.nodes = nodes;
    }

    /// Canonical form of the cycle, independent of rotation and direction.
    ///
    /// With fixed edges, the sequence starts at the low end of the smallest
    /// fixed edge and ends at its high end. Otherwise it starts at node 0
    /// and continues towards the smaller of 0's two neighbors.
    ///
    /// ```
    /// use u_tour::models::{FixedEdges, Tour};
    ///
    /// let a = Tour::new(vec![2, 3, 0, 1]).unwrap();
    /// let b = Tour::new(vec![1, 0, 3, 2]).unwrap();
    /// let none = FixedEdges::none();
    /// assert_eq!(a.normalized(&none), vec![0, 1, 2, 3]);
    /// assert_eq!(a.normalized(&none), b.normalized(&none));
    /// ```
    pub fn normalized(&self, fixed: &FixedEdges) -> Vec<usize> {
        let n = self.nodes.len();
        let anchor = fixed.smallest().and_then(|(lo, hi)| {
            (0..n).find_map(|i| {
                let j = self.next_pos(i);
                if (self.nodes[i], self.nodes[j]) == (lo, hi) {
                    Some((i, false))
                } else if (self.nodes[j], self.nodes[i]) == (lo, hi) {
                    Some((j, true))
                } else {
                    None
                }
            })
        });
        let (start, forward) = anchor.unwrap_or_else(|| {
            let idx = self.position_of(0);
            let next = self.nodes[self.next_pos(idx)];
            let prev = self.nodes[self.prev_pos(idx)];
            (idx, next < prev)
        });
        (0..n)
            .map(|k| {
                let pos = if forward {
                    (start + k) % n
                } else {
                    (start + n - k) % n
                };
                self.nodes[pos]
            })
            .collect()
    }

    /// Returns `true` if both tours describe the same cycle.
    pub fn same_cycle(&self, other: &Tour, fixed: &FixedEdges) -> bool {
        self.nodes.len() == other.nodes.len() && self.normalized(fixed) == other.normalized(fixed)
    }

    /// Number of undirected edges the two tours share.
    pub fn common_edges(&self, other: &Tour) -> usize {
        let n = self.nodes.len();
        if n != other.nodes.len() {
            return 0;
        }
        let mut succ = vec![usize::MAX; n];
        let mut pred = vec![usize::MAX; n];
        for (a, b) in self.edges() {
            succ[a] = b;
            pred[b] = a;
        }
        other
            .edges()
            .filter(|&(a, b)| succ[a] == b || pred[a] == b)
            .count()
    }

    /// Position of `node` in the sequence (linear scan).
    pub fn position_of(&self, node: usize) -> usize {
        self.nodes
            .iter()
            .position(|&v| v == node)
            .unwrap_or_else(|| panic!("node {} missing from tour", node))
    }
}

/// Checks that `nodes` is a permutation of `0..nodes.len()`.
pub fn check_permutation(nodes: &[usize]) -> Result<(), TourError> {
    let n = nodes.len();
    if n < MIN_TOUR_LEN {
        return Err(TourError::TooShort { len: n });
    }
    let mut seen = vec![false; n];
    for &v in nodes {
        if v >= n {
            return Err(TourError::NodeOutOfRange { node: v, len: n });
        }
        if seen[v] {
            return Err(TourError::DuplicateNode { node: v });
        }
        seen[v] = true;
    }
    Ok(())
}

impl TryFrom<Vec<usize>> for Tour {
    type Error = TourError;

    fn try_from(nodes: Vec<usize>) -> Result<Self, Self::Error> {
        Tour::new(nodes)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    #[test]
    fn test_new_valid() {
        let t = Tour::new(vec![1, 2, 0]).unwrap();
        assert_eq!(t.nodes(), &[1, 2, 0]);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_new_rejects() {
        assert_eq!(Tour::new(vec![0, 1]), Err(TourError::TooShort { len: 2 }));
        assert_eq!(
            Tour::new(vec![0, 1, 3]),
            Err(TourError::NodeOutOfRange { node: 3, len: 3 })
        );
        assert_eq!(
            Tour::new(vec![0, 2, 2]),
            Err(TourError::DuplicateNode { node: 2 })
        );
    }

    #[test]
    fn test_positions_wrap() {
        let t = Tour::identity(5);
        assert_eq!(t.next_pos(4), 0);
        assert_eq!(t.prev_pos(0), 4);
        assert_eq!(t.edge_at(4), (4, 0));
        assert_eq!(t.node_wrapped(7), 2);
    }

    #[test]
    fn test_length_square() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let t = Tour::identity(4);
        assert!((t.length(&dm) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalized_without_fixed() {
        let none = FixedEdges::none();
        let t = Tour::new(vec![3, 4, 0, 2, 1]).unwrap();
        // 0's neighbors are 4 and 2: continue towards 2
        assert_eq!(t.normalized(&none), vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_normalized_with_fixed() {
        let fixed = FixedEdges::new(5, [(3, 1)]).unwrap();
        let a = Tour::new(vec![0, 1, 3, 2, 4]).unwrap();
        let b = Tour::new(vec![4, 2, 3, 1, 0]).unwrap();
        let na = a.normalized(&fixed);
        assert_eq!(na.first(), Some(&1));
        assert_eq!(na.last(), Some(&3));
        assert_eq!(na, b.normalized(&fixed));
        assert!(a.same_cycle(&b, &fixed));
    }

    #[test]
    fn test_common_edges() {
        let a = Tour::new(vec![0, 1, 2, 3, 4]).unwrap();
        let b = Tour::new(vec![4, 3, 2, 1, 0]).unwrap();
        assert_eq!(a.common_edges(&b), 5);
        let c = Tour::new(vec![0, 2, 1, 3, 4]).unwrap();
        // shared: 2-1, 3-4, 4-0
        assert_eq!(a.common_edges(&c), 3);
    }

    #[test]
    fn test_try_from() {
        let t: Tour = vec![2, 1, 0].try_into().unwrap();
        assert_eq!(t.position_of(0), 2);
    }
}
