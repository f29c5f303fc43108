//! 2-opt edge exchange on a closed tour.
//!
//! # Algorithm
//!
//! For the edges leaving positions `i` and `j`, compare
//!
//! ```text
//! old = d(t[i], t[i+1]) + d(t[j], t[j+1])
//! new = d(t[i], t[j])   + d(t[i+1], t[j+1])
//! ```
//!
//! If `new < old`, reverse the tour between them. Of the two arcs that
//! reconnect the cycle the shorter one is reversed; on a tie, positions
//! `i+1..=j`. Both give the same cycle.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::EdgeWeight;
use crate::models::Tour;

use super::{SearchContext, GAIN_EPSILON};

/// Applies one 2-opt move if it shortens the tour.
///
/// Exchanges the edges leaving positions `idx1` and `idx2` for
/// `(t[idx1], t[idx2])` and `(t[idx1+1], t[idx2+1])`. Returns the gain
/// (old minus new length) when the move is applied, `0.0` otherwise.
/// Moves breaking a fixed edge are rejected, and so is `idx1 == idx2`.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::local_search::{two_opt_move, SearchContext};
/// use u_tour::models::{FixedEdges, Tour};
///
/// // Unit square visited in crossing order 0, 2, 1, 3.
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let fixed = FixedEdges::none();
/// let ctx = SearchContext::new(&dm, &fixed);
/// let mut tour = Tour::new(vec![0, 2, 1, 3]).unwrap();
///
/// let gain = two_opt_move(&mut tour, 0, 2, &ctx);
/// assert!(gain > 0.8);
/// assert_eq!(tour.nodes(), &[0, 1, 2, 3]);
/// ```
pub fn two_opt_move<W: EdgeWeight + ?Sized>(
    tour: &mut Tour,
    idx1: usize,
    idx2: usize,
    ctx: &SearchContext<'_, W>,
) -> f64 {
    let n = tour.len();
    if idx1 == idx2 {
        return 0.0;
    }
    let (i1, j1) = tour.edge_at(idx1);
    let (i2, j2) = tour.edge_at(idx2);
    if ctx.is_fixed(i1, j1) || ctx.is_fixed(i2, j2) {
        return 0.0;
    }

    let old = ctx.weight(i1, j1) + ctx.weight(i2, j2);
    let new = ctx.weight(i1, i2) + ctx.weight(j1, j2);
    let gain = old - new;
    if gain <= GAIN_EPSILON {
        return 0.0;
    }

    let inner = (idx2 + n - idx1) % n;
    if inner <= n - inner {
        reverse_cyclic(tour, (idx1 + 1) % n, inner);
    } else {
        reverse_cyclic(tour, (idx2 + 1) % n, n - inner);
    }
    gain
}

/// Reverses `count` consecutive positions starting at `start`, wrapping.
pub(crate) fn reverse_cyclic(tour: &mut Tour, start: usize, count: usize) {
    let n = tour.len();
    for k in 0..count / 2 {
        tour.swap((start + k) % n, (start + count - 1 - k) % n);
    }
}

/// Applies 2-opt moves until none improves the tour (first improvement).
///
/// Returns the total gain.
///
/// # Complexity
///
/// O(n²) per pass.
pub fn two_opt_improve<W: EdgeWeight + ?Sized>(tour: &mut Tour, ctx: &SearchContext<'_, W>) -> f64 {
    let n = tour.len();
    let mut total = 0.0;
    let mut improved = true;

    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let gain = two_opt_move(tour, i, j, ctx);
                if gain > 0.0 {
                    total += gain;
                    improved = true;
                }
            }
        }
    }

    total
}
