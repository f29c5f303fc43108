//! Or-opt: relocate a run of consecutive nodes, optionally reversed.
//!
//! # Algorithm
//!
//! The run `t[a+1..=a+k]` is cut out between its neighbors `bef = t[a]` and
//! `aft = t[a+k+1]` and reinserted between `y1 = t[p]` and `y2 = t[p+1]`:
//!
//! ```text
//! old = d(bef, first) + d(last, aft) + d(y1, y2)
//! new = d(bef, aft) + d(y1, first) + d(last, y2)     (forward)
//! new = d(bef, aft) + d(y1, last)  + d(first, y2)    (reversed)
//! ```
//!
//! The move is applied by shifting the nodes between the run and the
//! target back by `k` places and writing the run after them, so the whole
//! operation is one pass over the affected arc.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::distance::EdgeWeight;
use crate::models::{FixedEdges, Tour};

use super::{SearchContext, GAIN_EPSILON};

/// One Or-opt relocation, described by tour positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrOptMove {
    /// Position just before the run.
    pub anchor: usize,
    /// Number of nodes in the run.
    pub len: usize,
    /// The run is inserted after this position.
    pub target: usize,
    /// Insert the run in reverse order.
    pub reversed: bool,
}

impl OrOptMove {
    /// Creates a move of the `len` nodes after `anchor` to just after `target`.
    pub fn new(anchor: usize, len: usize, target: usize, reversed: bool) -> Self {
        Self {
            anchor,
            len,
            target,
            reversed,
        }
    }

    /// The same move with the opposite orientation.
    pub fn flipped(self) -> Self {
        Self {
            reversed: !self.reversed,
            ..self
        }
    }
}

/// Returns `true` if `target` may receive the run of `len` nodes after `anchor`.
///
/// The target must lie outside the window `anchor..=anchor+len+1` (taken
/// cyclically), and the edge leaving it must not be fixed. With `len == 0`
/// this is the rule for a 2-opt partner of the edge leaving `anchor + 1`.
pub fn valid_target(
    tour: &Tour,
    fixed: &FixedEdges,
    target: usize,
    anchor: usize,
    len: usize,
) -> bool {
    let n = tour.len();
    if (target + n - anchor) % n <= len + 1 {
        return false;
    }
    !tour.is_fixed_at(target, fixed)
}

/// Applies `mv` if it shortens the tour, or unconditionally with `force`.
///
/// Returns the gain (old minus new length) when the move is applied and
/// `0.0` when it is rejected. A forced move may return a negative gain.
/// Rejected without change: runs that are empty or leave fewer than three
/// other nodes, targets inside the run's window, and moves that would break
/// a fixed edge.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::local_search::{or_opt_move, OrOptMove, SearchContext};
/// use u_tour::models::{FixedEdges, Tour};
///
/// // Node 1 sits far from its tour neighbors but next to 4.
/// let dm = DistanceMatrix::from_points(&[
///     (0.0, 0.0), (4.5, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0),
/// ]);
/// let fixed = FixedEdges::none();
/// let ctx = SearchContext::new(&dm, &fixed);
/// let mut tour = Tour::identity(6);
///
/// let gain = or_opt_move(&mut tour, OrOptMove::new(0, 1, 4, false), &ctx, false);
/// assert!((gain - 5.0).abs() < 1e-10);
/// assert_eq!(tour.nodes(), &[0, 2, 3, 4, 1, 5]);
/// ```
pub fn or_opt_move<W: EdgeWeight + ?Sized>(
    tour: &mut Tour,
    mv: OrOptMove,
    ctx: &SearchContext<'_, W>,
    force: bool,
) -> f64 {
    let n = tour.len();
    let OrOptMove {
        anchor,
        len,
        target,
        reversed,
    } = mv;
    if len == 0 || len + 3 > n || anchor >= n || target >= n {
        return 0.0;
    }
    if !valid_target(tour, ctx.fixed(), target, anchor, len) {
        return 0.0;
    }

    let start = (anchor + 1) % n;
    let last_pos = (anchor + len) % n;
    if tour.is_fixed_at(anchor, ctx.fixed()) || tour.is_fixed_at(last_pos, ctx.fixed()) {
        return 0.0;
    }

    let bef = tour.node(anchor);
    let first = tour.node(start);
    let last = tour.node(last_pos);
    let aft = tour.node((anchor + len + 1) % n);
    let (y1, y2) = tour.edge_at(target);

    let old = ctx.weight(bef, first) + ctx.weight(last, aft) + ctx.weight(y1, y2);
    let insertion = if reversed {
        ctx.weight(y1, last) + ctx.weight(first, y2)
    } else {
        ctx.weight(y1, first) + ctx.weight(last, y2)
    };
    let new = ctx.weight(bef, aft) + insertion;
    let gain = old - new;
    if gain <= GAIN_EPSILON && !force {
        return 0.0;
    }

    let run: Vec<usize> = (0..len).map(|k| tour.node((start + k) % n)).collect();
    let mut write = start;
    loop {
        let read = (write + len) % n;
        tour.set_node(write, tour.node(read));
        if read == target {
            break;
        }
        write = (write + 1) % n;
    }
    for k in 0..len {
        let node = if reversed { run[len - 1 - k] } else { run[k] };
        tour.set_node((write + 1 + k) % n, node);
    }
    gain
}

/// Applies Or-opt moves of runs up to `max_len` nodes until none improves.
///
/// Returns the total gain.
///
/// # Complexity
///
/// O(n² · max_len) per pass.
pub fn or_opt_improve<W: EdgeWeight + ?Sized>(
    tour: &mut Tour,
    ctx: &SearchContext<'_, W>,
    max_len: usize,
) -> f64 {
    let n = tour.len();
    if n < 4 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut improved = true;

    while improved {
        improved = false;
        for len in 1..=max_len.min(n - 3) {
            for anchor in 0..n {
                for target in 0..n {
                    for reversed in [false, true] {
                        let mv = OrOptMove::new(anchor, len, target, reversed);
                        let gain = or_opt_move(tour, mv, ctx, false);
                        if gain > 0.0 {
                            total += gain;
                            improved = true;
                        }
                    }
                }
            }
        }
    }

    total
}
