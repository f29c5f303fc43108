//! The Lin-Kernighan search.
//!
//! # Algorithm
//!
//! Starting at position `t1`, break one of its two tour edges `(t1, t2)`.
//! At each depth the free end `t2` is joined to some position `tk1` and
//! one of `tk1`'s tour edges `(tk1, tk2)` is broken, so the tentative tour
//! stays a Hamiltonian path from `t1` to the new free end `tk2`. Closing
//! the path with `(tk2, t1)` gives a tour; the best closing seen is
//! remembered by depth. Candidates are tried in order of decreasing
//! `d(t2, tk1)` savings plus `d(tk1, tk2)`, and must keep the running gain
//! above the best closing found so far. Beyond depth 2 only the top
//! candidate is followed.
//!
//! The first step may break the "wrong" edge and split the cycle in two;
//! the next step must then reconnect the halves. This admits the
//! sequential 3-opt moves that plain 2-opt chaining cannot reach.
//!
//! # Reference
//!
//! Lin, S. & Kernighan, B.W. (1973). "An Effective Heuristic Algorithm for
//! the Traveling-Salesman Problem", *Operations Research* 21(2), 498-516.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::distance::EdgeWeight;
use crate::local_search::{SearchContext, GAIN_EPSILON};
use crate::models::{check_permutation, edge_key, Tour};
use crate::random::RandomSource;

use super::graph::SegmentedTourGraph;

/// Smallest tour the engine searches.
pub const MIN_LK_LEN: usize = 5;

/// An improving tour found by [`LinKernighan::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct LkImprovement {
    /// Old length minus new length; always positive.
    pub gain: f64,
    /// Splits taken to reach it. A depth-`d` move exchanges `d + 1` edges.
    pub depth: usize,
    /// The new node sequence, starting at the anchor.
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// `(tk1, tk2)`: join the free end to `tk1`, break `tk1 - tk2`.
    edge: (usize, usize),
    rev: bool,
    /// Removed minus added weight of this step.
    gain: f64,
    /// `gain` plus the weight of the edge broken next; the sort key.
    score: f64,
}

/// Lin-Kernighan engine bound to one instance.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::lin_kernighan::LinKernighan;
/// use u_tour::local_search::SearchContext;
/// use u_tour::models::{FixedEdges, Tour};
///
/// // Corners of a rectangle plus midpoints, visited in a crossing order.
/// let dm = DistanceMatrix::from_points(&[
///     (0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0), (0.0, 2.0),
/// ]);
/// let fixed = FixedEdges::none();
/// let ctx = SearchContext::new(&dm, &fixed);
/// let mut tour = Tour::new(vec![0, 1, 4, 3, 2, 5]).unwrap();
/// let before = ctx.tour_length(&tour);
///
/// let mut lk = LinKernighan::new(ctx);
/// let gain = (0..6).map(|p| lk.improve(&mut tour, p)).find(|&g| g > 0.0).unwrap();
/// assert!((before - ctx.tour_length(&tour) - gain).abs() < 1e-9);
/// ```
pub struct LinKernighan<'a, W: ?Sized> {
    ctx: SearchContext<'a, W>,
    steps: u64,
}

impl<'a, W: EdgeWeight + ?Sized> LinKernighan<'a, W> {
    /// An engine for the given instance.
    pub fn new(ctx: SearchContext<'a, W>) -> Self {
        Self { ctx, steps: 0 }
    }

    /// Search steps taken so far, over all calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Searches for an improving exchange anchored at position `anchor`.
    ///
    /// Both tour edges at the anchor are tried as the first broken edge,
    /// fixed ones excepted. Returns the first improvement found.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` is out of range, or if the search produces a
    /// sequence that is not a permutation.
    pub fn search(&mut self, tour: &Tour, anchor: usize) -> Option<LkImprovement> {
        let n = tour.len();
        if n < MIN_LK_LEN {
            return None;
        }
        assert!(anchor < n, "anchor {} out of range", anchor);

        for t2 in [(anchor + n - 1) % n, (anchor + 1) % n] {
            if self.ctx.is_fixed(tour.node(anchor), tour.node(t2)) {
                continue;
            }
            let mut search = Search::new(tour, self.ctx, anchor, t2);
            search.step(anchor, t2);
            self.steps += search.steps;
            if search.best_gain <= 0.0 {
                continue;
            }

            let nodes: Vec<usize> = search
                .graph
                .walk(search.best_depth)
                .into_iter()
                .map(|p| tour.node(p))
                .collect();
            assert!(
                check_permutation(&nodes).is_ok(),
                "Lin-Kernighan walk is not a permutation"
            );
            debug_assert!(
                {
                    let before = self.ctx.tour_length(tour);
                    let after: f64 = (0..n)
                        .map(|i| self.ctx.weight(nodes[i], nodes[(i + 1) % n]))
                        .sum();
                    (before - after - search.best_gain).abs() <= 1e-6 * before.abs().max(1.0)
                },
                "Lin-Kernighan gain does not match the tour length"
            );
            tracing::debug!(
                "LK: anchor {} improved by {} at depth {}",
                anchor,
                search.best_gain,
                search.best_depth
            );
            return Some(LkImprovement {
                gain: search.best_gain,
                depth: search.best_depth,
                nodes,
            });
        }
        None
    }

    /// Runs [`search`](Self::search) and applies the result to `tour`.
    ///
    /// Returns the gain, or `0.0` if nothing was found.
    pub fn improve(&mut self, tour: &mut Tour, anchor: usize) -> f64 {
        match self.search(tour, anchor) {
            Some(found) => {
                tour.replace_nodes(found.nodes);
                found.gain
            }
            None => 0.0,
        }
    }
}

struct Search<'t, 'a, W: ?Sized> {
    tour: &'t Tour,
    ctx: SearchContext<'a, W>,
    head: usize,
    graph: SegmentedTourGraph,
    broken: HashSet<(usize, usize)>,
    joined: HashSet<(usize, usize)>,
    gain: f64,
    best_gain: f64,
    best_depth: usize,
    depth: usize,
    steps: u64,
}

impl<'t, 'a, W: EdgeWeight + ?Sized> Search<'t, 'a, W> {
    fn new(tour: &'t Tour, ctx: SearchContext<'a, W>, t1: usize, t2: usize) -> Self {
        Self {
            tour,
            ctx,
            head: t1,
            graph: SegmentedTourGraph::new(tour.len(), t1, t2),
            broken: HashSet::new(),
            joined: HashSet::new(),
            gain: 0.0,
            best_gain: 0.0,
            best_depth: 0,
            depth: 0,
            steps: 0,
        }
    }

    /// Breaks `from - to` and explores every way of continuing from `to`.
    fn step(&mut self, from: usize, to: usize) {
        self.steps += 1;
        self.depth += 1;
        let (a, b) = (self.tour.node(from), self.tour.node(to));
        assert!(!self.ctx.is_fixed(a, b), "fixed edge {}-{} broken", a, b);
        self.broken.insert(edge_key(from, to));

        let removed = self.ctx.weight(a, b);
        let head_node = self.tour.node(self.head);
        for c in self.candidates(to, removed) {
            let (next, free) = c.edge;
            let closing = c.score - self.ctx.weight(self.tour.node(free), head_node);

            self.joined.insert(edge_key(to, next));
            let checkpoint = self.graph.checkpoint();
            self.graph.split(next, to, c.rev);
            if !self.graph.is_split_in_two()
                && closing + self.gain > self.best_gain + GAIN_EPSILON
            {
                self.best_gain = closing + self.gain;
                self.best_depth = self.graph.depth();
                tracing::trace!(
                    "LK: closing at depth {} gains {}",
                    self.best_depth,
                    self.best_gain
                );
            }

            self.gain += c.gain;
            self.step(next, free);
            if self.best_gain > 0.0 {
                return;
            }
            self.gain -= c.gain;
            self.broken.remove(&edge_key(next, free));
            self.joined.remove(&edge_key(to, next));
            self.graph.rollback(checkpoint);
        }
        self.depth -= 1;
    }

    /// Ways to continue from the free end `to` after removing `removed`.
    fn candidates(&self, to: usize, removed: f64) -> Vec<Candidate> {
        let n = self.tour.len();
        let to_node = self.tour.node(to);
        let mut out = Vec::new();

        for idx in 0..n {
            if idx == to || idx == self.head {
                continue;
            }
            for rev in [false, true] {
                let free = match self.graph.split_edge(idx, rev) {
                    Some((_, free)) => free,
                    None => continue,
                };
                if free == self.head || free == to {
                    continue;
                }
                if self.joined.contains(&edge_key(idx, free))
                    || self.joined.contains(&edge_key(idx, to))
                    || self.broken.contains(&edge_key(idx, free))
                    || self.broken.contains(&edge_key(to, idx))
                {
                    continue;
                }
                let (x, y) = (self.tour.node(idx), self.tour.node(free));
                if self.ctx.is_fixed(x, y) {
                    continue;
                }
                let added = self.ctx.weight(to_node, x);
                if self.gain + removed - added <= self.best_gain {
                    continue;
                }
                let gain = removed - added;
                out.push(Candidate {
                    edge: (idx, free),
                    rev,
                    gain,
                    score: gain + self.ctx.weight(x, y),
                });
            }
        }

        out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        if self.depth > 2 {
            out.truncate(1);
        }
        out
    }
}

/// Outcome of [`optimize`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LkReport {
    /// Total gain.
    pub gain: f64,
    /// Anchors searched.
    pub tries: u64,
    /// Improvements applied.
    pub successes: u64,
    /// Search steps taken.
    pub steps: u64,
}

/// Improves `tour` with the Lin-Kernighan engine until no anchor yields
/// an improvement.
///
/// Anchors are visited in random order; after every improvement the
/// order is reshuffled and the scan starts over.
#[tracing::instrument(level = "debug", name = "LK Optimize", skip_all, fields(n = tour.len()))]
pub fn optimize<W, R>(tour: &mut Tour, ctx: SearchContext<'_, W>, rng: &mut R) -> LkReport
where
    W: EdgeWeight + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut report = LkReport::default();
    let mut engine = LinKernighan::new(ctx);
    let mut order: Vec<usize> = (0..tour.len()).collect();

    'restart: loop {
        rng.shuffle(&mut order);
        for &anchor in &order {
            report.tries += 1;
            let gain = engine.improve(tour, anchor);
            if gain > 0.0 {
                report.gain += gain;
                report.successes += 1;
                continue 'restart;
            }
        }
        break;
    }

    report.steps = engine.steps();
    tracing::debug!(
        "LK: optimize finished, gain {} after {} tries ({} improvements)",
        report.gain,
        report.tries,
        report.successes
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::local_search::{or_opt_move, two_opt_move, OrOptMove};
    use crate::models::FixedEdges;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn local_optimum_for_simple_moves<W: EdgeWeight + ?Sized>(
        tour: &Tour,
        ctx: &SearchContext<'_, W>,
    ) -> bool {
        let n = tour.len();
        for i in 0..n {
            for j in 0..n {
                if two_opt_move(&mut tour.clone(), i, j, ctx) > 0.0 {
                    return false;
                }
                for len in 1..=3 {
                    for reversed in [false, true] {
                        let mv = OrOptMove::new(i, len, j, reversed);
                        if or_opt_move(&mut tour.clone(), mv, ctx, false) > 0.0 {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    #[test]
    fn test_search_gain_matches_length() {
        let pts = [
            (0.0, 0.0),
            (3.0, 7.0),
            (6.0, 1.0),
            (2.0, 2.0),
            (8.0, 8.0),
            (5.0, 4.0),
            (1.0, 6.0),
            (7.0, 3.0),
        ];
        let dm = DistanceMatrix::from_points(&pts);
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let tour = Tour::identity(8);
        let mut lk = LinKernighan::new(ctx);

        let found = (0..8).find_map(|p| lk.search(&tour, p)).expect("identity is not optimal");
        let after = Tour::new(found.nodes.clone()).unwrap();
        assert!(found.gain > 0.0);
        assert!((ctx.tour_length(&tour) - ctx.tour_length(&after) - found.gain).abs() < 1e-9);
        assert!(lk.steps() > 0);
    }

    #[test]
    fn test_search_small_tour() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let mut lk = LinKernighan::new(ctx);
        assert_eq!(lk.search(&Tour::identity(4), 0), None);
    }

    #[test]
    fn test_fixed_edges_survive() {
        let pts: Vec<(f64, f64)> = (0..9)
            .map(|i| {
                let a = i as f64 * 2.0 * std::f64::consts::PI / 9.0;
                (10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        let dm = DistanceMatrix::from_points(&pts);
        let fixed = FixedEdges::new(9, [(0, 5), (3, 7)]).unwrap();
        let ctx = SearchContext::new(&dm, &fixed);
        let mut tour = Tour::new(vec![0, 5, 1, 6, 2, 3, 7, 4, 8]).unwrap();
        let mut rng = StdRng::seed_from_u64(17);

        let report = optimize(&mut tour, ctx, &mut rng);
        assert!(report.gain > 0.0);
        assert!(fixed.all_in(&tour));
    }

    #[test]
    fn test_six_node_move_beyond_simple_operators() {
        #[rustfmt::skip]
        let data = vec![
            0.0, 3.0, 9.0, 6.0, 8.0, 4.0,
            3.0, 0.0, 5.0, 7.0, 9.0, 2.0,
            9.0, 5.0, 0.0, 5.0, 5.0, 5.0,
            6.0, 7.0, 5.0, 0.0, 3.0, 9.0,
            8.0, 9.0, 5.0, 3.0, 0.0, 5.0,
            4.0, 2.0, 5.0, 9.0, 5.0, 0.0,
        ];
        let dm = DistanceMatrix::from_data(6, data).unwrap();
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let tour = Tour::identity(6);
        assert!(local_optimum_for_simple_moves(&tour, &ctx));

        let mut lk = LinKernighan::new(ctx);
        let found = lk.search(&tour, 0).expect("deeper exchange");
        assert!((found.gain - 1.0).abs() < 1e-10);
        assert_eq!(found.depth, 3);
        assert_eq!(found.nodes, vec![0, 1, 5, 2, 4, 3]);
    }

    #[test]
    fn test_segment_exchange() {
        // Three runs of four nodes. The links 3-4, 7-8 and 11-0 cost 10,
        // run interiors cost 1, and 3-8, 11-4, 7-0 cost 2. Swapping the
        // last two runs gains 24; no reversal or short relocation helps.
        let mut dm = DistanceMatrix::from_fn(12, |a, b| if a == b { 0.0 } else { 20.0 });
        for i in 0..12 {
            dm.set_symmetric(i, (i + 1) % 12, 1.0);
        }
        for (a, b) in [(3, 4), (7, 8), (11, 0)] {
            dm.set_symmetric(a, b, 10.0);
        }
        for (a, b) in [(3, 8), (11, 4), (7, 0)] {
            dm.set_symmetric(a, b, 2.0);
        }
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let tour = Tour::identity(12);
        assert!((ctx.tour_length(&tour) - 39.0).abs() < 1e-10);
        assert!(local_optimum_for_simple_moves(&tour, &ctx));

        let mut lk = LinKernighan::new(ctx);
        let found = lk.search(&tour, 0).expect("segment exchange");
        assert!((found.gain - 24.0).abs() < 1e-10);
        assert_eq!(found.depth, 2);
        assert_eq!(found.nodes, vec![0, 1, 2, 3, 8, 9, 10, 11, 4, 5, 6, 7]);
        assert_eq!(lk.search(&tour, 1), None);
    }

    #[test]
    fn test_optimize_reaches_lk_optimum() {
        let pts: Vec<(f64, f64)> = (0..12)
            .map(|i| ((i * 7 % 12) as f64, ((i * 5) % 12) as f64))
            .collect();
        let dm = DistanceMatrix::from_points(&pts);
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let mut tour = Tour::identity(12);
        let before = ctx.tour_length(&tour);
        let mut rng = StdRng::seed_from_u64(23);

        let report = optimize(&mut tour, ctx, &mut rng);
        assert!((before - ctx.tour_length(&tour) - report.gain).abs() < 1e-8);
        let mut lk = LinKernighan::new(ctx);
        assert!((0..12).all(|p| lk.search(&tour, p).is_none()));
        assert!(report.tries >= report.successes + 12);
    }
}
