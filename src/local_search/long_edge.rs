//! Long-edge repair: Or-opt moves built from the tour's longest edges.

use crate::distance::EdgeWeight;
use crate::models::Tour;
use crate::random::RandomSource;

use super::or_opt::{valid_target, OrOptMove};
use super::SearchContext;

/// The `k` longest non-fixed edges of a tour, drawn three at a time.
///
/// Edges are stored by the position they leave. A triple `(e0, e1, e2)`
/// becomes the Or-opt move that cuts the run between `e0` and `e1` and
/// reinserts it into `e2`, so one move replaces three long edges at once.
#[derive(Debug, Clone)]
pub struct LongEdges {
    positions: Vec<usize>,
    next: usize,
}

impl LongEdges {
    /// Collects the `count` longest non-fixed edges of `tour`, in random order.
    pub fn new<W, R>(tour: &Tour, ctx: &SearchContext<'_, W>, count: usize, rng: &mut R) -> Self
    where
        W: EdgeWeight + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut edges: Vec<(f64, usize)> = (0..tour.len())
            .filter(|&p| !tour.is_fixed_at(p, ctx.fixed()))
            .map(|p| {
                let (a, b) = tour.edge_at(p);
                (ctx.weight(a, b), p)
            })
            .collect();
        edges.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(std::cmp::Ordering::Equal));
        edges.truncate(count);

        let mut positions: Vec<usize> = edges.into_iter().map(|(_, p)| p).collect();
        rng.shuffle(&mut positions);
        Self { positions, next: 0 }
    }

    /// Number of tracked edges.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no edge is tracked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn next_triple<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<[usize; 3]> {
        if self.positions.len() < 3 {
            return None;
        }
        if self.next + 3 > self.positions.len() {
            rng.shuffle(&mut self.positions);
            self.next = 0;
        }
        let triple = [
            self.positions[self.next],
            self.positions[self.next + 1],
            self.positions[self.next + 2],
        ];
        self.next += 3;
        Some(triple)
    }

    /// Draws triples until one forms a valid forward Or-opt move.
    ///
    /// Returns `None` after a bounded number of draws.
    pub fn next_move<W, R>(
        &mut self,
        tour: &Tour,
        ctx: &SearchContext<'_, W>,
        rng: &mut R,
    ) -> Option<OrOptMove>
    where
        W: EdgeWeight + ?Sized,
        R: RandomSource + ?Sized,
    {
        let n = tour.len();
        for _ in 0..3 * self.positions.len() {
            let [e0, e1, e2] = self.next_triple(rng)?;
            let len = (e1 + n - e0) % n;
            if len == 0 || len + 3 > n {
                continue;
            }
            if valid_target(tour, ctx.fixed(), e2, e0, len) {
                return Some(OrOptMove::new(e0, len, e2, false));
            }
        }
        None
    }
}
