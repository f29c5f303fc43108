//! Exhaustive Or-opt sweep with an edge memory.
//!
//! The sweep tries every run length towards every target from every
//! anchor and stops at the first improvement. The memory keeps it from
//! re-examining anchors whose edge keeps failing: each fruitless target
//! bumps the anchor edge's failure count, and an edge whose count passes
//! `prune_value` is promoted to "good" and left alone for a number of
//! generations.

use std::collections::HashMap;

use crate::config::LocalSearchConfig;
use crate::distance::EdgeWeight;
use crate::driver::Statistics;
use crate::models::{edge_key, FixedEdges, Tour};

use super::or_opt::{or_opt_move, valid_target, OrOptMove};
use super::SearchContext;

/// Failure counts and "good" marks for tour edges, keyed by node pair.
#[derive(Debug, Clone)]
pub struct EdgeMemory {
    good: HashMap<(usize, usize), usize>,
    prune: HashMap<(usize, usize), usize>,
    prune_value: usize,
    generations: usize,
    removal: usize,
}

impl EdgeMemory {
    /// An empty memory with the parameters from `config`.
    pub fn new(config: &LocalSearchConfig) -> Self {
        Self {
            good: HashMap::new(),
            prune: HashMap::new(),
            prune_value: config.prune_value,
            generations: config.good_edge_generations,
            removal: config.good_edge_removal,
        }
    }

    /// Number of edges marked good.
    pub fn good_len(&self) -> usize {
        self.good.len()
    }

    /// Number of edges carrying a failure count.
    pub fn prune_len(&self) -> usize {
        self.prune.len()
    }

    /// Current promotion threshold; doubles whenever the memory is cleared.
    pub fn prune_value(&self) -> usize {
        self.prune_value
    }

    /// Returns `true` if the sweep should skip the anchor edge `a - b`.
    ///
    /// Fixed edges are always skipped. A good edge is skipped while it is
    /// younger than the configured number of generations and forgotten once
    /// it is older. An edge whose failure count passed the threshold is
    /// promoted to good at `generation` and skipped.
    pub fn should_skip(
        &mut self,
        a: usize,
        b: usize,
        fixed: &FixedEdges,
        generation: usize,
        stats: &mut Statistics,
    ) -> bool {
        if fixed.contains(a, b) {
            return true;
        }
        let key = edge_key(a, b);
        if let Some(&since) = self.good.get(&key) {
            if generation.saturating_sub(since) < self.generations {
                stats.good_edge_hits += 1;
                return true;
            }
            self.good.remove(&key);
        }
        if let Some(&count) = self.prune.get(&key) {
            if count > self.prune_value {
                self.prune.remove(&key);
                self.good.insert(key, generation);
                return true;
            }
        }
        false
    }

    fn record_failure(&mut self, a: usize, b: usize) {
        *self.prune.entry(edge_key(a, b)).or_insert(0) += 1;
    }

    fn mark_good(&mut self, a: usize, b: usize, generation: usize) {
        self.good.insert(edge_key(a, b), generation);
    }

    /// Forgets after a fruitless sweep.
    ///
    /// With a removal count of zero everything is cleared and the promotion
    /// threshold doubles; otherwise the oldest good edges are dropped.
    pub fn forget(&mut self) {
        if self.removal == 0 {
            self.good.clear();
            self.prune.clear();
            self.prune_value = self.prune_value.saturating_mul(2);
            return;
        }
        let mut by_age: Vec<((usize, usize), usize)> =
            self.good.iter().map(|(&k, &g)| (k, g)).collect();
        by_age.sort_unstable_by_key(|&(k, g)| (g, k));
        for (key, _) in by_age.into_iter().take(self.removal) {
            self.good.remove(&key);
        }
    }
}

/// Runs the exhaustive Or-opt sweep over `tour`.
///
/// `anchors` gives the order in which run starts are visited and `targets`
/// the order of insertion points; both are permutations of the positions.
/// Returns the gain of the first improving move, or `0.0` after the whole
/// neighborhood failed (which also makes the memory forget).
pub fn exhaustive_or_opt<W: EdgeWeight + ?Sized>(
    tour: &mut Tour,
    ctx: &SearchContext<'_, W>,
    memory: &mut EdgeMemory,
    anchors: &[usize],
    targets: &[usize],
    generation: usize,
    stats: &mut Statistics,
) -> f64 {
    let n = tour.len();
    for &start in anchors {
        let anchor = tour.prev_pos(start);
        let (a, b) = (tour.node(start), tour.node(anchor));
        if memory.should_skip(a, b, ctx.fixed(), generation, stats) {
            continue;
        }
        for &target in targets {
            let reach = (start + n - target) % n;
            if reach < 2 {
                continue;
            }
            for reversed in [false, true] {
                for len in (1..=reach).rev() {
                    if tour.is_fixed_at((start + len - 1) % n, ctx.fixed()) {
                        continue;
                    }
                    if !valid_target(tour, ctx.fixed(), target, anchor, len) {
                        continue;
                    }
                    stats.tries += 1;
                    stats.or_opt_tries += 1;
                    stats.hard_tries += 1;
                    let mv = OrOptMove::new(anchor, len, target, reversed);
                    let gain = or_opt_move(tour, mv, ctx, false);
                    if gain > 0.0 {
                        stats.or_opt_success += 1;
                        stats.hard_success += 1;
                        tracing::trace!(
                            "Sweep: moved {} nodes after position {} to {} (reversed {}), gain {}",
                            len,
                            anchor,
                            target,
                            reversed,
                            gain
                        );
                        return gain;
                    }
                }
            }
            memory.record_failure(a, b);
        }
        memory.mark_good(a, b, generation);
    }

    stats.hard_fail += 1;
    memory.forget();
    tracing::debug!(
        "Sweep: no improvement, {} good edges kept, prune value {}",
        memory.good_len(),
        memory.prune_value()
    );
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn line(n: usize) -> DistanceMatrix {
        let pts: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, 0.0)).collect();
        DistanceMatrix::from_points(&pts)
    }

    #[test]
    fn test_sweep_finds_improvement() {
        let dm = line(8);
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let mut tour = Tour::new(vec![0, 1, 5, 2, 3, 4, 6, 7]).unwrap();
        let before = ctx.tour_length(&tour);
        let mut memory = EdgeMemory::new(&LocalSearchConfig::default());
        let mut stats = Statistics::default();
        let order: Vec<usize> = (0..8).collect();

        let gain = exhaustive_or_opt(&mut tour, &ctx, &mut memory, &order, &order, 1, &mut stats);
        assert!(gain > 0.0);
        assert!((before - ctx.tour_length(&tour) - gain).abs() < 1e-10);
        assert_eq!(stats.hard_success, 1);
        assert_eq!(stats.hard_fail, 0);
        assert!(stats.hard_tries > 0);
        assert_eq!(stats.tries, stats.hard_tries);
    }

    #[test]
    fn test_sweep_failure_clears_memory() {
        let dm = line(6);
        let fixed = FixedEdges::none();
        let ctx = SearchContext::new(&dm, &fixed);
        let mut tour = Tour::identity(6);
        let config = LocalSearchConfig::default();
        let mut memory = EdgeMemory::new(&config);
        let mut stats = Statistics::default();
        let order: Vec<usize> = (0..6).collect();

        let gain = exhaustive_or_opt(&mut tour, &ctx, &mut memory, &order, &order, 1, &mut stats);
        assert_eq!(gain, 0.0);
        assert_eq!(tour, Tour::identity(6));
        assert_eq!(stats.hard_fail, 1);
        assert_eq!(stats.tries, stats.or_opt_tries);
        assert_eq!(memory.good_len(), 0);
        assert_eq!(memory.prune_value(), 2 * config.prune_value);
    }

    #[test]
    fn test_good_edge_lifecycle() {
        let config = LocalSearchConfig::default().with_edge_memory(1, 10, 5);
        let mut memory = EdgeMemory::new(&config);
        let fixed = FixedEdges::none();
        let mut stats = Statistics::default();

        memory.record_failure(3, 4);
        assert!(!memory.should_skip(4, 3, &fixed, 0, &mut stats));
        memory.record_failure(4, 3);
        // count 2 passes the threshold 1: promoted
        assert!(memory.should_skip(3, 4, &fixed, 0, &mut stats));
        assert_eq!(memory.good_len(), 1);
        assert_eq!(memory.prune_len(), 0);

        assert!(memory.should_skip(3, 4, &fixed, 9, &mut stats));
        assert_eq!(stats.good_edge_hits, 1);
        // aged out
        assert!(!memory.should_skip(3, 4, &fixed, 10, &mut stats));
        assert_eq!(memory.good_len(), 0);
    }

    #[test]
    fn test_forget_oldest() {
        let config = LocalSearchConfig::default().with_edge_memory(10, 300, 2);
        let mut memory = EdgeMemory::new(&config);
        memory.mark_good(0, 1, 5);
        memory.mark_good(1, 2, 1);
        memory.mark_good(2, 3, 3);
        memory.forget();
        assert_eq!(memory.good_len(), 1);
        assert!(memory.good.contains_key(&(0, 1)));
        assert_eq!(memory.prune_value(), 10);
    }

    #[test]
    fn test_fixed_anchor_is_skipped() {
        let fixed = FixedEdges::new(6, [(1, 2)]).unwrap();
        let mut memory = EdgeMemory::new(&LocalSearchConfig::default());
        let mut stats = Statistics::default();
        assert!(memory.should_skip(2, 1, &fixed, 0, &mut stats));
        assert_eq!(stats.good_edge_hits, 0);
    }
}
