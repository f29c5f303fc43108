//! The per-generation local-search hook.

use std::collections::HashSet;

use crate::config::{ConfigError, HarderTarget, LocalSearchConfig, OperatorScope};
use crate::distance::EdgeWeight;
use crate::lin_kernighan::{self, LinKernighan};
use crate::local_search::{
    exhaustive_or_opt, or_opt_move, two_opt_move, valid_target, EdgeMemory, LongEdges,
    OrOptMove, PositionCursor, SearchContext,
};
use crate::models::{FixedEdges, Tour, TourError};
use crate::population::Population;
use crate::random::RandomSource;

use super::Statistics;

/// What one call to [`LocalSearchDriver::run_generation`] achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationReport {
    /// Individuals whose tour was shortened.
    pub improved: usize,
    /// Individuals left unchanged.
    pub failed: usize,
    /// Sum of all gains applied.
    pub gain: f64,
}

#[derive(Debug, Clone, Copy)]
struct OperatorDraw {
    or_opt: bool,
    lk: bool,
    end_of_gene: bool,
}

impl OperatorDraw {
    fn new<R: RandomSource + ?Sized>(config: &LocalSearchConfig, rng: &mut R) -> Self {
        Self {
            or_opt: rng.random_flip(config.or_opt_probability),
            lk: rng.random_flip(config.lk_probability),
            end_of_gene: rng.random_flip(config.end_of_gene_probability),
        }
    }
}

/// Improves a host population between generations.
///
/// Each generation every individual gets one local-search attempt: the
/// distinguished "harder" individual receives the exhaustive Or-opt sweep,
/// all others the randomized 2-opt / Or-opt / Lin-Kernighan search with
/// long-edge repairs. An improved tour is written back and its cached
/// evaluation is lowered by the gain.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tour::config::LocalSearchConfig;
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::driver::LocalSearchDriver;
/// use u_tour::models::{FixedEdges, Tour};
/// use u_tour::population::{Population, TourChromosome, VecPopulation};
///
/// let pts: Vec<(f64, f64)> = (0..8).map(|i| (i as f64, (i % 2) as f64)).collect();
/// let dm = DistanceMatrix::from_points(&pts);
/// let fixed = FixedEdges::none();
/// let mut rng = StdRng::seed_from_u64(3);
///
/// let tour = Tour::new(vec![0, 4, 2, 6, 1, 5, 3, 7]).unwrap();
/// let mut pop = VecPopulation::new(vec![TourChromosome::evaluated(tour, &dm)]);
/// let before = pop.evaluation(0);
///
/// let config = LocalSearchConfig::default().with_end_of_gene_probability(1.0);
/// let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
/// for _ in 0..20 {
///     driver.run_generation(&mut pop, &mut rng).unwrap();
/// }
/// assert!(pop.evaluation(0) < before);
/// ```
pub struct LocalSearchDriver<'a, W: ?Sized> {
    ctx: SearchContext<'a, W>,
    config: LocalSearchConfig,
    positions: Vec<usize>,
    cursor: PositionCursor,
    memory: EdgeMemory,
    checked_out: HashSet<Vec<usize>>,
    stats: Statistics,
    generation: usize,
}

impl<'a, W: EdgeWeight + ?Sized> LocalSearchDriver<'a, W> {
    /// Builds a driver for the instance given by `weights` and `fixed`.
    ///
    /// The configuration is validated here and cannot change afterwards.
    pub fn new<R: RandomSource + ?Sized>(
        weights: &'a W,
        fixed: &'a FixedEdges,
        config: LocalSearchConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = weights.dimension();
        Ok(Self {
            ctx: SearchContext::new(weights, fixed),
            positions: (0..n).collect(),
            cursor: PositionCursor::new(n, rng),
            memory: EdgeMemory::new(&config),
            checked_out: HashSet::new(),
            stats: Statistics::default(),
            generation: 0,
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Counters accumulated so far.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Generations run so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns `true` if the Lin-Kernighan engine already gave up on `tour`.
    pub fn is_checked_out(&self, tour: &Tour) -> bool {
        !self.checked_out.is_empty()
            && self.checked_out.contains(&tour.normalized(self.ctx.fixed()))
    }

    fn check_out(&mut self, tour: &Tour) {
        self.checked_out.insert(tour.normalized(self.ctx.fixed()));
    }

    fn refresh_gauges(&mut self) {
        self.stats.good_edges = self.memory.good_len();
        self.stats.prune_edges = self.memory.prune_len();
        self.stats.checked_out = self.checked_out.len();
    }

    fn check_len<P: Population + ?Sized>(&self, pop: &P) -> Result<(), TourError> {
        let expected = self.positions.len();
        let found = pop.tour_len();
        if pop.size() > 0 && found != expected {
            return Err(TourError::LengthMismatch { expected, found });
        }
        Ok(())
    }

    /// Runs one generation of local search over `pop`.
    ///
    /// Fails only when an individual is not a valid tour of the instance;
    /// individuals before it have already been processed.
    #[tracing::instrument(level = "debug", name = "Local Search Generation", skip_all)]
    pub fn run_generation<P, R>(
        &mut self,
        pop: &mut P,
        rng: &mut R,
    ) -> Result<GenerationReport, TourError>
    where
        P: Population + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.check_len(pop)?;
        self.generation += 1;

        if self.config.lk_only() {
            let report = self.run_lk_only(pop, rng)?;
            self.refresh_gauges();
            return Ok(report);
        }

        let size = pop.size();
        let best = pop.best_index();
        let harder = match self.config.harder {
            Some(HarderTarget::Best) => best,
            Some(HarderTarget::Worst) => pop.worst_index(),
            Some(HarderTarget::Random) if size > 0 => Some(rng.random_int(0, size - 1)),
            _ => None,
        };

        let mut report = GenerationReport::default();
        for p in 0..size {
            let mut tour = pop.read_tour(p)?;
            let force = (self.config.always_include_best && best == Some(p))
                || self.config.focus_index == Some(p);
            let gain = if harder == Some(p) {
                self.sweep(&mut tour, rng)
            } else {
                self.improve_tour(&mut tour, force, rng)
            };
            if gain > 0.0 {
                self.apply(pop, p, &tour, gain);
                report.improved += 1;
                report.gain += gain;
            } else {
                self.stats.normal_fail += 1;
                report.failed += 1;
            }
        }

        self.refresh_gauges();
        tracing::debug!(
            "Local search: generation {} improved {}/{} individuals, gain {}",
            self.generation,
            report.improved,
            size,
            report.gain
        );
        tracing::debug!("Local search: {}", self.stats);
        Ok(report)
    }

    fn apply<P: Population + ?Sized>(&self, pop: &mut P, p: usize, tour: &Tour, gain: f64) {
        let evaluation = pop.evaluation(p) - gain;
        debug_assert!(
            self.ctx.fixed().all_in(tour),
            "local search broke a fixed edge of individual {}",
            p
        );
        debug_assert!(
            !evaluation.is_finite()
                || (evaluation - self.ctx.tour_length(tour)).abs()
                    <= 1e-6 * evaluation.abs().max(1.0),
            "cached evaluation of individual {} drifted from its tour length",
            p
        );
        pop.write_tour(p, tour);
        pop.set_evaluation(p, evaluation);
    }

    /// The exhaustive Or-opt sweep for the distinguished individual.
    fn sweep<R: RandomSource + ?Sized>(&mut self, tour: &mut Tour, rng: &mut R) -> f64 {
        self.cursor.reshuffle(rng);
        exhaustive_or_opt(
            tour,
            &self.ctx,
            &mut self.memory,
            &self.positions,
            self.cursor.order(),
            self.generation,
            &mut self.stats,
        )
    }

    /// One randomized search over the positions of `tour`.
    ///
    /// Positions are visited in random order; each is skipped unless the
    /// end-of-gene draw (or `force`) admits it. The first improving move
    /// ends the search. After every failed attempt a long-edge repair may
    /// be tried instead.
    fn improve_tour<R: RandomSource + ?Sized>(
        &mut self,
        tour: &mut Tour,
        force: bool,
        rng: &mut R,
    ) -> f64 {
        let ctx = self.ctx;
        let fixed = ctx.fixed();
        let n = tour.len();
        let per_tour = self.config.operator_scope == OperatorScope::PerTour;
        let long_edge_chance = self.config.long_edge_chance(n);
        let mut long_edges: Option<LongEdges> = None;

        rng.shuffle(&mut self.positions);
        let mut draw = OperatorDraw::new(&self.config, rng);
        let mut gain = 0.0;

        for i in 0..n {
            let idx = self.positions[i];
            if !per_tour {
                draw = OperatorDraw::new(&self.config, rng);
            }
            if !draw.end_of_gene && !force {
                continue;
            }
            self.stats.tries += 1;

            if draw.lk {
                if !self.is_checked_out(tour) {
                    self.stats.lk_tries += 1;
                    let mut engine = LinKernighan::new(ctx);
                    gain = engine.improve(tour, idx);
                    self.stats.lk_steps += engine.steps();
                    if gain > 0.0 {
                        self.stats.lk_success += 1;
                        break;
                    }
                }
            } else if draw.or_opt {
                self.stats.or_opt_tries += 1;
                let anchor = tour.prev_pos(idx);
                if tour.is_fixed_at(anchor, fixed) {
                    continue;
                }
                let len = rng.random_int(1, self.config.or_opt_max);
                if tour.is_fixed_at((idx + len - 1) % n, fixed) {
                    continue;
                }
                let reversed = rng.random_flip(0.5);
                let target = self
                    .cursor
                    .next_valid(rng, |t| valid_target(tour, fixed, t, anchor, len));
                if let Some(target) = target {
                    let mv = OrOptMove::new(anchor, len, target, reversed);
                    gain = or_opt_move(tour, mv, &ctx, false);
                    if gain > 0.0 {
                        self.stats.or_opt_success += 1;
                        break;
                    }
                }
            } else {
                self.stats.two_opt_tries += 1;
                if tour.is_fixed_at(idx, fixed) {
                    continue;
                }
                let anchor = tour.prev_pos(idx);
                let target = self
                    .cursor
                    .next_valid(rng, |t| valid_target(tour, fixed, t, anchor, 0));
                if let Some(target) = target {
                    gain = two_opt_move(tour, idx, target, &ctx);
                    if gain > 0.0 {
                        self.stats.two_opt_success += 1;
                        break;
                    }
                }
            }

            if rng.random_flip(long_edge_chance) {
                let count = self.config.long_edge_count(n);
                let edges = long_edges
                    .get_or_insert_with(|| LongEdges::new(tour, &ctx, count, &mut *rng));
                if let Some(mv) = edges.next_move(tour, &ctx, rng) {
                    for mv in [mv, mv.flipped()] {
                        self.stats.long_edge_tries += 1;
                        let repaired = or_opt_move(tour, mv, &ctx, false);
                        if repaired > 0.0 {
                            self.stats.long_edge_success += 1;
                            return repaired;
                        }
                    }
                }
            }
        }

        if gain > 0.0 {
            return gain;
        }
        if per_tour && draw.lk && (draw.end_of_gene || force) {
            self.stats.lk_fail += 1;
            self.check_out(tour);
        }
        0.0
    }

    /// Lin-Kernighan on individuals `focus, focus - 1, …, 0`, stopping at
    /// the first improvement. Individuals the engine cannot improve are
    /// checked out and skipped from then on.
    fn run_lk_only<P, R>(&mut self, pop: &mut P, rng: &mut R) -> Result<GenerationReport, TourError>
    where
        P: Population + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut report = GenerationReport::default();
        let Some(last) = self.focus_range_end(pop) else {
            return Ok(report);
        };

        for p in (0..=last).rev() {
            let mut tour = pop.read_tour(p)?;
            if self.is_checked_out(&tour) {
                self.stats.lk_fail += 1;
                report.failed += 1;
                continue;
            }
            rng.shuffle(&mut self.positions);
            let mut engine = LinKernighan::new(self.ctx);
            for i in 0..self.positions.len() {
                self.stats.lk_tries += 1;
                let gain = engine.improve(&mut tour, self.positions[i]);
                if gain > 0.0 {
                    self.stats.lk_success += 1;
                    self.stats.lk_steps += engine.steps();
                    self.apply(pop, p, &tour, gain);
                    report.improved += 1;
                    report.gain = gain;
                    tracing::debug!("Local search: LK improved individual {} by {}", p, gain);
                    return Ok(report);
                }
            }
            self.stats.lk_steps += engine.steps();
            self.stats.lk_fail += 1;
            report.failed += 1;
            self.check_out(&tour);
        }
        Ok(report)
    }

    fn focus_range_end<P: Population + ?Sized>(&self, pop: &P) -> Option<usize> {
        let focus = self.config.focus_index?;
        pop.size().checked_sub(1).map(|last| focus.min(last))
    }

    /// Returns `true` once every individual `0..=focus` is checked out.
    ///
    /// Only meaningful with a focus index; without one this is `false`.
    /// Hosts use it as a stop condition in Lin-Kernighan-only mode.
    pub fn all_checked_out<P: Population + ?Sized>(&self, pop: &P) -> Result<bool, TourError> {
        let Some(last) = self.focus_range_end(pop) else {
            return Ok(false);
        };
        for p in 0..=last {
            if !self.is_checked_out(&pop.read_tour(p)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Runs the Lin-Kernighan engine on one individual until no anchor
    /// improves it, and writes the result back.
    ///
    /// Returns the total gain.
    pub fn optimize_individual<P, R>(
        &mut self,
        pop: &mut P,
        p: usize,
        rng: &mut R,
    ) -> Result<f64, TourError>
    where
        P: Population + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.check_len(pop)?;
        let mut tour = pop.read_tour(p)?;
        let report = lin_kernighan::optimize(&mut tour, self.ctx, rng);
        self.stats.lk_tries += report.tries;
        self.stats.lk_success += report.successes;
        self.stats.lk_steps += report.steps;
        if report.gain > 0.0 {
            self.apply(pop, p, &tour, report.gain);
        }
        Ok(report.gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::population::{TourChromosome, VecPopulation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn circle(n: usize) -> DistanceMatrix {
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 * 2.0 * std::f64::consts::PI / n as f64;
                (100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        DistanceMatrix::from_points(&pts)
    }

    fn random_population(dm: &DistanceMatrix, size: usize, rng: &mut StdRng) -> VecPopulation {
        let n = dm.size();
        let individuals = (0..size)
            .map(|_| {
                let mut nodes: Vec<usize> = (0..n).collect();
                rng.shuffle(&mut nodes);
                TourChromosome::evaluated(Tour::new(nodes).unwrap(), dm)
            })
            .collect();
        VecPopulation::new(individuals)
    }

    fn assert_consistent(pop: &VecPopulation, dm: &DistanceMatrix) {
        for c in pop.individuals() {
            let tour = c.to_tour().unwrap();
            assert!((tour.length(dm) - c.evaluation()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let dm = circle(8);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(1);
        let config = LocalSearchConfig::default().with_or_opt_probability(1.5);
        assert!(LocalSearchDriver::new(&dm, &fixed, config, &mut rng).is_err());
    }

    #[test]
    fn test_generation_improves_and_tracks_evaluation() {
        let dm = circle(20);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(11);
        let mut pop = random_population(&dm, 6, &mut rng);
        let before: f64 = pop.individuals().iter().map(|c| c.evaluation()).sum();

        let config = LocalSearchConfig::default()
            .with_end_of_gene_probability(1.0)
            .with_or_opt_probability(0.5);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        let mut total = 0.0;
        for _ in 0..30 {
            let report = driver.run_generation(&mut pop, &mut rng).unwrap();
            assert_eq!(report.improved + report.failed, 6);
            total += report.gain;
        }

        let after: f64 = pop.individuals().iter().map(|c| c.evaluation()).sum();
        assert!(total > 0.0);
        assert!((before - after - total).abs() < 1e-6);
        assert_consistent(&pop, &dm);
        assert_eq!(driver.generation(), 30);
        let stats = driver.statistics();
        assert!(stats.tries > 0);
        assert!(stats.two_opt_success + stats.or_opt_success + stats.long_edge_success > 0);
    }

    #[test]
    fn test_fixed_edges_survive_generations() {
        let dm = circle(16);
        let fixed = FixedEdges::new(16, [(0, 8), (3, 12)]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut nodes: Vec<usize> = vec![0, 8];
        nodes.extend([1, 2, 3, 12, 4, 5, 6, 7, 9, 10, 11, 13, 14, 15]);
        let tour = Tour::new(nodes).unwrap();
        let mut pop = VecPopulation::new(vec![TourChromosome::evaluated(tour.clone(), &dm); 3]);

        let config = LocalSearchConfig::default()
            .with_end_of_gene_probability(1.0)
            .with_or_opt_probability(0.5)
            .with_lk_probability(0.2)
            .with_harder(HarderTarget::Worst);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        for _ in 0..15 {
            driver.run_generation(&mut pop, &mut rng).unwrap();
        }
        for c in pop.individuals() {
            assert!(fixed.all_in(&c.to_tour().unwrap()));
        }
        assert_consistent(&pop, &dm);
    }

    #[test]
    fn test_no_tries_without_end_of_gene() {
        let dm = circle(10);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = random_population(&dm, 4, &mut rng);
        let snapshot = pop.clone();

        let config = LocalSearchConfig::default().with_end_of_gene_probability(0.0);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        let report = driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(report.improved, 0);
        assert_eq!(driver.statistics().tries, 0);
        assert_eq!(driver.statistics().normal_fail, 4);
        assert_eq!(pop, snapshot);
    }

    #[test]
    fn test_always_include_best_forces_search() {
        let dm = circle(12);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(21);
        let mut pop = random_population(&dm, 3, &mut rng);

        let config = LocalSearchConfig::default()
            .with_end_of_gene_probability(0.0)
            .with_always_include_best(true);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        driver.run_generation(&mut pop, &mut rng).unwrap();
        assert!(driver.statistics().tries > 0);
    }

    #[test]
    fn test_harder_sweep_targets_worst() {
        let dm = circle(12);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(8);
        let good = TourChromosome::evaluated(Tour::identity(12), &dm);
        let mut nodes = Tour::identity(12).into_nodes();
        nodes.swap(2, 7);
        let bad = TourChromosome::evaluated(Tour::new(nodes).unwrap(), &dm);
        let bad_length = bad.evaluation();
        let mut pop = VecPopulation::new(vec![good, bad]);

        let config = LocalSearchConfig::default()
            .with_end_of_gene_probability(0.0)
            .with_harder(HarderTarget::Worst);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        let report = driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(report.improved, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(driver.statistics().hard_success, 1);
        // only the sweep ran, and it counts towards the overall tries
        assert_eq!(driver.statistics().tries, driver.statistics().hard_tries);
        assert!(pop.evaluation(1) < bad_length);
        assert_consistent(&pop, &dm);
    }

    #[test]
    fn test_lk_only_mode_checks_out_optimal_tours() {
        let dm = circle(10);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(2);
        let optimal = TourChromosome::evaluated(Tour::identity(10), &dm);
        let mut pop = VecPopulation::new(vec![optimal.clone(), optimal]);

        let config = LocalSearchConfig::default()
            .with_lk_probability(1.0)
            .with_end_of_gene_probability(0.0)
            .with_focus_index(1);
        assert!(config.lk_only());
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        assert!(!driver.all_checked_out(&pop).unwrap());

        let report = driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(report.improved, 0);
        assert_eq!(report.failed, 2);
        // both individuals are the same cycle: the second is already out
        assert_eq!(driver.statistics().lk_fail, 2);
        assert_eq!(driver.statistics().checked_out, 1);
        assert!(driver.all_checked_out(&pop).unwrap());
    }

    #[test]
    fn test_lk_only_mode_improves_focus_first() {
        let dm = circle(10);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(6);
        let optimal = TourChromosome::evaluated(Tour::identity(10), &dm);
        let crossed_tour = Tour::new(vec![0, 5, 2, 7, 4, 9, 6, 1, 8, 3]).unwrap();
        let crossed = TourChromosome::evaluated(crossed_tour, &dm);
        let mut pop = VecPopulation::new(vec![optimal, crossed]);

        let config = LocalSearchConfig::default()
            .with_lk_probability(1.0)
            .with_end_of_gene_probability(0.0)
            .with_focus_index(1);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        let report = driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(report.improved, 1);
        assert!(report.gain > 0.0);
        assert_eq!(driver.statistics().lk_success, 1);
        assert_consistent(&pop, &dm);
    }

    #[test]
    fn test_per_tour_lk_failure_checks_out() {
        let dm = circle(9);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(13);
        let mut pop = VecPopulation::new(vec![TourChromosome::evaluated(Tour::identity(9), &dm)]);

        let config = LocalSearchConfig::default()
            .with_lk_probability(1.0)
            .with_end_of_gene_probability(1.0)
            .with_long_edge_probability(0.0)
            .with_operator_scope(OperatorScope::PerTour);
        let mut driver = LocalSearchDriver::new(&dm, &fixed, config, &mut rng).unwrap();
        driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(driver.statistics().lk_fail, 1);
        assert_eq!(driver.statistics().lk_tries, 9);
        assert!(driver.is_checked_out(&Tour::identity(9)));

        // checked-out tours are not searched again
        driver.run_generation(&mut pop, &mut rng).unwrap();
        assert_eq!(driver.statistics().lk_tries, 9);
    }

    #[test]
    fn test_optimize_individual() {
        let dm = circle(12);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(31);
        let mut pop = random_population(&dm, 2, &mut rng);
        let before = pop.evaluation(1);

        let mut driver =
            LocalSearchDriver::new(&dm, &fixed, LocalSearchConfig::default(), &mut rng).unwrap();
        let gain = driver.optimize_individual(&mut pop, 1, &mut rng).unwrap();
        assert!(gain > 0.0);
        assert!((before - pop.evaluation(1) - gain).abs() < 1e-6);
        assert_consistent(&pop, &dm);
        assert!(driver.statistics().lk_success > 0);
    }

    #[test]
    fn test_length_mismatch() {
        let dm = circle(8);
        let fixed = FixedEdges::none();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = VecPopulation::new(vec![TourChromosome::new(vec![0, 1, 2, 3])]);
        let mut driver =
            LocalSearchDriver::new(&dm, &fixed, LocalSearchConfig::default(), &mut rng).unwrap();
        assert_eq!(
            driver.run_generation(&mut pop, &mut rng),
            Err(TourError::LengthMismatch { expected: 8, found: 4 })
        );
    }
}
