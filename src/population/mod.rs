//! The host's population, as seen by the local search.
//!
//! The evolutionary loop lives outside this crate. The driver only needs
//! per-individual access to node positions and the cached evaluation,
//! which the [`Population`] trait provides. [`VecPopulation`] is a plain
//! in-memory implementation over [`TourChromosome`]s.

mod chromosome;

pub use chromosome::TourChromosome;

use std::cmp::Ordering;

use crate::models::{Tour, TourError};

/// Genome and evaluation accessors supplied by the host optimizer.
///
/// Evaluations are tour lengths: lower is better.
pub trait Population {
    /// Number of individuals.
    fn size(&self) -> usize;

    /// Number of nodes per tour.
    fn tour_len(&self) -> usize;

    /// Node at `position` of individual `individual`.
    fn get_node(&self, individual: usize, position: usize) -> usize;

    /// Stores `node` at `position` of individual `individual`.
    fn set_node(&mut self, individual: usize, position: usize, node: usize);

    /// Cached evaluation of an individual.
    fn evaluation(&self, individual: usize) -> f64;

    /// Replaces the cached evaluation of an individual.
    fn set_evaluation(&mut self, individual: usize, value: f64);

    /// Index of the individual with the lowest evaluation.
    fn best_index(&self) -> Option<usize> {
        (0..self.size()).min_by(|&a, &b| {
            self.evaluation(a)
                .partial_cmp(&self.evaluation(b))
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Index of the individual with the highest evaluation.
    fn worst_index(&self) -> Option<usize> {
        (0..self.size()).max_by(|&a, &b| {
            self.evaluation(a)
                .partial_cmp(&self.evaluation(b))
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Copies an individual out as a validated [`Tour`].
    fn read_tour(&self, individual: usize) -> Result<Tour, TourError> {
        let nodes = (0..self.tour_len())
            .map(|p| self.get_node(individual, p))
            .collect();
        Tour::new(nodes)
    }

    /// Writes `tour` back into an individual.
    fn write_tour(&mut self, individual: usize, tour: &Tour) {
        for (position, &node) in tour.nodes().iter().enumerate() {
            self.set_node(individual, position, node);
        }
    }
}

/// A population held in a `Vec`.
///
/// # Examples
///
/// ```
/// use u_tour::population::{Population, TourChromosome, VecPopulation};
///
/// let mut pop = VecPopulation::new(vec![
///     TourChromosome::new(vec![0, 1, 2, 3]),
///     TourChromosome::new(vec![3, 2, 1, 0]),
/// ]);
/// pop.set_evaluation(0, 10.0);
/// pop.set_evaluation(1, 4.0);
/// assert_eq!(pop.best_index(), Some(1));
/// assert_eq!(pop.get_node(1, 0), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VecPopulation {
    individuals: Vec<TourChromosome>,
}

impl VecPopulation {
    /// Wraps a list of chromosomes. All must have the same length.
    ///
    /// # Panics
    ///
    /// Panics if the chromosome lengths differ.
    pub fn new(individuals: Vec<TourChromosome>) -> Self {
        if let Some(first) = individuals.first() {
            assert!(
                individuals.iter().all(|c| c.len() == first.len()),
                "chromosomes differ in length"
            );
        }
        Self { individuals }
    }

    /// The individuals.
    pub fn individuals(&self) -> &[TourChromosome] {
        &self.individuals
    }

    /// One individual.
    pub fn get(&self, index: usize) -> Option<&TourChromosome> {
        self.individuals.get(index)
    }

    /// Consumes the population.
    pub fn into_inner(self) -> Vec<TourChromosome> {
        self.individuals
    }
}

impl Population for VecPopulation {
    fn size(&self) -> usize {
        self.individuals.len()
    }

    fn tour_len(&self) -> usize {
        self.individuals.first().map_or(0, TourChromosome::len)
    }

    fn get_node(&self, individual: usize, position: usize) -> usize {
        self.individuals[individual].nodes()[position]
    }

    fn set_node(&mut self, individual: usize, position: usize, node: usize) {
        self.individuals[individual].nodes_mut()[position] = node;
    }

    fn evaluation(&self, individual: usize) -> f64 {
        self.individuals[individual].evaluation()
    }

    fn set_evaluation(&mut self, individual: usize, value: f64) {
        self.individuals[individual].set_evaluation(value);
    }
}
