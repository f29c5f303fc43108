//! Tour chromosome: a node permutation with a cached evaluation.

use crate::distance::EdgeWeight;
use crate::models::{Tour, TourError};

/// A TSP individual: the node sequence and its cached tour length.
///
/// The evaluation is whatever the host last stored; the driver keeps it
/// current by subtracting each gain it applies. Lower is better.
///
/// # Examples
///
/// ```
/// use u_tour::population::TourChromosome;
///
/// let c = TourChromosome::new(vec![3, 1, 2, 0]);
/// assert_eq!(c.nodes(), &[3, 1, 2, 0]);
/// assert_eq!(c.evaluation(), f64::INFINITY);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TourChromosome {
    nodes: Vec<usize>,
    evaluation: f64,
}

impl TourChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(nodes: Vec<usize>) -> Self {
        Self {
            nodes,
            evaluation: f64::INFINITY,
        }
    }

    /// Creates a chromosome from `tour` with its length as evaluation.
    pub fn evaluated<W: EdgeWeight + ?Sized>(tour: Tour, weights: &W) -> Self {
        let evaluation = tour.length(weights);
        Self {
            nodes: tour.into_nodes(),
            evaluation,
        }
    }

    /// The node sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Mutable access to the node sequence.
    pub fn nodes_mut(&mut self) -> &mut Vec<usize> {
        &mut self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the chromosome has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The cached evaluation.
    pub fn evaluation(&self) -> f64 {
        self.evaluation
    }

    /// Replaces the cached evaluation.
    pub fn set_evaluation(&mut self, evaluation: f64) {
        self.evaluation = evaluation;
    }

    /// Validates the node sequence as a tour.
    pub fn to_tour(&self) -> Result<Tour, TourError> {
        Tour::new(self.nodes.clone())
    }
}
