//! Local search configuration.
//!
//! Every choice that shapes the per-generation search is fixed here, once,
//! before the driver is built: operator probabilities, Or-opt run length,
//! long-edge repair, which individual gets the exhaustive sweep, and the
//! sweep's edge-memory parameters.

use serde::{Deserialize, Serialize};

/// How often the operator kind is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperatorScope {
    /// A fresh draw for every tried position.
    #[default]
    PerPosition,
    /// One draw per tour; a failed Lin-Kernighan attempt checks the tour out.
    PerTour,
}

/// Which individual receives the exhaustive Or-opt sweep each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarderTarget {
    /// The best individual of the population.
    Best,
    /// The worst individual of the population.
    Worst,
    /// A uniformly drawn individual.
    Random,
}

/// Parameters of the local-search driver.
///
/// # Examples
///
/// ```
/// use u_tour::config::{HarderTarget, LocalSearchConfig};
///
/// let config = LocalSearchConfig::default()
///     .with_or_opt_probability(0.8)
///     .with_lk_probability(0.1)
///     .with_harder(HarderTarget::Worst);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.or_opt_max, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Probability of Or-opt instead of 2-opt at a position.
    pub or_opt_probability: f64,
    /// Probability of the Lin-Kernighan engine at a position.
    pub lk_probability: f64,
    /// Probability that a position is tried at all (unless forced).
    pub end_of_gene_probability: f64,
    /// Longest run Or-opt relocates.
    pub or_opt_max: usize,
    /// Share of tour edges considered "long".
    pub long_edge_ratio: f64,
    /// Probability of a long-edge repair after a failed try.
    /// `None` means `long edges / tour length`.
    pub long_edge_probability: Option<f64>,
    /// Operator draw granularity.
    pub operator_scope: OperatorScope,
    /// Individual that receives the exhaustive Or-opt sweep.
    pub harder: Option<HarderTarget>,
    /// Always try every position of the best individual.
    pub always_include_best: bool,
    /// Always try every position of this individual; with
    /// `lk_probability == 1` and `end_of_gene_probability == 0` it switches
    /// the driver into Lin-Kernighan-only mode.
    pub focus_index: Option<usize>,
    /// Sweep: failures before an edge is promoted to "good".
    pub prune_value: usize,
    /// Sweep: generations a good edge is left alone.
    pub good_edge_generations: usize,
    /// Sweep: good edges forgotten after a failed sweep (0 = all).
    pub good_edge_removal: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            or_opt_probability: 0.2,
            lk_probability: 0.0,
            end_of_gene_probability: 0.2,
            or_opt_max: 4,
            long_edge_ratio: 0.05,
            long_edge_probability: None,
            operator_scope: OperatorScope::PerPosition,
            harder: None,
            always_include_best: false,
            focus_index: None,
            prune_value: 10,
            good_edge_generations: 300,
            good_edge_removal: 0,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the Or-opt probability.
    pub fn with_or_opt_probability(mut self, p: f64) -> Self {
        self.or_opt_probability = p;
        self
    }

    /// Sets the Lin-Kernighan probability.
    pub fn with_lk_probability(mut self, p: f64) -> Self {
        self.lk_probability = p;
        self
    }

    /// Sets the per-position try probability.
    pub fn with_end_of_gene_probability(mut self, p: f64) -> Self {
        self.end_of_gene_probability = p;
        self
    }

    /// Sets the longest Or-opt run.
    pub fn with_or_opt_max(mut self, max: usize) -> Self {
        self.or_opt_max = max;
        self
    }

    /// Sets the long-edge ratio.
    pub fn with_long_edge_ratio(mut self, ratio: f64) -> Self {
        self.long_edge_ratio = ratio;
        self
    }

    /// Sets an explicit long-edge repair probability.
    pub fn with_long_edge_probability(mut self, p: f64) -> Self {
        self.long_edge_probability = Some(p);
        self
    }

    /// Sets the operator draw granularity.
    pub fn with_operator_scope(mut self, scope: OperatorScope) -> Self {
        self.operator_scope = scope;
        self
    }

    /// Enables the exhaustive Or-opt sweep for one individual per generation.
    pub fn with_harder(mut self, target: HarderTarget) -> Self {
        self.harder = Some(target);
        self
    }

    /// Always searches the best individual.
    pub fn with_always_include_best(mut self, on: bool) -> Self {
        self.always_include_best = on;
        self
    }

    /// Always searches the individual at `index`.
    pub fn with_focus_index(mut self, index: usize) -> Self {
        self.focus_index = Some(index);
        self
    }

    /// Sets the sweep's edge-memory parameters.
    pub fn with_edge_memory(
        mut self,
        prune_value: usize,
        generations: usize,
        removal: usize,
    ) -> Self {
        self.prune_value = prune_value;
        self.good_edge_generations = generations;
        self.good_edge_removal = removal;
        self
    }

    /// Returns `true` if the driver should only run the Lin-Kernighan engine.
    pub fn lk_only(&self) -> bool {
        self.focus_index.is_some()
            && self.lk_probability >= 1.0
            && self.end_of_gene_probability <= 0.0
    }

    /// Number of long edges tracked for a tour of `n` nodes (at least 4).
    pub fn long_edge_count(&self, n: usize) -> usize {
        ((n as f64 * self.long_edge_ratio).round() as usize).max(4)
    }

    /// Long-edge repair probability for a tour of `n` nodes.
    pub fn long_edge_chance(&self, n: usize) -> f64 {
        self.long_edge_probability
            .unwrap_or_else(|| self.long_edge_count(n) as f64 / n as f64)
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("or_opt_probability", Some(self.or_opt_probability)),
            ("lk_probability", Some(self.lk_probability)),
            ("end_of_gene_probability", Some(self.end_of_gene_probability)),
            ("long_edge_probability", self.long_edge_probability),
        ];
        for (name, value) in probabilities {
            if let Some(p) = value {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::ProbabilityOutOfRange { name, value: p });
                }
            }
        }
        if self.or_opt_max == 0 {
            return Err(ConfigError::ZeroOrOptMax);
        }
        if !(self.long_edge_ratio > 0.0 && self.long_edge_ratio <= 1.0) {
            return Err(ConfigError::LongEdgeRatio(self.long_edge_ratio));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// A configuration value is out of range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probability outside `[0, 1]`.
    ProbabilityOutOfRange {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// `or_opt_max` must allow at least one node.
    ZeroOrOptMax,
    /// `long_edge_ratio` must lie in `(0, 1]`.
    LongEdgeRatio(f64),
    /// The JSON text could not be parsed.
    Json(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ProbabilityOutOfRange { name, value } => {
                write!(f, "{} must be within [0, 1], got {}", name, value)
            }
            ConfigError::ZeroOrOptMax => write!(f, "or_opt_max must be at least 1"),
            ConfigError::LongEdgeRatio(r) => {
                write!(f, "long_edge_ratio must be within (0, 1], got {}", r)
            }
            ConfigError::Json(msg) => write!(f, "invalid configuration JSON: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
