//! # u-tour
//!
//! Tour local search for the Traveling Salesman Problem, meant to run as a
//! per-generation improvement hook inside a host genetic algorithm.
//!
//! ## Modules
//!
//! - [`distance`]: edge weight oracle and distance matrix
//! - [`models`]: tours, fixed edges, and input errors
//! - [`random`]: the host's random source
//! - [`config`]: local-search parameters
//! - [`local_search`]: 2-opt, Or-opt, long-edge repair, and the exhaustive Or-opt sweep
//! - [`lin_kernighan`]: Lin-Kernighan search on a segmented tour graph
//! - [`population`]: host population accessors
//! - [`driver`]: the per-generation driver and its statistics
//!
//! ## Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_tour::distance::DistanceMatrix;
//! use u_tour::lin_kernighan;
//! use u_tour::local_search::SearchContext;
//! use u_tour::models::{FixedEdges, Tour};
//!
//! let pts = [(0.0, 0.0), (4.0, 3.0), (4.0, 0.0), (0.0, 3.0), (2.0, 4.0), (2.0, -1.0)];
//! let dm = DistanceMatrix::from_points(&pts);
//! let fixed = FixedEdges::none();
//! let ctx = SearchContext::new(&dm, &fixed);
//!
//! let mut tour = Tour::identity(6);
//! let before = ctx.tour_length(&tour);
//! let report = lin_kernighan::optimize(&mut tour, ctx, &mut StdRng::seed_from_u64(1));
//! assert!((before - ctx.tour_length(&tour) - report.gain).abs() < 1e-9);
//! ```

pub mod config;
pub mod distance;
pub mod driver;
pub mod lin_kernighan;
pub mod local_search;
pub mod models;
pub mod population;
pub mod random;
