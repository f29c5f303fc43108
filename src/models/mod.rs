//! Tour model types.
//!
//! Provides the genome the local search works on: a cyclic permutation of
//! node indices, the set of fixed edges every tour must keep, and the
//! errors raised when host data violates either.

mod error;
mod fixed_edges;
mod tour;

pub use error::TourError;
pub(crate) use fixed_edges::edge_key;
pub use fixed_edges::FixedEdges;
pub use tour::{check_permutation, Tour, MIN_TOUR_LEN};
