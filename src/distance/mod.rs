//! Edge weights between tour nodes.
//!
//! - [`EdgeWeight`]: the distance oracle every operator reads through
//! - [`DistanceMatrix`]: dense n×n matrix, the usual oracle
//! - [`FnWeight`]: adapter for a host-supplied lookup function

mod matrix;
mod weight;

pub use matrix::DistanceMatrix;
pub use weight::{EdgeWeight, FnWeight};
