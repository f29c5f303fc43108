//! The per-generation local-search driver and its statistics.
//!
//! The host's evolutionary loop calls
//! [`LocalSearchDriver::run_generation`] once per generation. The driver
//! picks an operator for each individual, applies it, keeps the cached
//! evaluations current and counts what happened in [`Statistics`].

mod runner;
mod statistics;

pub use runner::{GenerationReport, LocalSearchDriver};
pub use statistics::Statistics;
