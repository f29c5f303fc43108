//! Local search operators for improving a single tour.
//!
//! - [`two_opt_move`]: exchange two edges by reversing the arc between them
//! - [`or_opt_move`]: relocate a short run of nodes, optionally reversed
//! - [`LongEdges`]: Or-opt repairs aimed at the tour's longest edges
//! - [`exhaustive_or_opt`]: full Or-opt neighborhood with an edge memory
//!
//! Every operator takes a [`SearchContext`], mutates the tour in place only
//! when the move is accepted, and returns the gain (old length minus new).

mod context;
mod cursor;
mod long_edge;
mod or_opt;
mod sweep;
mod two_opt;

pub use context::{SearchContext, GAIN_EPSILON};
pub use cursor::PositionCursor;
pub use long_edge::LongEdges;
pub use or_opt::{or_opt_improve, or_opt_move, valid_target, OrOptMove};
pub use sweep::{exhaustive_or_opt, EdgeMemory};
pub use two_opt::{two_opt_improve, two_opt_move};
