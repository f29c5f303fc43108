//! Lin-Kernighan search on a segmented tour graph.
//!
//! - [`SegmentedTourGraph`]: the tour cut into segments at broken edges,
//!   with spliced-in edges tagged by depth and an undo trail
//! - [`LinKernighan`]: the sequential edge-exchange search for one anchor
//! - [`optimize`]: repeated search until no anchor improves the tour

mod engine;
mod graph;
mod segment;

pub use engine::{optimize, LinKernighan, LkImprovement, LkReport, MIN_LK_LEN};
pub use graph::{Checkpoint, Edge, SegmentedTourGraph};
pub use segment::{Orientation, Segment, SegmentEnd, Splice};
