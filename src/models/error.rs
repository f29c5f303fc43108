//! Errors raised when building tours and fixed-edge sets from host data.

/// A host-supplied tour or fixed-edge declaration is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    /// Fewer nodes than any tour operator can work with.
    TooShort {
        /// Number of nodes supplied.
        len: usize,
    },
    /// A node index is not in `0..len`.
    NodeOutOfRange {
        /// The offending node.
        node: usize,
        /// Number of nodes in the tour.
        len: usize,
    },
    /// A node occurs more than once.
    DuplicateNode {
        /// The repeated node.
        node: usize,
    },
    /// A fixed edge references a node outside the instance.
    FixedEdgeOutOfRange {
        /// First endpoint.
        a: usize,
        /// Second endpoint.
        b: usize,
        /// Number of nodes in the instance.
        len: usize,
    },
    /// A fixed edge joins a node to itself.
    FixedSelfLoop {
        /// The node.
        node: usize,
    },
    /// The host's tours and the weight oracle disagree on the node count.
    LengthMismatch {
        /// Nodes known to the weight oracle.
        expected: usize,
        /// Nodes in the host's tours.
        found: usize,
    },
}

impl std::fmt::Display for TourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TourError::TooShort { len } => {
                write!(f, "Tour has {} nodes, at least {} are required", len, super::MIN_TOUR_LEN)
            }
            TourError::NodeOutOfRange { node, len } => {
                write!(f, "Node {} is out of range for a tour of {} nodes", node, len)
            }
            TourError::DuplicateNode { node } => write!(f, "Node {} occurs more than once", node),
            TourError::FixedEdgeOutOfRange { a, b, len } => write!(
                f,
                "Fixed edge ({}, {}) is out of range for {} nodes",
                a, b, len
            ),
            TourError::FixedSelfLoop { node } => {
                write!(f, "Fixed edge ({}, {}) is a self-loop", node, node)
            }
            TourError::LengthMismatch { expected, found } => write!(
                f,
                "Tours have {} nodes but the instance has {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for TourError {}
