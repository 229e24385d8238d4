use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the wheelway library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// A search that finds no accessible path is not an error; see
/// [`SearchOutcome::NoPathFound`](crate::SearchOutcome::NoPathFound).
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an origin or destination is not part of the graph.
    #[error("node {id} is not present in the graph")]
    UnknownNode { id: NodeId },

    /// Raised when a graph is built with the same node identifier twice.
    #[error("duplicate node identifier {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when an edge references a node that was never added.
    #[error("edge {from} -> {to} references missing node {missing}")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// Raised when an edge length is negative or not finite.
    #[error("edge {from} -> {to} has invalid length {length}")]
    InvalidEdgeLength {
        from: NodeId,
        to: NodeId,
        length: f64,
    },

    /// Raised when a node position contains non-finite coordinates.
    #[error("node {id} has a non-finite position")]
    InvalidPosition { id: NodeId },

    /// Raised when a search observes its cancellation token.
    #[error("search was cancelled")]
    SearchCancelled,

    /// Raised when a search runs past its deadline.
    #[error("search deadline exceeded")]
    DeadlineExceeded,

    /// Raised when a search expands more nodes than allowed.
    #[error("search expansion limit of {limit} nodes reached")]
    ExpansionLimitReached { limit: usize },

    /// Raised when a coordinate could not be matched to any graph node.
    #[error("no graph node near ({x}, {y})")]
    LocationNotResolved { x: f64, y: f64 },

    /// Raised when a compass direction is not one of N, S, E or W.
    #[error("invalid hemisphere {value:?}; expected N, S, E or W")]
    InvalidHemisphere { value: String },

    /// Raised when a routing configuration fails validation.
    #[error("invalid route configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for outcomes caused by [`SearchLimits`](crate::SearchLimits)
    /// rather than by bad input.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Error::SearchCancelled | Error::DeadlineExceeded | Error::ExpansionLimitReached { .. }
        )
    }
}
