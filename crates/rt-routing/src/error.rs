//! Routing error type.
//!
//! Graph errors pass through unchanged; [`RoutingError::kind`] folds every
//! error onto the small set of kinds a request layer reports to its callers.

use thiserror::Error;

use rt_core::NodeId;
use rt_graph::GraphError;

/// Errors produced by `rt-routing`.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no path from {origin} to {destination}")]
    PathNotFound { origin: NodeId, destination: NodeId },

    #[error("search stopped after {expanded} expansions")]
    ExpansionLimit { expanded: usize },

    #[error("weight function {0:?} is already registered")]
    DuplicateWeight(String),

    #[error("unknown weight function {name:?}; available: {}", .available.join(", "))]
    UnknownWeight { name: String, available: Vec<String> },
}

/// Caller-facing classification of a [`RoutingError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NodeNotFound,
    EdgeNotFound,
    GraphEmpty,
    PathNotFound,
    Other,
}

impl RoutingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::Graph(GraphError::NodeNotFound(_)) => ErrorKind::NodeNotFound,
            RoutingError::Graph(GraphError::EdgeNotFound { .. }) => ErrorKind::EdgeNotFound,
            RoutingError::Graph(GraphError::GraphEmpty) => ErrorKind::GraphEmpty,
            RoutingError::PathNotFound { .. } => ErrorKind::PathNotFound,
            _ => ErrorKind::Other,
        }
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
