//! Graph-subsystem error type.

use thiserror::Error;

use rt_core::NodeId;

/// Errors produced by `rt-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no edge from {start} to {end}")]
    EdgeNotFound { start: NodeId, end: NodeId },

    #[error("graph has no nodes")]
    GraphEmpty,

    #[error("node {0} added twice")]
    DuplicateNode(NodeId),

    #[error("graph too large: {count} {what} overflow the 32-bit index range")]
    TooLarge { what: &'static str, count: usize },

    #[error("invalid edge {start} -> {end}: {reason}")]
    InvalidEdge {
        start:  NodeId,
        end:    NodeId,
        reason: String,
    },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
