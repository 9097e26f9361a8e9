//! Metrics over an already-found path.
//!
//! Every metric is the same pairwise fold the search uses: walk consecutive
//! node pairs, resolve each to its primary edge, and sum
//! `weight(previous_edge, edge)` with `previous_edge = None` for the first
//! hop.  Replaying a path returned by [`astar`](crate::astar) with the weight
//! that drove the search yields exactly the cost the search reported.
//!
//! Paths with fewer than two nodes have no edges and cost `0.0`.

use rt_graph::{Edge, Node, RoadGraph};

use crate::weight::{Length, Weight};
use crate::RoutingResult;

/// Total `weight` along `path`.
///
/// # Errors
///
/// `EdgeNotFound` if two consecutive nodes are not connected (or
/// `NodeNotFound` if a node is not in `graph`).  For a path produced by the
/// search on the same graph that indicates a bug, not bad input.
pub fn costs_for_path<W: Weight + ?Sized>(
    graph: &RoadGraph,
    path: &[Node],
    weight: &W,
) -> RoutingResult<f64> {
    let mut total = 0.0;
    let mut previous: Option<&Edge> = None;
    for pair in path.windows(2) {
        let edge = graph.edge_ref(pair[0].id, pair[1].id)?;
        total += weight.cost(previous, edge);
        previous = Some(edge);
    }
    Ok(total)
}

/// Physical length of `path` in metres.
pub fn length_of_path(graph: &RoadGraph, path: &[Node]) -> RoutingResult<f64> {
    costs_for_path(graph, path, &Length)
}

/// Travel time of `path` in seconds, as priced by `weight` (normally
/// [`TravelTime`](crate::TravelTime)).
pub fn travel_time_of_path<W: Weight + ?Sized>(
    graph: &RoadGraph,
    path: &[Node],
    weight: &W,
) -> RoutingResult<f64> {
    costs_for_path(graph, path, weight)
}
