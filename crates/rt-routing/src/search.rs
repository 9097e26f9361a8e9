//! Best-first (A*) search under a pairwise weight.
//!
//! # Search state
//!
//! Because a [`Weight`] may look at the previous edge, the cost of leaving a
//! node depends on how the search got there.  The frontier therefore holds
//! **(node, arrival edge)** states, not bare nodes.  Since an arrival edge
//! determines its node, each directed edge *is* a state; the origin is the
//! one extra state with no arrival edge.  Best-known cost and predecessor
//! are kept per edge in a hash map, so a query only pays for the states it
//! touches, not for the whole graph.
//!
//! # Ordering
//!
//! The open set is a binary heap keyed on `g + h`, with the insertion
//! sequence number as secondary key, so equal-priority entries pop in the
//! order they were pushed and results are deterministic.
//!
//! # Parallel edges
//!
//! Only the primary edge of each `(node, neighbour)` pair is expanded.  The
//! returned node sequence therefore re-resolves, edge by edge, to exactly the
//! edges the search priced, and replaying it through
//! [`costs_for_path`](crate::costs_for_path) reproduces the reported cost.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use rt_core::{EdgeId, Location, NodeId, NodeIdx};
use rt_graph::{GraphError, Node, RoadGraph};

use crate::weight::Weight;
use crate::{RoutingError, RoutingResult};

// ── Heuristic ─────────────────────────────────────────────────────────────────

/// Lower-bound estimate of the remaining cost to the destination.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Heuristic {
    /// `h = 0`: uniform-cost search.  Admissible for every weight.
    #[default]
    Zero,
    /// Great-circle distance to the destination times `cost_per_metre`.
    ///
    /// Only admissible if every path's accumulated cost is at least its
    /// straight-line length times `cost_per_metre`.  Nothing checks that;
    /// pairing it with an incompatible weight can return suboptimal paths.
    GreatCircle { cost_per_metre: f64 },
}

impl Heuristic {
    /// Great-circle heuristic for [`Length`](crate::Length)-like weights.
    pub fn for_length() -> Self {
        Heuristic::GreatCircle { cost_per_metre: 1.0 }
    }

    /// Great-circle heuristic for travel-time weights, given the fastest
    /// speed anywhere on the graph.
    ///
    /// A speed that is not finite and positive has no meaningful bound and
    /// falls back to [`Heuristic::Zero`].
    pub fn for_travel_time(max_speed_kph: f64) -> Self {
        if !(max_speed_kph.is_finite() && max_speed_kph > 0.0) {
            log::warn!("ignoring travel-time heuristic for max speed {max_speed_kph} km/h");
            return Heuristic::Zero;
        }
        Heuristic::GreatCircle { cost_per_metre: 3.6 / max_speed_kph }
    }

    #[inline]
    pub fn estimate(&self, from: Location, to: Location) -> f64 {
        match *self {
            Heuristic::Zero => 0.0,
            Heuristic::GreatCircle { cost_per_metre } => from.distance_m(to) * cost_per_metre,
        }
    }
}

// ── Options / result ──────────────────────────────────────────────────────────

/// Tuning knobs for [`astar`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SearchOptions {
    pub heuristic:      Heuristic,
    /// Give up with [`RoutingError::ExpansionLimit`] after this many state
    /// expansions.  `None` searches until the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

/// A path found by [`astar`].
#[derive(Clone, Debug, PartialEq)]
pub struct FoundPath {
    /// Nodes from origin to destination inclusive.
    pub nodes:    Vec<Node>,
    /// Accumulated weight along `nodes`.
    pub cost:     f64,
    /// Number of states expanded.
    pub expanded: usize,
    /// Number of (node, arrival edge) states the search touched.
    pub states:   usize,
}

// ── Heap entry ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
struct State {
    priority: f64,
    cost:     f64,
    seq:      u64,
    /// `None` only for the origin state.
    arrival:  Option<EdgeId>,
}

// Min-heap on (priority, seq), reversed for Rust's max-heap BinaryHeap.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

// ── Per-edge search state ────────────────────────────────────────────────────

/// Search bookkeeping for the state "arrived over this edge".
#[derive(Copy, Clone)]
struct Label {
    /// Best known cost.
    best:   f64,
    /// Arrival edge of the state that reached this one; `None` after the origin.
    prev:   Option<EdgeId>,
    closed: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self { best: f64::INFINITY, prev: None, closed: false }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Find the minimum-cost node sequence from `origin` to `destination`.
///
/// # Errors
///
/// - `NodeNotFound` if either endpoint is absent (checked before searching).
/// - [`RoutingError::PathNotFound`] if the destination is unreachable.
/// - [`RoutingError::ExpansionLimit`] if `options.max_expansions` is hit.
pub fn astar<W: Weight + ?Sized>(
    graph: &RoadGraph,
    origin: NodeId,
    destination: NodeId,
    weight: &W,
    options: &SearchOptions,
) -> RoutingResult<FoundPath> {
    let from = graph.node_index(origin).ok_or(GraphError::NodeNotFound(origin))?;
    let to = graph.node_index(destination).ok_or(GraphError::NodeNotFound(destination))?;

    let target = graph.node_at(to).location;
    let h = |idx: NodeIdx| options.heuristic.estimate(graph.node_at(idx).location, target);

    let mut labels: FxHashMap<EdgeId, Label> = FxHashMap::default();

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(State { priority: h(from), cost: 0.0, seq, arrival: None });

    let mut expanded = 0usize;

    while let Some(State { cost, arrival, .. }) = heap.pop() {
        let node = match arrival {
            None => from,
            Some(e) => {
                let label = labels.entry(e).or_default();
                // Skip stale heap entries.
                if label.closed {
                    continue;
                }
                label.closed = true;
                graph.edge_target(e)
            }
        };

        if node == to {
            let nodes = reconstruct(graph, &labels, from, arrival);
            log::debug!(
                "astar {origin} -> {destination}: cost {cost}, {} nodes, {expanded} expansions",
                nodes.len()
            );
            return Ok(FoundPath { nodes, cost, expanded, states: labels.len() });
        }

        if options.max_expansions.is_some_and(|limit| expanded >= limit) {
            log::debug!("astar {origin} -> {destination}: expansion limit {expanded} reached");
            return Err(RoutingError::ExpansionLimit { expanded });
        }
        expanded += 1;

        let previous = arrival.map(|e| graph.edge_by_id(e));
        for e in graph.primary_out_edges(node) {
            let label = labels.entry(e).or_default();
            if label.closed {
                continue;
            }
            let next = cost + weight.cost(previous, graph.edge_by_id(e));
            if next < label.best {
                label.best = next;
                label.prev = arrival;
                seq += 1;
                heap.push(State {
                    priority: next + h(graph.edge_target(e)),
                    cost: next,
                    seq,
                    arrival: Some(e),
                });
            }
        }
    }

    log::debug!(
        "astar {origin} -> {destination}: frontier exhausted after {expanded} expansions, {} states",
        labels.len()
    );
    Err(RoutingError::PathNotFound { origin, destination })
}

/// Walk predecessors back from `last` and emit the node sequence from the
/// origin.
fn reconstruct(
    graph: &RoadGraph,
    labels: &FxHashMap<EdgeId, Label>,
    origin: NodeIdx,
    last: Option<EdgeId>,
) -> Vec<Node> {
    let mut edges = Vec::new();
    let mut cur = last;
    while let Some(e) = cur {
        edges.push(e);
        cur = labels.get(&e).and_then(|label| label.prev);
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(*graph.node_at(origin));
    nodes.extend(edges.iter().map(|&e| graph.edge_by_id(e).end));
    nodes
}
