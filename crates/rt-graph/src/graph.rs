//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a dense `NodeIdx n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edges[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are sorted *stably* by `(source, target)`.  Parallel edges between
//! the same ordered pair are therefore contiguous and keep the order in which
//! they were added; the first one is the **primary** edge (key 0).
//!
//! Each stored [`Edge`] already carries snapshots of both endpoint nodes, so
//! handing `&Edge` to a weight function needs no lookup or allocation, and
//! [`RoadGraph::edge`] returns a cheap clone (geometry is shared via `Arc`).
//!
//! # Identifiers
//!
//! Callers address nodes by their stable [`NodeId`].  A hash map resolves it
//! to the dense [`NodeIdx`] used internally.  Dense indices are exposed for
//! search code that needs to walk the adjacency arrays directly.

use std::sync::Arc;

use geo::LineString;
use rustc_hash::FxHashMap;

use rt_core::{EdgeId, Location, NodeId, NodeIdx};

use crate::index::NodeIndex;
use crate::{GraphError, GraphResult};

// ── Node / Edge snapshots ─────────────────────────────────────────────────────

/// A geolocated graph node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Stable identifier, unique within the graph.
    pub id:       NodeId,
    /// Identifier in the source map data.  Not required to be unique.
    pub osm_id:   i64,
    pub location: Location,
}

impl Node {
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.location.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.location.longitude
    }
}

/// A directed, attributed edge between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub start:       Node,
    pub end:         Node,
    pub osm_id:      i64,
    pub oneway:      bool,
    /// Physical length in metres.
    pub length:      f64,
    /// Traversal time in seconds.
    pub travel_time: f64,
    /// Shape of the road segment, if the provider supplied one.  Opaque to
    /// routing.
    pub geometry:    Option<Arc<LineString<f64>>>,
}

impl Edge {
    /// Initial heading of the edge in degrees, measured start → end.
    pub fn bearing(&self) -> f64 {
        self.start.location.bearing_to(self.end.location)
    }
}

/// Edge attributes supplied by the graph provider.
///
/// ```
/// use rt_graph::EdgeAttrs;
///
/// let attrs = EdgeAttrs::new(61.516, 2.0).osm_id(4_047_345).oneway(true);
/// assert_eq!(attrs.length, 61.516);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    pub osm_id:      i64,
    pub oneway:      bool,
    pub length:      f64,
    pub travel_time: f64,
    pub geometry:    Option<LineString<f64>>,
}

impl EdgeAttrs {
    pub fn new(length: f64, travel_time: f64) -> Self {
        Self { osm_id: 0, oneway: false, length, travel_time, geometry: None }
    }

    pub fn osm_id(mut self, osm_id: i64) -> Self {
        self.osm_id = osm_id;
        self
    }

    pub fn oneway(mut self, oneway: bool) -> Self {
        self.oneway = oneway;
        self
    }

    pub fn geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable directed road multigraph plus a nearest-node index.
///
/// Do not construct directly; use [`RoadGraphBuilder`].  Once built the graph
/// exposes no mutation, so it can be shared across threads freely.
pub struct RoadGraph {
    // ── Node data (indexed by NodeIdx) ────────────────────────────────────
    nodes:     Vec<Node>,
    id_to_idx: FxHashMap<NodeId, NodeIdx>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    edge_from: Vec<NodeIdx>,
    edge_to:   Vec<NodeIdx>,
    edges:     Vec<Edge>,

    /// `(source, target)` → (primary EdgeId, number of parallel edges).
    pair_index: FxHashMap<(NodeIdx, NodeIdx), (EdgeId, u32)>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: NodeIndex,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any nearest-node query against it fails with
    /// [`GraphError::GraphEmpty`].
    pub fn empty() -> Self {
        // An empty builder has nothing to reject.
        match RoadGraphBuilder::new().build() {
            Ok(graph) => graph,
            Err(_) => unreachable!("empty builder cannot fail"),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookups by stable id ──────────────────────────────────────────────

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.id_to_idx.contains_key(&id)
    }

    /// Dense index of `id`, if the node exists.
    #[inline]
    pub fn node_index(&self, id: NodeId) -> Option<NodeIdx> {
        self.id_to_idx.get(&id).copied()
    }

    /// Snapshot of the node with stable id `id`.
    pub fn node(&self, id: NodeId) -> GraphResult<Node> {
        self.node_index(id)
            .map(|idx| self.nodes[idx.index()])
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// All nodes in dense-index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Snapshot of the primary edge `start → end`.
    ///
    /// Fails with `NodeNotFound` if either endpoint is missing and with
    /// `EdgeNotFound` if the nodes exist but are not connected in this
    /// direction.
    pub fn edge(&self, start: NodeId, end: NodeId) -> GraphResult<Edge> {
        self.edge_ref(start, end).cloned()
    }

    /// Snapshot of parallel edge number `key` (0 = primary) from `start` to `end`.
    pub fn edge_at(&self, start: NodeId, end: NodeId, key: usize) -> GraphResult<Edge> {
        let (first, count) = self.pair(start, end)?;
        if key >= count as usize {
            return Err(GraphError::EdgeNotFound { start, end });
        }
        Ok(self.edges[first.index() + key].clone())
    }

    /// Same as [`edge`](Self::edge), starting from node snapshots.
    pub fn edge_between(&self, start: &Node, end: &Node) -> GraphResult<Edge> {
        self.edge(start.id, end.id)
    }

    /// Borrow the primary edge `start → end` without cloning.
    pub fn edge_ref(&self, start: NodeId, end: NodeId) -> GraphResult<&Edge> {
        let (first, _) = self.pair(start, end)?;
        Ok(&self.edges[first.index()])
    }

    /// Number of parallel edges `start → end` (0 if unconnected or unknown).
    pub fn parallel_edge_count(&self, start: NodeId, end: NodeId) -> usize {
        self.pair(start, end).map(|(_, n)| n as usize).unwrap_or(0)
    }

    fn pair(&self, start: NodeId, end: NodeId) -> GraphResult<(EdgeId, u32)> {
        let from = self.node_index(start).ok_or(GraphError::NodeNotFound(start))?;
        let to = self.node_index(end).ok_or(GraphError::NodeNotFound(end))?;
        self.pair_index
            .get(&(from, to))
            .copied()
            .ok_or(GraphError::EdgeNotFound { start, end })
    }

    // ── Dense-index traversal ─────────────────────────────────────────────

    /// Node stored at dense index `idx`.
    ///
    /// # Panics
    /// Panics if `idx` does not belong to this graph.
    #[inline]
    pub fn node_at(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    /// Edge stored at `edge`.
    ///
    /// # Panics
    /// Panics if `edge` does not belong to this graph.
    #[inline]
    pub fn edge_by_id(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.index()]
    }

    #[inline]
    pub fn edge_source(&self, edge: EdgeId) -> NodeIdx {
        self.edge_from[edge.index()]
    }

    #[inline]
    pub fn edge_target(&self, edge: EdgeId) -> NodeIdx {
        self.edge_to[edge.index()]
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`,
    /// parallel edges included.
    ///
    /// A contiguous index range; nothing is allocated.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()];
        let end   = self.node_out_start[node.index() + 1];
        (start..end).map(EdgeId)
    }

    /// Outgoing edges of `node`, skipping every parallel edge but the primary.
    ///
    /// One edge per distinct neighbour, in ascending target order.
    #[inline]
    pub fn primary_out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        self.out_edges(node).filter(move |e| {
            let i = e.index();
            i == start || self.edge_to[i - 1] != self.edge_to[i]
        })
    }

    /// Out-degree of `node` (number of outgoing edges, parallel ones included).
    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `loc` by great-circle distance.
    ///
    /// Ties go to the lowest `NodeId`.  Fails with `GraphEmpty` if the graph
    /// has no nodes.
    pub fn nearest_node(&self, loc: Location) -> GraphResult<Node> {
        self.spatial_idx
            .nearest(loc)
            .map(|idx| self.nodes[idx.index()])
            .ok_or(GraphError::GraphEmpty)
    }

    /// Up to `k` nodes closest to `loc`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, loc: Location, k: usize) -> Vec<Node> {
        self.spatial_idx
            .k_nearest(loc, k)
            .into_iter()
            .map(|idx| self.nodes[idx.index()])
            .collect()
    }
}

impl std::fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// validates them, sorts edges by `(source, target)`, constructs the CSR
/// arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use rt_core::{Location, NodeId};
/// use rt_graph::{EdgeAttrs, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_node(NodeId(1), 1, Location::new_unchecked(51.4996, -2.6823));
/// b.add_node(NodeId(2), 2, Location::new_unchecked(51.4973, -2.6828));
/// b.add_road(NodeId(1), NodeId(2), EdgeAttrs::new(260.0, 31.2));
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:     Vec<Node>,
    id_to_idx: FxHashMap<NodeId, NodeIdx>,
    duplicate: Option<NodeId>,
    overflow:  bool,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            id_to_idx: FxHashMap::default(),
            duplicate: None,
            overflow:  false,
            raw_edges: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from OSM or CSV.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        let mut id_to_idx = FxHashMap::default();
        id_to_idx.reserve(nodes);
        Self {
            nodes: Vec::with_capacity(nodes),
            id_to_idx,
            duplicate: None,
            overflow:  false,
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its dense index.
    ///
    /// Adding the same `id` twice is reported by [`build`](Self::build) as
    /// [`GraphError::DuplicateNode`]; the second copy is ignored until then.
    /// Nodes past the `u32` index range return [`NodeIdx::INVALID`] and make
    /// `build` fail with [`GraphError::TooLarge`].
    pub fn add_node(&mut self, id: NodeId, osm_id: i64, location: Location) -> NodeIdx {
        if let Some(&idx) = self.id_to_idx.get(&id) {
            self.duplicate.get_or_insert(id);
            return idx;
        }
        let idx = match NodeIdx::try_from(self.nodes.len()) {
            Ok(idx) if idx != NodeIdx::INVALID => idx,
            _ => {
                self.overflow = true;
                return NodeIdx::INVALID;
            }
        };
        self.nodes.push(Node { id, osm_id, location });
        self.id_to_idx.insert(id, idx);
        idx
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        self.raw_edges.push(RawEdge { from, to, attrs });
    }

    /// Convenience: add edges in **both directions** for a two-way road
    /// segment.  Both copies get `oneway = false`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        let attrs = attrs.oneway(false);
        self.add_edge(a, b, attrs.clone());
        self.add_edge(b, a, attrs);
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute edge lengths between adjacent way nodes).
    pub fn node_location(&self, id: NodeId) -> Option<Location> {
        self.id_to_idx.get(&id).map(|idx| self.nodes[idx.index()].location)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateNode`] if a node id was added twice.
    /// - [`GraphError::TooLarge`] if nodes or edges overflow the `u32` indices.
    /// - [`GraphError::InvalidEdge`] if an edge references an unknown node or
    ///   carries a negative or non-finite `length`/`travel_time`.
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> GraphResult<RoadGraph> {
        if let Some(id) = self.duplicate {
            return Err(GraphError::DuplicateNode(id));
        }
        if self.overflow {
            return Err(GraphError::TooLarge { what: "nodes", count: self.nodes.len() + 1 });
        }
        if EdgeId::try_from(self.raw_edges.len()).is_err() {
            return Err(GraphError::TooLarge { what: "edges", count: self.raw_edges.len() });
        }

        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // ── Resolve and validate edges ────────────────────────────────────
        let mut resolved: Vec<(NodeIdx, NodeIdx, EdgeAttrs)> = Vec::with_capacity(edge_count);
        for RawEdge { from, to, attrs } in self.raw_edges {
            let invalid = |reason: &str| GraphError::InvalidEdge {
                start:  from,
                end:    to,
                reason: reason.to_string(),
            };
            let f = *self.id_to_idx.get(&from).ok_or_else(|| invalid("unknown start node"))?;
            let t = *self.id_to_idx.get(&to).ok_or_else(|| invalid("unknown end node"))?;
            if !(attrs.length.is_finite() && attrs.length >= 0.0) {
                return Err(invalid("length must be finite and non-negative"));
            }
            if !(attrs.travel_time.is_finite() && attrs.travel_time >= 0.0) {
                return Err(invalid("travel_time must be finite and non-negative"));
            }
            resolved.push((f, t, attrs));
        }

        // Stable sort keeps parallel edges in insertion order.
        resolved.sort_by_key(|(f, t, _)| (f.0, t.0));

        // ── Build edge arrays from sorted edges ───────────────────────────
        let mut edge_from  = Vec::with_capacity(edge_count);
        let mut edge_to    = Vec::with_capacity(edge_count);
        let mut edges      = Vec::with_capacity(edge_count);
        let mut pair_index: FxHashMap<(NodeIdx, NodeIdx), (EdgeId, u32)> = FxHashMap::default();
        pair_index.reserve(edge_count);

        // Edge count was checked against the u32 range above.
        for (id, (f, t, attrs)) in (0u32..).map(EdgeId).zip(resolved) {
            pair_index
                .entry((f, t))
                .and_modify(|entry| entry.1 += 1)
                .or_insert((id, 1));
            edge_from.push(f);
            edge_to.push(t);
            edges.push(Edge {
                start:       self.nodes[f.index()],
                end:         self.nodes[t.index()],
                osm_id:      attrs.osm_id,
                oneway:      attrs.oneway,
                length:      attrs.length,
                travel_time: attrs.travel_time,
                geometry:    attrs.geometry.map(Arc::new),
            });
        }

        // ── Build CSR row pointer (node_out_start) ────────────────────────
        let mut node_out_start = vec![0u32; node_count + 1];
        for f in &edge_from {
            node_out_start[f.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let spatial_idx = NodeIndex::build(
            (0u32..)
                .map(NodeIdx)
                .zip(&self.nodes)
                .map(|(idx, n)| (idx, n.id, n.location)),
        );

        log::debug!(
            "built road graph: {node_count} nodes, {edge_count} edges, {} connected pairs",
            pair_index.len()
        );

        Ok(RoadGraph {
            nodes: self.nodes,
            id_to_idx: self.id_to_idx,
            node_out_start,
            edge_from,
            edge_to,
            edges,
            pair_index,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
