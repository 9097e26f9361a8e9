//! Nearest-node spatial index.
//!
//! Nodes are stored in an R-tree (via `rstar`) as points on the unit sphere
//! rather than as raw `[lat, lon]` pairs.  Squared chord length between two
//! unit vectors is a strictly increasing function of their great-circle
//! distance, so the R-tree's Euclidean nearest neighbour *is* the geodesic
//! nearest neighbour, at any latitude and across the antimeridian.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rt_core::{Location, NodeId, NodeIdx};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a unit-sphere point with the node's dense index
/// and stable id (the latter is the tie-breaker).
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 3],
    idx:   NodeIdx,
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length on the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── NodeIndex ─────────────────────────────────────────────────────────────────

/// Spatial index answering "which node is closest to this coordinate?".
///
/// Built once by [`RoadGraphBuilder::build`](crate::RoadGraphBuilder::build);
/// queries are O(log N).
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load the index from `(idx, id, location)` triples.
    ///
    /// Bulk loading is O(N log N), faster than N individual inserts.
    pub fn build<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (NodeIdx, NodeId, Location)>,
    {
        let entries: Vec<NodeEntry> = nodes
            .into_iter()
            .map(|(idx, id, loc)| NodeEntry { point: loc.unit_vector(), idx, id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Dense index of the node closest to `loc`.
    ///
    /// Among nodes at exactly the same distance the lowest `NodeId` wins.
    /// Returns `None` only if the index is empty.
    pub fn nearest(&self, loc: Location) -> Option<NodeIdx> {
        let query = loc.unit_vector();
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = iter.next()?;

        let mut winner = first;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            if entry.id < winner.id {
                winner = entry;
            }
        }
        Some(winner.idx)
    }

    /// Up to `k` nearest nodes to `loc`, by ascending distance, ties by id.
    pub fn k_nearest(&self, loc: Location, k: usize) -> Vec<NodeIdx> {
        if k == 0 {
            return Vec::new();
        }
        let query = loc.unit_vector();
        let mut found: Vec<(f64, NodeId, NodeIdx)> = Vec::with_capacity(k);
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            // Keep pulling past `k` while the distance still ties with the k-th.
            if found.len() >= k && d2 > found[k - 1].0 {
                break;
            }
            found.push((d2, entry.id, entry.idx));
        }
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.truncate(k);
        found.into_iter().map(|(_, _, idx)| idx).collect()
    }
}
