//! CSV graph loader.
//!
//! # CSV format
//!
//! A graph is two files, conventionally [`NODES_FILE`] and [`EDGES_FILE`] in
//! one directory.
//!
//! ```csv
//! node_id,osm_id,latitude,longitude
//! 1468922197,1468922197,51.4996612,-2.6823825
//! 2106393640,2106393640,51.4995872,-2.6822174
//! ```
//!
//! ```csv
//! start,end,osm_id,oneway,length,travel_time,geometry
//! 1468922197,2106393640,200728367,true,14.09,1.0,
//! 2106393640,1468922197,200728367,false,14.09,1.0,"LINESTRING (-2.6822174 51.4995872, -2.6823825 51.4996612)"
//! ```
//!
//! The `geometry` column is optional.  When present it holds a WKT
//! `LINESTRING` in `lon lat` order; an empty cell means "no geometry".
//!
//! Coordinates are validated; out-of-range values are a parse error.

use std::io::Read;
use std::path::Path;

use geo::LineString;
use serde::Deserialize;
use wkt::TryFromWkt;

use rt_core::{Location, NodeId};

use crate::graph::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

/// File name of the node table inside a graph directory.
pub const NODES_FILE: &str = "nodes.csv";
/// File name of the edge table inside a graph directory.
pub const EDGES_FILE: &str = "edges.csv";

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id:   u64,
    osm_id:    i64,
    latitude:  f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    start:       u64,
    end:         u64,
    osm_id:      i64,
    oneway:      bool,
    length:      f64,
    travel_time: f64,
    #[serde(default)]
    geometry:    Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `nodes.csv` and `edges.csv` from `dir`.
pub fn load_csv_dir(dir: &Path) -> GraphResult<RoadGraph> {
    load_csv(&dir.join(NODES_FILE), &dir.join(EDGES_FILE))
}

/// Load a graph from explicit node and edge file paths.
pub fn load_csv(nodes: &Path, edges: &Path) -> GraphResult<RoadGraph> {
    log::info!("loading graph from {} and {}", nodes.display(), edges.display());
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    let graph = load_csv_readers(nodes, edges)?;
    log::info!(
        "loaded graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Like [`load_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_csv_readers<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(format!("nodes: {e}")))?;
        let location = Location::new(row.latitude, row.longitude)
            .map_err(|e| GraphError::Parse(format!("node {}: {e}", row.node_id)))?;
        builder.add_node(NodeId(row.node_id), row.osm_id, location);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(format!("edges: {e}")))?;
        let mut attrs = EdgeAttrs::new(row.length, row.travel_time)
            .osm_id(row.osm_id)
            .oneway(row.oneway);
        if let Some(wkt) = row.geometry.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            attrs = attrs.geometry(parse_linestring(wkt).map_err(|e| {
                GraphError::Parse(format!("edge {} -> {}: {e}", row.start, row.end))
            })?);
        }
        builder.add_edge(NodeId(row.start), NodeId(row.end), attrs);
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_linestring(wkt: &str) -> Result<LineString<f64>, String> {
    LineString::<f64>::try_from_wkt_str(wkt).map_err(|e| format!("invalid WKT geometry: {e}"))
}
