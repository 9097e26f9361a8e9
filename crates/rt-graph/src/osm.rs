//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rt_graph::osm::load_from_pbf;
//!
//! let graph = load_from_pbf(Path::new("bristol.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`default_speed_kph`]).
//! One-way roads add a single directed edge, reversed for `oneway=-1`; two-way
//! roads add both directions (see [`way_direction`]).  Node ids are the OSM node ids; edge `osm_id` is the way id.
//!
//! Every edge gets a haversine `length` and a `travel_time` derived from the
//! way's `maxspeed` tag, or from the highway class when the tag is missing or
//! unparsable.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use rt_core::{Location, NodeId};

use crate::graph::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

/// Speed assumed for drivable roads with no class-specific default.
pub const FALLBACK_SPEED_KPH: f64 = 30.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a road graph from an OSM PBF file.
///
/// # Errors
///
/// Returns [`GraphError::Osm`] on parse errors and whatever
/// [`RoadGraphBuilder::build`] rejects.
pub fn load_from_pbf(path: &Path) -> GraphResult<RoadGraph> {
    log::info!("loading OSM extract {}", path.display());

    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(path).map_err(|e| GraphError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, Location> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), Location::new_unchecked(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), Location::new_unchecked(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                let Some(highway) = tag("highway") else { return };
                let Some(class_kph) = default_speed_kph(highway) else { return };

                let speed_kph = tag("maxspeed").and_then(parse_maxspeed).unwrap_or(class_kph);
                road_ways.push(OsmWay {
                    id: w.id(),
                    refs: w.refs().collect(),
                    speed_kph,
                    direction: way_direction(highway, &tags),
                });
            }
            _ => {}
        })
        .map_err(|e| GraphError::Osm(e.to_string()))?;

    // ── Phase 2: identify road-referenced node IDs ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    // ── Phase 3: build graph ──────────────────────────────────────────────
    let mut builder = RoadGraphBuilder::with_capacity(
        road_node_ids.len(),
        road_node_ids.len() * 2,
    );

    let mut skipped = 0usize;
    for &osm_id in &road_node_ids {
        match (u64::try_from(osm_id), all_nodes.get(&osm_id)) {
            (Ok(id), Some(&loc)) => {
                builder.add_node(NodeId(id), osm_id, loc);
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} way nodes that are missing or have negative ids");
    }

    // Only way nodes are needed from here on.
    drop(all_nodes);
    drop(road_node_ids);

    for way in &road_ways {
        let speed_mps = way.speed_kph / 3.6;
        for window in way.refs.windows(2) {
            let (Ok(a), Ok(b)) = (u64::try_from(window[0]), u64::try_from(window[1])) else {
                continue;
            };
            let (from, to) = (NodeId(a), NodeId(b));
            let (Some(pa), Some(pb)) = (builder.node_location(from), builder.node_location(to))
            else {
                continue;
            };

            let length = pa.distance_m(pb);
            let attrs = EdgeAttrs::new(length, length / speed_mps).osm_id(way.id);
            add_segment(&mut builder, from, to, attrs, way.direction);
        }
    }

    let graph = builder.build()?;
    log::info!(
        "loaded OSM graph: {} nodes, {} edges from {} ways",
        graph.node_count(),
        graph.edge_count(),
        road_ways.len()
    );
    Ok(graph)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    id:        i64,
    refs:      Vec<i64>,
    speed_kph: f64,
    direction: Direction,
}

/// Which way car traffic may use a way, relative to its node order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Along the node order only.
    Forward,
    /// Against the node order only (`oneway=-1`).
    Reverse,
    Both,
}

/// Add the directed edge(s) for one way segment `from → to` (node order).
pub(crate) fn add_segment(
    builder: &mut RoadGraphBuilder,
    from: NodeId,
    to: NodeId,
    attrs: EdgeAttrs,
    direction: Direction,
) {
    match direction {
        Direction::Forward => builder.add_edge(from, to, attrs.oneway(true)),
        Direction::Reverse => builder.add_edge(to, from, attrs.oneway(true)),
        Direction::Both => builder.add_road(from, to, attrs),
    }
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Return the assumed car speed (km/h) for a road class, or `None` if this
/// `highway` value is not drivable by car.
pub fn default_speed_kph(highway: &str) -> Option<f64> {
    match highway {
        "motorway" | "motorway_link"         => Some(105.0),
        "trunk"    | "trunk_link"            => Some(90.0),
        "primary"  | "primary_link"          => Some(65.0),
        "secondary"| "secondary_link"        => Some(55.0),
        "tertiary" | "tertiary_link"         => Some(45.0),
        "residential" | "living_street"      => Some(FALLBACK_SPEED_KPH),
        "service"  | "unclassified"          => Some(25.0),
        // Explicitly non-car:
        "footway" | "path" | "cycleway" | "bridleway"
        | "pedestrian" | "steps" | "track"   => None,
        _                                    => Some(FALLBACK_SPEED_KPH),
    }
}

/// Parse an OSM `maxspeed` value (`"50"`, `"30 mph"`, `"50;30"`) into km/h.
///
/// Lists are averaged; symbolic values (`"walk"`, `"none"`, `"DE:urban"`)
/// return `None`.
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let values: Vec<f64> = raw
        .split(';')
        .map(|part| {
            let part = part.trim();
            let (num, factor) = match part.strip_suffix("mph") {
                Some(n) => (n.trim(), 1.609_344),
                None => (part.strip_suffix("km/h").unwrap_or(part).trim(), 1.0),
            };
            num.parse::<f64>().ok().filter(|v| *v > 0.0).map(|v| v * factor)
        })
        .collect::<Option<_>>()?;
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Traffic direction of a way for cars.
///
/// An explicit `oneway` tag wins.  Without one, motorways, motorway links and
/// roundabouts are one-way along the node order.
pub fn way_direction(highway: &str, tags: &[(&str, &str)]) -> Direction {
    let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
    match tag("oneway") {
        Some("yes" | "1" | "true") => return Direction::Forward,
        Some("-1" | "reverse") => return Direction::Reverse,
        Some("no" | "0" | "false") => return Direction::Both,
        _ => {}
    }
    let implicit = matches!(highway, "motorway" | "motorway_link")
        || matches!(tag("junction"), Some("roundabout" | "circular"));
    if implicit { Direction::Forward } else { Direction::Both }
}
