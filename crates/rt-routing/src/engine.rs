//! Routing facade: GPS pair in, [`Route`] out.
//!
//! # Lifecycle
//!
//! One map load = one [`RoadGraph`] = one `Engine`.  The engine never mutates
//! the graph, and both are `Send + Sync`, so a single engine can serve any
//! number of concurrent requests.  Wrap it in an `Arc` (or share the graph via
//! [`Engine::from_shared`]) to hand it to worker threads.
//!
//! # Example
//!
//! ```rust,ignore
//! let engine = Engine::new(rt_graph::load_csv_dir(Path::new("bristol"))?);
//! let weights = WeightRegistry::with_defaults();
//! let route = engine.route(origin, destination, &*weights.get("length")?)?;
//! println!("{:.2} m in {:.2} s", route.length, route.travel_time);
//! ```

use std::sync::Arc;

use rt_core::Location;
use rt_graph::{Node, RoadGraph};

use crate::aggregate;
use crate::search::{astar, SearchOptions};
use crate::weight::{TravelTime, Weight};
use crate::RoutingResult;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Total cost under the weight that drove the search.
    pub costs:       f64,
    /// Total length in metres.
    pub length:      f64,
    /// Total travel time in seconds.
    pub travel_time: f64,
    /// Node positions from origin to destination inclusive.
    pub path:        Vec<Location>,
}

impl Route {
    /// Copy of `self` with `costs`, `length` and `travel_time` rounded to
    /// `decimals` places.  Path coordinates are left untouched.
    pub fn rounded(&self, decimals: i32) -> Route {
        let factor = 10f64.powi(decimals);
        let round = |v: f64| (v * factor).round() / factor;
        Route {
            costs:       round(self.costs),
            length:      round(self.length),
            travel_time: round(self.travel_time),
            path:        self.path.clone(),
        }
    }

    /// `true` if origin and destination resolved to the same node.
    pub fn is_trivial(&self) -> bool {
        self.path.len() <= 1
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Owns a road graph and answers routing queries against it.
pub struct Engine {
    graph:       Arc<RoadGraph>,
    travel_time: Arc<dyn Weight>,
    options:     SearchOptions,
}

impl Engine {
    /// Take ownership of `graph`.
    pub fn new(graph: RoadGraph) -> Self {
        Self::from_shared(Arc::new(graph))
    }

    /// Share an already published graph.
    pub fn from_shared(graph: Arc<RoadGraph>) -> Self {
        Self {
            graph,
            travel_time: Arc::new(TravelTime),
            options: SearchOptions::default(),
        }
    }

    /// Replace the weight used to report `Route::travel_time`.
    ///
    /// Defaults to [`TravelTime`].
    pub fn with_travel_time_weight(mut self, weight: Arc<dyn Weight>) -> Self {
        self.travel_time = weight;
        self
    }

    /// Replace the search options (heuristic, expansion budget).
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<RoadGraph> {
        Arc::clone(&self.graph)
    }

    pub fn search_options(&self) -> &SearchOptions {
        &self.options
    }

    // ── Building blocks ───────────────────────────────────────────────────

    /// The graph node closest to `location`.
    pub fn closest_node(&self, location: Location) -> RoutingResult<Node> {
        Ok(self.graph.nearest_node(location)?)
    }

    /// Minimum-cost node sequence from `origin` to `destination` under `weight`.
    pub fn find_path(
        &self,
        origin: &Node,
        destination: &Node,
        weight: &dyn Weight,
    ) -> RoutingResult<Vec<Node>> {
        astar(&self.graph, origin.id, destination.id, weight, &self.options).map(|p| p.nodes)
    }

    /// Total `weight` along `path`.
    pub fn costs_for_path(&self, path: &[Node], weight: &dyn Weight) -> RoutingResult<f64> {
        aggregate::costs_for_path(&self.graph, path, weight)
    }

    /// Length of `path` in metres.
    pub fn length_of_path(&self, path: &[Node]) -> RoutingResult<f64> {
        aggregate::length_of_path(&self.graph, path)
    }

    /// Travel time of `path` under the engine's travel-time weight.
    pub fn travel_time_of_path(&self, path: &[Node]) -> RoutingResult<f64> {
        aggregate::travel_time_of_path(&self.graph, path, &*self.travel_time)
    }

    // ── Facade ────────────────────────────────────────────────────────────

    /// Route between two GPS positions.
    ///
    /// Snaps both positions to their nearest nodes, searches under `weight`,
    /// then prices the path three ways: `weight` for `costs`,
    /// [`Length`](crate::Length) for `length`, and the engine's travel-time
    /// weight for `travel_time`.  Any error aborts the whole request.
    pub fn route(
        &self,
        origin: Location,
        destination: Location,
        weight: &dyn Weight,
    ) -> RoutingResult<Route> {
        let origin_node = self.closest_node(origin)?;
        let destination_node = self.closest_node(destination)?;
        log::debug!(
            "route {origin} -> {destination} snapped to {} -> {}",
            origin_node.id,
            destination_node.id
        );

        let found = astar(
            &self.graph,
            origin_node.id,
            destination_node.id,
            weight,
            &self.options,
        )?;

        let costs = self.costs_for_path(&found.nodes, weight)?;
        let length = self.length_of_path(&found.nodes)?;
        let travel_time = self.travel_time_of_path(&found.nodes)?;

        Ok(Route {
            costs,
            length,
            travel_time,
            path: found.nodes.iter().map(|n| n.location).collect(),
        })
    }

    /// Route many `(origin, destination)` pairs under one weight.
    ///
    /// Results are in input order.  With the `parallel` feature the pairs are
    /// spread over the Rayon pool.
    pub fn route_many(
        &self,
        pairs: &[(Location, Location)],
        weight: &dyn Weight,
    ) -> Vec<RoutingResult<Route>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pairs
                .par_iter()
                .map(|&(origin, destination)| self.route(origin, destination, weight))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .iter()
                .map(|&(origin, destination)| self.route(origin, destination, weight))
                .collect()
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("graph", &self.graph)
            .field("options", &self.options)
            .finish()
    }
}
