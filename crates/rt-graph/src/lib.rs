//! `rt-graph` — road graph, spatial indexing, and graph loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `RoadGraph` (CSR multigraph), `RoadGraphBuilder`, `Node`, `Edge` |
//! | [`index`]   | `NodeIndex` (R-tree over unit-sphere points)                |
//! | [`loader`]  | `load_csv_dir`, `load_csv_readers`                          |
//! | [`osm`]     | `load_from_pbf` (feature = `"osm"` only)                   |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod index;
pub mod loader;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeAttrs, Node, RoadGraph, RoadGraphBuilder};
pub use index::NodeIndex;
pub use loader::{load_csv, load_csv_dir, load_csv_readers};
