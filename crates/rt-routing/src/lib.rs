//! `rt-routing` — shortest paths under pairwise cost functions.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`weight`]    | `Weight` trait, `Length`, `TravelTime`, `TurnPenalty`     |
//! | [`registry`]  | `WeightRegistry` (name → weight, built at startup)        |
//! | [`search`]    | `astar`, `SearchOptions`, `Heuristic`, `FoundPath`        |
//! | [`aggregate`] | `costs_for_path`, `length_of_path`, `travel_time_of_path` |
//! | [`engine`]    | `Engine` facade, `Route`                                  |
//! | [`error`]     | `RoutingError`, `ErrorKind`, `RoutingResult<T>`           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `Engine::route_many` runs on the Rayon pool.              |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Route`.             |

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod registry;
pub mod search;
pub mod weight;


pub use aggregate::{costs_for_path, length_of_path, travel_time_of_path};
pub use engine::{Engine, Route};
pub use error::{ErrorKind, RoutingError, RoutingResult};
pub use registry::WeightRegistry;
pub use search::{astar, FoundPath, Heuristic, SearchOptions};
pub use weight::{Length, TravelTime, TurnPenalty, Weight};
