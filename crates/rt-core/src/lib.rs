//! `rt-core` — foundational types for the `routor` routing engine.
//!
//! This crate is a dependency of every other `rt-*` crate.  It intentionally
//! has no `rt-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId` (stable), `NodeIdx`, `EdgeId` (dense)        |
//! | [`geo`]         | `Location`, haversine distance, bearings              |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Location;
pub use ids::{EdgeId, NodeId, NodeIdx};
