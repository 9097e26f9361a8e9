//! The weight-function contract.
//!
//! A weight prices the edge about to be traversed, optionally looking at the
//! edge traversed immediately before it (`None` for the first edge of a
//! path).  That one extra argument is enough to express turn penalties and
//! junction costs, which a per-edge scalar cannot.
//!
//! # Contract
//!
//! - Deterministic for a fixed `(previous, edge)` pair, with no side effects.
//! - Should return finite, non-negative values.  This is **not** checked:
//!   with negative costs the search still terminates but the path it returns
//!   is not guaranteed to be optimal, and `NaN` costs make an edge
//!   unreachable.
//!
//! Any `Fn(Option<&Edge>, &Edge) -> f64 + Send + Sync` closure is a weight:
//!
//! ```
//! use rt_graph::Edge;
//! use rt_routing::Weight;
//!
//! let hops = |_prev: Option<&Edge>, _edge: &Edge| 1.0;
//! fn takes(_: &dyn Weight) {}
//! takes(&hops);
//! ```

use rt_core::geo::heading_change;
use rt_graph::Edge;

/// A pairwise edge cost.
///
/// `Send + Sync` so one weight can price many concurrent searches.
pub trait Weight: Send + Sync {
    /// Cost of traversing `edge`, having arrived over `previous`.
    fn cost(&self, previous: Option<&Edge>, edge: &Edge) -> f64;
}

impl<F> Weight for F
where
    F: Fn(Option<&Edge>, &Edge) -> f64 + Send + Sync,
{
    #[inline]
    fn cost(&self, previous: Option<&Edge>, edge: &Edge) -> f64 {
        self(previous, edge)
    }
}

// ── Reference weights ─────────────────────────────────────────────────────────

/// Physical length in metres.  Ignores the previous edge.
#[derive(Copy, Clone, Debug, Default)]
pub struct Length;

impl Weight for Length {
    #[inline]
    fn cost(&self, _previous: Option<&Edge>, edge: &Edge) -> f64 {
        edge.length
    }
}

/// Travel time in seconds.  Ignores the previous edge.
#[derive(Copy, Clone, Debug, Default)]
pub struct TravelTime;

impl Weight for TravelTime {
    #[inline]
    fn cost(&self, _previous: Option<&Edge>, edge: &Edge) -> f64 {
        edge.travel_time
    }
}

/// Travel time plus a fixed delay for changing direction at a junction.
///
/// The heading change between the previous and current edge picks the
/// penalty:
///
/// | Change (°)   | Penalty           |
/// |--------------|-------------------|
/// | ≤ 30         | none              |
/// | 30 – 120     | `turn_secs`       |
/// | 120 – 160    | `sharp_turn_secs` |
/// | > 160        | `u_turn_secs`     |
#[derive(Copy, Clone, Debug)]
pub struct TurnPenalty {
    pub turn_secs:       f64,
    pub sharp_turn_secs: f64,
    pub u_turn_secs:     f64,
}

impl TurnPenalty {
    pub fn penalty(&self, previous: &Edge, edge: &Edge) -> f64 {
        let change = heading_change(previous.bearing(), edge.bearing());
        if change <= 30.0 {
            0.0
        } else if change <= 120.0 {
            self.turn_secs
        } else if change <= 160.0 {
            self.sharp_turn_secs
        } else {
            self.u_turn_secs
        }
    }
}

impl Default for TurnPenalty {
    fn default() -> Self {
        Self { turn_secs: 5.0, sharp_turn_secs: 10.0, u_turn_secs: 30.0 }
    }
}

impl Weight for TurnPenalty {
    fn cost(&self, previous: Option<&Edge>, edge: &Edge) -> f64 {
        edge.travel_time + previous.map_or(0.0, |prev| self.penalty(prev, edge))
    }
}
