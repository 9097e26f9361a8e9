//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two families live here:
//!
//! - [`NodeId`] is the **stable** identifier a graph provider assigns to a
//!   node (typically the OSM node id).  It is sparse and only meaningful as a
//!   lookup key.
//! - [`NodeIdx`] and [`EdgeId`] are **dense** indices into the graph's
//!   struct-of-arrays storage.  They are assigned by the graph builder and are
//!   only valid for the graph that produced them.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

/// Add `Vec`-indexing helpers to a dense `u32` ID.
macro_rules! dense_id {
    ($name:ident) => {
        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Stable node identifier, unique within one graph.
    pub struct NodeId(u64);
}

typed_id! {
    /// Dense position of a node in graph storage.
    pub struct NodeIdx(u32);
}

typed_id! {
    /// Dense position of a directed edge in graph storage.
    pub struct EdgeId(u32);
}

dense_id!(NodeIdx);
dense_id!(EdgeId);

impl From<u64> for NodeId {
    #[inline]
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}
