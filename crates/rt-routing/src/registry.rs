//! Name → weight lookup for request layers.
//!
//! The registry is an ordinary value: build it once at startup, register
//! application-specific weights, then share it read-only.  The search and
//! aggregation code never sees names, only the resolved [`Weight`].
//!
//! ```
//! use rt_routing::{TurnPenalty, WeightRegistry};
//!
//! let mut registry = WeightRegistry::with_defaults();
//! registry.register("turn_penalty", TurnPenalty::default()).unwrap();
//! assert_eq!(registry.names(), ["travel_time", "length", "turn_penalty"]);
//! assert!(registry.get("LENGTH").is_ok());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::weight::{Length, TravelTime, Weight};
use crate::{RoutingError, RoutingResult};

/// Insertion-ordered map from lower-case name to weight.
#[derive(Clone, Default)]
pub struct WeightRegistry {
    entries: Vec<(String, Arc<dyn Weight>)>,
}

impl WeightRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `travel_time` and `length`, in that order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.entries.push(("travel_time".to_string(), Arc::new(TravelTime)));
        registry.entries.push(("length".to_string(), Arc::new(Length)));
        registry
    }

    /// Register `weight` under `name` (case-insensitive).
    ///
    /// Fails with [`RoutingError::DuplicateWeight`] if the name is taken.
    pub fn register<W: Weight + 'static>(&mut self, name: &str, weight: W) -> RoutingResult<()> {
        self.register_shared(name, Arc::new(weight))
    }

    /// Like [`register`](Self::register) for an already shared weight.
    pub fn register_shared(&mut self, name: &str, weight: Arc<dyn Weight>) -> RoutingResult<()> {
        let key = normalize(name);
        if self.position(&key).is_some() {
            return Err(RoutingError::DuplicateWeight(key));
        }
        log::debug!("registered weight function {key:?}");
        self.entries.push((key, weight));
        Ok(())
    }

    /// Remove `name`.  Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Weight>> {
        let idx = self.position(&normalize(name))?;
        Some(self.entries.remove(idx).1)
    }

    /// Resolve `name` (case-insensitive).
    ///
    /// Fails with [`RoutingError::UnknownWeight`], listing the registered
    /// names.
    pub fn get(&self, name: &str) -> RoutingResult<Arc<dyn Weight>> {
        let key = normalize(name);
        match self.position(&key) {
            Some(idx) => Ok(Arc::clone(&self.entries[idx].1)),
            None => Err(RoutingError::UnknownWeight {
                name:      key,
                available: self.names().into_iter().map(String::from).collect(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(&normalize(name)).is_some()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == key)
    }
}

impl fmt::Debug for WeightRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
