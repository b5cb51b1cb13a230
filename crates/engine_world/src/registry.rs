//! The actor-type registry.
//!
//! A process builds exactly one registry at startup: engine built-ins
//! first, then a game-supplied registration pass. After that the registry
//! is read-only and shared freely — lookups need no locking.
//!
//! Registration failures are programmer/content-build errors and panic by
//! design: a binary that registers two kinds under one name, or level data
//! naming a kind that was never registered, cannot be safely continued.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::definition::{ActorDefinition, FIRST_GAME_ACTOR_TYPE_ID};

/// Hard cap on registered actor kinds.
pub const MAX_ACTOR_DEFINITIONS: usize = 1024;

/// Registrations at or past this count log a warning before the hard cap
/// aborts.
const CAPACITY_WARN_THRESHOLD: usize = MAX_ACTOR_DEFINITIONS - MAX_ACTOR_DEFINITIONS / 8;

/// Append-only map from actor-type name to its definition.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    definitions: HashMap<String, Arc<ActorDefinition>>,
    builtins_sealed: bool,
}

impl ActorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor kind under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered, if the registry is at
    /// capacity, or if a game-phase registration (after
    /// [`ActorRegistry::seal_builtins`]) uses a type id below
    /// [`FIRST_GAME_ACTOR_TYPE_ID`].
    pub fn register(&mut self, name: &str, definition: ActorDefinition) {
        assert!(
            !self.definitions.contains_key(name),
            "actor type \"{name}\" already registered"
        );
        assert!(
            self.definitions.len() < MAX_ACTOR_DEFINITIONS,
            "actor definition capacity ({MAX_ACTOR_DEFINITIONS}) exceeded registering \"{name}\""
        );
        if self.builtins_sealed {
            assert!(
                definition.type_id() >= FIRST_GAME_ACTOR_TYPE_ID,
                "game actor type \"{name}\" must use a type id >= {FIRST_GAME_ACTOR_TYPE_ID}, got {}",
                definition.type_id()
            );
        }
        if self.definitions.len() + 1 >= CAPACITY_WARN_THRESHOLD {
            warn!(
                registered = self.definitions.len() + 1,
                max = MAX_ACTOR_DEFINITIONS,
                "actor definition registry approaching capacity"
            );
        }
        debug!(name, type_id = definition.type_id(), "registered actor type");
        self.definitions
            .insert(name.to_string(), Arc::new(definition));
    }

    /// Mark the end of built-in registration. Later registrations must use
    /// game-range type ids.
    pub fn seal_builtins(&mut self) {
        self.builtins_sealed = true;
    }

    /// Returns `true` once built-in registration has ended.
    #[must_use]
    pub fn builtins_sealed(&self) -> bool {
        self.builtins_sealed
    }

    /// Look up the definition for an actor type.
    ///
    /// # Panics
    ///
    /// Panics on an unknown type name. There is no recoverable path here:
    /// level data referencing an unregistered kind is a fatal
    /// data-integrity failure.
    #[must_use]
    pub fn definition(&self, name: &str) -> Arc<ActorDefinition> {
        match self.definitions.get(name) {
            Some(definition) => Arc::clone(definition),
            None => panic!("unknown actor type \"{name}\""),
        }
    }

    /// Non-fatal lookup, for tooling that can handle absence.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ActorDefinition>> {
        self.definitions.get(name)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate registered type names.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ActorRegistry::new();
        registry.register("door", ActorDefinition::new(1));
        assert!(registry.contains("door"));
        assert_eq!(registry.definition("door").type_id(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = ActorRegistry::new();
        registry.register("door", ActorDefinition::new(1));
        registry.register("door", ActorDefinition::new(2));
    }

    #[test]
    #[should_panic(expected = "unknown actor type")]
    fn test_unknown_type_panics() {
        let registry = ActorRegistry::new();
        let _ = registry.definition("never_registered");
    }

    #[test]
    fn test_get_is_non_fatal() {
        let registry = ActorRegistry::new();
        assert!(registry.get("never_registered").is_none());
    }

    #[test]
    fn test_game_registration_above_offset_allowed() {
        let mut registry = ActorRegistry::new();
        registry.register("trigger", ActorDefinition::new(1));
        registry.seal_builtins();
        registry.register("game_door", ActorDefinition::new(FIRST_GAME_ACTOR_TYPE_ID));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    #[should_panic(expected = "must use a type id")]
    fn test_game_registration_below_offset_panics() {
        let mut registry = ActorRegistry::new();
        registry.seal_builtins();
        registry.register("game_door", ActorDefinition::new(5));
    }
}
