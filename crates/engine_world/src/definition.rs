//! Actor kind definitions.
//!
//! An [`ActorDefinition`] is the immutable "class" of an actor kind: its
//! lifecycle hooks and its table of named input handlers. Definitions are
//! built once at startup and shared by every actor of that kind; plain `fn`
//! pointers keep every hook signature checked at compile time.

use std::collections::HashMap;

use engine_param::{KvList, Param};
use engine_physics::{BodyId, Transform};

use crate::actor::{Actor, ActorId, ACTOR_INPUT_KILL};
use crate::map::MapEnv;

/// First type id available to game-supplied actor kinds. Engine built-ins
/// use small sequential ids below this; the gap prevents collisions when
/// the two sets evolve independently.
pub const FIRST_GAME_ACTOR_TYPE_ID: u64 = 1 << 16;

/// Constructs the actor: params, spawn transform, world services. Creates
/// the physics body (if any) and installs kind state.
pub type ActorInitFn = fn(&mut Actor, &mut KvList, &Transform, &mut MapEnv);

/// Called every physics tick with the tick delta.
pub type ActorUpdateFn = fn(&mut Actor, f64, &mut MapEnv);

/// Called exactly once as the actor is destroyed.
pub type ActorDestroyFn = fn(&mut Actor, &mut MapEnv);

/// Player-contact callback; receives the contacting body.
pub type ActorContactFn = fn(&mut Actor, BodyId, &mut MapEnv);

/// Per-frame UI hook, render-thread side.
pub type ActorRenderUiFn = fn(&Actor);

/// Named input handler; receives the sending actor's handle and the signal
/// payload.
pub type ActorInputFn = fn(&mut Actor, ActorId, &Param, &mut MapEnv);

/// Default no-op update.
pub fn default_update(_actor: &mut Actor, _delta: f64, _env: &mut MapEnv) {}

/// Default no-op init.
pub fn default_init(_actor: &mut Actor, _params: &mut KvList, _transform: &Transform, _env: &mut MapEnv) {
}

/// Default no-op destroy.
pub fn default_destroy(_actor: &mut Actor, _env: &mut MapEnv) {}

/// Default no-op contact callback.
pub fn default_contact(_actor: &mut Actor, _body: BodyId, _env: &mut MapEnv) {}

/// Default no-op UI render.
pub fn default_render_ui(_actor: &Actor) {}

/// The universal `kill` input: removes the actor.
pub fn actor_signal_kill(actor: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    env.kill(actor.id());
}

/// The immutable dispatch table for one actor kind.
///
/// Built with the `with_*` methods before registration; never mutated
/// afterwards. Every lifecycle hook has a no-op default, so a minimal kind
/// only supplies what it needs. The input table starts with the universal
/// `kill` input.
#[derive(Debug, Clone)]
pub struct ActorDefinition {
    type_id: u64,
    pub init: ActorInitFn,
    pub update: ActorUpdateFn,
    pub destroy: ActorDestroyFn,
    pub on_player_contact_added: ActorContactFn,
    pub on_player_contact_persisted: ActorContactFn,
    pub on_player_contact_removed: ActorContactFn,
    pub render_ui: ActorRenderUiFn,
    inputs: HashMap<String, ActorInputFn>,
}

impl ActorDefinition {
    /// Create a definition with every hook defaulted and the universal
    /// `kill` input installed.
    #[must_use]
    pub fn new(type_id: u64) -> Self {
        let mut inputs: HashMap<String, ActorInputFn> = HashMap::new();
        inputs.insert(ACTOR_INPUT_KILL.to_string(), actor_signal_kill);
        Self {
            type_id,
            init: default_init,
            update: default_update,
            destroy: default_destroy,
            on_player_contact_added: default_contact,
            on_player_contact_persisted: default_contact,
            on_player_contact_removed: default_contact,
            render_ui: default_render_ui,
            inputs,
        }
    }

    /// The stable type id.
    #[must_use]
    pub fn type_id(&self) -> u64 {
        self.type_id
    }

    /// Set the init hook.
    #[must_use]
    pub fn with_init(mut self, init: ActorInitFn) -> Self {
        self.init = init;
        self
    }

    /// Set the update hook.
    #[must_use]
    pub fn with_update(mut self, update: ActorUpdateFn) -> Self {
        self.update = update;
        self
    }

    /// Set the destroy hook.
    #[must_use]
    pub fn with_destroy(mut self, destroy: ActorDestroyFn) -> Self {
        self.destroy = destroy;
        self
    }

    /// Set the contact-added hook.
    #[must_use]
    pub fn with_contact_added(mut self, hook: ActorContactFn) -> Self {
        self.on_player_contact_added = hook;
        self
    }

    /// Set the contact-persisted hook.
    #[must_use]
    pub fn with_contact_persisted(mut self, hook: ActorContactFn) -> Self {
        self.on_player_contact_persisted = hook;
        self
    }

    /// Set the contact-removed hook.
    #[must_use]
    pub fn with_contact_removed(mut self, hook: ActorContactFn) -> Self {
        self.on_player_contact_removed = hook;
        self
    }

    /// Set the UI render hook.
    #[must_use]
    pub fn with_render_ui(mut self, hook: ActorRenderUiFn) -> Self {
        self.render_ui = hook;
        self
    }

    /// Register a named input handler.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered — duplicate inputs are a
    /// programmer error.
    #[must_use]
    pub fn with_input(mut self, name: &str, handler: ActorInputFn) -> Self {
        assert!(
            !self.inputs.contains_key(name),
            "input \"{name}\" already registered on actor type {}",
            self.type_id
        );
        self.inputs.insert(name.to_string(), handler);
        self
    }

    /// Remove a named input handler. Used by kinds that opt out of a
    /// default input (the I/O proxy drops `kill`).
    #[must_use]
    pub fn without_input(mut self, name: &str) -> Self {
        self.inputs.remove(name);
        self
    }

    /// Look up an input handler. `None` is not an error — firing a wire at
    /// a nonexistent input is tolerated and skipped by the signal engine.
    #[must_use]
    pub fn input_handler(&self, name: &str) -> Option<ActorInputFn> {
        self.inputs.get(name).copied()
    }

    /// Iterate registered input names.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_definition_has_kill_input() {
        let definition = ActorDefinition::new(7);
        assert_eq!(definition.type_id(), 7);
        assert!(definition.input_handler(ACTOR_INPUT_KILL).is_some());
    }

    #[test]
    fn test_unknown_input_is_none() {
        let definition = ActorDefinition::new(1);
        assert!(definition.input_handler("does_not_exist").is_none());
    }

    #[test]
    fn test_with_input_registers_handler() {
        fn open_handler(_: &mut Actor, _: ActorId, _: &Param, _: &mut MapEnv) {}

        let definition = ActorDefinition::new(1).with_input("open", open_handler);
        assert!(definition.input_handler("open").is_some());
        let mut names: Vec<&str> = definition.input_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["kill", "open"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_input_panics() {
        fn handler(_: &mut Actor, _: ActorId, _: &Param, _: &mut MapEnv) {}

        let _ = ActorDefinition::new(1)
            .with_input("open", handler)
            .with_input("open", handler);
    }

    #[test]
    fn test_without_input_removes_handler() {
        let definition = ActorDefinition::new(1).without_input(ACTOR_INPUT_KILL);
        assert!(definition.input_handler(ACTOR_INPUT_KILL).is_none());
    }
}
