//! # engine_actors
//!
//! The engine's built-in actor kinds. Each module owns one kind: its
//! parameter schema, its private state, its input handlers, and a
//! `register` function. [`register_builtin_actors`] installs the whole set;
//! games add their own kinds afterwards with type ids at or above
//! [`engine_world::FIRST_GAME_ACTOR_TYPE_ID`].

pub mod io_proxy;
pub mod logic_binary;
pub mod logic_counter;
pub mod logic_decimal;
pub mod sound_player;
pub mod sprite;
pub mod static_model;
pub mod trigger;

use engine_world::ActorRegistry;

pub(crate) const ACTOR_TYPE_IO_PROXY: u64 = 0;
pub(crate) const ACTOR_TYPE_LOGIC_BINARY: u64 = 1;
pub(crate) const ACTOR_TYPE_LOGIC_COUNTER: u64 = 2;
pub(crate) const ACTOR_TYPE_LOGIC_DECIMAL: u64 = 3;
pub(crate) const ACTOR_TYPE_SOUND_PLAYER: u64 = 4;
pub(crate) const ACTOR_TYPE_SPRITE: u64 = 5;
pub(crate) const ACTOR_TYPE_STATIC_MODEL: u64 = 6;
pub(crate) const ACTOR_TYPE_TRIGGER: u64 = 7;

/// Register every built-in actor kind. Call once at startup, before
/// sealing the registry for game registrations.
pub fn register_builtin_actors(registry: &mut ActorRegistry) {
    io_proxy::register(registry);
    logic_binary::register(registry);
    logic_counter::register(registry);
    logic_decimal::register(registry);
    sound_player::register(registry);
    sprite::register(registry);
    static_model::register(registry);
    trigger::register(registry);
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared scaffolding: a registry with the built-ins plus a "recorder"
    //! kind that captures every signal payload delivered to it.

    use engine_param::{KvList, Param};
    use engine_physics::{HeadlessPhysics, Transform};
    use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, Map, MapEnv};

    const RECORDER_TYPE_ID: u64 = 990;

    #[derive(Debug, Default)]
    pub struct RecorderState {
        pub events: Vec<Param>,
    }

    fn recorder_init(actor: &mut Actor, _p: &mut KvList, _t: &Transform, _env: &mut MapEnv) {
        actor.set_state(RecorderState::default());
    }

    fn recorder_record(actor: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
        if let Some(state) = actor.state_mut::<RecorderState>() {
            state.events.push(param.clone());
        }
    }

    /// Built-ins plus the recorder kind.
    pub fn registry() -> ActorRegistry {
        let mut registry = ActorRegistry::new();
        super::register_builtin_actors(&mut registry);
        registry.register(
            "recorder",
            ActorDefinition::new(RECORDER_TYPE_ID)
                .with_init(recorder_init)
                .with_input("record", recorder_record),
        );
        registry.seal_builtins();
        registry
    }

    /// An empty map over headless physics.
    pub fn map() -> Map {
        Map::new(Box::new(HeadlessPhysics::new()))
    }

    /// Spawn a recorder and register it under `name`.
    pub fn spawn_recorder(map: &mut Map, registry: &ActorRegistry, name: &str) -> ActorId {
        let id = map.spawn(registry, "recorder", Transform::IDENTITY, KvList::new());
        map.name_actor(id, name);
        id
    }

    /// Everything a recorder has received so far.
    pub fn recorded(map: &Map, id: ActorId) -> Vec<Param> {
        map.actor(id)
            .and_then(|a| a.state::<RecorderState>())
            .map(|s| s.events.clone())
            .unwrap_or_default()
    }
}
