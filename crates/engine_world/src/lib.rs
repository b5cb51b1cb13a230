//! # engine_world
//!
//! The actor/signal core: live world entities, the actor-type definition
//! registry, the declarative I/O wiring between actors, and the map
//! container that owns them all.
//!
//! This crate provides:
//!
//! - [`Actor`] — a tickable world entity with an optional physics body,
//!   optional renderable state, and per-kind private state.
//! - [`ActorDefinition`] / [`ActorRegistry`] — the immutable per-kind
//!   dispatch tables, registered once at startup.
//! - Signal propagation — firing a named output resolves level-authored
//!   connections by target name and invokes input handlers, best-effort.
//! - [`Map`] — owns the live actors, the physics backend, the player, and
//!   the per-tick update traversal.
//! - [`map_loader`] — decodes authored actor records into a live map.

pub mod actor;
pub mod audio;
pub mod definition;
pub mod map;
pub mod map_loader;
pub mod player;
pub mod registry;
mod signal;
pub mod wall;

pub use actor::{
    Actor, ActorConnection, ActorFlags, ActorId, ActorState, ACTOR_INPUT_KILL,
    ACTOR_OUTPUT_KILLED, ACTOR_OUTPUT_SPAWNED,
};
pub use audio::{AudioOutput, NullAudio};
pub use definition::{
    ActorContactFn, ActorDefinition, ActorDestroyFn, ActorInitFn, ActorInputFn, ActorRenderUiFn,
    ActorUpdateFn, FIRST_GAME_ACTOR_TYPE_ID,
};
pub use map::{Map, MapEnv, RenderView};
pub use map_loader::{load_map, load_map_into, MapLoadError};
pub use player::{Player, PlayerFocus};
pub use registry::{ActorRegistry, MAX_ACTOR_DEFINITIONS};
pub use wall::ActorWall;
