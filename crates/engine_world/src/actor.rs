//! The live world entity.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use engine_assets::ModelDefinition;
use engine_param::{Color, Param};
use engine_physics::BodyId;
use slotmap::{Key, KeyData};

use crate::definition::ActorDefinition;
use crate::wall::ActorWall;

/// The universal input every definition starts with.
pub const ACTOR_INPUT_KILL: &str = "kill";

/// Fired after an actor finishes construction.
pub const ACTOR_OUTPUT_SPAWNED: &str = "spawned";

/// Fired as an actor is removed, before its destroy hook runs.
pub const ACTOR_OUTPUT_KILLED: &str = "killed";

slotmap::new_key_type! {
    /// Stable generational handle to a live actor.
    ///
    /// Handles are never reused for a different actor; a stale handle
    /// simply stops resolving.
    pub struct ActorId;
}

impl ActorId {
    /// Encode this handle as physics-body user data. Valid handles never
    /// encode to zero, so zero marks an unowned body.
    #[must_use]
    pub fn to_user_data(self) -> u64 {
        self.data().as_ffi()
    }

    /// Decode a handle from physics-body user data.
    #[must_use]
    pub fn from_user_data(data: u64) -> Self {
        KeyData::from_ffi(data).into()
    }
}

/// Capability flags describing how other systems may interact with an
/// actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorFlags(u32);

impl ActorFlags {
    pub const NONE: Self = Self(0);
    pub const CAN_PUSH_PLAYER: Self = Self(1 << 0);
    pub const ENEMY: Self = Self(1 << 1);
    pub const CAN_BLOCK_LASERS: Self = Self(1 << 2);
    pub const CAN_BE_HELD: Self = Self(1 << 3);
    pub const USES_BOUNDING_BOX_COLLISION: Self = Self(1 << 4);

    /// Returns `true` if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for ActorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One outbound I/O wire, authored at map time.
///
/// The target is a *name*, resolved against the map at fire time — never a
/// cached handle. The target may not exist yet when the connection is
/// parsed, or may have been removed by the time the output fires; both are
/// normal.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorConnection {
    /// Output name on the owning actor.
    pub source_output: String,
    /// Name of the target actor, resolved at fire time.
    pub target_name: String,
    /// Input name to invoke on the target.
    pub target_input: String,
    /// Replaces the signal's default payload unless `Param::None`.
    pub param_override: Param,
    /// Cap on repeated deliveries along this connection within one
    /// propagation chain.
    pub num_refires: u64,
}

impl ActorConnection {
    /// Create a connection with no override and no refires.
    #[must_use]
    pub fn new(
        source_output: impl Into<String>,
        target_name: impl Into<String>,
        target_input: impl Into<String>,
    ) -> Self {
        Self {
            source_output: source_output.into(),
            target_name: target_name.into(),
            target_input: target_input.into(),
            param_override: Param::None,
            num_refires: 0,
        }
    }

    /// Set the payload override.
    #[must_use]
    pub fn with_override(mut self, param: Param) -> Self {
        self.param_override = param;
        self
    }

    /// Set the refire cap.
    #[must_use]
    pub fn with_refires(mut self, num_refires: u64) -> Self {
        self.num_refires = num_refires;
        self
    }
}

/// Per-kind private actor state.
///
/// Each actor kind owns an arbitrary state struct, stored type-erased on
/// the actor and recovered with checked downcasts — only that kind's own
/// handlers know the concrete type.
pub trait ActorState: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send> ActorState for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A live world entity.
///
/// Owned exclusively by the [`Map`](crate::Map). The definition reference
/// is fixed at construction — it is the actor's dispatch table. The physics
/// body, if any, is owned by the actor and removed with it.
pub struct Actor {
    id: ActorId,
    /// Capability flags.
    pub flags: ActorFlags,
    /// Physics body, or [`BodyId::INVALID`] for bodiless actors.
    pub body: BodyId,
    /// Optional 3D model. Rendered instead of the wall when present.
    pub model: Option<Arc<ModelDefinition>>,
    /// Active skin index on the model.
    pub current_skin: u32,
    /// Current LOD index, recomputed by the LOD pass.
    pub current_lod: u32,
    /// Model tint.
    pub mod_color: Color,
    /// Optional 2D billboard wall.
    pub wall: Option<ActorWall>,
    definition: Arc<ActorDefinition>,
    /// Outbound I/O wires.
    pub connections: Vec<ActorConnection>,
    /// Health. Semantics belong to game actor kinds; the engine only
    /// stores it.
    pub health: i32,
    state: Option<Box<dyn ActorState>>,
}

impl Actor {
    pub(crate) fn new(id: ActorId, definition: Arc<ActorDefinition>) -> Self {
        Self {
            id,
            flags: ActorFlags::NONE,
            body: BodyId::INVALID,
            model: None,
            current_skin: 0,
            current_lod: 0,
            mod_color: Color::WHITE,
            wall: None,
            definition,
            connections: Vec::new(),
            health: 1,
            state: None,
        }
    }

    /// This actor's handle.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The actor's definition — its immutable dispatch table.
    #[must_use]
    pub fn definition(&self) -> &ActorDefinition {
        &self.definition
    }

    /// Install the kind-private state block.
    pub fn set_state<S: ActorState>(&mut self, state: S) {
        self.state = Some(Box::new(state));
    }

    /// Borrow the kind-private state, if it is an `S`.
    #[must_use]
    pub fn state<S: ActorState>(&self) -> Option<&S> {
        self.state.as_deref()?.as_any().downcast_ref::<S>()
    }

    /// Mutably borrow the kind-private state, if it is an `S`.
    #[must_use]
    pub fn state_mut<S: ActorState>(&mut self) -> Option<&mut S> {
        self.state.as_deref_mut()?.as_any_mut().downcast_mut::<S>()
    }

    /// Returns `true` if a state block is installed.
    #[must_use]
    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    /// Connections whose source output matches `output`, with their
    /// positions in the connection list.
    pub fn matching_connections<'a>(
        &'a self,
        output: &'a str,
    ) -> impl Iterator<Item = (usize, &'a ActorConnection)> {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.source_output == output)
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("type", &self.definition.type_id())
            .field("flags", &self.flags)
            .field("body", &self.body)
            .field("connections", &self.connections.len())
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}
