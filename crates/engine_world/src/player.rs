//! The player.

use engine_physics::{
    BodyCreationSettings, BodyId, BodyInterface, MotionType, ObjectLayer, Shape, Transform,
};

use crate::actor::ActorId;

const PLAYER_CAPSULE_HALF_HEIGHT: f32 = 0.9;
const PLAYER_CAPSULE_RADIUS: f32 = 0.35;

/// What the player's reticle is currently engaged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerFocus {
    #[default]
    None,
    /// Looking at an actor that could be interacted with.
    Targeted(ActorId),
    /// Carrying an actor (one with `CAN_BE_HELD`).
    Holding(ActorId),
}

/// Player state owned by the map and mutated only under the tick lock.
#[derive(Debug)]
pub struct Player {
    /// Current transform, synced from the character body each tick.
    pub transform: Transform,
    /// The character body.
    pub body: BodyId,
    pub focus: PlayerFocus,
    pub can_drop_held: bool,
    pub noclip: bool,
}

impl Player {
    /// Create the player and its character body at the origin.
    pub(crate) fn new(physics: &mut dyn BodyInterface) -> Self {
        let body = physics.create_body(&BodyCreationSettings::new(
            Shape::Capsule {
                half_height: PLAYER_CAPSULE_HALF_HEIGHT,
                radius: PLAYER_CAPSULE_RADIUS,
            },
            Transform::IDENTITY,
            MotionType::Dynamic,
            ObjectLayer::Dynamic,
        ));
        Self {
            transform: Transform::IDENTITY,
            body,
            focus: PlayerFocus::None,
            can_drop_held: true,
            noclip: false,
        }
    }

    /// The held actor, if any.
    #[must_use]
    pub fn held_actor(&self) -> Option<ActorId> {
        match self.focus {
            PlayerFocus::Holding(id) => Some(id),
            _ => None,
        }
    }

    /// The targeted actor, if any.
    #[must_use]
    pub fn targeted_actor(&self) -> Option<ActorId> {
        match self.focus {
            PlayerFocus::Targeted(id) => Some(id),
            _ => None,
        }
    }
}
