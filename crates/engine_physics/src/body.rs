//! Body identifiers, shapes, layers, and creation settings.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Handle to a physics body.
///
/// Actors without collision hold [`BodyId::INVALID`] — a valid state for
/// purely logical actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The "no body" sentinel.
    pub const INVALID: Self = Self(u32::MAX);

    /// Returns `true` unless this is the invalid sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Broad-phase collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectLayer {
    /// Immovable level geometry and props.
    Static,
    /// Moving bodies that collide with everything.
    Dynamic,
    /// Non-solid overlap volumes that report contacts only.
    Sensor,
}

/// How a body moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionType {
    Static,
    Kinematic,
    Dynamic,
}

/// Collision shape. The backend interprets these; the headless backend
/// treats every shape as its axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A positional marker with no collision extent.
    Empty,
    /// An axis-aligned box.
    Box { half_extents: Vec3 },
    /// A sphere.
    Sphere { radius: f32 },
    /// A vertical capsule.
    Capsule { half_height: f32, radius: f32 },
}

impl Shape {
    /// Half extents of the shape's axis-aligned bounding box.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Empty => Vec3::ZERO,
            Self::Box { half_extents } => half_extents,
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Capsule {
                half_height,
                radius,
            } => Vec3::new(radius, half_height + radius, radius),
        }
    }
}

/// Everything the backend needs to create a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCreationSettings {
    pub shape: Shape,
    pub transform: Transform,
    pub motion_type: MotionType,
    pub layer: ObjectLayer,
    /// Sensor bodies report contacts but do not collide.
    pub is_sensor: bool,
    pub friction: f32,
    /// Opaque back-reference resolved by the owner (the world stores the
    /// owning actor's key here; zero means unowned).
    pub user_data: u64,
}

impl BodyCreationSettings {
    /// Create settings with default friction, no sensor flag, and no owner.
    #[must_use]
    pub fn new(
        shape: Shape,
        transform: Transform,
        motion_type: MotionType,
        layer: ObjectLayer,
    ) -> Self {
        Self {
            shape,
            transform,
            motion_type,
            layer,
            is_sensor: false,
            friction: 0.5,
            user_data: 0,
        }
    }

    /// Mark the body as a sensor.
    #[must_use]
    pub fn with_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Set the friction coefficient.
    #[must_use]
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Attach the opaque owner back-reference.
    #[must_use]
    pub fn with_user_data(mut self, user_data: u64) -> Self {
        self.user_data = user_data;
        self
    }
}
