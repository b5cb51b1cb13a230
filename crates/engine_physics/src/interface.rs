//! The capability trait the actor core consumes.

use glam::Vec3;

use crate::body::{BodyCreationSettings, BodyId, ObjectLayer};
use crate::contact::ContactEvent;
use crate::transform::Transform;

/// A ray for [`BodyInterface::cast_ray`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Direction. Need not be normalized; `max_distance` is measured along
    /// the normalized direction.
    pub direction: Vec3,
    pub max_distance: f32,
}

/// Filters applied to a ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayFilter {
    /// Restrict hits to one layer, or test all layers when `None`.
    pub layer: Option<ObjectLayer>,
    /// A body to ignore (typically the caster's own).
    pub exclude: Option<BodyId>,
}

/// A ray-cast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyId,
    /// Distance from the ray origin along the normalized direction.
    pub distance: f32,
    pub position: Vec3,
}

/// The black-box solver capability.
///
/// Implementations own all body state. The core holds [`BodyId`]s and this
/// trait object, nothing else. All methods on missing bodies are no-ops or
/// return `None` — a removed body is not an error to query.
pub trait BodyInterface: Send {
    /// Create a body and return its handle.
    fn create_body(&mut self, settings: &BodyCreationSettings) -> BodyId;

    /// Remove a body. Removing an already-removed body is a no-op.
    fn remove_body(&mut self, body: BodyId);

    /// Returns `true` if the body exists.
    fn has_body(&self, body: BodyId) -> bool;

    /// The body's current transform.
    fn body_transform(&self, body: BodyId) -> Option<Transform>;

    /// Teleport the body.
    fn set_body_transform(&mut self, body: BodyId, transform: &Transform);

    /// The body's linear velocity.
    fn linear_velocity(&self, body: BodyId) -> Option<Vec3>;

    /// Set the body's linear velocity.
    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3);

    /// The opaque owner back-reference attached at creation.
    fn user_data(&self, body: BodyId) -> Option<u64>;

    /// Cast a ray, returning the nearest hit passing the filter.
    fn cast_ray(&self, ray: &Ray, filter: &RayFilter) -> Option<RayHit>;

    /// Step a character-controlled body by `displacement`, returning the
    /// displacement actually applied after collision resolution.
    fn move_character(&mut self, body: BodyId, displacement: Vec3) -> Vec3;

    /// Advance the simulation by `dt` seconds and report contact changes.
    fn step(&mut self, dt: f32) -> Vec<ContactEvent>;

    /// Number of live bodies.
    fn body_count(&self) -> usize;
}
