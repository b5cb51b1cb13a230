//! # engine_physics
//!
//! The narrow contract between the actor core and whatever rigid-body
//! solver backs it. The core never sees solver internals — it creates and
//! removes bodies, reads and writes transforms and velocities, casts rays,
//! and receives contact events, all through [`BodyInterface`].
//!
//! [`HeadlessPhysics`] is a reference backend: a kinematic transform store
//! with AABB sensor overlap detection. It exists so the world, the built-in
//! actors, and the thread coordination can run (and be tested) without a
//! real solver.

pub mod body;
pub mod contact;
pub mod headless;
pub mod interface;
pub mod transform;

pub use body::{BodyCreationSettings, BodyId, MotionType, ObjectLayer, Shape};
pub use contact::{ContactEvent, ContactPhase};
pub use headless::HeadlessPhysics;
pub use interface::{BodyInterface, Ray, RayFilter, RayHit};
pub use transform::Transform;
