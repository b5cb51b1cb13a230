//! Headless reference backend.
//!
//! A kinematic transform store: bodies integrate their linear velocity,
//! sensors report AABB overlaps as contact events, and rays test against
//! body AABBs. There is no collision response — the backend exists to drive
//! the actor core in tests and headless runs.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::body::{BodyCreationSettings, BodyId, MotionType, ObjectLayer, Shape};
use crate::contact::{ContactEvent, ContactPhase};
use crate::interface::{BodyInterface, Ray, RayFilter, RayHit};
use crate::transform::Transform;

#[derive(Debug, Clone)]
struct BodyRecord {
    shape: Shape,
    transform: Transform,
    velocity: Vec3,
    motion_type: MotionType,
    layer: ObjectLayer,
    is_sensor: bool,
    user_data: u64,
}

impl BodyRecord {
    fn aabb(&self) -> (Vec3, Vec3) {
        let half = self.shape.half_extents();
        let center = self.transform.position;
        (center - half, center + half)
    }
}

fn aabbs_overlap(a: (Vec3, Vec3), b: (Vec3, Vec3)) -> bool {
    a.0.x <= b.1.x
        && a.1.x >= b.0.x
        && a.0.y <= b.1.y
        && a.1.y >= b.0.y
        && a.0.z <= b.1.z
        && a.1.z >= b.0.z
}

/// In-memory [`BodyInterface`] implementation.
#[derive(Debug, Default)]
pub struct HeadlessPhysics {
    bodies: HashMap<u32, BodyRecord>,
    next_id: u32,
    overlaps: HashSet<(u32, u32)>,
}

impl HeadlessPhysics {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn current_overlaps(&self) -> HashSet<(u32, u32)> {
        let mut pairs = HashSet::new();
        for (&sensor_id, sensor) in &self.bodies {
            if !sensor.is_sensor || matches!(sensor.shape, Shape::Empty) {
                continue;
            }
            let sensor_box = sensor.aabb();
            for (&other_id, other) in &self.bodies {
                if other_id == sensor_id
                    || other.is_sensor
                    || matches!(other.shape, Shape::Empty)
                {
                    continue;
                }
                if aabbs_overlap(sensor_box, other.aabb()) {
                    pairs.insert((sensor_id, other_id));
                }
            }
        }
        pairs
    }
}

impl BodyInterface for HeadlessPhysics {
    fn create_body(&mut self, settings: &BodyCreationSettings) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(
            id,
            BodyRecord {
                shape: settings.shape,
                transform: settings.transform,
                velocity: Vec3::ZERO,
                motion_type: settings.motion_type,
                layer: settings.layer,
                is_sensor: settings.is_sensor,
                user_data: settings.user_data,
            },
        );
        BodyId(id)
    }

    fn remove_body(&mut self, body: BodyId) {
        if !body.is_valid() {
            return;
        }
        self.bodies.remove(&body.0);
        self.overlaps
            .retain(|&(a, b)| a != body.0 && b != body.0);
    }

    fn has_body(&self, body: BodyId) -> bool {
        body.is_valid() && self.bodies.contains_key(&body.0)
    }

    fn body_transform(&self, body: BodyId) -> Option<Transform> {
        self.bodies.get(&body.0).map(|b| b.transform)
    }

    fn set_body_transform(&mut self, body: BodyId, transform: &Transform) {
        if let Some(record) = self.bodies.get_mut(&body.0) {
            record.transform = *transform;
        }
    }

    fn linear_velocity(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(&body.0).map(|b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3) {
        if let Some(record) = self.bodies.get_mut(&body.0) {
            record.velocity = velocity;
        }
    }

    fn user_data(&self, body: BodyId) -> Option<u64> {
        self.bodies.get(&body.0).map(|b| b.user_data)
    }

    fn cast_ray(&self, ray: &Ray, filter: &RayFilter) -> Option<RayHit> {
        let direction = ray.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let mut nearest: Option<RayHit> = None;
        for (&id, record) in &self.bodies {
            if matches!(record.shape, Shape::Empty) {
                continue;
            }
            if filter.exclude == Some(BodyId(id)) {
                continue;
            }
            if let Some(layer) = filter.layer
                && record.layer != layer
            {
                continue;
            }
            let (lo, hi) = record.aabb();
            // Slab test against the body AABB.
            let mut t_near = 0.0f32;
            let mut t_far = ray.max_distance;
            let mut missed = false;
            for axis in 0..3 {
                let origin = ray.origin[axis];
                let dir = direction[axis];
                if dir.abs() < 1e-8 {
                    if origin < lo[axis] || origin > hi[axis] {
                        missed = true;
                        break;
                    }
                    continue;
                }
                let mut t0 = (lo[axis] - origin) / dir;
                let mut t1 = (hi[axis] - origin) / dir;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_near = t_near.max(t0);
                t_far = t_far.min(t1);
                if t_near > t_far {
                    missed = true;
                    break;
                }
            }
            if missed {
                continue;
            }
            if nearest.is_none_or(|hit| t_near < hit.distance) {
                nearest = Some(RayHit {
                    body: BodyId(id),
                    distance: t_near,
                    position: ray.origin + direction * t_near,
                });
            }
        }
        nearest
    }

    fn move_character(&mut self, body: BodyId, displacement: Vec3) -> Vec3 {
        if let Some(record) = self.bodies.get_mut(&body.0) {
            record.transform.position += displacement;
            displacement
        } else {
            Vec3::ZERO
        }
    }

    fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        for record in self.bodies.values_mut() {
            if !matches!(record.motion_type, MotionType::Static) {
                record.transform.position += record.velocity * dt;
            }
        }

        let current = self.current_overlaps();
        let mut events = Vec::new();
        for &(sensor, other) in &current {
            let phase = if self.overlaps.contains(&(sensor, other)) {
                ContactPhase::Persisted
            } else {
                ContactPhase::Added
            };
            events.push(ContactEvent {
                phase,
                body: BodyId(sensor),
                other: BodyId(other),
            });
        }
        for &(sensor, other) in &self.overlaps {
            if !current.contains(&(sensor, other)) {
                events.push(ContactEvent {
                    phase: ContactPhase::Removed,
                    body: BodyId(sensor),
                    other: BodyId(other),
                });
            }
        }
        self.overlaps = current;
        events
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor_at(physics: &mut HeadlessPhysics, position: Vec3) -> BodyId {
        physics.create_body(
            &BodyCreationSettings::new(
                Shape::Box {
                    half_extents: Vec3::ONE,
                },
                Transform::from_position(position),
                MotionType::Static,
                ObjectLayer::Sensor,
            )
            .with_sensor(),
        )
    }

    fn dynamic_at(physics: &mut HeadlessPhysics, position: Vec3) -> BodyId {
        physics.create_body(&BodyCreationSettings::new(
            Shape::Sphere { radius: 0.5 },
            Transform::from_position(position),
            MotionType::Dynamic,
            ObjectLayer::Dynamic,
        ))
    }

    #[test]
    fn test_create_and_remove() {
        let mut physics = HeadlessPhysics::new();
        let body = dynamic_at(&mut physics, Vec3::ZERO);
        assert!(physics.has_body(body));
        assert_eq!(physics.body_count(), 1);
        physics.remove_body(body);
        assert!(!physics.has_body(body));
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_velocity_integration() {
        let mut physics = HeadlessPhysics::new();
        let body = dynamic_at(&mut physics, Vec3::ZERO);
        physics.set_linear_velocity(body, Vec3::new(2.0, 0.0, 0.0));
        physics.step(0.5);
        let transform = physics.body_transform(body).unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sensor_contact_lifecycle() {
        let mut physics = HeadlessPhysics::new();
        let sensor = sensor_at(&mut physics, Vec3::ZERO);
        let walker = dynamic_at(&mut physics, Vec3::new(10.0, 0.0, 0.0));

        assert!(physics.step(0.1).is_empty());

        // Walk into the sensor.
        physics.set_body_transform(walker, &Transform::from_position(Vec3::ZERO));
        let events = physics.step(0.1);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, ContactPhase::Added);
        assert_eq!(events[0].body, sensor);
        assert_eq!(events[0].other, walker);

        // Stay inside.
        let events = physics.step(0.1);
        assert_eq!(events[0].phase, ContactPhase::Persisted);

        // Leave.
        physics.set_body_transform(walker, &Transform::from_position(Vec3::splat(50.0)));
        let events = physics.step(0.1);
        assert_eq!(events[0].phase, ContactPhase::Removed);
        assert!(physics.step(0.1).is_empty());
    }

    #[test]
    fn test_removed_body_drops_overlap_silently() {
        let mut physics = HeadlessPhysics::new();
        let _sensor = sensor_at(&mut physics, Vec3::ZERO);
        let walker = dynamic_at(&mut physics, Vec3::ZERO);
        let events = physics.step(0.1);
        assert_eq!(events.len(), 1);
        physics.remove_body(walker);
        assert!(physics.step(0.1).is_empty());
    }

    #[test]
    fn test_ray_cast_nearest_with_filter() {
        let mut physics = HeadlessPhysics::new();
        let near = dynamic_at(&mut physics, Vec3::new(5.0, 0.0, 0.0));
        let far = dynamic_at(&mut physics, Vec3::new(9.0, 0.0, 0.0));
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
            max_distance: 100.0,
        };
        let hit = physics.cast_ray(&ray, &RayFilter::default()).unwrap();
        assert_eq!(hit.body, near);

        let hit = physics
            .cast_ray(
                &ray,
                &RayFilter {
                    exclude: Some(near),
                    ..RayFilter::default()
                },
            )
            .unwrap();
        assert_eq!(hit.body, far);

        assert!(physics
            .cast_ray(
                &ray,
                &RayFilter {
                    layer: Some(ObjectLayer::Static),
                    ..RayFilter::default()
                },
            )
            .is_none());
    }

    #[test]
    fn test_move_character() {
        let mut physics = HeadlessPhysics::new();
        let body = dynamic_at(&mut physics, Vec3::ZERO);
        let moved = physics.move_character(body, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(moved, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(
            physics.body_transform(body).unwrap().position,
            Vec3::new(0.0, 0.0, 3.0)
        );
    }
}
