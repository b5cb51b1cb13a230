//! 2D billboard walls.
//!
//! A wall is the flat, textured representation some actors use instead of
//! (or layered under) a 3D model — sprites, decals, laser beams.

use glam::{Vec2, Vec3};

use engine_physics::Shape;

/// Collision half-thickness of a solid wall.
const WALL_HALF_THICKNESS: f32 = 0.05;

/// A textured 2D wall segment in actor-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorWall {
    /// First endpoint.
    pub a: Vec2,
    /// Second endpoint.
    pub b: Vec2,
    /// Fully qualified texture path.
    pub texture: String,
    /// Texture X scale.
    pub uv_scale: f32,
    /// Texture X offset.
    pub uv_offset: f32,
    /// Render height. Does not affect collision.
    pub height: f32,
    /// Baked segment length. Call [`ActorWall::bake`] after moving endpoints.
    pub length: f32,
    /// Baked segment angle in radians.
    pub angle: f32,
    /// Render without shading.
    pub unshaded: bool,
}

impl ActorWall {
    /// Create a wall between two points with default UV mapping. The wall
    /// starts unbaked; call [`ActorWall::bake`].
    #[must_use]
    pub fn new(a: Vec2, b: Vec2, texture: impl Into<String>) -> Self {
        Self {
            a,
            b,
            texture: texture.into(),
            uv_scale: 1.0,
            uv_offset: 0.0,
            height: 1.0,
            length: 0.0,
            angle: 0.0,
            unshaded: false,
        }
    }

    /// Recompute the derived length and angle from the endpoints.
    pub fn bake(&mut self) {
        let delta = self.b - self.a;
        self.length = delta.length();
        self.angle = delta.y.atan2(delta.x);
    }

    /// The collision shape for a solid wall: a thin box spanning the
    /// segment.
    #[must_use]
    pub fn collider_shape(&self) -> Shape {
        Shape::Box {
            half_extents: Vec3::new(self.length / 2.0, self.height / 2.0, WALL_HALF_THICKNESS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bake_computes_length_and_angle() {
        let mut wall = ActorWall::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), "texture/t");
        wall.bake();
        assert_eq!(wall.length, 2.0);
        assert_eq!(wall.angle, 0.0);

        let mut vertical = ActorWall::new(Vec2::ZERO, Vec2::new(0.0, 3.0), "texture/t");
        vertical.bake();
        assert_eq!(vertical.length, 3.0);
        assert!((vertical.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_collider_spans_segment() {
        let mut wall = ActorWall::new(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), "texture/t");
        wall.height = 3.0;
        wall.bake();
        let Shape::Box { half_extents } = wall.collider_shape() else {
            panic!("wall collider should be a box");
        };
        assert_eq!(half_extents.x, 2.0);
        assert_eq!(half_extents.y, 1.5);
    }
}
