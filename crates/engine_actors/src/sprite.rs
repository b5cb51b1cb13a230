//! Billboard sprite.
//!
//! A textured 2D wall facing the camera, optionally solid.

use engine_param::KvList;
use engine_physics::{BodyCreationSettings, MotionType, ObjectLayer, Transform};
use engine_world::{Actor, ActorDefinition, ActorRegistry, ActorWall, MapEnv};
use glam::Vec2;

use crate::ACTOR_TYPE_SPRITE;

pub const SPRITE_ACTOR_NAME: &str = "sprite";

fn init(this: &mut Actor, params: &mut KvList, transform: &Transform, env: &mut MapEnv) {
    let half_width = params.get_float("width", 1.0) * 0.5;
    let texture = format!("texture/{}", params.get_string("texture", "level/uvtest"));
    let mut wall = ActorWall::new(
        Vec2::new(half_width, 0.0),
        Vec2::new(-half_width, 0.0),
        texture,
    );
    wall.uv_scale = params.get_float("uvScale", 1.0);
    wall.uv_offset = params.get_float("uvOffset", 0.0);
    wall.height = params.get_float("height", 1.0);
    wall.unshaded = params.get_bool("unshaded", false);
    wall.bake();

    if params.get_bool("solid", false) {
        let shape = wall.collider_shape();
        env.attach_body(
            this,
            BodyCreationSettings::new(shape, *transform, MotionType::Kinematic, ObjectLayer::Dynamic),
        );
    } else {
        env.attach_empty_body(this, transform);
    }
    this.wall = Some(wall);
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        SPRITE_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_SPRITE).with_init(init),
    );
}
