//! Static decorative model with selectable collision.

use engine_assets::CollisionModelType;
use engine_param::{Color, KvList};
use engine_physics::{BodyCreationSettings, MotionType, ObjectLayer, Shape, Transform};
use engine_world::{Actor, ActorDefinition, ActorFlags, ActorRegistry, MapEnv};
use tracing::warn;

use crate::ACTOR_TYPE_STATIC_MODEL;

pub const STATIC_MODEL_ACTOR_NAME: &str = "static_model";

/// `collision` param values.
pub const COLLISION_NONE: u8 = 0;
pub const COLLISION_BOUNDING_BOX: u8 = 1;
pub const COLLISION_FULL: u8 = 2;

fn init(this: &mut Actor, params: &mut KvList, transform: &Transform, env: &mut MapEnv) {
    let model_name = params.get_string("model", "leafy").to_string();
    let model = env.load_model(&format!("model/{model_name}"));
    this.current_skin = params.get_int("skin", 0) as u32;
    this.mod_color = params.get_color("color", Color::WHITE);

    let mut collision = params.get_byte("collision", COLLISION_FULL);
    if collision == COLLISION_FULL && model.collision == CollisionModelType::None {
        warn!(
            model = model_name,
            "static model requested full collision but the model has none"
        );
        collision = COLLISION_NONE;
    }

    // The solver bakes mesh colliders from the model asset itself; the
    // core only supplies the bounds.
    let shape = Shape::Box {
        half_extents: model.bounding_half_extents,
    };
    match collision {
        COLLISION_BOUNDING_BOX => {
            this.flags.insert(ActorFlags::USES_BOUNDING_BOX_COLLISION);
            env.attach_body(
                this,
                BodyCreationSettings::new(shape, *transform, MotionType::Static, ObjectLayer::Static),
            );
        }
        COLLISION_FULL => {
            env.attach_body(
                this,
                BodyCreationSettings::new(shape, *transform, MotionType::Static, ObjectLayer::Static),
            );
        }
        _ => {
            env.attach_empty_body(this, transform);
        }
    }
    this.model = Some(model);
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        STATIC_MODEL_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_STATIC_MODEL).with_init(init),
    );
}
