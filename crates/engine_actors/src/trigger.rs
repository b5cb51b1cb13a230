//! Player-touch trigger volume.
//!
//! A sensor box that fires outputs as the player enters, stays inside, and
//! leaves. One-shot triggers remove themselves after the player exits.

use engine_param::{KvList, Param};
use engine_physics::{
    BodyCreationSettings, BodyId, MotionType, ObjectLayer, Shape, Transform,
};
use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, MapEnv};
use glam::Vec3;

use crate::ACTOR_TYPE_TRIGGER;

pub const TRIGGER_ACTOR_NAME: &str = "trigger";

pub const INPUT_FORCE_TRIGGER: &str = "force_trigger";
pub const INPUT_ENABLE: &str = "enable";
pub const INPUT_DISABLE: &str = "disable";

pub const OUTPUT_TRIGGERED: &str = "triggered";
pub const OUTPUT_ENTERED: &str = "entered";
pub const OUTPUT_EXITED: &str = "exited";

#[derive(Debug)]
pub struct TriggerState {
    pub width: f32,
    pub depth: f32,
    pub one_shot: bool,
    pub enabled: bool,
}

fn force_trigger_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    env.fire_output(this, OUTPUT_TRIGGERED, &Param::None);
}

fn enable_handler(this: &mut Actor, _sender: ActorId, _param: &Param, _env: &mut MapEnv) {
    if let Some(state) = this.state_mut::<TriggerState>() {
        state.enabled = true;
    }
}

fn disable_handler(this: &mut Actor, _sender: ActorId, _param: &Param, _env: &mut MapEnv) {
    if let Some(state) = this.state_mut::<TriggerState>() {
        state.enabled = false;
    }
}

fn on_contact_added(this: &mut Actor, _body: BodyId, env: &mut MapEnv) {
    let enabled = this.state::<TriggerState>().is_some_and(|s| s.enabled);
    if enabled {
        env.fire_output(this, OUTPUT_ENTERED, &Param::None);
        env.fire_output(this, OUTPUT_TRIGGERED, &Param::None);
    }
}

fn on_contact_persisted(this: &mut Actor, _body: BodyId, env: &mut MapEnv) {
    let fire = this
        .state::<TriggerState>()
        .is_some_and(|s| s.enabled && !s.one_shot);
    if fire {
        env.fire_output(this, OUTPUT_TRIGGERED, &Param::None);
    }
}

fn on_contact_removed(this: &mut Actor, _body: BodyId, env: &mut MapEnv) {
    let Some(state) = this.state::<TriggerState>() else {
        return;
    };
    if state.enabled {
        let one_shot = state.one_shot;
        env.fire_output(this, OUTPUT_EXITED, &Param::None);
        if one_shot {
            env.kill(this.id());
        }
    }
}

fn init(this: &mut Actor, params: &mut KvList, transform: &Transform, env: &mut MapEnv) {
    let state = TriggerState {
        width: params.get_float("width", 1.0),
        depth: params.get_float("depth", 1.0),
        one_shot: params.get_bool("oneShot", true),
        enabled: params.get_bool("startEnabled", true),
    };
    let half_extents = Vec3::new(state.width / 2.0, 0.5, state.depth / 2.0);
    this.set_state(state);
    env.attach_body(
        this,
        BodyCreationSettings::new(
            Shape::Box { half_extents },
            *transform,
            MotionType::Static,
            ObjectLayer::Sensor,
        )
        .with_sensor(),
    );
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        TRIGGER_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_TRIGGER)
            .with_init(init)
            .with_contact_added(on_contact_added)
            .with_contact_persisted(on_contact_persisted)
            .with_contact_removed(on_contact_removed)
            .with_input(INPUT_FORCE_TRIGGER, force_trigger_handler)
            .with_input(INPUT_ENABLE, enable_handler)
            .with_input(INPUT_DISABLE, disable_handler),
    );
}
