//! Map-wide I/O relay.
//!
//! A map has at most one proxy; level scripts wire map-level events
//! through it. It cannot be killed through the signal graph — the `kill`
//! input is deliberately absent.

use engine_param::KvList;
use engine_physics::Transform;
use engine_world::{Actor, ActorDefinition, ActorRegistry, MapEnv, ACTOR_INPUT_KILL};
use tracing::error;

use crate::ACTOR_TYPE_IO_PROXY;

pub const IO_PROXY_ACTOR_NAME: &str = "io_proxy";

pub const OUTPUT_FIRST_TICK: &str = "first_tick";

fn init(this: &mut Actor, _params: &mut KvList, _transform: &Transform, env: &mut MapEnv) {
    if env.io_proxy.is_some() {
        error!("map already has an I/O proxy; the new one cannot be used");
    } else {
        env.io_proxy = Some(this.id());
    }
}

fn update(this: &mut Actor, _delta: f64, env: &mut MapEnv) {
    if env.physics_tick == 1 {
        env.fire_output(this, OUTPUT_FIRST_TICK, &engine_param::Param::None);
    }
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        IO_PROXY_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_IO_PROXY)
            .with_init(init)
            .with_update(update)
            .without_input(ACTOR_INPUT_KILL),
    );
}
