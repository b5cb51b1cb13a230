//! # engine_app — headless bootstrap
//!
//! Assembles the whole core without a renderer: registry, a small wired
//! scene over the headless physics backend, the fixed-timestep physics
//! thread, and the advisory LOD thread.
//!
//! ## Startup sequence
//!
//! 1. Register built-in actor kinds, seal, then register game kinds.
//! 2. Build a map: a counter, a pulse emitter wired into it, an I/O proxy.
//! 3. Start the LOD thread and the physics thread with their handoff.
//! 4. Run for a bounded number of ticks, report, shut down.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_actors::logic_counter::{self, LogicCounterState};
use engine_param::{KvList, Param};
use engine_physics::{HeadlessPhysics, Transform};
use engine_runtime::{input_pair, LodHandoff, LodThread, PhysicsThread, PhysicsThreadConfig};
use engine_world::{
    Actor, ActorConnection, ActorDefinition, ActorRegistry, Map, MapEnv, FIRST_GAME_ACTOR_TYPE_ID,
};

/// Ticks to simulate before shutting down.
const RUN_TICKS: u64 = 120;

/// Emits a `pulse` output every 30 ticks.
fn pulse_update(actor: &mut Actor, _delta: f64, env: &mut MapEnv) {
    if env.physics_tick % 30 == 0 {
        env.fire_output(actor, "pulse", &Param::None);
    }
}

fn register_game_actors(registry: &mut ActorRegistry) {
    registry.register(
        "pulse_emitter",
        ActorDefinition::new(FIRST_GAME_ACTOR_TYPE_ID).with_update(pulse_update),
    );
}

fn build_map(registry: &ActorRegistry) -> Map {
    let mut map = Map::new(Box::new(HeadlessPhysics::new()));

    let mut params = KvList::new();
    params.set_int("min", 0);
    params.set_int("max", 1000);
    let counter = map.spawn(
        registry,
        logic_counter::LOGIC_COUNTER_ACTOR_NAME,
        Transform::IDENTITY,
        params,
    );
    map.name_actor(counter, "tally");

    let _emitter = map.spawn_wired(
        registry,
        "pulse_emitter",
        Transform::IDENTITY,
        KvList::new(),
        vec![ActorConnection::new("pulse", "tally", logic_counter::INPUT_ADD)
            .with_override(Param::Int(1))],
    );

    let _proxy = map.spawn_wired(
        registry,
        engine_actors::io_proxy::IO_PROXY_ACTOR_NAME,
        Transform::IDENTITY,
        KvList::new(),
        vec![
            ActorConnection::new(engine_actors::io_proxy::OUTPUT_FIRST_TICK, "tally", logic_counter::INPUT_ADD)
                .with_override(Param::Int(10)),
        ],
    );

    map
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    info!("engine bootstrap starting");

    let mut registry = ActorRegistry::new();
    engine_actors::register_builtin_actors(&mut registry);
    registry.seal_builtins();
    register_game_actors(&mut registry);
    info!(actor_types = registry.len(), "actor registry built");

    let world = Arc::new(Mutex::new(build_map(&registry)));

    // LOD pass: reads positions, writes LOD indices, never touches the
    // actor list shape.
    let handoff = Arc::new(LodHandoff::new());
    let lod_world = Arc::clone(&world);
    let lod_thread = LodThread::spawn(
        Arc::clone(&handoff),
        Box::new(move || {
            let mut map = lod_world.lock().unwrap_or_else(|e| e.into_inner());
            map.recompute_lods(Vec3::ZERO, 1.0);
        }),
    );

    // Input double-buffering: the collector would hang off the OS event
    // pump; headless, it simply stays idle.
    let (_collector, mut input) = input_pair();

    let physics = PhysicsThread::spawn(PhysicsThreadConfig::default(), Some(Arc::clone(&handoff)));
    let tick_world = Arc::clone(&world);
    physics.set_tick_fn(Some(Box::new(move |delta| {
        input.begin_tick();
        let mut map = tick_world.lock().unwrap_or_else(|e| e.into_inner());
        map.tick(delta);
    })));

    while physics.ticks_completed() < RUN_TICKS {
        physics.wait_tick_ended(Duration::from_secs(2));
    }

    physics.set_tick_fn(None);
    physics.shutdown();
    lod_thread.shutdown();

    let map = world.lock().unwrap_or_else(|e| e.into_inner());
    let tally = map
        .actor_by_name("tally")
        .and_then(|id| map.actor(id))
        .and_then(|actor| actor.state::<LogicCounterState>())
        .map(|state| state.counter);
    info!(
        ticks = map.env.physics_tick,
        tally = tally.unwrap_or(-1),
        "run complete"
    );

    Ok(())
}
