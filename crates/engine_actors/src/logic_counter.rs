//! Integer counter with clamped range and edge-transition outputs.

use engine_param::{KvList, Param};
use engine_physics::Transform;
use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, MapEnv};

use crate::ACTOR_TYPE_LOGIC_COUNTER;

pub const LOGIC_COUNTER_ACTOR_NAME: &str = "logic_counter";

pub const INPUT_ADD: &str = "add";
pub const INPUT_SUBTRACT: &str = "subtract";
pub const INPUT_INCREMENT: &str = "increment";
pub const INPUT_DECREMENT: &str = "decrement";

pub const OUTPUT_COUNTER_CHANGED: &str = "counter_changed";
pub const OUTPUT_HIT_MAX: &str = "hit_max";
pub const OUTPUT_LEFT_MAX: &str = "left_max";
pub const OUTPUT_HIT_MIN: &str = "hit_min";
pub const OUTPUT_LEFT_MIN: &str = "left_min";

#[derive(Debug)]
pub struct LogicCounterState {
    pub counter: i32,
    pub min: i32,
    pub max: i32,
    pub clamp_to_min: bool,
    pub clamp_to_max: bool,
}

fn change_value(this: &mut Actor, env: &mut MapEnv, change: i32) {
    let Some(state) = this.state_mut::<LogicCounterState>() else {
        return;
    };
    let prev = state.counter;
    let mut value = prev.saturating_add(change);
    let mut fired: Vec<(&str, Param)> = Vec::new();

    if state.clamp_to_max {
        if value > state.max {
            value = state.max;
        }
        if prev < state.max && value == state.max {
            fired.push((OUTPUT_HIT_MAX, Param::None));
        } else if prev == state.max && value < state.max {
            fired.push((OUTPUT_LEFT_MAX, Param::None));
        }
    }
    if state.clamp_to_min {
        if value < state.min {
            value = state.min;
        }
        if prev > state.min && value == state.min {
            fired.push((OUTPUT_HIT_MIN, Param::None));
        } else if prev == state.min && value > state.min {
            fired.push((OUTPUT_LEFT_MIN, Param::None));
        }
    }
    state.counter = value;
    if prev != value {
        fired.push((OUTPUT_COUNTER_CHANGED, Param::Int(value)));
    }

    for (output, param) in fired {
        env.fire_output(this, output, &param);
    }
}

fn add_handler(this: &mut Actor, _sender: ActorId, param: &Param, env: &mut MapEnv) {
    if let Param::Int(amount) = param {
        change_value(this, env, *amount);
    }
}

fn subtract_handler(this: &mut Actor, _sender: ActorId, param: &Param, env: &mut MapEnv) {
    if let Param::Int(amount) = param {
        change_value(this, env, -amount);
    }
}

fn increment_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    change_value(this, env, 1);
}

fn decrement_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    change_value(this, env, -1);
}

fn init(this: &mut Actor, params: &mut KvList, _transform: &Transform, _env: &mut MapEnv) {
    let min = params.get_int("min", 0);
    let max = params.get_int("max", 100);
    let counter = params.get_int("counter", 0);
    let counter = if counter < min {
        min
    } else if counter > max {
        max
    } else {
        counter
    };
    this.set_state(LogicCounterState {
        counter,
        min,
        max,
        clamp_to_min: params.get_bool("clampToMin", true),
        clamp_to_max: params.get_bool("clampToMax", true),
    });
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        LOGIC_COUNTER_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_LOGIC_COUNTER)
            .with_init(init)
            .with_input(INPUT_ADD, add_handler)
            .with_input(INPUT_SUBTRACT, subtract_handler)
            .with_input(INPUT_INCREMENT, increment_handler)
            .with_input(INPUT_DECREMENT, decrement_handler),
    );
}

#[cfg(test)]
mod tests {
    use engine_world::ActorConnection;

    use super::*;
    use crate::test_support;

    fn counter_params(min: i32, max: i32, counter: i32) -> KvList {
        let mut params = KvList::new();
        params.set_int("min", min);
        params.set_int("max", max);
        params.set_int("counter", counter);
        params.set_bool("clampToMax", true);
        params.set_bool("clampToMin", true);
        params
    }

    fn counter_value(map: &engine_world::Map, id: engine_world::ActorId) -> i32 {
        map.actor(id)
            .and_then(|a| a.state::<LogicCounterState>())
            .map(|s| s.counter)
            .unwrap()
    }

    #[test]
    fn test_add_and_clamp_to_max() {
        let registry = test_support::registry();
        let mut map = test_support::map();
        let changed = test_support::spawn_recorder(&mut map, &registry, "changed");
        let hit_max = test_support::spawn_recorder(&mut map, &registry, "hit_max");

        let counter = map.spawn_wired(
            &registry,
            LOGIC_COUNTER_ACTOR_NAME,
            Transform::IDENTITY,
            counter_params(0, 10, 5),
            vec![
                ActorConnection::new(OUTPUT_COUNTER_CHANGED, "changed", "record"),
                ActorConnection::new(OUTPUT_HIT_MAX, "hit_max", "record"),
            ],
        );

        map.trigger_input(counter, counter, INPUT_ADD, Param::Int(3));
        assert_eq!(counter_value(&map, counter), 8);
        assert_eq!(test_support::recorded(&map, changed), vec![Param::Int(8)]);
        assert!(test_support::recorded(&map, hit_max).is_empty());

        // Overshooting clamps to max and reports the transition.
        map.trigger_input(counter, counter, INPUT_ADD, Param::Int(10));
        assert_eq!(counter_value(&map, counter), 10);
        assert_eq!(
            test_support::recorded(&map, changed),
            vec![Param::Int(8), Param::Int(10)]
        );
        assert_eq!(test_support::recorded(&map, hit_max).len(), 1);

        // Already at max: no change, no repeat of hit_max.
        map.trigger_input(counter, counter, INPUT_ADD, Param::Int(1));
        assert_eq!(counter_value(&map, counter), 10);
        assert_eq!(test_support::recorded(&map, changed).len(), 2);
        assert_eq!(test_support::recorded(&map, hit_max).len(), 1);
    }

    #[test]
    fn test_leaving_max_and_hitting_min() {
        let registry = test_support::registry();
        let mut map = test_support::map();
        let left_max = test_support::spawn_recorder(&mut map, &registry, "left_max");
        let hit_min = test_support::spawn_recorder(&mut map, &registry, "hit_min");
        let left_min = test_support::spawn_recorder(&mut map, &registry, "left_min");

        let counter = map.spawn_wired(
            &registry,
            LOGIC_COUNTER_ACTOR_NAME,
            Transform::IDENTITY,
            counter_params(0, 3, 3),
            vec![
                ActorConnection::new(OUTPUT_LEFT_MAX, "left_max", "record"),
                ActorConnection::new(OUTPUT_HIT_MIN, "hit_min", "record"),
                ActorConnection::new(OUTPUT_LEFT_MIN, "left_min", "record"),
            ],
        );

        map.trigger_input(counter, counter, INPUT_DECREMENT, Param::None);
        assert_eq!(counter_value(&map, counter), 2);
        assert_eq!(test_support::recorded(&map, left_max).len(), 1);

        map.trigger_input(counter, counter, INPUT_SUBTRACT, Param::Int(5));
        assert_eq!(counter_value(&map, counter), 0);
        assert_eq!(test_support::recorded(&map, hit_min).len(), 1);

        map.trigger_input(counter, counter, INPUT_INCREMENT, Param::None);
        assert_eq!(counter_value(&map, counter), 1);
        assert_eq!(test_support::recorded(&map, left_min).len(), 1);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let registry = test_support::registry();
        let mut map = test_support::map();
        let counter = map.spawn(
            &registry,
            LOGIC_COUNTER_ACTOR_NAME,
            Transform::IDENTITY,
            counter_params(0, 10, 25),
        );
        assert_eq!(counter_value(&map, counter), 10);
    }

    #[test]
    fn test_non_integer_payload_is_ignored() {
        let registry = test_support::registry();
        let mut map = test_support::map();
        let counter = map.spawn(
            &registry,
            LOGIC_COUNTER_ACTOR_NAME,
            Transform::IDENTITY,
            counter_params(0, 10, 5),
        );
        map.trigger_input(counter, counter, INPUT_ADD, Param::Float(2.5));
        map.trigger_input(counter, counter, INPUT_ADD, Param::None);
        assert_eq!(counter_value(&map, counter), 5);
    }

    #[test]
    fn test_unclamped_counter_fires_no_edge_outputs() {
        let registry = test_support::registry();
        let mut map = test_support::map();
        let hit_max = test_support::spawn_recorder(&mut map, &registry, "hit_max");

        let mut params = KvList::new();
        params.set_int("max", 10);
        params.set_int("counter", 9);
        params.set_bool("clampToMax", false);
        let counter = map.spawn_wired(
            &registry,
            LOGIC_COUNTER_ACTOR_NAME,
            Transform::IDENTITY,
            params,
            vec![ActorConnection::new(OUTPUT_HIT_MAX, "hit_max", "record")],
        );

        map.trigger_input(counter, counter, INPUT_ADD, Param::Int(5));
        assert_eq!(counter_value(&map, counter), 14);
        assert!(test_support::recorded(&map, hit_max).is_empty());
    }
}
