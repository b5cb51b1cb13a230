//! Map binary decode.
//!
//! Reads the actor records of an authored map into a live [`Map`]: header
//! strings, then per-actor class name, transform, connection list, and
//! construction params. Geometry and collision-mesh sections belong to the
//! renderer and solver and are not interpreted here.
//!
//! Truncated data is a content defect surfaced as [`MapLoadError`];
//! referencing an unregistered actor type aborts (see
//! [`ActorRegistry::definition`]).

use glam::Vec3;
use tracing::info;

use engine_param::{ByteReader, ReadError};
use engine_physics::{BodyInterface, Transform};

use crate::actor::ActorConnection;
use crate::map::Map;
use crate::registry::ActorRegistry;

/// The actor record a `player` class marks: it positions the player
/// instead of spawning an actor.
const PLAYER_CLASS: &str = "player";

/// Errors from decoding a map.
#[derive(Debug, thiserror::Error)]
pub enum MapLoadError {
    /// The actor records were malformed or truncated.
    #[error("map data: {0}")]
    Read(#[from] ReadError),
}

/// Decode a map from `data` over a fresh [`Map`].
///
/// # Errors
///
/// Returns [`MapLoadError`] on malformed data.
///
/// # Panics
///
/// Panics if an actor record references an unregistered type.
pub fn load_map(
    registry: &ActorRegistry,
    physics: Box<dyn BodyInterface>,
    data: &[u8],
) -> Result<Map, MapLoadError> {
    let mut map = Map::new(physics);
    load_map_into(registry, &mut map, data)?;
    Ok(map)
}

/// Decode actor records from `data` into an existing map.
///
/// # Errors
///
/// Returns [`MapLoadError`] on malformed data.
pub fn load_map_into(
    registry: &ActorRegistry,
    map: &mut Map,
    data: &[u8],
) -> Result<(), MapLoadError> {
    let mut reader = ByteReader::new(data);

    map.env.sky_texture = reader.read_string()?;
    map.env.presence_icon = reader.read_string()?;
    map.env.presence_name = reader.read_string()?;

    let actor_count = reader.read_u64()?;
    let mut spawned = 0u64;
    for _ in 0..actor_count {
        let class = reader.read_string()?;

        let position = Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?);
        let rot_x = reader.read_f32()?;
        let rot_y = reader.read_f32()?;
        let rot_z = reader.read_f32()?;
        let transform = Transform::from_position_euler(position, rot_x, rot_y, rot_z);

        let connection_count = reader.read_u64()?;
        let mut connections = Vec::with_capacity(connection_count as usize);
        for _ in 0..connection_count {
            let source_output = reader.read_string()?;
            let target_name = reader.read_string()?;
            let target_input = reader.read_string()?;
            // The override's presence is carried by the param tag itself;
            // the flag byte is redundant in current map data.
            let _has_override = reader.read_u8()?;
            let param_override = reader.read_param()?;
            let num_refires = reader.read_u64()?;
            connections.push(ActorConnection {
                source_output,
                target_name,
                target_input,
                param_override,
                num_refires,
            });
        }

        let params = reader.read_kvlist()?;

        if class == PLAYER_CLASS {
            map.env.player.transform = transform;
            let body = map.env.player.body;
            map.env.physics.set_body_transform(body, &transform);
            continue;
        }

        let name = {
            let name = params.get_string("name", "");
            (!name.is_empty()).then(|| name.to_string())
        };

        let id = map.spawn_wired(registry, &class, transform, params, connections);
        if let Some(name) = name {
            map.name_actor(id, name);
        }
        spawned += 1;
    }

    info!(
        records = actor_count,
        spawned,
        sky = map.env.sky_texture,
        "map actor records loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine_param::{KvList, Param};
    use engine_physics::HeadlessPhysics;

    use super::*;
    use crate::actor::{Actor, ActorId};
    use crate::definition::ActorDefinition;
    use crate::map::MapEnv;

    #[derive(Debug, Default)]
    struct SinkState {
        pings: Vec<Param>,
    }

    fn sink_init(
        actor: &mut Actor,
        _params: &mut KvList,
        _t: &Transform,
        _env: &mut MapEnv,
    ) {
        actor.set_state(SinkState::default());
    }

    fn sink_ping(actor: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
        if let Some(state) = actor.state_mut::<SinkState>() {
            state.pings.push(param.clone());
        }
    }

    fn test_registry() -> ActorRegistry {
        let mut registry = ActorRegistry::new();
        registry.register(
            "sink",
            ActorDefinition::new(950)
                .with_init(sink_init)
                .with_input("ping", sink_ping),
        );
        registry
    }

    struct MapWriter {
        data: Vec<u8>,
    }

    impl MapWriter {
        fn new(sky: &str) -> Self {
            let mut writer = Self { data: Vec::new() };
            writer.string(sky);
            writer.string("icon");
            writer.string("Test Level");
            writer
        }

        fn string(&mut self, value: &str) {
            self.u64(value.len() as u64);
            self.data.extend_from_slice(value.as_bytes());
        }

        fn u64(&mut self, value: u64) {
            self.data.extend_from_slice(&value.to_le_bytes());
        }

        fn f32(&mut self, value: f32) {
            self.data.extend_from_slice(&value.to_le_bytes());
        }

        fn actor_count(&mut self, count: u64) {
            self.u64(count);
        }

        fn actor_header(&mut self, class: &str, position: [f32; 3]) {
            self.string(class);
            for v in position {
                self.f32(v);
            }
            for _ in 0..3 {
                self.f32(0.0); // euler rotation
            }
        }

        fn connections(&mut self, connections: &[(&str, &str, &str, Param, u64)]) {
            self.u64(connections.len() as u64);
            for (output, target, input, param, refires) in connections {
                self.string(output);
                self.string(target);
                self.string(input);
                self.data.push(u8::from(!param.is_none()));
                self.param(param);
                self.u64(*refires);
            }
        }

        fn param(&mut self, param: &Param) {
            self.data.push(param.kind().tag());
            match param {
                Param::Int(v) => self.data.extend_from_slice(&v.to_le_bytes()),
                Param::Bool(v) => self.data.push(u8::from(*v)),
                Param::String(v) => self.string(v),
                Param::None => {}
                other => panic!("test writer does not encode {:?}", other.kind()),
            }
        }

        fn params(&mut self, entries: &[(&str, Param)]) {
            self.u64(entries.len() as u64);
            for (key, param) in entries {
                self.string(key);
                self.param(param);
            }
        }
    }

    #[test]
    fn test_load_header_and_actors() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/night");
        writer.actor_count(2);

        writer.actor_header("sink", [1.0, 2.0, 3.0]);
        writer.connections(&[("spawned", "second", "ping", Param::Int(5), 0)]);
        writer.params(&[("name", Param::String("first".to_string()))]);

        writer.actor_header("sink", [4.0, 5.0, 6.0]);
        writer.connections(&[]);
        writer.params(&[("name", Param::String("second".to_string()))]);

        let map = load_map(
            &registry,
            Box::new(HeadlessPhysics::new()),
            &writer.data,
        )
        .unwrap();

        assert_eq!(map.env.sky_texture, "texture/level/night");
        assert_eq!(map.env.presence_name, "Test Level");
        assert_eq!(map.actor_count(), 2);
        let first = map.actor_by_name("first").unwrap();
        assert_eq!(map.actor(first).unwrap().connections.len(), 1);
        assert_eq!(
            map.actor(first).unwrap().connections[0].param_override,
            Param::Int(5)
        );
        // "second" spawned after "first" fired its spawned output, so the
        // wire was still dangling then — no ping arrived.
        let second = map.actor_by_name("second").unwrap();
        let pings = map
            .actor(second)
            .and_then(|a| a.state::<SinkState>())
            .map(|s| s.pings.len());
        assert_eq!(pings, Some(0));
    }

    #[test]
    fn test_player_record_positions_player() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/sky");
        writer.actor_count(1);
        writer.actor_header("player", [7.0, 0.0, -2.0]);
        writer.connections(&[]);
        writer.params(&[]);

        let map = load_map(
            &registry,
            Box::new(HeadlessPhysics::new()),
            &writer.data,
        )
        .unwrap();

        assert_eq!(map.actor_count(), 0);
        assert_eq!(map.env.player.transform.position, Vec3::new(7.0, 0.0, -2.0));
        let body_transform = map.env.physics.body_transform(map.env.player.body).unwrap();
        assert_eq!(body_transform.position, Vec3::new(7.0, 0.0, -2.0));
    }

    #[test]
    fn test_unnamed_actor_gets_no_name_entry() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/sky");
        writer.actor_count(1);
        writer.actor_header("sink", [0.0; 3]);
        writer.connections(&[]);
        writer.params(&[("name", Param::String(String::new()))]);

        let map = load_map(
            &registry,
            Box::new(HeadlessPhysics::new()),
            &writer.data,
        )
        .unwrap();
        assert_eq!(map.actor_count(), 1);
        assert!(map.actors_by_name("").is_empty());
    }

    #[test]
    fn test_truncated_map_is_an_error() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/sky");
        writer.actor_count(3);
        writer.actor_header("sink", [0.0; 3]);
        // Promised three actors, delivered a fragment of one.
        let result = load_map(
            &registry,
            Box::new(HeadlessPhysics::new()),
            &writer.data,
        );
        assert!(matches!(result, Err(MapLoadError::Read(_))));
    }

    #[test]
    #[should_panic(expected = "unknown actor type")]
    fn test_unknown_class_is_fatal() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/sky");
        writer.actor_count(1);
        writer.actor_header("unregistered_kind", [0.0; 3]);
        writer.connections(&[]);
        writer.params(&[]);
        let _ = load_map(&registry, Box::new(HeadlessPhysics::new()), &writer.data);
    }

    #[test]
    fn test_mistyped_name_param_is_ignored() {
        let registry = test_registry();
        let mut writer = MapWriter::new("texture/level/sky");
        writer.actor_count(1);
        writer.actor_header("sink", [0.0; 3]);
        writer.connections(&[]);
        writer.params(&[("name", Param::Int(12))]);

        let map = load_map(
            &registry,
            Box::new(HeadlessPhysics::new()),
            &writer.data,
        )
        .unwrap();
        assert_eq!(map.actor_count(), 1);
        assert!(map.env.names.is_empty());
    }
}
