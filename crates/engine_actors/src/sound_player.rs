//! Positional sound-effect player.

use engine_param::{KvList, Param};
use engine_physics::Transform;
use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, MapEnv};

use crate::ACTOR_TYPE_SOUND_PLAYER;

pub const SOUND_PLAYER_ACTOR_NAME: &str = "sound_player";

pub const INPUT_PLAY: &str = "play";
pub const INPUT_PAUSE: &str = "pause";
pub const INPUT_RESUME: &str = "resume";
pub const INPUT_STOP: &str = "stop";

#[derive(Debug)]
pub struct SoundPlayerState {
    /// Fully qualified sound asset path.
    pub asset: String,
    pub loops: i32,
    pub volume: f32,
    /// Handle of the playing effect, if any.
    pub handle: Option<u64>,
}

fn play_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    let Some(state) = this.state::<SoundPlayerState>() else {
        return;
    };
    let (asset, loops, volume) = (state.asset.clone(), state.loops, state.volume);
    let handle = env.audio.play(&asset, loops, volume);
    if let Some(state) = this.state_mut::<SoundPlayerState>() {
        state.handle = Some(handle);
    }
}

fn pause_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    if let Some(handle) = this.state::<SoundPlayerState>().and_then(|s| s.handle) {
        env.audio.pause(handle);
    }
}

fn resume_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    if let Some(handle) = this.state::<SoundPlayerState>().and_then(|s| s.handle) {
        env.audio.resume(handle);
    }
}

fn stop_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    if let Some(handle) = this.state::<SoundPlayerState>().and_then(|s| s.handle) {
        env.audio.stop(handle);
    }
    if let Some(state) = this.state_mut::<SoundPlayerState>() {
        state.handle = None;
    }
}

fn destroy(this: &mut Actor, env: &mut MapEnv) {
    if let Some(handle) = this.state::<SoundPlayerState>().and_then(|s| s.handle) {
        env.audio.stop(handle);
    }
}

fn init(this: &mut Actor, params: &mut KvList, _transform: &Transform, _env: &mut MapEnv) {
    this.set_state(SoundPlayerState {
        asset: format!("sound/{}", params.get_string("sound", "sfx/click")),
        loops: params.get_int("loops", 0),
        volume: params.get_float("volume", 1.0),
        handle: None,
    });
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        SOUND_PLAYER_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_SOUND_PLAYER)
            .with_init(init)
            .with_destroy(destroy)
            .with_input(INPUT_PLAY, play_handler)
            .with_input(INPUT_PAUSE, pause_handler)
            .with_input(INPUT_RESUME, resume_handler)
            .with_input(INPUT_STOP, stop_handler),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use engine_world::AudioOutput;

    use super::*;
    use crate::test_support;

    /// Records mixer calls for assertions.
    #[derive(Debug, Default)]
    struct RecordingAudio {
        log: Arc<Mutex<Vec<String>>>,
        next_handle: u64,
    }

    impl AudioOutput for RecordingAudio {
        fn play(&mut self, asset: &str, loops: i32, volume: f32) -> u64 {
            self.next_handle += 1;
            self.log
                .lock()
                .unwrap()
                .push(format!("play {asset} loops={loops} volume={volume}"));
            self.next_handle
        }

        fn pause(&mut self, handle: u64) {
            self.log.lock().unwrap().push(format!("pause {handle}"));
        }

        fn resume(&mut self, handle: u64) {
            self.log.lock().unwrap().push(format!("resume {handle}"));
        }

        fn stop(&mut self, handle: u64) {
            self.log.lock().unwrap().push(format!("stop {handle}"));
        }
    }

    fn player_setup() -> (engine_world::Map, engine_world::ActorId, Arc<Mutex<Vec<String>>>) {
        let registry = test_support::registry();
        let log = Arc::new(Mutex::new(Vec::new()));
        let audio = RecordingAudio {
            log: Arc::clone(&log),
            next_handle: 0,
        };
        let mut map = test_support::map().with_audio(Box::new(audio));

        let mut params = KvList::new();
        params.set_string("sound", "sfx/alarm");
        params.set_int("loops", 2);
        params.set_float("volume", 0.5);
        let player = map.spawn(
            &registry,
            SOUND_PLAYER_ACTOR_NAME,
            Transform::IDENTITY,
            params,
        );
        (map, player, log)
    }

    #[test]
    fn test_play_pause_resume_stop() {
        let (mut map, player, log) = player_setup();
        map.trigger_input(player, player, INPUT_PLAY, Param::None);
        map.trigger_input(player, player, INPUT_PAUSE, Param::None);
        map.trigger_input(player, player, INPUT_RESUME, Param::None);
        map.trigger_input(player, player, INPUT_STOP, Param::None);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "play sound/sfx/alarm loops=2 volume=0.5",
                "pause 1",
                "resume 1",
                "stop 1",
            ]
        );
    }

    #[test]
    fn test_controls_without_playback_are_noops() {
        let (mut map, player, log) = player_setup();
        map.trigger_input(player, player, INPUT_PAUSE, Param::None);
        map.trigger_input(player, player, INPUT_STOP, Param::None);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_destroy_stops_playback() {
        let (mut map, player, log) = player_setup();
        map.trigger_input(player, player, INPUT_PLAY, Param::None);
        map.remove_actor(player);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["play sound/sfx/alarm loops=2 volume=0.5", "stop 1"]
        );
    }
}
