//! Narrow audio seam.
//!
//! The mixer is an external collaborator; actors that make noise go
//! through this trait and nothing else.

/// Playback capability consumed by sound-emitting actors.
///
/// Handles are opaque; zero is a valid "nothing playing" handle that all
/// control methods must tolerate.
pub trait AudioOutput: Send {
    /// Start playback of a sound asset. `loops` of zero plays once.
    /// Returns a handle for later control.
    fn play(&mut self, asset: &str, loops: i32, volume: f32) -> u64;

    /// Pause a playing sound.
    fn pause(&mut self, handle: u64);

    /// Resume a paused sound.
    fn resume(&mut self, handle: u64);

    /// Stop and release a sound.
    fn stop(&mut self, handle: u64);
}

/// Silent implementation used headless and in tests.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn play(&mut self, _asset: &str, _loops: i32, _volume: f32) -> u64 {
        0
    }

    fn pause(&mut self, _handle: u64) {}

    fn resume(&mut self, _handle: u64) {}

    fn stop(&mut self, _handle: u64) {}
}
