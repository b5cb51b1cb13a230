//! # engine_runtime
//!
//! The scheduling substrate the actor core runs inside: a fixed-timestep
//! physics thread, an advisory LOD thread with a strict per-tick
//! producer/consumer handoff, and double-buffered input delivery.
//!
//! Coordination is lock-based — two mutexes, counting semaphores, and a
//! buffer swap. No async runtime.

pub mod input;
pub mod lod_thread;
pub mod physics_thread;
pub mod sync;

pub use input::{input_pair, InputCollector, InputReader, MAX_MOUSE_BUTTONS, MAX_SCANCODES};
pub use lod_thread::{LodHandoff, LodThread};
pub use physics_thread::{PhysicsThread, PhysicsThreadConfig, TickFn};
pub use sync::Semaphore;
