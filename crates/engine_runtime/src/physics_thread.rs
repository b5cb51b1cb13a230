//! The fixed-timestep physics thread.
//!
//! Runs the installed tick callback at a fixed rate (~60 Hz). Two locks
//! coordinate it: the control mutex arbitrates which callback is
//! installed (so the main thread can swap per-map fixed-update functions
//! safely), and the tick mutex is held for the whole tick body so any
//! thread can take it for a consistent read of world state.
//!
//! `delta` passed to the callback is the previous tick's length as a
//! fraction of one nominal tick period: a tick that overran stretches the
//! next tick's perceived motion instead of sub-stepping.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::lod_thread::LodHandoff;
use crate::sync::Semaphore;

/// The per-tick callback. Installed under the control mutex; runs under
/// the tick mutex.
pub type TickFn = Box<dyn FnMut(f64) + Send>;

/// How often a tick blocked on the LOD handoff re-checks the quit flag.
const LOD_WAIT_POLL: Duration = Duration::from_millis(16);

/// Pacing configuration.
#[derive(Debug, Clone)]
pub struct PhysicsThreadConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Cap on `delta`, in nominal ticks. A stall longer than this is
    /// absorbed rather than simulated.
    pub max_delta: f64,
}

impl Default for PhysicsThreadConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_delta: 4.0,
        }
    }
}

struct Control {
    tick_fn: Option<TickFn>,
    /// Bumped on every install so an in-flight tick knows its callback
    /// was replaced and must not be put back.
    epoch: u64,
}

struct Shared {
    control: Mutex<Control>,
    tick_mutex: Mutex<()>,
    tick_ended: Semaphore,
    quit: AtomicBool,
    ticks: AtomicU64,
    lod: Option<Arc<LodHandoff>>,
    config: PhysicsThreadConfig,
}

/// Handle to the running physics thread.
pub struct PhysicsThread {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl PhysicsThread {
    /// Start the thread. With a [`LodHandoff`] attached, each tick waits
    /// for the LOD pass to end before running and releases it afterwards.
    #[must_use]
    pub fn spawn(config: PhysicsThreadConfig, lod: Option<Arc<LodHandoff>>) -> Self {
        let shared = Arc::new(Shared {
            control: Mutex::new(Control {
                tick_fn: None,
                epoch: 0,
            }),
            tick_mutex: Mutex::new(()),
            tick_ended: Semaphore::new(0),
            quit: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            lod,
            config,
        });
        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("engine-physics".to_string())
            .spawn(move || thread_main(&thread_shared))
            .expect("failed to spawn physics thread");
        info!(
            tick_rate = shared.config.tick_rate,
            "physics thread started"
        );
        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Install (or clear) the tick callback. Takes effect on the next
    /// tick; a tick already in flight finishes with the old callback.
    pub fn set_tick_fn(&self, tick_fn: Option<TickFn>) {
        let mut control = self
            .shared
            .control
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        control.epoch += 1;
        control.tick_fn = tick_fn;
    }

    /// Take the tick mutex for a consistent read of world state. Blocks
    /// until the current tick completes.
    pub fn lock_tick(&self) -> MutexGuard<'_, ()> {
        self.shared
            .tick_mutex
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Completed tick count.
    #[must_use]
    pub fn ticks_completed(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Block until at least one more tick completes, up to `timeout`.
    /// Returns `true` if a tick-ended signal was consumed.
    pub fn wait_tick_ended(&self, timeout: Duration) -> bool {
        self.shared.tick_ended.wait_timeout(timeout)
    }

    /// Ask the thread to exit after the current iteration and join it.
    pub fn shutdown(mut self) {
        self.request_shutdown();
    }

    fn request_shutdown(&mut self) {
        self.shared.quit.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!("physics thread joined");
    }
}

impl Drop for PhysicsThread {
    fn drop(&mut self) {
        self.request_shutdown();
    }
}

fn thread_main(shared: &Shared) {
    let target = Duration::from_secs_f64(1.0 / shared.config.tick_rate);
    let mut last_tick = target.as_secs_f64();

    loop {
        let start = Instant::now();
        if shared.quit.load(Ordering::Acquire) {
            return;
        }
        // Drain a stale tick-ended permit so the count never grows
        // unbounded when nobody waits on it.
        shared.tick_ended.try_wait();

        let (tick_fn, epoch) = {
            let mut control = shared.control.lock().unwrap_or_else(|e| e.into_inner());
            (control.tick_fn.take(), control.epoch)
        };

        let Some(mut tick_fn) = tick_fn else {
            // Nothing installed; idle at the tick rate without spinning.
            std::thread::sleep(target);
            continue;
        };

        {
            let _tick = shared.tick_mutex.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(lod) = &shared.lod {
                // Bounded waits so a shutdown request can interrupt the
                // handoff.
                loop {
                    if lod.wait_until_ended_timeout(LOD_WAIT_POLL) {
                        break;
                    }
                    if shared.quit.load(Ordering::Acquire) {
                        return;
                    }
                }
            }
            // delta is the portion of one nominal tick the previous tick
            // took, idle time included.
            let delta = last_tick / target.as_secs_f64();
            tick_fn(delta);
            shared.ticks.fetch_add(1, Ordering::Release);
            if let Some(lod) = &shared.lod {
                lod.signal_can_start();
            }
        }
        shared.tick_ended.signal();

        {
            let mut control = shared.control.lock().unwrap_or_else(|e| e.into_inner());
            if control.epoch == epoch {
                control.tick_fn = Some(tick_fn);
            }
        }

        let elapsed = start.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        } else {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = target.as_millis() as u64,
                "tick exceeded time budget"
            );
        }
        let total = start.elapsed().as_secs_f64();
        last_tick = total.min(target.as_secs_f64() * shared.config.max_delta);
    }
}
