//! Double-buffered input edges.
//!
//! The main thread records just-pressed/just-released edges into a working
//! frame as OS events arrive. At the start of each physics tick the reader
//! swaps the working frame for its private one, giving the tick a
//! consistent, non-torn snapshot without a lock on every key query.

use std::sync::{Arc, Mutex};

/// Tracked key scancodes. Every code is tracked whether or not it is
/// bound.
pub const MAX_SCANCODES: usize = 512;

/// Tracked mouse buttons.
pub const MAX_MOUSE_BUTTONS: usize = 5;

/// One tick's worth of input edges.
#[derive(Clone)]
pub struct InputFrame {
    keys_pressed: [bool; MAX_SCANCODES],
    keys_released: [bool; MAX_SCANCODES],
    mouse_pressed: [bool; MAX_MOUSE_BUTTONS],
    mouse_released: [bool; MAX_MOUSE_BUTTONS],
}

impl InputFrame {
    fn empty() -> Self {
        Self {
            keys_pressed: [false; MAX_SCANCODES],
            keys_released: [false; MAX_SCANCODES],
            mouse_pressed: [false; MAX_MOUSE_BUTTONS],
            mouse_released: [false; MAX_MOUSE_BUTTONS],
        }
    }

    fn clear(&mut self) {
        *self = Self::empty();
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for InputFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pressed = self.keys_pressed.iter().filter(|p| **p).count();
        let released = self.keys_released.iter().filter(|p| **p).count();
        f.debug_struct("InputFrame")
            .field("keys_pressed", &pressed)
            .field("keys_released", &released)
            .finish_non_exhaustive()
    }
}

/// Writer half, held by the main thread's event pump.
#[derive(Debug, Clone)]
pub struct InputCollector {
    working: Arc<Mutex<InputFrame>>,
}

impl InputCollector {
    /// Record a key-down edge.
    pub fn key_pressed(&self, scancode: usize) {
        if scancode >= MAX_SCANCODES {
            return;
        }
        let mut frame = self.working.lock().unwrap_or_else(|e| e.into_inner());
        frame.keys_pressed[scancode] = true;
    }

    /// Record a key-up edge.
    pub fn key_released(&self, scancode: usize) {
        if scancode >= MAX_SCANCODES {
            return;
        }
        let mut frame = self.working.lock().unwrap_or_else(|e| e.into_inner());
        frame.keys_released[scancode] = true;
    }

    /// Record a mouse-button-down edge.
    pub fn mouse_pressed(&self, button: usize) {
        if button >= MAX_MOUSE_BUTTONS {
            return;
        }
        let mut frame = self.working.lock().unwrap_or_else(|e| e.into_inner());
        frame.mouse_pressed[button] = true;
    }

    /// Record a mouse-button-up edge.
    pub fn mouse_released(&self, button: usize) {
        if button >= MAX_MOUSE_BUTTONS {
            return;
        }
        let mut frame = self.working.lock().unwrap_or_else(|e| e.into_inner());
        frame.mouse_released[button] = true;
    }
}

/// Reader half, owned by the physics thread.
#[derive(Debug)]
pub struct InputReader {
    working: Arc<Mutex<InputFrame>>,
    frame: InputFrame,
}

impl InputReader {
    /// Swap buffers at tick start: the working frame becomes this tick's
    /// snapshot and a cleared frame goes back for the main thread to fill.
    pub fn begin_tick(&mut self) {
        let mut working = self.working.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::swap(&mut *working, &mut self.frame);
        working.clear();
    }

    /// Was the key pressed during the snapshot tick?
    #[must_use]
    pub fn key_just_pressed(&self, scancode: usize) -> bool {
        scancode < MAX_SCANCODES && self.frame.keys_pressed[scancode]
    }

    /// Was the key released during the snapshot tick?
    #[must_use]
    pub fn key_just_released(&self, scancode: usize) -> bool {
        scancode < MAX_SCANCODES && self.frame.keys_released[scancode]
    }

    /// Was the mouse button pressed during the snapshot tick?
    #[must_use]
    pub fn mouse_just_pressed(&self, button: usize) -> bool {
        button < MAX_MOUSE_BUTTONS && self.frame.mouse_pressed[button]
    }

    /// Was the mouse button released during the snapshot tick?
    #[must_use]
    pub fn mouse_just_released(&self, button: usize) -> bool {
        button < MAX_MOUSE_BUTTONS && self.frame.mouse_released[button]
    }
}

/// Create a connected collector/reader pair.
#[must_use]
pub fn input_pair() -> (InputCollector, InputReader) {
    let working = Arc::new(Mutex::new(InputFrame::empty()));
    (
        InputCollector {
            working: Arc::clone(&working),
        },
        InputReader {
            working,
            frame: InputFrame::empty(),
        },
    )
}
