//! Live control key state
//!
//! An explicit per-session resource: the host input system calls
//! `press`/`release` from its key events, the vehicle controller only reads.
//! A control that was never pressed is simply absent - there is no error
//! path for unknown keys.

use std::collections::HashSet;

/// Control identifiers the vehicle responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
}

/// Set of currently held controls
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Control>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down: mark a control as held
    pub fn press(&mut self, control: Control) {
        self.pressed.insert(control);
    }

    /// Key-up: release a control (no-op if it was not held)
    pub fn release(&mut self, control: Control) {
        self.pressed.remove(&control);
    }

    #[inline]
    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }

    /// Release everything (used when gameplay freezes)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
