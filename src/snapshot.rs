//! Per-frame window and pointer state
//!
//! The session latches pointer input between frames in a [`PointerLatch`].
//! The frame driver drains it once per iteration into a fresh
//! [`WindowStateSnapshot`], which lives for exactly one frame.

use crate::ui::touch::TouchEvent;

/// One frame's view of the window and pointer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowStateSnapshot {
    pub screen_width: f32,
    pub screen_height: f32,
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub pointer_pressed: bool,
    pub pointer_held: bool,
    pub pointer_released: bool,
    pub resized: bool,
    pub exit_requested: bool,
}

impl WindowStateSnapshot {
    /// Pointer fields as a touch event for the UI layer
    pub fn touch(&self) -> TouchEvent {
        TouchEvent {
            x: self.pointer_x,
            y: self.pointer_y,
            pressed: self.pointer_pressed,
            held: self.pointer_held,
            released: self.pointer_released,
        }
    }

    pub fn apply_pointer(&mut self, pointer: PointerState) {
        self.pointer_x = pointer.x;
        self.pointer_y = pointer.y;
        self.pointer_pressed = pointer.pressed;
        self.pointer_held = pointer.held;
        self.pointer_released = pointer.released;
    }
}

/// Pointer state drained from the latch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

/// Accumulates pointer events between two snapshot refreshes.
///
/// Press and release are edges: they stay set until [`PointerLatch::take`]
/// and are then cleared. Hold follows the button.
///
/// A release arriving before its press edge was taken is held back until
/// the following `take`, so a click never shows up as `pressed && released`
/// in a single snapshot.
#[derive(Debug, Clone, Default)]
pub struct PointerLatch {
    state: PointerState,
    deferred_release: bool,
}

impl PointerLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motion(&mut self, x: f32, y: f32) {
        self.state.x = x;
        self.state.y = y;
    }

    pub fn button_down(&mut self) {
        self.state.pressed = true;
        self.state.held = true;
        self.deferred_release = false;
    }

    pub fn button_up(&mut self) {
        if self.state.pressed {
            self.deferred_release = true;
            return;
        }
        self.state.released = true;
        self.state.held = false;
    }

    /// Pointer left the surface; a held button can no longer be released
    /// over it, so report the release now.
    pub fn leave(&mut self) {
        if self.state.held && !self.deferred_release {
            self.button_up();
        }
    }

    /// Current state; press and release edges are reset
    pub fn take(&mut self) -> PointerState {
        let out = self.state;
        self.state.pressed = false;
        self.state.released = false;
        if std::mem::take(&mut self.deferred_release) {
            self.state.released = true;
            self.state.held = false;
        }
        out
    }

    pub fn peek(&self) -> PointerState {
        self.state
    }
}
