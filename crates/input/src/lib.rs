//! Keyboard and scroll input for the flight loop.
//!
//! One explicit state struct owned by the main loop replaces hidden per-key
//! debounce statics: "pressed this frame" is edge-triggered, "held" is level-
//! triggered, and `begin_frame` clears the per-frame sets.

use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse scroll state
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.scroll_delta = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a scroll-wheel event (positive = away from the user).
    pub fn process_scroll(&mut self, delta: f32) {
        self.scroll_delta += delta;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame (edge-triggered).
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Accumulated scroll delta for this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    // Flight controls

    /// Nose up (W).
    pub fn is_pitch_up_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyW)
    }

    /// Nose down (S).
    pub fn is_pitch_down_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyS)
    }

    /// Banked turn to the left (A).
    pub fn is_turn_left_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyA)
    }

    /// Banked turn to the right (D).
    pub fn is_turn_right_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyD)
    }

    /// True while any flight-control key is held (gates the roll stabilizer).
    pub fn any_control_held(&self) -> bool {
        self.is_pitch_up_held()
            || self.is_pitch_down_held()
            || self.is_turn_left_held()
            || self.is_turn_right_held()
    }

    /// Afterburner boost (Space).
    pub fn is_boost_held(&self) -> bool {
        self.is_key_held(KeyCode::Space)
    }

    /// Engine on/off toggle (F, one-shot per press).
    pub fn is_engine_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyF)
    }

    /// Leave the start menu (P).
    pub fn is_start_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyP)
    }

    /// Arm the round countdown (H, one-shot per press).
    pub fn is_countdown_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyH)
    }

    /// Switch to the nose camera (1).
    pub fn is_nose_view_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Digit1)
    }

    /// Switch to the chase camera (2).
    pub fn is_chase_view_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Digit2)
    }

    /// Fixed right-side debug view (Q, held).
    pub fn is_right_view_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyQ)
    }

    /// Fixed left-side debug view (E, held).
    pub fn is_left_view_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyE)
    }

    /// Fixed front debug view (X, held).
    pub fn is_front_view_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyX)
    }

    /// Quit (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
