//! Input handling for keyboard and pointer.

use glam::Vec2;
use std::collections::HashSet;

/// Keys that start a greeting.
pub const GREETING_KEYS: [KeyCode; 4] = [
    KeyCode::Enter,
    KeyCode::NumpadEnter,
    KeyCode::Space,
    KeyCode::KeyG,
];

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Cursor positions of left-button presses this frame, in order.
    pointer_presses: Vec<Vec2>,

    /// Cursor position in window coordinates.
    cursor_position: Vec2,
    /// Whether the cursor moved this frame.
    cursor_moved: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame has consumed its input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.pointer_presses.clear();
        self.cursor_moved = false;
    }

    /// Process a keyboard event. Auto-repeat does not count as a new press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event. Left presses are recorded at the current cursor.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) && button == MouseButton::Left {
                    self.pointer_presses.push(self.cursor_position);
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.cursor_position = Vec2::new(position.0 as f32, position.1 as f32);
        self.cursor_moved = true;
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Where the left button went down this frame.
    pub fn pointer_presses(&self) -> &[Vec2] {
        &self.pointer_presses
    }

    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    /// Check if any greeting key was pressed this frame.
    pub fn is_greeting_pressed(&self) -> bool {
        GREETING_KEYS.iter().any(|&k| self.is_key_pressed(k))
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// Check if mute was toggled (M).
    pub fn is_mute_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyM)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
