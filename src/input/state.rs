//! Keyboard and mouse state

use glam::DVec2;
use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Polled input state, fed by window events (or a script) and queried by
/// behaviors during their input hook
#[derive(Debug, Default)]
pub struct Input {
    pressed_keys: FxHashSet<KeyCode>,
    just_pressed_keys: FxHashSet<KeyCode>,
    just_released_keys: FxHashSet<KeyCode>,
    pressed_buttons: FxHashSet<MouseButton>,
    just_pressed_buttons: FxHashSet<MouseButton>,
    mouse_position: DVec2,
}

impl Input {
    /// Create an idle input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the per-frame edges; call once the frame's input phase is over
    pub fn end_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_buttons.clear();
    }

    /// Release everything (focus loss, scene change)
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
        self.pressed_buttons.clear();
        self.end_frame();
    }

    /// Record a keyboard event
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&key) {
                    self.just_released_keys.insert(key);
                }
            }
        }
    }

    /// Record a mouse button event
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
            }
            ElementState::Released => {
                self.pressed_buttons.remove(&button);
            }
        }
    }

    /// Record the cursor position in surface pixels
    pub fn process_mouse_motion(&mut self, position: DVec2) {
        self.mouse_position = position;
    }

    /// Shorthand for a key press
    pub fn press(&mut self, key: KeyCode) {
        self.process_keyboard(key, ElementState::Pressed);
    }

    /// Shorthand for a key release
    pub fn release(&mut self, key: KeyCode) {
        self.process_keyboard(key, ElementState::Released);
    }

    /// Key is held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Key went down this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Key went up this frame
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Either shift key is held
    pub fn shift(&self) -> bool {
        self.is_key_pressed(KeyCode::ShiftLeft) || self.is_key_pressed(KeyCode::ShiftRight)
    }

    /// Either control key is held
    pub fn ctrl(&self) -> bool {
        self.is_key_pressed(KeyCode::ControlLeft) || self.is_key_pressed(KeyCode::ControlRight)
    }

    /// Either alt key is held
    pub fn alt(&self) -> bool {
        self.is_key_pressed(KeyCode::AltLeft) || self.is_key_pressed(KeyCode::AltRight)
    }

    /// Mouse button is held
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Mouse button went down this frame
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    /// Last cursor position
    pub fn mouse_position(&self) -> DVec2 {
        self.mouse_position
    }
}

/// Parse a key name as used in scripts and configuration (`"left"`, `"space"`, `"a"`...)
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let name = name.trim().to_ascii_lowercase();
    let key = match name.as_str() {
        "left" => KeyCode::ArrowLeft,
        "right" => KeyCode::ArrowRight,
        "up" => KeyCode::ArrowUp,
        "down" => KeyCode::ArrowDown,
        "space" => KeyCode::Space,
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Escape,
        "shift" => KeyCode::ShiftLeft,
        "ctrl" | "control" => KeyCode::ControlLeft,
        "alt" => KeyCode::AltLeft,
        "a" => KeyCode::KeyA,
        "d" => KeyCode::KeyD,
        "p" => KeyCode::KeyP,
        "r" => KeyCode::KeyR,
        "s" => KeyCode::KeyS,
        "w" => KeyCode::KeyW,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edges() {
        let mut input = Input::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyA);
        assert!(input.is_key_pressed(KeyCode::KeyA));
        assert!(input.is_key_just_pressed(KeyCode::KeyA));

        input.end_frame();
        assert!(input.is_key_pressed(KeyCode::KeyA));
        assert!(!input.is_key_just_pressed(KeyCode::KeyA));

        input.release(KeyCode::KeyA);
        assert!(!input.is_key_pressed(KeyCode::KeyA));
        assert!(input.is_key_just_released(KeyCode::KeyA));
    }

    #[test]
    fn test_modifiers() {
        let mut input = Input::new();
        assert!(!input.shift() && !input.ctrl() && !input.alt());

        input.press(KeyCode::ShiftRight);
        input.press(KeyCode::ControlLeft);
        assert!(input.shift());
        assert!(input.ctrl());
        assert!(!input.alt());

        input.clear();
        assert!(!input.shift());
        assert!(!input.is_key_just_pressed(KeyCode::ShiftRight));
    }

    #[test]
    fn test_mouse_buttons() {
        let mut input = Input::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_mouse_motion(DVec2::new(10.0, 4.0));
        assert!(input.is_mouse_button_just_pressed(MouseButton::Left));
        assert_eq!(input.mouse_position(), DVec2::new(10.0, 4.0));

        input.end_frame();
        assert!(input.is_mouse_button_pressed(MouseButton::Left));
        assert!(!input.is_mouse_button_just_pressed(MouseButton::Left));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_from_name(" Left "), Some(KeyCode::ArrowLeft));
        assert_eq!(key_from_name("space"), Some(KeyCode::Space));
        assert_eq!(key_from_name("f13"), None);
    }
}
