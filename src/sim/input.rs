//! Player input
//!
//! [`InputState`] is fed by the platform's key listener. Once per frame the
//! driver takes a [`FrameInput`] snapshot from it; movement keys are level
//! triggered while fire is edge triggered (one volley per press).

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Fire),
            "Escape" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Input for a single frame (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// A fire press happened since the previous frame
    pub fire: bool,
}

/// Live key state between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    fire_held: bool,
    fire_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => {
                // Auto-repeat keydowns do not count as new presses
                if !self.fire_held {
                    self.fire_pending = true;
                }
                self.fire_held = true;
            }
            Key::Pause => {}
        }
    }

    pub fn release(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Fire => self.fire_held = false,
            Key::Pause => {}
        }
    }

    /// Snapshot for this frame, consuming any pending fire press
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            left: self.left,
            right: self.right,
            fire: std::mem::take(&mut self.fire_pending),
        }
    }

    /// Forget every key (session start/reset)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_is_consumed_once() {
        let mut input = InputState::new();
        input.press(Key::Fire);
        assert!(input.take_frame().fire);
        assert!(!input.take_frame().fire);
    }

    #[test]
    fn test_fire_repeat_needs_release() {
        let mut input = InputState::new();
        input.press(Key::Fire);
        input.take_frame();
        input.press(Key::Fire);
        assert!(!input.take_frame().fire);

        input.release(Key::Fire);
        input.press(Key::Fire);
        assert!(input.take_frame().fire);
    }

    #[test]
    fn test_tap_between_frames_still_fires() {
        let mut input = InputState::new();
        input.press(Key::Fire);
        input.release(Key::Fire);
        assert!(input.take_frame().fire);
    }

    #[test]
    fn test_movement_is_held() {
        let mut input = InputState::new();
        input.press(Key::Left);
        assert!(input.take_frame().left);
        assert!(input.take_frame().left);
        input.release(Key::Left);
        assert_eq!(input.take_frame(), FrameInput::default());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("Space"), Some(Key::Fire));
        assert_eq!(Key::from_code("Escape"), Some(Key::Pause));
        assert_eq!(Key::from_code("KeyQ"), None);
    }
}
