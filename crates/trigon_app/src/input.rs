pub use winit::keyboard::KeyCode;

use std::collections::HashMap;
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::PhysicalKey,
};

/// Keyboard state, sampled once per frame
#[derive(Default)]
pub struct Input {
    keyboard: HashMap<KeyCode, (ElementState, ElementState)>,
}

impl Input {
    /// Update keyboard state from a `winit` KeyEvent
    pub(crate) fn keyboard(&mut self, event: KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.set_key(key_code, event.state);
        }
    }

    fn set_key(&mut self, key: KeyCode, state: ElementState) {
        let prev = self
            .keyboard
            .get(&key)
            .map_or(ElementState::Released, |(curr, _)| *curr);
        self.keyboard.insert(key, (state, prev));
    }

    /// Update previous states & clean up released keys
    pub(crate) fn end_frame(&mut self) {
        for (curr, prev) in self.keyboard.values_mut() {
            *prev = *curr;
        }

        // Drop released keys to avoid buildup
        self.keyboard
            .retain(|_, (curr, _)| *curr != ElementState::Released);
    }

    /// True if the key went from not pressed last frame to pressed this frame
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.get(&key).is_some_and(|(curr, prev)| {
            *curr == ElementState::Pressed && *prev != ElementState::Pressed
        })
    }

    /// True if key is held down (pressed now regardless of last frame)
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keyboard
            .get(&key)
            .is_some_and(|(curr, _)| *curr == ElementState::Pressed)
    }

    /// True if key was just released this frame
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keyboard
            .get(&key)
            .is_some_and(|(curr, _)| *curr == ElementState::Released)
    }
}

#[cfg(test)]
impl Input {
    pub fn inject_key(&mut self, key: KeyCode, state: ElementState) {
        self.set_key(key, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState::{Pressed, Released};

    #[test]
    fn key_press_and_release_behavior() {
        // test key press -> hold -> release flow
        let mut input = Input::default();
        input.inject_key(KeyCode::Escape, Pressed);
        assert!(input.key_pressed(KeyCode::Escape));
        assert!(input.key_held(KeyCode::Escape));
        assert!(!input.key_released(KeyCode::Escape));

        input.end_frame(); // clears pressed flag
        assert!(!input.key_pressed(KeyCode::Escape));
        assert!(input.key_held(KeyCode::Escape));

        input.inject_key(KeyCode::Escape, Released);
        assert!(input.key_released(KeyCode::Escape));
        assert!(!input.key_held(KeyCode::Escape));

        input.end_frame(); // drops released key from map
        assert!(!input.key_held(KeyCode::Escape));
        assert!(!input.key_released(KeyCode::Escape));
    }

    #[test]
    fn unrelated_keys_are_independent() {
        let mut input = Input::default();
        input.inject_key(KeyCode::KeyA, Pressed);

        assert!(input.key_held(KeyCode::KeyA));
        assert!(!input.key_held(KeyCode::Escape));
    }
}
