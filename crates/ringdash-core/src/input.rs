use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical game keys. Device mapping happens outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Special ability trigger (boost, flight, punch).
    Ability,
    /// Cycle the active party member.
    Switch,
    /// Manual climb while hovering.
    Up,
    /// Manual descent while hovering.
    Down,
}

/// Held keys plus per-frame press/release edges.
///
/// Edges are what the jump buffer and ability triggers consume, so a key
/// held across many frames only produces a single press.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keys currently held down.
    pub keys_down: HashSet<Key>,
    /// Keys pressed this frame (cleared each frame).
    pub keys_just_pressed: HashSet<Key>,
    /// Keys released this frame (cleared each frame).
    pub keys_just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down event. Repeats while held are not new presses.
    pub fn on_key_down(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Register a key up event.
    pub fn on_key_up(&mut self, key: Key) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Replace the held set with `held`, deriving edges against the previous
    /// frame. Used by scripted playback, which only records held state.
    pub fn set_held(&mut self, held: &[Key]) {
        let next: HashSet<Key> = held.iter().copied().collect();
        for key in self.keys_down.difference(&next) {
            self.keys_just_released.insert(*key);
        }
        for key in next.difference(&self.keys_down) {
            self.keys_just_pressed.insert(*key);
        }
        self.keys_down = next;
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Horizontal intent in {-1, 0, 1}. Opposing keys cancel.
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_key_down(Key::Left) {
            axis -= 1.0;
        }
        if self.is_key_down(Key::Right) {
            axis += 1.0;
        }
        axis
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut input = InputState::new();
        input.on_key_down(Key::Jump);
        assert!(input.is_key_down(Key::Jump));
        assert!(input.is_key_just_pressed(Key::Jump));

        input.end_frame();
        assert!(input.is_key_down(Key::Jump));
        assert!(!input.is_key_just_pressed(Key::Jump));

        input.on_key_up(Key::Jump);
        assert!(!input.is_key_down(Key::Jump));
        assert!(input.is_key_just_released(Key::Jump));
    }

    #[test]
    fn duplicate_key_down_not_just_pressed_twice() {
        let mut input = InputState::new();
        input.on_key_down(Key::Jump);
        input.end_frame();
        input.on_key_down(Key::Jump); // held repeat
        assert!(
            !input.is_key_just_pressed(Key::Jump),
            "Auto-repeat of a held key must not count as a new press"
        );
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.on_key_up(Key::Left);
        assert!(!input.is_key_just_released(Key::Left));
    }

    #[test]
    fn set_held_derives_edges() {
        let mut input = InputState::new();
        input.set_held(&[Key::Right, Key::Jump]);
        assert!(input.is_key_just_pressed(Key::Right));
        assert!(input.is_key_just_pressed(Key::Jump));

        input.end_frame();
        input.set_held(&[Key::Right]);
        assert!(!input.is_key_just_pressed(Key::Right));
        assert!(input.is_key_just_released(Key::Jump));
        assert!(input.is_key_down(Key::Right));
    }

    #[test]
    fn move_axis_cancels_opposing_keys() {
        let mut input = InputState::new();
        input.set_held(&[Key::Left]);
        assert_eq!(input.move_axis(), -1.0);
        input.set_held(&[Key::Left, Key::Right]);
        assert_eq!(input.move_axis(), 0.0);
        input.set_held(&[Key::Right]);
        assert_eq!(input.move_axis(), 1.0);
    }

    #[test]
    fn keys_deserialize_snake_case() {
        let keys: Vec<Key> = serde_json::from_str(r#"["left","jump","ability"]"#).unwrap();
        assert_eq!(keys, vec![Key::Left, Key::Jump, Key::Ability]);
    }
}
