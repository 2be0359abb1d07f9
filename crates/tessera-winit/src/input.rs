//! Keyboard state, fed from window events.

use tessera_core::alloc::HashSet;

use crate::event::{Event, KeyCode};

/// Which keys are held, and which went down this frame.
#[derive(Debug, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyInput(key) => {
                let Some(code) = key.code() else {
                    return;
                };
                if key.is_pressed() {
                    if self.pressed.insert(code) {
                        self.just_pressed.insert(code);
                    }
                } else {
                    self.pressed.remove(&code);
                }
            }
            Event::Focused(false) => self.pressed.clear(),
            _ => {}
        }
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Pressed since the last [`KeyboardState::end_frame`].
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.just_pressed.contains(&code)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ElementState, KeyEvent, PhysicalKey};

    fn key(code: KeyCode, state: ElementState, repeat: bool) -> Event {
        Event::KeyInput(KeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        })
    }

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyboardState::new();
        keys.handle_event(&key(KeyCode::KeyD, ElementState::Pressed, false));
        assert!(keys.is_pressed(KeyCode::KeyD));
        assert!(keys.just_pressed(KeyCode::KeyD));

        keys.end_frame();
        keys.handle_event(&key(KeyCode::KeyD, ElementState::Pressed, true));
        assert!(keys.is_pressed(KeyCode::KeyD));
        assert!(!keys.just_pressed(KeyCode::KeyD));

        keys.handle_event(&key(KeyCode::KeyD, ElementState::Released, false));
        assert!(!keys.is_pressed(KeyCode::KeyD));
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let mut keys = KeyboardState::new();
        keys.handle_event(&key(KeyCode::Space, ElementState::Pressed, false));
        keys.handle_event(&Event::Focused(false));
        assert!(!keys.is_pressed(KeyCode::Space));
    }
}
