//! Keyboard input
//!
//! The host forwards raw `KeyboardEvent.code` strings; the simulation only
//! ever asks which actions are held (movement) or were just pressed (the
//! edge-triggered ones).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    TogglePause,
    ReleaseBall,
    /// Raise the time scale (slower motion)
    SlowDown,
    /// Lower the time scale (faster motion)
    SpeedUp,
}

impl Action {
    /// Edge-triggered actions fire once per key press; the rest are polled while held
    pub fn is_edge_triggered(self) -> bool {
        !matches!(self, Action::MoveLeft | Action::MoveRight)
    }
}

/// Key codes bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub toggle_pause: Vec<String>,
    pub release_ball: Vec<String>,
    pub slow_down: Vec<String>,
    pub speed_up: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let codes = |list: &[&str]| list.iter().map(|c| c.to_string()).collect();
        Self {
            move_left: codes(&["ArrowLeft", "KeyA"]),
            move_right: codes(&["ArrowRight", "KeyD"]),
            toggle_pause: codes(&["Enter"]),
            release_ball: codes(&["Space"]),
            slow_down: codes(&["BracketLeft"]),
            speed_up: codes(&["BracketRight"]),
        }
    }
}

impl KeyBindings {
    pub fn codes(&self, action: Action) -> &[String] {
        match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::TogglePause => &self.toggle_pause,
            Action::ReleaseBall => &self.release_ball,
            Action::SlowDown => &self.slow_down,
            Action::SpeedUp => &self.speed_up,
        }
    }

    /// Action bound to a key code, if any
    pub fn action_for(&self, code: &str) -> Option<Action> {
        [
            Action::MoveLeft,
            Action::MoveRight,
            Action::TogglePause,
            Action::ReleaseBall,
            Action::SlowDown,
            Action::SpeedUp,
        ]
        .into_iter()
        .find(|action| self.codes(*action).iter().any(|c| c == code))
    }
}

/// Polled key map plus a queue of edge-triggered presses
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    bindings: KeyBindings,
    held: HashSet<String>,
    pressed: Vec<Action>,
}

impl Keyboard {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed: Vec::new(),
        }
    }

    /// Record a keydown; auto-repeat of an already held key is ignored
    pub fn key_down(&mut self, code: &str) {
        if !self.held.insert(code.to_string()) {
            return;
        }
        if let Some(action) = self.bindings.action_for(code) {
            if action.is_edge_triggered() {
                self.pressed.push(action);
            }
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    pub fn is_key_pressed(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Any key bound to `action` is down
    pub fn is_held(&self, action: Action) -> bool {
        self.bindings
            .codes(action)
            .iter()
            .any(|code| self.is_key_pressed(code))
    }

    /// Take the edge-triggered actions pressed since the last call, in order
    pub fn take_pressed(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pressed)
    }

    /// Forget every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for("KeyA"), Some(Action::MoveLeft));
        assert_eq!(bindings.action_for("ArrowRight"), Some(Action::MoveRight));
        assert_eq!(bindings.action_for("Enter"), Some(Action::TogglePause));
        assert_eq!(bindings.action_for("Space"), Some(Action::ReleaseBall));
        assert_eq!(bindings.action_for("BracketLeft"), Some(Action::SlowDown));
        assert_eq!(bindings.action_for("BracketRight"), Some(Action::SpeedUp));
        assert_eq!(bindings.action_for("KeyQ"), None);
    }

    #[test]
    fn test_held_movement() {
        let mut keyboard = Keyboard::default();
        keyboard.key_down("ArrowLeft");
        assert!(keyboard.is_key_pressed("ArrowLeft"));
        assert!(keyboard.is_held(Action::MoveLeft));
        assert!(!keyboard.is_held(Action::MoveRight));
        // Movement is level-triggered, never queued
        assert!(keyboard.take_pressed().is_empty());

        keyboard.key_down("KeyA");
        keyboard.key_up("ArrowLeft");
        assert!(keyboard.is_held(Action::MoveLeft));
        keyboard.key_up("KeyA");
        assert!(!keyboard.is_held(Action::MoveLeft));
    }

    #[test]
    fn test_edge_triggered_ignores_repeat() {
        let mut keyboard = Keyboard::default();
        keyboard.key_down("Enter");
        keyboard.key_down("Enter");
        keyboard.key_down("Enter");
        assert_eq!(keyboard.take_pressed(), vec![Action::TogglePause]);
        assert!(keyboard.take_pressed().is_empty());

        keyboard.key_up("Enter");
        keyboard.key_down("Enter");
        keyboard.key_down("BracketLeft");
        assert_eq!(
            keyboard.take_pressed(),
            vec![Action::TogglePause, Action::SlowDown]
        );
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = KeyBindings {
            release_ball: vec!["KeyW".into()],
            ..Default::default()
        };
        let mut keyboard = Keyboard::new(bindings);
        keyboard.key_down("Space");
        keyboard.key_down("KeyW");
        assert_eq!(keyboard.take_pressed(), vec![Action::ReleaseBall]);
    }

    #[test]
    fn test_release_all() {
        let mut keyboard = Keyboard::default();
        keyboard.key_down("ArrowRight");
        keyboard.release_all();
        assert!(!keyboard.is_held(Action::MoveRight));
    }
}
