//! Abstract input commands and the one canonical key table.
//!
//! The core only ever sees `InputCommand`. `KeyBindings` is offered to the
//! input layer so every front end agrees on which key drives which axis:
//! W/S are always the forward axis and Space is always jump, in both
//! locomotion modes. Platform mode simply ignores the forward axis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One tick's worth of player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputCommand {
    /// +1 forward, -1 back.
    pub forward: f32,
    /// +1 right, -1 left.
    pub strafe: f32,
    /// Yaw change this tick in radians (free-roam look).
    pub turn: f32,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
    pub interact: bool,
}

impl InputCommand {
    /// Copy with axes clamped to [-1, 1] and non-finite values zeroed.
    pub fn sanitized(&self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        }
        Self {
            forward: axis(self.forward),
            strafe: axis(self.strafe),
            turn: if self.turn.is_finite() { self.turn } else { 0.0 },
            ..*self
        }
    }

    pub fn has_movement(&self) -> bool {
        self.forward != 0.0 || self.strafe != 0.0
    }
}

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    Sprint,
    Interact,
    Inventory,
    Pause,
}

/// Key name (as the platform reports it) to action.
pub struct KeyBindings {
    map: HashMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let table: &[(&[&str], Action)] = &[
            (&["w", "W", "ArrowUp"], Action::MoveForward),
            (&["s", "S", "ArrowDown"], Action::MoveBackward),
            (&["a", "A", "ArrowLeft"], Action::MoveLeft),
            (&["d", "D", "ArrowRight"], Action::MoveRight),
            (&[" "], Action::Jump),
            (&["Control", "c", "C"], Action::Crouch),
            (&["Shift"], Action::Sprint),
            (&["e", "E", "Enter"], Action::Interact),
            (&["Tab", "i", "I"], Action::Inventory),
            (&["Escape", "p", "P"], Action::Pause),
        ];
        let mut map = HashMap::new();
        for (keys, action) in table {
            for key in *keys {
                map.insert((*key).to_string(), *action);
            }
        }
        Self { map }
    }
}

impl KeyBindings {
    pub fn action(&self, key: &str) -> Option<Action> {
        self.map.get(key).copied()
    }

    /// Rebind a key. Returns the action it was bound to before, if any.
    pub fn bind(&mut self, key: impl Into<String>, action: Action) -> Option<Action> {
        self.map.insert(key.into(), action)
    }

    /// Fold the currently held keys into a command. Opposing keys cancel.
    pub fn resolve<'a>(&self, held: impl IntoIterator<Item = &'a str>, turn: f32) -> InputCommand {
        let mut cmd = InputCommand {
            turn,
            ..InputCommand::default()
        };
        let (mut fwd, mut back, mut left, mut right) = (false, false, false, false);
        for key in held {
            match self.action(key) {
                Some(Action::MoveForward) => fwd = true,
                Some(Action::MoveBackward) => back = true,
                Some(Action::MoveLeft) => left = true,
                Some(Action::MoveRight) => right = true,
                Some(Action::Jump) => cmd.jump = true,
                Some(Action::Crouch) => cmd.crouch = true,
                Some(Action::Sprint) => cmd.sprint = true,
                Some(Action::Interact) => cmd.interact = true,
                // Menu actions belong to the session layer.
                Some(Action::Inventory) | Some(Action::Pause) | None => {}
            }
        }
        cmd.forward = fwd as i8 as f32 - back as i8 as f32;
        cmd.strafe = right as i8 as f32 - left as i8 as f32;
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_axes() {
        let keys = KeyBindings::default();
        let cmd = keys.resolve(["w", "d", "Shift"], 0.0);
        assert_eq!(cmd.forward, 1.0);
        assert_eq!(cmd.strafe, 1.0);
        assert!(cmd.sprint);
        assert!(!cmd.jump);
    }

    #[test]
    fn opposing_keys_cancel() {
        let keys = KeyBindings::default();
        let cmd = keys.resolve(["ArrowLeft", "ArrowRight", "s"], 0.0);
        assert_eq!(cmd.strafe, 0.0);
        assert_eq!(cmd.forward, -1.0);
    }

    #[test]
    fn space_jumps_and_w_does_not() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action(" "), Some(Action::Jump));
        assert_eq!(keys.action("W"), Some(Action::MoveForward));
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut keys = KeyBindings::default();
        assert_eq!(keys.bind("c", Action::Interact), Some(Action::Crouch));
        assert!(keys.resolve(["c"], 0.0).interact);
    }

    #[test]
    fn sanitize_clamps_axes() {
        let cmd = InputCommand {
            forward: 3.0,
            strafe: f32::NAN,
            turn: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cmd.forward, 1.0);
        assert_eq!(cmd.strafe, 0.0);
        assert_eq!(cmd.turn, 0.0);
    }
}
