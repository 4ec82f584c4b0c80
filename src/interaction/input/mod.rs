//! Small action map over the keyboard: named actions with rebindable key
//! lists, queried per tick as booleans plus a signed rotation axis.

use bevy::prelude::*;
use serde::Deserialize;
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Thrust,
    RotateLeft,
    RotateRight,
    Pause,
    /// Debug: immediate level advance.
    NextLevel,
    /// Debug: toggle collision handling.
    ToggleCollision,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Thrust,
        Action::RotateLeft,
        Action::RotateRight,
        Action::Pause,
        Action::NextLevel,
        Action::ToggleCollision,
    ];

    fn name(self) -> &'static str {
        match self {
            Action::Thrust => "Thrust",
            Action::RotateLeft => "RotateLeft",
            Action::RotateRight => "RotateRight",
            Action::Pause => "Pause",
            Action::NextLevel => "NextLevel",
            Action::ToggleCollision => "ToggleCollision",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == s)
    }

    fn default_bindings(self) -> SmallVec<[KeyCode; 2]> {
        match self {
            Action::Thrust => smallvec![KeyCode::Space, KeyCode::ArrowUp],
            Action::RotateLeft => smallvec![KeyCode::KeyA, KeyCode::ArrowLeft],
            Action::RotateRight => smallvec![KeyCode::KeyD, KeyCode::ArrowRight],
            Action::Pause => smallvec![KeyCode::KeyP, KeyCode::Escape],
            Action::NextLevel => smallvec![KeyCode::KeyL],
            Action::ToggleCollision => smallvec![KeyCode::KeyC],
        }
    }
}

/// Action -> key bindings.
#[derive(Resource, Debug, Clone)]
pub struct InputMap {
    bindings: HashMap<Action, SmallVec<[KeyCode; 2]>>,
}

impl Default for InputMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        for a in Action::ALL {
            bindings.insert(a, a.default_bindings());
        }
        Self { bindings }
    }
}

impl InputMap {
    pub fn pressed(&self, keys: &ButtonInput<KeyCode>, action: Action) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|b| b.iter().any(|k| keys.pressed(*k)))
    }

    pub fn just_pressed(&self, keys: &ButtonInput<KeyCode>, action: Action) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|b| b.iter().any(|k| keys.just_pressed(*k)))
    }

    /// Signed rotation axis: +1 left, -1 right, 0 when idle or both held.
    pub fn rotation_axis(&self, keys: &ButtonInput<KeyCode>) -> f32 {
        let left = self.pressed(keys, Action::RotateLeft);
        let right = self.pressed(keys, Action::RotateRight);
        (left as i8 - right as i8) as f32
    }

    fn apply_overrides(&mut self, file: BindingsFile) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, keys) in file.bindings {
            let Some(action) = Action::from_name(&name) else {
                errors.push(format!("unknown action '{name}'"));
                continue;
            };
            let mut parsed: SmallVec<[KeyCode; 2]> = SmallVec::new();
            for spec in &keys {
                match parse_key(spec) {
                    Some(k) => parsed.push(k),
                    None => errors.push(format!("[{name}] unknown key '{spec}'")),
                }
            }
            if parsed.is_empty() {
                errors.push(format!("[{name}] no valid keys; keeping defaults"));
            } else {
                self.bindings.insert(action, parsed);
            }
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

fn parse_key(s: &str) -> Option<KeyCode> {
    // Letters, digits, and the handful of named keys the bindings use.
    let k = match s {
        "Space" => KeyCode::Space,
        "Escape" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        other => return other.strip_prefix("Key").and_then(parse_letter),
    };
    Some(k)
}

fn parse_letter(rest: &str) -> Option<KeyCode> {
    let c = match rest {
        "A" => KeyCode::KeyA,
        "B" => KeyCode::KeyB,
        "C" => KeyCode::KeyC,
        "D" => KeyCode::KeyD,
        "E" => KeyCode::KeyE,
        "F" => KeyCode::KeyF,
        "G" => KeyCode::KeyG,
        "H" => KeyCode::KeyH,
        "I" => KeyCode::KeyI,
        "J" => KeyCode::KeyJ,
        "K" => KeyCode::KeyK,
        "L" => KeyCode::KeyL,
        "M" => KeyCode::KeyM,
        "N" => KeyCode::KeyN,
        "O" => KeyCode::KeyO,
        "P" => KeyCode::KeyP,
        "Q" => KeyCode::KeyQ,
        "R" => KeyCode::KeyR,
        "S" => KeyCode::KeyS,
        "T" => KeyCode::KeyT,
        "U" => KeyCode::KeyU,
        "V" => KeyCode::KeyV,
        "W" => KeyCode::KeyW,
        "X" => KeyCode::KeyX,
        "Y" => KeyCode::KeyY,
        "Z" => KeyCode::KeyZ,
        _ => return None,
    };
    Some(c)
}

pub struct InputActionsPlugin;

impl Plugin for InputActionsPlugin {
    fn build(&self, app: &mut App) {
        // Tests run without the winit input plugin; provide the key state.
        if app.world().get_resource::<ButtonInput<KeyCode>>().is_none() {
            app.init_resource::<ButtonInput<KeyCode>>();
        }
        app.init_resource::<InputMap>()
            .add_systems(PreStartup, load_binding_overrides);
    }
}

fn load_binding_overrides(mut input_map: ResMut<InputMap>) {
    let path =
        std::env::var("INPUT_CONFIG_PATH").unwrap_or_else(|_| "assets/config/input.ron".into());
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return; // defaults stay in force
    };
    match ron::from_str::<BindingsFile>(&raw) {
        Ok(file) => {
            let errors = input_map.apply_overrides(file);
            for e in &errors {
                error!(target: "input", "binding override: {e}");
            }
            if errors.is_empty() {
                info!(target: "input", "key bindings loaded from {path}");
            }
        }
        Err(e) => error!(target: "input", "parse {path}: {e}"),
    }
}
