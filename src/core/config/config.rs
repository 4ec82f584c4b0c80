use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Rocket Boost".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Upward acceleration while thrust is held (px/s^2; the rocket has unit mass).
    pub thrust_strength: f32,
    /// Steering rate in degrees per second at full axis deflection.
    pub rotation_strength: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            thrust_strength: 2500.0,
            rotation_strength: 180.0,
            gravity_scale: 1.0,
            linear_damping: 0.4,
            angular_damping: 2.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Health the player starts each level with.
    pub starting_health: u32,
    /// Seconds between a success/crash and the follow-up level load.
    pub level_load_delay: f32,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_health: 3,
            level_load_delay: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub engine: String,
    pub success: String,
    pub crash: String,
}
impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            engine: "audio/main_engine.ogg".into(),
            success: "audio/success.ogg".into(),
            crash: "audio/crash.ogg".into(),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub session: SessionConfig,
    pub audio: AudioConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    #[allow(dead_code)]
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Merge every readable path in order (later files override earlier keys),
    /// falling back to defaults when nothing parses. Returns the config plus
    /// the used paths and accumulated per-file errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        let mut replaced = false;
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                let val = incoming.take().unwrap();
                                merge_value(ev, val);
                                replaced = true;
                                break;
                            }
                        }
                        if !replaced {
                            bm.insert(k, incoming.unwrap());
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                // A missing layer is not an error; layers are optional.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        if let Some(val) = merged {
            match val.clone().into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => (GameConfig::default(), used, {
                    let mut evec = errors;
                    evec.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    evec
                }),
            }
        } else {
            (GameConfig::default(), used, errors)
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.player.thrust_strength <= 0.0 {
            w.push("player.thrust_strength must be > 0; the rocket cannot lift off".into());
        }
        if self.player.rotation_strength <= 0.0 {
            w.push("player.rotation_strength must be > 0; the rocket cannot steer".into());
        }
        if self.player.gravity_scale < 0.0 {
            w.push(format!(
                "player.gravity_scale {} negative; rocket falls upward",
                self.player.gravity_scale
            ));
        }
        if !(0.0..=10.0).contains(&self.player.linear_damping) {
            w.push(format!(
                "player.linear_damping {} outside 0..10 typical bounds",
                self.player.linear_damping
            ));
        }
        if self.session.starting_health == 0 {
            w.push("session.starting_health is 0; first hazard contact is instantly fatal".into());
        }
        if self.session.starting_health > 99 {
            w.push(format!(
                "session.starting_health {} very high; HUD expects a small count",
                self.session.starting_health
            ));
        }
        if self.session.level_load_delay < 0.0 {
            w.push("session.level_load_delay negative -> treated as immediate".into());
        } else if self.session.level_load_delay > 30.0 {
            w.push(format!(
                "session.level_load_delay {}s very long; the game appears hung after landing",
                self.session.level_load_delay
            ));
        }
        for (label, path) in [
            ("audio.engine", &self.audio.engine),
            ("audio.success", &self.audio.success),
            ("audio.crash", &self.audio.crash),
        ] {
            if path.trim().is_empty() {
                w.push(format!("{label} path empty; clip will be silent"));
            }
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_empty());
    }

    #[test]
    fn parses_partial_ron_with_defaults() {
        let cfg: GameConfig =
            ron::from_str("(session: (starting_health: 5))").expect("partial RON should parse");
        assert_eq!(cfg.session.starting_health, 5);
        assert_eq!(cfg.session.level_load_delay, 2.0);
        assert_eq!(cfg.window.title, "Rocket Boost");
    }

    #[test]
    fn validate_flags_zero_health_and_bad_strengths() {
        let mut cfg = GameConfig::default();
        cfg.session.starting_health = 0;
        cfg.player.thrust_strength = 0.0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("starting_health")));
        assert!(warnings.iter().any(|w| w.contains("thrust_strength")));
    }

    #[test]
    fn layered_load_later_overrides_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("game.ron");
        let local = dir.path().join("game.local.ron");
        std::fs::write(&base, "(session: (starting_health: 3, level_load_delay: 2.0))").unwrap();
        std::fs::write(&local, "(session: (starting_health: 7))").unwrap();
        let (cfg, used, errors) = GameConfig::load_layered([&base, &local]);
        assert_eq!(used.len(), 2, "both layers should be read: {errors:?}");
        assert_eq!(cfg.session.starting_health, 7);
        assert_eq!(cfg.session.level_load_delay, 2.0);
    }
}
