use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

/// Axis-aligned rectangular surface: fixed collider plus sprite.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PadSpec {
    pub pos: [f32; 2],
    pub half_extents: [f32; 2],
}

impl PadSpec {
    pub fn center(&self) -> Vec2 {
        Vec2::from(self.pos)
    }
    pub fn half(&self) -> Vec2 {
        Vec2::from(self.half_extents)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelSpec {
    pub id: String,
    pub player_start: [f32; 2],
    /// Initial rocket tilt in degrees (counterclockwise).
    #[serde(default)]
    pub player_rotation: f32,
    /// Safe take-off surface (Friendly contact).
    pub launch_pad: PadSpec,
    /// Target surface (Finish contact).
    pub landing_pad: PadSpec,
    #[serde(default)]
    pub hazards: Vec<PadSpec>,
    #[serde(default)]
    pub collectibles: Vec<[f32; 2]>,
}

/// Ordered level list loaded from `assets/config/levels.ron`. Progression
/// walks `list` front to back; the last entry is the final level.
#[derive(Debug, Deserialize, Resource, Clone)]
pub struct LevelRegistry {
    pub version: u32,
    pub list: Vec<LevelSpec>,
}

impl LevelRegistry {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let txt = fs::read_to_string(&path)
            .map_err(|e| format!("read registry {:?}: {e}", path.as_ref()))?;
        let reg: LevelRegistry =
            ron::from_str(&txt).map_err(|e| format!("parse registry {:?}: {e}", path.as_ref()))?;
        if reg.version != 1 {
            return Err(format!(
                "LevelRegistry version {} unsupported (expected 1)",
                reg.version
            ));
        }
        if reg.list.is_empty() {
            return Err("LevelRegistry list empty".into());
        }
        Ok(reg)
    }

    /// Registry compiled into the binary; used when no levels file is present
    /// and by headless tests.
    pub fn builtin() -> Self {
        let flat = |x: f32, y: f32, hx: f32| PadSpec {
            pos: [x, y],
            half_extents: [hx, 20.0],
        };
        Self {
            version: 1,
            list: vec![
                LevelSpec {
                    id: "training_ground".into(),
                    player_start: [-420.0, -240.0],
                    player_rotation: 0.0,
                    launch_pad: flat(-420.0, -300.0, 80.0),
                    landing_pad: flat(420.0, -300.0, 80.0),
                    hazards: vec![flat(0.0, -300.0, 260.0)],
                    collectibles: vec![[0.0, -120.0]],
                },
                LevelSpec {
                    id: "the_gap".into(),
                    player_start: [-480.0, -240.0],
                    player_rotation: 0.0,
                    launch_pad: flat(-480.0, -300.0, 70.0),
                    landing_pad: flat(480.0, 120.0, 70.0),
                    hazards: vec![
                        flat(-120.0, -60.0, 40.0),
                        flat(160.0, -180.0, 40.0),
                        PadSpec {
                            pos: [300.0, 0.0],
                            half_extents: [20.0, 160.0],
                        },
                    ],
                    collectibles: vec![[-120.0, 40.0], [160.0, -80.0]],
                },
                LevelSpec {
                    id: "needle_thread".into(),
                    player_start: [0.0, -260.0],
                    player_rotation: 0.0,
                    launch_pad: flat(0.0, -320.0, 60.0),
                    landing_pad: flat(0.0, 260.0, 60.0),
                    hazards: vec![
                        PadSpec {
                            pos: [-200.0, -40.0],
                            half_extents: [160.0, 20.0],
                        },
                        PadSpec {
                            pos: [200.0, 120.0],
                            half_extents: [160.0, 20.0],
                        },
                    ],
                    collectibles: vec![[180.0, -40.0], [-180.0, 120.0], [0.0, 200.0]],
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn level(&self, index: usize) -> Option<&LevelSpec> {
        self.list.get(index)
    }

    /// Map a requested level id to its index, falling back to 0 when the id is
    /// unknown or absent.
    pub fn resolve_start_index(&self, requested: Option<&str>) -> usize {
        let Some(id) = requested.filter(|s| !s.trim().is_empty()) else {
            return 0;
        };
        match self.list.iter().position(|l| l.id == id) {
            Some(i) => i,
            None => {
                warn!(
                    target: "level",
                    "requested level '{id}' not in registry; starting at '{}'",
                    self.list[0].id
                );
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_valid() {
        let reg = LevelRegistry::builtin();
        assert_eq!(reg.version, 1);
        assert!(reg.len() >= 2, "progression needs at least two levels");
        for level in &reg.list {
            assert!(!level.id.is_empty());
        }
    }

    #[test]
    fn resolve_start_index_falls_back_to_zero() {
        let reg = LevelRegistry::builtin();
        assert_eq!(reg.resolve_start_index(None), 0);
        assert_eq!(reg.resolve_start_index(Some("no_such_level")), 0);
        assert_eq!(reg.resolve_start_index(Some("the_gap")), 1);
    }

    #[test]
    fn rejects_bad_registry_files() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("levels.ron");
        std::fs::write(&p, "(version: 2, list: [])").unwrap();
        let err = LevelRegistry::load_from_file(&p).unwrap_err();
        assert!(err.contains("version"), "unexpected error: {err}");
    }
}
