use bevy::prelude::*;

/// Marker component identifying the player rocket (holds physics body & collider).
#[derive(Component)]
pub struct Player;

/// Everything spawned by the level loader carries this so a reload can despawn
/// the whole level in one pass.
#[derive(Component)]
pub struct LevelEntity;

/// Category of a touchable surface or object, resolved from the entity the
/// player contacted. Dispatch over this is exhaustive and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Launch pad and other safe surfaces; touching them changes nothing.
    Friendly,
    /// Landing pad; touching it completes the level.
    Finish,
    /// Pickup removed on touch, worth one point.
    Collectible,
    /// Anything else. Costs one health point.
    Hazard,
}

/// Attached by the level loader to touchable level entities. Entities without
/// a tag count as [`ContactKind::Hazard`].
#[derive(Component, Debug, Clone, Copy)]
pub struct ContactTag(pub ContactKind);

/// Main engine exhaust visual (child of the player).
#[derive(Component)]
pub struct MainExhaust;

/// Side thruster puff visuals; `side` is the sign of the rotation axis the
/// puff corresponds to (+1 left, -1 right).
#[derive(Component)]
pub struct SideThruster {
    pub side: i8,
}

/// Looping engine audio entity, alive only while thrust is held.
#[derive(Component)]
pub struct EngineAudio;

/// Short-lived crash debris sprite.
#[derive(Component)]
pub struct Debris;
