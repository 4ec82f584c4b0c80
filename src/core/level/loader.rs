use bevy::prelude::*;
use bevy_rapier2d::prelude::{
    ActiveEvents, Collider, ColliderMassProperties, Damping, ExternalImpulse, GravityScale,
    LockedAxes, RigidBody, Sensor, Velocity,
};

use crate::core::components::{ContactKind, ContactTag, LevelEntity, MainExhaust, Player, SideThruster};
use crate::core::config::GameConfig;

use super::registry::{LevelRegistry, PadSpec};

/// Index of the currently loaded level within the registry list.
#[derive(Debug, Resource, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelIndex(pub usize);

/// Level id requested on the command line / environment, if any.
#[derive(Debug, Resource, Clone, Default)]
pub struct RequestedLevel(pub Option<String>);

/// Request to (re)load a level. The loader despawns every [`LevelEntity`] and
/// rebuilds the world from the registry entry.
#[derive(Event, Debug, Clone, Copy)]
pub struct LoadLevel {
    pub index: usize,
}

/// Plugin performing data-driven level loading.
pub struct LevelLoaderPlugin;

impl Plugin for LevelLoaderPlugin {
    fn build(&self, app: &mut App) {
        // Tests often run with only MinimalPlugins; ensure a registry exists.
        if app.world().get_resource::<LevelRegistry>().is_none() {
            app.insert_resource(LevelRegistry::builtin());
        }
        app.add_event::<LoadLevel>()
            .init_resource::<LevelIndex>()
            .init_resource::<RequestedLevel>()
            .add_systems(Startup, queue_initial_level)
            .add_systems(Update, process_load_requests);
    }
}

fn queue_initial_level(
    requested: Res<RequestedLevel>,
    registry: Res<LevelRegistry>,
    mut ev_load: EventWriter<LoadLevel>,
) {
    let index = registry.resolve_start_index(requested.0.as_deref());
    ev_load.write(LoadLevel { index });
}

fn process_load_requests(
    mut commands: Commands,
    mut ev_load: EventReader<LoadLevel>,
    registry: Res<LevelRegistry>,
    cfg: Res<GameConfig>,
    mut index: ResMut<LevelIndex>,
    q_level: Query<Entity, With<LevelEntity>>,
) {
    // Collapse bursts; only the last request matters.
    let Some(req) = ev_load.read().last().copied() else {
        return;
    };
    let Some(level) = registry.level(req.index) else {
        warn!(target: "level", "LoadLevel index {} out of range ({} levels); ignored", req.index, registry.len());
        return;
    };

    for e in &q_level {
        commands.entity(e).despawn();
    }
    index.0 = req.index;
    info!(
        target: "level",
        "loading level {} '{}' ({} hazards, {} collectibles)",
        req.index,
        level.id,
        level.hazards.len(),
        level.collectibles.len()
    );

    spawn_player(&mut commands, &cfg, level.player_start.into(), level.player_rotation);
    spawn_pad(&mut commands, &level.launch_pad, ContactKind::Friendly, Color::srgb(0.25, 0.55, 0.9));
    spawn_pad(&mut commands, &level.landing_pad, ContactKind::Finish, Color::srgb(0.2, 0.8, 0.35));
    for h in &level.hazards {
        spawn_pad(&mut commands, h, ContactKind::Hazard, Color::srgb(0.75, 0.2, 0.2));
    }
    for c in &level.collectibles {
        spawn_collectible(&mut commands, Vec2::from(*c));
    }
    spawn_bounds(&mut commands, &cfg);
}

fn spawn_player(commands: &mut Commands, cfg: &GameConfig, start: Vec2, rotation_deg: f32) {
    commands
        .spawn((
            Player,
            LevelEntity,
            Sprite::from_color(Color::srgb(0.85, 0.85, 0.9), Vec2::new(36.0, 52.0)),
            Transform::from_translation(start.extend(1.0))
                .with_rotation(Quat::from_rotation_z(rotation_deg.to_radians())),
            RigidBody::Dynamic,
            Collider::capsule_y(12.0, 14.0),
            // Unit mass so thrust_strength reads as acceleration; steering
            // rotates the transform directly with physics rotation locked.
            ColliderMassProperties::Mass(1.0),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            ExternalImpulse::default(),
            Damping {
                linear_damping: cfg.player.linear_damping,
                angular_damping: cfg.player.angular_damping,
            },
            GravityScale(cfg.player.gravity_scale),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .with_children(|parent| {
            parent.spawn((
                MainExhaust,
                Sprite::from_color(Color::srgb(1.0, 0.6, 0.1), Vec2::new(14.0, 26.0)),
                Transform::from_xyz(0.0, -38.0, -0.1),
                Visibility::Hidden,
            ));
            for side in [1i8, -1i8] {
                parent.spawn((
                    SideThruster { side },
                    Sprite::from_color(Color::srgb(0.9, 0.8, 0.4), Vec2::new(10.0, 8.0)),
                    Transform::from_xyz(-(side as f32) * 22.0, 14.0, -0.1),
                    Visibility::Hidden,
                ));
            }
        });
}

fn spawn_pad(commands: &mut Commands, pad: &PadSpec, kind: ContactKind, color: Color) {
    commands.spawn((
        LevelEntity,
        ContactTag(kind),
        Sprite::from_color(color, pad.half() * 2.0),
        Transform::from_translation(pad.center().extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(pad.half().x, pad.half().y),
    ));
}

fn spawn_collectible(commands: &mut Commands, pos: Vec2) {
    commands.spawn((
        LevelEntity,
        ContactTag(ContactKind::Collectible),
        Sprite::from_color(Color::srgb(0.95, 0.85, 0.2), Vec2::splat(18.0)),
        Transform::from_translation(pos.extend(0.0)),
        RigidBody::Fixed,
        Collider::ball(12.0),
        Sensor,
    ));
}

/// Universal bounds shared by every level: a kill floor and side walls so the
/// rocket cannot drift out of the playfield. All count as hazards.
fn spawn_bounds(commands: &mut Commands, cfg: &GameConfig) {
    let hw = cfg.window.width * 0.5 + 40.0;
    let hh = cfg.window.height * 0.5 + 40.0;
    let walls = [
        (Vec2::new(0.0, -hh), Vec2::new(hw, 20.0)),
        (Vec2::new(0.0, hh), Vec2::new(hw, 20.0)),
        (Vec2::new(-hw, 0.0), Vec2::new(20.0, hh)),
        (Vec2::new(hw, 0.0), Vec2::new(20.0, hh)),
    ];
    for (pos, half) in walls {
        commands.spawn((
            LevelEntity,
            ContactTag(ContactKind::Hazard),
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
        ));
    }
}
