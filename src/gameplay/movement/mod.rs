//! Player movement: thrust impulses and steering applied before the physics
//! step, plus edge-triggered engine feedback and the pause latch.

use bevy::prelude::*;
use bevy_rapier2d::prelude::ExternalImpulse;

use crate::app::state::AppState;
use crate::core::components::{EngineAudio, MainExhaust, Player, SideThruster};
use crate::core::config::GameConfig;
use crate::core::level::LoadLevel;
use crate::core::system::system_order::PrePhysicsSet;
use crate::gameplay::session::{AudioAssets, RunState};
use crate::interaction::input::{Action, InputMap};

/// Last-seen feedback state, so audio/exhaust start and stop on the edges of
/// input transitions instead of retriggering every tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct EffectState {
    pub thrusting: bool,
    pub rot_sign: i8,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectState>()
            .add_systems(
                Update,
                (
                    (apply_thrust, apply_steering, check_pause_latch).in_set(PrePhysicsSet),
                    sync_engine_effects.after(PrePhysicsSet),
                )
                    .run_if(in_state(AppState::Running)),
            )
            // Runs in every state: pause-menu restarts load levels from Ready.
            .add_systems(Update, reset_effects_on_load);
    }
}

fn apply_thrust(
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    run: Res<RunState>,
    cfg: Res<GameConfig>,
    time: Res<Time>,
    mut q_player: Query<(&Transform, &mut ExternalImpulse), With<Player>>,
) {
    if !run.controllable || !input_map.pressed(&keys, Action::Thrust) {
        return;
    }
    let Ok((tf, mut impulse)) = q_player.single_mut() else {
        return;
    };
    let up = (tf.rotation * Vec3::Y).truncate();
    impulse.impulse += up * cfg.player.thrust_strength * time.delta_secs();
}

/// Steering rotates the transform directly; the body's physics rotation is
/// locked, matching the thrust-and-tilt feel of the classic lander controls.
fn apply_steering(
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    run: Res<RunState>,
    cfg: Res<GameConfig>,
    time: Res<Time>,
    mut q_player: Query<&mut Transform, With<Player>>,
) {
    if !run.controllable {
        return;
    }
    let axis = input_map.rotation_axis(&keys);
    if axis == 0.0 {
        return;
    }
    let Ok(mut tf) = q_player.single_mut() else {
        return;
    };
    let step = (axis * cfg.player.rotation_strength * time.delta_secs()).to_radians();
    tf.rotate_z(step);
}

/// Pause is a latch: while the pause input is held the transition fires every
/// tick, and nothing clears it except the resume control. Kept bug-for-bug
/// with the original behavior pending product clarification.
fn check_pause_latch(
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if input_map.pressed(&keys, Action::Pause) {
        next_state.set(AppState::Paused);
    }
}

fn sync_engine_effects(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    run: Res<RunState>,
    audio: Option<Res<AudioAssets>>,
    mut state: ResMut<EffectState>,
    mut q_main: Query<&mut Visibility, (With<MainExhaust>, Without<SideThruster>)>,
    mut q_side: Query<(&SideThruster, &mut Visibility), Without<MainExhaust>>,
    q_engine_audio: Query<Entity, With<EngineAudio>>,
) {
    let thrusting = run.controllable && input_map.pressed(&keys, Action::Thrust);
    if thrusting != state.thrusting {
        state.thrusting = thrusting;
        for mut vis in &mut q_main {
            *vis = if thrusting {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
        if thrusting {
            if let Some(assets) = &audio {
                commands.spawn((
                    EngineAudio,
                    AudioPlayer::new(assets.engine.clone()),
                    PlaybackSettings::LOOP,
                ));
            }
        } else {
            for e in &q_engine_audio {
                commands.entity(e).despawn();
            }
        }
    }

    let sign = if run.controllable {
        input_map.rotation_axis(&keys) as i8
    } else {
        0
    };
    if sign != state.rot_sign {
        state.rot_sign = sign;
        for (thruster, mut vis) in &mut q_side {
            *vis = if sign != 0 && thruster.side == sign {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}

/// A reload replaces the exhaust entities, so the cached edge state must not
/// carry over into the fresh level.
fn reset_effects_on_load(
    mut ev_load: EventReader<LoadLevel>,
    mut state: ResMut<EffectState>,
    mut commands: Commands,
    q_engine_audio: Query<Entity, With<EngineAudio>>,
) {
    if ev_load.read().next().is_none() {
        return;
    }
    *state = EffectState::default();
    for e in &q_engine_audio {
        commands.entity(e).despawn();
    }
}
