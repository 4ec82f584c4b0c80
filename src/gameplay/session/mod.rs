//! Collision / progress tracking: health, score, level transitions and the
//! win/lose sequences. Rapier contact events are translated into domain
//! [`ContactEvent`]s so everything below the bridge is headless-testable.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, CollisionEvent, RigidBody, Velocity};
use rand::Rng;

use crate::app::state::AppState;
use crate::core::components::{ContactKind, ContactTag, Debris, LevelEntity, Player};
use crate::core::config::GameConfig;
use crate::core::level::{LevelIndex, LevelRegistry, LoadLevel};
use crate::core::system::system_order::PostPhysicsSet;

/// Per-session run state. Owned here for the lifetime of one play session;
/// reset semantics are explicit (no statics).
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub health: u32,
    pub level_score: u32,
    pub total_score: u32,
    pub controllable: bool,
    pub collidable: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RunState {
    pub fn new(health: u32) -> Self {
        Self {
            health,
            level_score: 0,
            total_score: 0,
            controllable: true,
            collidable: true,
        }
    }

    /// Level (re)load: health and level score come back, total score persists.
    pub fn reset_for_level(&mut self, health: u32) {
        self.health = health;
        self.level_score = 0;
        self.controllable = true;
        self.collidable = true;
    }

    pub fn record_collect(&mut self) {
        self.level_score += 1;
    }

    /// One hazard contact. Returns true when this contact emptied the health
    /// pool (the caller starts the crash sequence exactly once, since it also
    /// clears `controllable`).
    pub fn apply_hazard(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Successful advance: fold the level score into the total.
    pub fn fold_level_score(&mut self) {
        self.total_score += self.level_score;
        self.level_score = 0;
    }

    pub fn reset_all(&mut self, health: u32) {
        *self = Self::new(health);
    }
}

/// Set once the final level has been completed.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GameOver(pub bool);

/// A player contact, already classified.
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactEvent {
    pub kind: ContactKind,
    pub other: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Advance,
    Reload,
}

/// Fire-once delayed level transition, ticked on virtual time so pausing
/// stalls it. Present only while a success/crash sequence is in flight.
#[derive(Resource, Debug)]
pub struct PendingTransition {
    pub timer: Timer,
    pub outcome: TransitionOutcome,
}

impl PendingTransition {
    pub fn new(delay: f32, outcome: TransitionOutcome) -> Self {
        Self {
            timer: Timer::from_seconds(delay.max(0.0), TimerMode::Once),
            outcome,
        }
    }
}

/// Reload the current level and return to Ready (pause-menu restart).
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct ReloadRequest;

/// Fresh session: zero both scores, load level 0, return to Ready.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct RestartRequest;

/// One-shot clips resolved from config paths at startup.
#[derive(Resource, Clone)]
pub struct AudioAssets {
    pub engine: Handle<AudioSource>,
    pub success: Handle<AudioSource>,
    pub crash: Handle<AudioSource>,
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RunState>()
            .init_resource::<GameOver>()
            // Headless tests run without the rapier plugin; make sure the
            // collision event storage the bridge reads from exists.
            .add_event::<CollisionEvent>()
            .add_event::<ContactEvent>()
            .add_event::<ReloadRequest>()
            .add_event::<RestartRequest>()
            .add_systems(Startup, load_audio_assets)
            .add_systems(
                Update,
                (bridge_rapier_contacts, handle_contacts)
                    .chain()
                    .in_set(PostPhysicsSet),
            )
            .add_systems(
                Update,
                (
                    tick_pending_transition,
                    apply_level_resets,
                    handle_reload_requests,
                    handle_restart_requests,
                ),
            );
    }
}

fn load_audio_assets(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
) {
    // Headless runs (tests) have no asset server; gameplay carries on silent.
    let Some(server) = asset_server else {
        return;
    };
    commands.insert_resource(AudioAssets {
        engine: server.load(cfg.audio.engine.clone()),
        success: server.load(cfg.audio.success.clone()),
        crash: server.load(cfg.audio.crash.clone()),
    });
}

/// Translate rapier contact reports involving the player into classified
/// [`ContactEvent`]s. Untagged geometry counts as a hazard.
fn bridge_rapier_contacts(
    mut ev_collisions: EventReader<CollisionEvent>,
    mut ev_contacts: EventWriter<ContactEvent>,
    q_player: Query<(), With<Player>>,
    q_tags: Query<&ContactTag>,
) {
    for ev in ev_collisions.read() {
        let CollisionEvent::Started(e1, e2, _flags) = ev else {
            continue;
        };
        let other = if q_player.contains(*e1) {
            *e2
        } else if q_player.contains(*e2) {
            *e1
        } else {
            continue;
        };
        let kind = q_tags
            .get(other)
            .map(|t| t.0)
            .unwrap_or(ContactKind::Hazard);
        ev_contacts.write(ContactEvent { kind, other });
    }
}

fn handle_contacts(
    mut commands: Commands,
    mut ev_contacts: EventReader<ContactEvent>,
    mut run: ResMut<RunState>,
    cfg: Res<GameConfig>,
    audio: Option<Res<AudioAssets>>,
    q_player_tf: Query<&Transform, With<Player>>,
) {
    for ev in ev_contacts.read() {
        if !run.controllable || !run.collidable {
            continue;
        }
        match ev.kind {
            ContactKind::Friendly => {
                info!(target: "session", "friendly contact; nothing to do");
            }
            ContactKind::Finish => {
                run.controllable = false;
                info!(target: "session", "landed! level score {}", run.level_score);
                play_one_shot(&mut commands, &audio, |a| a.success.clone());
                commands.insert_resource(PendingTransition::new(
                    cfg.session.level_load_delay,
                    TransitionOutcome::Advance,
                ));
            }
            ContactKind::Collectible => {
                run.record_collect();
                commands.entity(ev.other).despawn();
                info!(target: "session", "collected; level score {}", run.level_score);
            }
            ContactKind::Hazard => {
                let crashed = run.apply_hazard();
                info!(target: "session", "hazard contact; health {}", run.health);
                if crashed {
                    run.controllable = false;
                    warn!(target: "session", "rocket destroyed; reloading shortly");
                    play_one_shot(&mut commands, &audio, |a| a.crash.clone());
                    if let Ok(tf) = q_player_tf.single() {
                        scatter_debris(&mut commands, tf.translation.truncate());
                    }
                    commands.insert_resource(PendingTransition::new(
                        cfg.session.level_load_delay,
                        TransitionOutcome::Reload,
                    ));
                }
            }
        }
    }
}

fn play_one_shot(
    commands: &mut Commands,
    audio: &Option<Res<AudioAssets>>,
    pick: impl Fn(&AudioAssets) -> Handle<AudioSource>,
) {
    if let Some(assets) = audio {
        commands.spawn((AudioPlayer::new(pick(assets)), PlaybackSettings::DESPAWN));
    }
}

fn scatter_debris(commands: &mut Commands, origin: Vec2) {
    let mut rng = rand::thread_rng();
    for _ in 0..12 {
        let vel = Vec2::new(rng.gen_range(-220.0..220.0), rng.gen_range(40.0..320.0));
        let size = rng.gen_range(4.0..10.0);
        commands.spawn((
            Debris,
            LevelEntity,
            Sprite::from_color(Color::srgb(0.7, 0.45, 0.2), Vec2::splat(size)),
            Transform::from_translation(origin.extend(0.5)),
            RigidBody::Dynamic,
            Collider::ball(size * 0.5),
            Velocity::linear(vel),
        ));
    }
}

fn tick_pending_transition(
    mut commands: Commands,
    pending: Option<ResMut<PendingTransition>>,
    time: Res<Time>,
    mut run: ResMut<RunState>,
    mut game_over: ResMut<GameOver>,
    index: Res<LevelIndex>,
    registry: Res<LevelRegistry>,
    mut ev_load: EventWriter<LoadLevel>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    pending.timer.tick(time.delta());
    if !pending.timer.finished() {
        return;
    }
    let outcome = pending.outcome;
    commands.remove_resource::<PendingTransition>();
    match outcome {
        TransitionOutcome::Advance => {
            run.fold_level_score();
            let next = index.0 + 1;
            if next < registry.len() {
                info!(target: "session", "advancing to level {next}");
                ev_load.write(LoadLevel { index: next });
            } else {
                info!(
                    target: "session",
                    "final level complete; total score {}", run.total_score
                );
                game_over.0 = true;
            }
        }
        TransitionOutcome::Reload => {
            info!(target: "session", "reloading level {}", index.0);
            ev_load.write(LoadLevel { index: index.0 });
        }
    }
}

/// Every level load reinitializes per-level run state (health is a serialized
/// initial value; total score persists) and cancels any pending transition.
fn apply_level_resets(
    mut commands: Commands,
    mut ev_load: EventReader<LoadLevel>,
    registry: Res<LevelRegistry>,
    cfg: Res<GameConfig>,
    mut run: ResMut<RunState>,
) {
    let Some(req) = ev_load.read().last() else {
        return;
    };
    if req.index >= registry.len() {
        return; // loader ignores it too
    }
    run.reset_for_level(cfg.session.starting_health);
    commands.remove_resource::<PendingTransition>();
}

fn handle_reload_requests(
    mut ev_reload: EventReader<ReloadRequest>,
    index: Res<LevelIndex>,
    mut ev_load: EventWriter<LoadLevel>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if ev_reload.read().next().is_none() {
        return;
    }
    info!(target: "session", "restart: reloading level {}", index.0);
    ev_load.write(LoadLevel { index: index.0 });
    next_state.set(AppState::Ready);
}

fn handle_restart_requests(
    mut ev_restart: EventReader<RestartRequest>,
    cfg: Res<GameConfig>,
    mut run: ResMut<RunState>,
    mut game_over: ResMut<GameOver>,
    mut ev_load: EventWriter<LoadLevel>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if ev_restart.read().next().is_none() {
        return;
    }
    info!(target: "session", "fresh session: back to level 0");
    run.reset_all(cfg.session.starting_health);
    game_over.0 = false;
    ev_load.write(LoadLevel { index: 0 });
    next_state.set(AppState::Ready);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_damage_saturates_and_reports_crash_once() {
        let mut run = RunState::new(3);
        assert!(!run.apply_hazard());
        assert!(!run.apply_hazard());
        assert!(run.apply_hazard(), "third hit empties the pool");
        assert_eq!(run.health, 0);
        // Further hits never underflow.
        run.apply_hazard();
        assert_eq!(run.health, 0);
    }

    #[test]
    fn fold_moves_level_score_into_total_exactly_once() {
        let mut run = RunState::new(3);
        for _ in 0..5 {
            run.record_collect();
        }
        run.fold_level_score();
        assert_eq!(run.total_score, 5);
        assert_eq!(run.level_score, 0);
        run.fold_level_score();
        assert_eq!(run.total_score, 5, "second fold adds nothing");
    }

    #[test]
    fn level_reset_keeps_total_score() {
        let mut run = RunState::new(3);
        run.record_collect();
        run.fold_level_score();
        run.controllable = false;
        run.reset_for_level(3);
        assert_eq!(run.total_score, 1);
        assert_eq!(run.level_score, 0);
        assert!(run.controllable);
    }

    #[test]
    fn reset_all_zeroes_everything() {
        let mut run = RunState::new(3);
        run.record_collect();
        run.fold_level_score();
        run.apply_hazard();
        run.reset_all(5);
        assert_eq!(run, RunState::new(5));
    }
}
