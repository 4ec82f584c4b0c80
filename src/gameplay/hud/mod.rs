//! In-game UI: health/score readouts, the start overlay, the pause menu and
//! the win / game-over banners. Marker components + OnEnter/OnExit
//! spawn-and-despawn per state, all reading [`RunState`].

use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::level::LevelIndex;
use crate::core::level::LevelRegistry;
use crate::gameplay::session::{
    GameOver, PendingTransition, ReloadRequest, RestartRequest, RunState, TransitionOutcome,
};
use crate::interaction::input::{Action, InputMap};

#[derive(Component)]
struct HudRoot;
#[derive(Component)]
struct HealthLabel;
#[derive(Component)]
struct ScoreLabel;
#[derive(Component)]
struct LevelLabel;
#[derive(Component)]
struct WinBanner;

#[derive(Component)]
struct StartOverlay;
#[derive(Component)]
struct StartButton;

#[derive(Component)]
struct PauseMenuRoot;
#[derive(Component)]
struct ResumeButton;
/// Pause menu: reload the current level. Game over: becomes "Play again".
#[derive(Component)]
struct RestartButton;

#[derive(Component)]
struct GameOverRoot;

const BUTTON_BG: Color = Color::srgb(0.18, 0.18, 0.24);
const OVERLAY_BG: Color = Color::srgba(0.02, 0.02, 0.05, 0.85);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(OnEnter(AppState::Ready), spawn_start_overlay)
            .add_systems(OnExit(AppState::Ready), despawn_all::<StartOverlay>)
            .add_systems(OnEnter(AppState::Paused), spawn_pause_menu)
            .add_systems(OnExit(AppState::Paused), despawn_all::<PauseMenuRoot>)
            .add_systems(
                Update,
                (
                    refresh_labels,
                    update_win_banner,
                    sync_game_over_overlay,
                    start_triggers,
                    resume_button,
                    restart_button,
                ),
            );
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexStart,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(4.0),
                ..default()
            },
        ))
        .with_children(|p| {
            p.spawn((HealthLabel, Text::new("♥ 0")));
            p.spawn((ScoreLabel, Text::new("Score 0  Total 0")));
            p.spawn((LevelLabel, Text::new("")));
        });
    commands.spawn((
        WinBanner,
        Text::new("Touchdown!"),
        TextFont {
            font_size: 42.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(42.0),
            top: Val::Percent(40.0),
            ..default()
        },
        Visibility::Hidden,
    ));
}

fn refresh_labels(
    run: Res<RunState>,
    index: Res<LevelIndex>,
    registry: Res<LevelRegistry>,
    mut q_health: Query<&mut Text, (With<HealthLabel>, Without<ScoreLabel>, Without<LevelLabel>)>,
    mut q_score: Query<&mut Text, (With<ScoreLabel>, Without<HealthLabel>, Without<LevelLabel>)>,
    mut q_level: Query<&mut Text, (With<LevelLabel>, Without<HealthLabel>, Without<ScoreLabel>)>,
) {
    if let Ok(mut text) = q_health.single_mut() {
        let s = format!("♥ {}", run.health);
        if text.as_str() != s {
            *text = Text::new(s);
        }
    }
    if let Ok(mut text) = q_score.single_mut() {
        let s = format!("Score {}  Total {}", run.level_score, run.total_score);
        if text.as_str() != s {
            *text = Text::new(s);
        }
    }
    if let Ok(mut text) = q_level.single_mut() {
        let id = registry
            .level(index.0)
            .map(|l| l.id.as_str())
            .unwrap_or("?");
        let s = format!("Level {}: {}", index.0 + 1, id);
        if text.as_str() != s {
            *text = Text::new(s);
        }
    }
}

/// The win banner is visible exactly while a successful advance is pending.
fn update_win_banner(
    pending: Option<Res<PendingTransition>>,
    mut q_banner: Query<&mut Visibility, With<WinBanner>>,
) {
    let show = pending.is_some_and(|p| p.outcome == TransitionOutcome::Advance);
    for mut vis in &mut q_banner {
        *vis = if show {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn spawn_start_overlay(mut commands: Commands) {
    commands
        .spawn((
            StartOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(OVERLAY_BG),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new("ROCKET BOOST"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
            ));
            p.spawn(Text::new("Space to thrust, A/D to steer, P to pause"));
            spawn_button(p, StartButton, "Launch");
        });
}

fn spawn_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            PauseMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(OVERLAY_BG),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new("PAUSED"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
            ));
            spawn_button(p, ResumeButton, "Resume");
            spawn_button(p, RestartButton, "Restart level");
        });
}

/// Appears when the final level is cleared; its restart button is the
/// "Play again" control.
fn sync_game_over_overlay(
    mut commands: Commands,
    game_over: Res<GameOver>,
    run: Res<RunState>,
    q_existing: Query<Entity, With<GameOverRoot>>,
) {
    if game_over.0 && q_existing.is_empty() {
        commands
            .spawn((
                GameOverRoot,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(16.0),
                    ..default()
                },
                BackgroundColor(OVERLAY_BG),
            ))
            .with_children(|p| {
                p.spawn((
                    Text::new("MISSION COMPLETE"),
                    TextFont {
                        font_size: 48.0,
                        ..default()
                    },
                ));
                p.spawn(Text::new(format!("Total score: {}", run.total_score)));
                spawn_button(p, RestartButton, "Play again");
            });
    } else if !game_over.0 {
        for e in &q_existing {
            commands.entity(e).despawn();
        }
    }
}

fn spawn_button(parent: &mut ChildSpawnerCommands, marker: impl Component, label: &str) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                padding: UiRect::axes(Val::Px(24.0), Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_BG),
        ))
        .with_children(|p| {
            p.spawn(Text::new(label.to_string()));
        });
}

/// Start via the Launch button or the thrust key.
fn start_triggers(
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    state: Res<State<AppState>>,
    q_button: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if *state.get() != AppState::Ready {
        return;
    }
    let clicked = q_button.iter().any(|i| *i == Interaction::Pressed);
    if clicked || input_map.just_pressed(&keys, Action::Thrust) {
        next_state.set(AppState::Running);
    }
}

fn resume_button(
    q_button: Query<&Interaction, (Changed<Interaction>, With<ResumeButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if q_button.iter().any(|i| *i == Interaction::Pressed) {
        next_state.set(AppState::Running);
    }
}

fn restart_button(
    q_button: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    game_over: Res<GameOver>,
    mut ev_reload: EventWriter<ReloadRequest>,
    mut ev_restart: EventWriter<RestartRequest>,
) {
    if !q_button.iter().any(|i| *i == Interaction::Pressed) {
        return;
    }
    if game_over.0 {
        ev_restart.write(RestartRequest);
    } else {
        ev_reload.write(ReloadRequest);
    }
}

fn despawn_all<M: Component>(mut commands: Commands, q: Query<Entity, With<M>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
