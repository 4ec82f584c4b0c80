use bevy::prelude::*;

/// High-level session lifecycle.
/// Ready -> Running <-> Paused; restart returns to Ready via a full level reload.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Waiting for the start trigger; simulation time is frozen.
    #[default]
    Ready,
    /// Active gameplay.
    Running,
    /// Pause menu shown; simulation time is frozen.
    Paused,
}

/// Registers [`AppState`] and freezes/unfreezes virtual time on transitions.
/// Pending level-load timers tick on virtual time, so a pause stalls them.
pub struct AppStatePlugin;

impl Plugin for AppStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .add_systems(OnEnter(AppState::Running), resume_time)
            .add_systems(OnEnter(AppState::Paused), freeze_time)
            .add_systems(OnEnter(AppState::Ready), freeze_time);
    }
}

fn freeze_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn resume_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}
