use bevy::prelude::*;

use crate::gameplay::session::{PendingTransition, RunState, TransitionOutcome};
use crate::interaction::input::{Action, InputMap};

/// Hot keys for playtesting: force an immediate level advance, or toggle
/// collision handling for collision-free flight.
pub fn debug_key_input_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    input_map: Res<InputMap>,
    mut run: ResMut<RunState>,
) {
    if input_map.just_pressed(&keys, Action::NextLevel) {
        info!(target: "debug", "forcing level advance");
        commands.insert_resource(PendingTransition::new(0.0, TransitionOutcome::Advance));
    }
    if input_map.just_pressed(&keys, Action::ToggleCollision) {
        run.collidable = !run.collidable;
        info!(target: "debug", "collidable -> {}", run.collidable);
    }
}
