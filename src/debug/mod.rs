//! Developer conveniences, compiled only with the `debug` cargo feature so
//! production builds ship without them.

#[cfg(feature = "debug")]
mod keys;

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "debug")]
        app.add_systems(Update, keys::debug_key_input_system);
        #[cfg(not(feature = "debug"))]
        let _ = app;
    }
}
