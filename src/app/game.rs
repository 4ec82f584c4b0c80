use bevy::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::prelude::RapierDebugRenderPlugin;
use bevy_rapier2d::prelude::{NoUserData, RapierPhysicsPlugin};

use crate::app::state::AppStatePlugin;
use crate::core::level::LevelLoaderPlugin;
use crate::core::system::system_order::{PostPhysicsSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::hud::HudPlugin;
use crate::gameplay::movement::MovementPlugin;
use crate::gameplay::session::SessionPlugin;
use crate::interaction::input::InputActionsPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (PrePhysicsSet, PostPhysicsSet.after(PrePhysicsSet)),
        )
        .add_plugins((
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0),
            AppStatePlugin,
            InputActionsPlugin,
            LevelLoaderPlugin,
            SessionPlugin,
            MovementPlugin,
            HudPlugin,
            AutoClosePlugin,
            DebugPlugin,
            #[cfg(feature = "debug")]
            RapierDebugRenderPlugin::default(),
        ))
        .add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
