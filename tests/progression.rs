//! Level progression edge cases: the final level ends the game instead of
//! loading a scene, and the restart operations reset what they should.

use bevy::prelude::*;

use rocket_boost::app::state::{AppState, AppStatePlugin};
use rocket_boost::core::components::{ContactKind, ContactTag};
use rocket_boost::core::level::{LevelIndex, LevelLoaderPlugin, LevelRegistry, RequestedLevel};
use rocket_boost::gameplay::session::{
    ContactEvent, GameOver, ReloadRequest, RestartRequest, RunState, SessionPlugin,
};
use rocket_boost::interaction::input::InputActionsPlugin;
use rocket_boost::GameConfig;

fn app_on_level(requested: Option<&str>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    let mut cfg = GameConfig::default();
    cfg.session.level_load_delay = 0.0;
    app.insert_resource(cfg);
    app.insert_resource(RequestedLevel(requested.map(str::to_string)));
    app.add_plugins((
        AppStatePlugin,
        InputActionsPlugin,
        LevelLoaderPlugin,
        SessionPlugin,
    ));
    app.update();
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Running);
    app.update();
    app
}

fn touch(app: &mut App, kind: ContactKind) {
    let other = app.world_mut().spawn(ContactTag(kind)).id();
    app.world_mut().send_event(ContactEvent { kind, other });
    app.update();
}

#[test]
fn finishing_the_final_level_ends_the_game_without_a_load() {
    let last = LevelRegistry::builtin().len() - 1;
    let last_id = LevelRegistry::builtin().list[last].id.clone();
    let mut app = app_on_level(Some(&last_id));
    assert_eq!(app.world().resource::<LevelIndex>().0, last);

    touch(&mut app, ContactKind::Collectible);
    touch(&mut app, ContactKind::Finish);
    app.update();
    app.update();

    assert!(app.world().resource::<GameOver>().0);
    assert_eq!(app.world().resource::<LevelIndex>().0, last, "no scene load");
    let run = *app.world().resource::<RunState>();
    assert_eq!(run.total_score, 1, "final level score still folds");
    assert_eq!(run.level_score, 0);
    assert!(!run.controllable, "no level reset happened");
}

#[test]
fn restart_game_zeroes_scores_and_returns_to_level_zero() {
    let last_id = LevelRegistry::builtin().list.last().unwrap().id.clone();
    let mut app = app_on_level(Some(&last_id));
    touch(&mut app, ContactKind::Collectible);
    touch(&mut app, ContactKind::Finish);
    app.update();
    app.update();
    assert!(app.world().resource::<GameOver>().0);
    assert!(app.world().resource::<RunState>().total_score > 0);

    app.world_mut().send_event(RestartRequest);
    app.update();
    app.update();

    let run = *app.world().resource::<RunState>();
    assert_eq!(run.total_score, 0);
    assert_eq!(run.level_score, 0);
    assert_eq!(run.health, 3);
    assert_eq!(app.world().resource::<LevelIndex>().0, 0);
    assert!(!app.world().resource::<GameOver>().0);
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::Ready,
        "restart returns to the not-started state"
    );
}

#[test]
fn reload_request_keeps_total_and_reloads_current_level() {
    let mut app = app_on_level(Some("the_gap"));
    touch(&mut app, ContactKind::Collectible);

    app.world_mut().send_event(ReloadRequest);
    app.update();
    app.update();

    let run = *app.world().resource::<RunState>();
    assert_eq!(app.world().resource::<LevelIndex>().0, 1, "same level index");
    assert_eq!(run.level_score, 0, "level score does not survive the reload");
    assert_eq!(run.total_score, 0, "nothing folded");
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::Ready
    );
}
