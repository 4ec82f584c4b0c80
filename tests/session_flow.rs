//! Headless runs of the contact / progress logic: score counting, health
//! floor, crash idempotence and the success advance.

use bevy::prelude::*;

use rocket_boost::app::state::{AppState, AppStatePlugin};
use rocket_boost::core::components::{ContactKind, ContactTag};
use rocket_boost::core::level::{LevelIndex, LevelLoaderPlugin};
use rocket_boost::gameplay::session::{
    ContactEvent, PendingTransition, RunState, SessionPlugin, TransitionOutcome,
};
use rocket_boost::interaction::input::InputActionsPlugin;
use rocket_boost::GameConfig;

fn headless_app(level_load_delay: f32) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    let mut cfg = GameConfig::default();
    cfg.session.level_load_delay = level_load_delay;
    app.insert_resource(cfg);
    app.add_plugins((
        AppStatePlugin,
        InputActionsPlugin,
        LevelLoaderPlugin,
        SessionPlugin,
    ));
    // Startup: level 0 loads, state machine settles in Ready.
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
fn collectible_contacts_count_while_controllable() {
    let mut app = headless_app(0.0);
    for _ in 0..3 {
        touch(&mut app, ContactKind::Collectible);
    }
    assert_eq!(app.world().resource::<RunState>().level_score, 3);

    // Friendly contact changes nothing.
    touch(&mut app, ContactKind::Friendly);
    let run = *app.world().resource::<RunState>();
    assert_eq!(run.level_score, 3);
    assert_eq!(run.health, 3);
    assert!(run.controllable);
}

#[test]
fn collected_entities_are_removed_from_the_world() {
    let mut app = headless_app(0.0);
    let other = app
        .world_mut()
        .spawn(ContactTag(ContactKind::Collectible))
        .id();
    app.world_mut().send_event(ContactEvent {
        kind: ContactKind::Collectible,
        other,
    });
    app.update();
    assert!(app.world().get_entity(other).is_err(), "collectible despawned");
}

#[test]
fn three_hazards_crash_exactly_once_and_later_contacts_are_ignored() {
    let mut app = headless_app(10.0);
    touch(&mut app, ContactKind::Hazard);
    touch(&mut app, ContactKind::Hazard);
    assert_eq!(app.world().resource::<RunState>().health, 1);
    assert!(app
        .world()
        .get_resource::<PendingTransition>()
        .is_none());

    touch(&mut app, ContactKind::Hazard);
    {
        let run = app.world().resource::<RunState>();
        assert_eq!(run.health, 0);
        assert!(!run.controllable, "crash freezes controllability");
    }
    let pending = app.world().resource::<PendingTransition>();
    assert_eq!(pending.outcome, TransitionOutcome::Reload);

    // Health never goes below zero, score never moves, no second sequence.
    touch(&mut app, ContactKind::Hazard);
    touch(&mut app, ContactKind::Collectible);
    let run = *app.world().resource::<RunState>();
    assert_eq!(run.health, 0);
    assert_eq!(run.level_score, 0);
    assert_eq!(
        app.world().resource::<PendingTransition>().outcome,
        TransitionOutcome::Reload
    );
}

#[test]
fn five_collects_then_finish_folds_into_total_on_advance() {
    let mut app = headless_app(0.0);
    for _ in 0..5 {
        touch(&mut app, ContactKind::Collectible);
    }
    assert_eq!(app.world().resource::<RunState>().level_score, 5);

    touch(&mut app, ContactKind::Finish);
    assert!(!app.world().resource::<RunState>().controllable);

    // Zero delay: the pending advance fires, level 1 loads, score folds once.
    app.update();
    app.update();
    let run = *app.world().resource::<RunState>();
    assert_eq!(run.total_score, 5);
    assert_eq!(run.level_score, 0);
    assert_eq!(app.world().resource::<LevelIndex>().0, 1);
    assert!(run.controllable, "fresh level is controllable again");
    assert_eq!(run.health, 3, "health reinitialized on load");
}

#[test]
fn crash_reload_preserves_total_but_resets_level_state() {
    let mut app = headless_app(0.0);
    // Bank a point on the way through level 0.
    touch(&mut app, ContactKind::Collectible);
    touch(&mut app, ContactKind::Finish);
    app.update();
    app.update();
    assert_eq!(app.world().resource::<LevelIndex>().0, 1);
    assert_eq!(app.world().resource::<RunState>().total_score, 1);

    // Collect one on level 1, then crash out.
    touch(&mut app, ContactKind::Collectible);
    for _ in 0..3 {
        touch(&mut app, ContactKind::Hazard);
    }
    app.update();
    app.update();
    let run = *app.world().resource::<RunState>();
    assert_eq!(app.world().resource::<LevelIndex>().0, 1, "same level reloads");
    assert_eq!(run.total_score, 1, "crash never folds the level score");
    assert_eq!(run.level_score, 0);
    assert_eq!(run.health, 3);
    assert!(run.controllable);
}

#[test]
fn pause_stalls_a_pending_transition() {
    let mut app = headless_app(0.05);
    touch(&mut app, ContactKind::Finish);
    assert!(app.world().get_resource::<PendingTransition>().is_some());

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Paused);
    app.update();
    for _ in 0..20 {
        std::thread::sleep(std::time::Duration::from_millis(10));
        app.update();
    }
    assert!(
        app.world().get_resource::<PendingTransition>().is_some(),
        "virtual time is frozen while paused, so the load never fires"
    );
    assert_eq!(app.world().resource::<LevelIndex>().0, 0);
}
