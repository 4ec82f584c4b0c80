use anyhow::{bail, Context};
use bevy::prelude::*;
use clap::Parser;
use std::path::{Path, PathBuf};

use rocket_boost::core::level::{LevelRegistry, RequestedLevel};
use rocket_boost::{GameConfig, GamePlugin};

const CONFIG_PATHS: [&str; 2] = ["assets/config/game.ron", "assets/config/game.local.ron"];
const LEVELS_PATH: &str = "assets/config/levels.ron";

#[derive(Parser, Debug)]
#[command(name = "rocket_boost", about = "Arcade thrust-and-land rocket game")]
struct Cli {
    /// Level id to start on (falls back to the LEVEL_ID env var, then level 0)
    #[arg(long)]
    level: Option<String>,
    /// Extra config overlay applied on top of the default layers
    #[arg(long)]
    config: Option<PathBuf>,
    /// Exit automatically after this many seconds (overrides window.autoClose)
    #[arg(long)]
    auto_close: Option<f32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut paths: Vec<String> = CONFIG_PATHS.iter().map(|s| s.to_string()).collect();
    if let Some(extra) = &cli.config {
        paths.push(extra.display().to_string());
    }
    let (mut cfg, used, errors) = GameConfig::load_layered(&paths);
    if let Some(extra) = &cli.config {
        // A layer the user named explicitly must actually load.
        if !used.iter().any(|u| u == &extra.display().to_string()) {
            bail!("config overlay {:?} could not be read or parsed: {errors:?}", extra);
        }
    }
    for e in &errors {
        eprintln!("config: {e}");
    }
    for w in cfg.validate() {
        eprintln!("config warning: {w}");
    }
    if let Some(secs) = cli.auto_close {
        cfg.window.auto_close = secs;
    }

    let registry = if Path::new(LEVELS_PATH).exists() {
        LevelRegistry::load_from_file(LEVELS_PATH)
            .map_err(anyhow::Error::msg)
            .context("level registry is present but unusable")?
    } else {
        eprintln!("levels: {LEVELS_PATH} not found; using built-in level set");
        LevelRegistry::builtin()
    };

    let requested = cli.level.or_else(|| std::env::var("LEVEL_ID").ok());

    App::new()
        .insert_resource(registry)
        .insert_resource(RequestedLevel(requested))
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .insert_resource(cfg)
        .add_plugins(GamePlugin)
        .run();
    Ok(())
}
