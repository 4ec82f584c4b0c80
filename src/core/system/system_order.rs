//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PrePhysics (impulses / manual velocity edits before Rapier)
//! 2. Rapier (handled by plugin)
//! 3. PostPhysics (contact dispatch, progress bookkeeping)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // impulses applied before the physics simulation step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsSet; // contact handling after physics has reported events
