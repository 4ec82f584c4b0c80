pub mod loader;
pub mod registry;

pub use loader::{LevelIndex, LevelLoaderPlugin, LoadLevel, RequestedLevel};
pub use registry::{LevelRegistry, LevelSpec};
