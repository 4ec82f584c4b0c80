pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::app::state::AppState;
pub use crate::core::components::{ContactKind, ContactTag, Player};
pub use crate::core::config::config::{GameConfig, WindowConfig};
pub use crate::gameplay::session::RunState;
