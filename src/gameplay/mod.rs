pub mod hud;
pub mod movement;
pub mod session;
