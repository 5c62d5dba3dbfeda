//! Tessera Engine Core
//!
//! Contains the fundamental simulation systems:
//! - Entity Component System (ECS) built on per-type sparse sets
//! - Built-in gameplay components
//! - Physics clients (velocity integration, collision tests)
//! - Sprite draw extraction
//! - Simulation time and math

pub mod components;
pub mod ecs;
pub mod math;
pub mod physics;
pub mod render;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
