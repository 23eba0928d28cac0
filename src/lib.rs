//! A 2D arcade game engine built in Rust
//!
//! This engine provides:
//! - Entities with materials, attributes and pluggable behaviors
//! - Force-based physics with world bounds and pairwise collisions
//! - Layered software rendering with a follow camera and draw plugins
//! - Scene lifecycle management and a measured-timestep game loop
//! - Input handling with winit key codes, audio with rodio

pub mod assets;
pub mod audio;
pub mod behavior;
pub mod core;
pub mod entity;
pub mod input;
pub mod math;
pub mod physics;
pub mod renderer;
pub mod scene;

// Re-exports for convenience
pub use glam;
pub use image;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::behavior::{
        Behavior, Bounce, CollisionResponse, ParticleBehavior, Pickup, PlayerInput, RainEmitter,
        Storm,
    };
    pub use crate::core::{DebugInfo, EngineConfig, FrameStats, Game, GameContext, Messages};
    pub use crate::entity::{
        AttributeKey, Entity, EntityId, EntityKind, EntityStore, Material, PhysicsKind, World,
    };
    pub use crate::input::Input;
    pub use crate::math::{Rng, Vector2D, VectorExt};
    pub use crate::physics::{CollisionEvent, CollisionMode, PhysicsEngine};
    pub use crate::renderer::{Camera, Color, Renderer, Surface, rgba};
    pub use crate::scene::{Scene, SceneManager, Stage};
    pub use glam::DVec2;
    pub use winit::keyboard::KeyCode;
}
