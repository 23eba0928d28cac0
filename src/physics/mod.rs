//! Arcade physics
//!
//! Forward-Euler integration with material damping, play-area constraint
//! and pairwise collision detection between collider-flagged entities.

mod collision;
mod engine;

pub use collision::{CollisionEvent, CollisionMode};
pub use engine::PhysicsEngine;
