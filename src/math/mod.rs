//! 2D math primitives
//!
//! Vectors are `glam::DVec2`; this module adds the clamping and folding
//! helpers the simulation relies on, collision shapes, and a small
//! deterministic random source.

mod random;
mod shape;
mod vector;

pub use random::Rng;
pub use shape::CollisionBox;
pub use vector::{Vector2D, VectorExt, add_all};
