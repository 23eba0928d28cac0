//! Entity data model
//!
//! Entities, their materials and tunables, the world they live in, and the
//! per-scene table that owns them.

mod attributes;
mod entity;
mod material;
mod store;
mod world;

pub use attributes::{AttributeKey, AttributeValue, Attributes, UnknownAttribute};
pub use entity::{Border, Entity, EntityId, EntityKind, PhysicsKind, Shadow, Style};
pub use material::Material;
pub use store::EntityStore;
pub use world::World;
