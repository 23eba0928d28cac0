//! Per-entity logic
//!
//! An entity carries an ordered list of behaviors. Each one may react to
//! input, contribute to the physics update and decorate the entity's
//! drawing. Two specializations exist: collision responses, invoked only by
//! the physics engine's collision pass, and particle behaviors, which own a
//! capacity-bounded pool of child entities.
//!
//! # Example
//!
//! ```ignore
//! struct Spin(f64);
//!
//! impl Behavior for Spin {
//!     fn update(&mut self, _ctx: &mut GameContext, entity: &mut Entity, dt: f64) {
//!         entity.rotation += self.0 * dt;
//!     }
//! }
//!
//! let wheel = Entity::new("wheel").with_behavior(Spin(0.1));
//! ```

mod controls;
mod particles;
mod responses;
mod weather;

pub use controls::PlayerInput;
pub use particles::RainEmitter;
pub use responses::{Bounce, Pickup};
pub use weather::Storm;

use std::fmt;

use crate::core::GameContext;
use crate::entity::Entity;
use crate::physics::CollisionEvent;
use crate::renderer::Surface;

// ============================================================================
// Hook traits
// ============================================================================

/// Hooks run for an entity every frame. All default to no-ops.
pub trait Behavior {
    /// Name for logs and debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Input phase, before physics
    fn input(&mut self, _ctx: &mut GameContext, _entity: &mut Entity) {}

    /// Physics phase, before forces are integrated
    fn update(&mut self, _ctx: &mut GameContext, _entity: &mut Entity, _dt: f64) {}

    /// Draw phase, before the entity's plugin draws it
    fn draw(&mut self, _ctx: &GameContext, _surface: &mut dyn Surface, _entity: &Entity) {}
}

/// Behavior notified of collisions involving its entity
pub trait CollisionResponse: Behavior {
    /// Comma-separated name fragments; empty accepts every collision
    fn filtered_names(&self) -> &str {
        ""
    }

    /// React to a collision where `source` is the entity this behavior is attached to
    fn collide(
        &mut self,
        ctx: &mut GameContext,
        event: &CollisionEvent,
        source: &mut Entity,
        collider: &mut Entity,
    );
}

/// Behavior owning a pool of child entities
pub trait ParticleBehavior: Behavior {
    /// Spawn children until the target count is reached; no-op afterwards
    fn create(&mut self, ctx: &mut GameContext, parent: &mut Entity);
}

// ============================================================================
// Slot
// ============================================================================

/// One attached behavior, tagged by its role
pub enum BehaviorSlot {
    /// Input/update/draw hooks only
    Plain(Box<dyn Behavior>),
    /// Also receives collision events
    Collision(Box<dyn CollisionResponse>),
    /// Also spawns child particles after each update
    Particles(Box<dyn ParticleBehavior>),
}

impl BehaviorSlot {
    /// Name of the wrapped behavior
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(b) => b.name(),
            Self::Collision(b) => b.name(),
            Self::Particles(b) => b.name(),
        }
    }

    fn input(&mut self, ctx: &mut GameContext, entity: &mut Entity) {
        match self {
            Self::Plain(b) => b.input(ctx, entity),
            Self::Collision(b) => b.input(ctx, entity),
            Self::Particles(b) => b.input(ctx, entity),
        }
    }

    fn update(&mut self, ctx: &mut GameContext, entity: &mut Entity, dt: f64) {
        match self {
            Self::Plain(b) => b.update(ctx, entity, dt),
            Self::Collision(b) => b.update(ctx, entity, dt),
            Self::Particles(b) => {
                b.update(ctx, entity, dt);
                b.create(ctx, entity);
            }
        }
    }

    fn draw(&mut self, ctx: &GameContext, surface: &mut dyn Surface, entity: &Entity) {
        match self {
            Self::Plain(b) => b.draw(ctx, surface, entity),
            Self::Collision(b) => b.draw(ctx, surface, entity),
            Self::Particles(b) => b.draw(ctx, surface, entity),
        }
    }
}

impl fmt::Debug for BehaviorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Self::Plain(_) => "Plain",
            Self::Collision(_) => "Collision",
            Self::Particles(_) => "Particles",
        };
        write!(f, "{role}({})", self.name())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run every behavior's input hook in attachment order
pub fn dispatch_input(ctx: &mut GameContext, entity: &mut Entity) {
    let mut behaviors = entity.take_behaviors();
    for slot in &mut behaviors {
        slot.input(ctx, entity);
    }
    entity.restore_behaviors(behaviors);
}

/// Run every behavior's update hook in attachment order
pub fn dispatch_update(ctx: &mut GameContext, entity: &mut Entity, dt: f64) {
    let mut behaviors = entity.take_behaviors();
    for slot in &mut behaviors {
        slot.update(ctx, entity, dt);
    }
    entity.restore_behaviors(behaviors);
}

/// Run every behavior's draw hook in attachment order
pub fn dispatch_draw(ctx: &GameContext, surface: &mut dyn Surface, entity: &mut Entity) {
    let mut behaviors = entity.take_behaviors();
    for slot in &mut behaviors {
        slot.draw(ctx, surface, entity);
    }
    entity.restore_behaviors(behaviors);
}

/// Deliver a collision to the source's collision responses whose filter matches.
///
/// Returns the number of responses invoked.
pub fn dispatch_collision(
    ctx: &mut GameContext,
    event: &CollisionEvent,
    source: &mut Entity,
    collider: &mut Entity,
) -> usize {
    let mut behaviors = source.take_behaviors();
    let mut delivered = 0;
    for slot in &mut behaviors {
        if let BehaviorSlot::Collision(response) = slot
            && filter_matches(response.filtered_names(), &source.name, &collider.name)
        {
            response.collide(ctx, event, source, collider);
            delivered += 1;
        }
    }
    source.restore_behaviors(behaviors);
    delivered
}

/// Check a comma-separated name filter against the two names of a collision.
///
/// A filter without entries matches everything; otherwise one of the names
/// must contain one of the (trimmed, non-empty) entries.
pub fn filter_matches(filter: &str, a: &str, b: &str) -> bool {
    let mut entries = filter
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .peekable();
    if entries.peek().is_none() {
        return true;
    }
    entries.any(|entry| a.contains(entry) || b.contains(entry))
}
