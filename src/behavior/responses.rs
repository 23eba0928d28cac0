//! Built-in collision responses

use super::{Behavior, CollisionResponse};
use crate::core::GameContext;
use crate::entity::{AttributeKey, Entity, PhysicsKind};
use crate::physics::CollisionEvent;

/// Pushes its entity out of whatever it hits and bounces it back.
///
/// Separation happens along the axis of least overlap; the velocity
/// component on that axis is reversed and scaled by the elasticity of the
/// two merged materials. Against another dynamic entity only half the
/// overlap is resolved, the other half being left to the other side.
#[derive(Debug, Default)]
pub struct Bounce {
    filter: String,
}

impl Bounce {
    /// Bounce off everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounce only off entities whose names contain one of the entries
    pub fn filtered(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

impl Behavior for Bounce {
    fn name(&self) -> &str {
        "bounce"
    }
}

impl CollisionResponse for Bounce {
    fn filtered_names(&self) -> &str {
        &self.filter
    }

    fn collide(
        &mut self,
        _ctx: &mut GameContext,
        event: &CollisionEvent,
        source: &mut Entity,
        collider: &mut Entity,
    ) {
        if source.physics == PhysicsKind::Static || source.stuck_to_camera {
            return;
        }
        let penetration = event.penetration;
        let overlap = (source.size() + collider.size()) * 0.5 - penetration.abs();
        if overlap.x <= 0.0 || overlap.y <= 0.0 {
            return;
        }

        let elasticity = source.material.merge(&collider.material).elasticity;
        let share = if collider.physics == PhysicsKind::Dynamic {
            0.5
        } else {
            1.0
        };

        let mut position = source.position();
        if overlap.x < overlap.y {
            position.x -= overlap.x * share * penetration.x.signum();
            source.speed.x = -source.speed.x * elasticity;
        } else {
            position.y -= overlap.y * share * penetration.y.signum();
            source.speed.y = -source.speed.y * elasticity;
        }
        source.set_position(position);
    }
}

/// Collects entities it touches.
///
/// The collected entity is deactivated (and swept after the frame's draw),
/// its `Value` is added to the collector's `Score`, and the `coin` sound
/// plays.
#[derive(Debug)]
pub struct Pickup {
    filter: String,
    sound: String,
}

impl Pickup {
    /// Collect entities whose names contain one of the filter entries
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            sound: String::from("coin"),
        }
    }

    /// Use another sound code
    #[must_use]
    pub fn with_sound(mut self, code: impl Into<String>) -> Self {
        self.sound = code.into();
        self
    }
}

impl Default for Pickup {
    fn default() -> Self {
        Self::new("coin")
    }
}

impl Behavior for Pickup {
    fn name(&self) -> &str {
        "pickup"
    }
}

impl CollisionResponse for Pickup {
    fn filtered_names(&self) -> &str {
        &self.filter
    }

    fn collide(
        &mut self,
        ctx: &mut GameContext,
        _event: &CollisionEvent,
        source: &mut Entity,
        collider: &mut Entity,
    ) {
        if !collider.active {
            return;
        }
        collider.active = false;

        let value = collider.attributes.int(AttributeKey::Value);
        let score = source.attributes.int(AttributeKey::Score) + value;
        source.attributes.set(AttributeKey::Score, score);
        ctx.audio.play(&self.sound, 1.0, 0.0, false);
        log::debug!("{} collected {} (+{value}, score {score})", source.name, collider.name);
    }
}
