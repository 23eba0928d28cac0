//! Rain particles

use glam::DVec2;

use super::{Behavior, ParticleBehavior};
use crate::core::GameContext;
use crate::entity::{Entity, EntityKind, PhysicsKind};
use crate::math::VectorExt;
use crate::renderer::{Color, rgba};

/// Fills its parent with falling drops.
///
/// Drops are children of the parent entity. They are spawned lazily, at most
/// `batch` per update, until `count` exist; from then on `create` does
/// nothing. A drop leaving the area is moved back to the top instead of
/// being destroyed. Drops fall with the world's (negated) gravity and drift
/// with its wind; without a world they use the parent's extent and a fixed
/// fall speed. A parent stuck to the camera keeps its drops within its own
/// rectangle.
#[derive(Debug, Clone)]
pub struct RainEmitter {
    count: usize,
    batch: usize,
    drop_size: DVec2,
    color: Color,
    max_speed: f64,
    spawned: u64,
}

impl RainEmitter {
    /// Emitter targeting `count` drops
    pub fn new(count: usize) -> Self {
        Self {
            count,
            batch: count,
            drop_size: DVec2::new(1.0, 4.0),
            color: rgba(120, 160, 255, 200),
            max_speed: 8.0,
            spawned: 0,
        }
    }

    /// Spawn at most `batch` drops per update
    #[must_use]
    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch.max(1);
        self
    }

    /// Drop color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Per-axis drop speed limit
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Target number of drops
    pub fn count(&self) -> usize {
        self.count
    }

    fn area(ctx: &GameContext, parent: &Entity) -> (DVec2, DVec2) {
        match &ctx.world {
            Some(world) if !parent.stuck_to_camera => (DVec2::ZERO, world.play_area),
            _ => (parent.position(), parent.size()),
        }
    }

    fn respawn(&self, ctx: &mut GameContext, drop: &mut Entity, origin: DVec2, extent: DVec2) {
        let x = origin.x + ctx.rng.range(0.0, extent.x);
        drop.set_position(DVec2::new(x, origin.y - self.drop_size.y));
        drop.speed = DVec2::new(0.0, ctx.rng.range(1.0, self.max_speed * 0.5));
    }
}

impl Behavior for RainEmitter {
    fn name(&self) -> &str {
        "rain"
    }

    fn update(&mut self, ctx: &mut GameContext, parent: &mut Entity, dt: f64) {
        let (origin, extent) = Self::area(ctx, parent);
        let drift = match &ctx.world {
            Some(world) => world.wind - world.gravity,
            None => DVec2::new(0.0, 0.5),
        };

        for drop in parent.children.iter_mut().filter(|d| d.active) {
            drop.speed += drift * dt;
            drop.speed.maximize(self.max_speed);
            let position = drop.position() + drop.speed * dt;
            drop.set_position(position);

            let outside = position.y > origin.y + extent.y
                || position.x < origin.x - drop.size().x
                || position.x > origin.x + extent.x;
            if outside {
                self.respawn(ctx, drop, origin, extent);
            }
        }
    }
}

impl ParticleBehavior for RainEmitter {
    fn create(&mut self, ctx: &mut GameContext, parent: &mut Entity) {
        let missing = self.count.saturating_sub(parent.children.len());
        if missing == 0 {
            return;
        }
        let (origin, extent) = Self::area(ctx, parent);
        for _ in 0..missing.min(self.batch) {
            self.spawned += 1;
            let mut drop = Entity::new(format!("{}_drop_{}", parent.name, self.spawned))
                .with_kind(EntityKind::Rectangle)
                .with_physics(PhysicsKind::Static)
                .with_size(self.drop_size.x, self.drop_size.y)
                .with_color(self.color)
                .with_fill(self.color)
                .with_layer(parent.layer, parent.priority)
                .with_stuck_to_camera(parent.stuck_to_camera);
            let y = origin.y + ctx.rng.range(0.0, extent.y);
            let x = origin.x + ctx.rng.range(0.0, extent.x);
            drop.set_position(DVec2::new(x, y));
            drop.speed = DVec2::new(0.0, ctx.rng.range(1.0, self.max_speed * 0.5));
            parent.children.push(drop);
        }
        log::trace!("{}: {} drops", parent.name, parent.children.len());
    }
}
