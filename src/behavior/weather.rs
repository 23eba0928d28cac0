//! World-level weather

use glam::DVec2;

use super::Behavior;
use crate::core::GameContext;
use crate::entity::Entity;

/// Periodically changes the world's wind
#[derive(Debug, Clone)]
pub struct Storm {
    period: f64,
    strength: f64,
    elapsed: f64,
}

impl Storm {
    /// Change the wind every `period` time units, up to `strength` either way
    pub fn new(period: f64, strength: f64) -> Self {
        Self {
            period,
            strength,
            elapsed: 0.0,
        }
    }
}

impl Behavior for Storm {
    fn name(&self) -> &str {
        "storm"
    }

    fn update(&mut self, ctx: &mut GameContext, _entity: &mut Entity, dt: f64) {
        self.elapsed += dt;
        if self.elapsed < self.period {
            return;
        }
        self.elapsed = 0.0;
        if let Some(world) = ctx.world.as_mut() {
            let gust = ctx.rng.range(-self.strength, self.strength);
            world.wind = DVec2::new(gust, world.wind.y);
            log::debug!("Storm gust: wind={:?}", world.wind);
        }
    }
}
