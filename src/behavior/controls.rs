//! Keyboard-driven movement

use glam::DVec2;
use winit::keyboard::KeyCode;

use super::Behavior;
use crate::core::GameContext;
use crate::entity::{AttributeKey, Entity};

/// Moves its entity with the arrow keys or WASD.
///
/// Input is sampled in the input phase and turned into a force in the
/// update phase, so the force lands inside the physics step that consumes it.
/// Shift doubles the step force; Space adds a one-shot upward jump.
#[derive(Debug, Default)]
pub struct PlayerInput {
    intent: DVec2,
}

impl PlayerInput {
    /// Create the behavior
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for PlayerInput {
    fn name(&self) -> &str {
        "player_input"
    }

    fn input(&mut self, ctx: &mut GameContext, entity: &mut Entity) {
        let input = &ctx.input;
        let mut step = entity.attributes.float(AttributeKey::StepForce);
        if input.shift() {
            step *= 2.0;
        }

        let mut intent = DVec2::ZERO;
        if input.is_key_pressed(KeyCode::ArrowLeft) || input.is_key_pressed(KeyCode::KeyA) {
            intent.x -= step;
            entity.direction = -1.0;
        }
        if input.is_key_pressed(KeyCode::ArrowRight) || input.is_key_pressed(KeyCode::KeyD) {
            intent.x += step;
            entity.direction = 1.0;
        }
        if input.is_key_pressed(KeyCode::ArrowUp) || input.is_key_pressed(KeyCode::KeyW) {
            intent.y -= step;
        }
        if input.is_key_pressed(KeyCode::ArrowDown) || input.is_key_pressed(KeyCode::KeyS) {
            intent.y += step;
        }
        if input.is_key_just_pressed(KeyCode::Space) {
            intent.y -= entity.attributes.float(AttributeKey::JumpForce);
        }
        self.intent = intent;
    }

    fn update(&mut self, _ctx: &mut GameContext, entity: &mut Entity, _dt: f64) {
        if self.intent != DVec2::ZERO {
            entity.apply_force(self.intent);
            self.intent = DVec2::ZERO;
        }
    }
}
