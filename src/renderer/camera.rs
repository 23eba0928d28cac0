//! Follow camera for 2D scenes

use glam::DVec2;

use super::Surface;
use crate::entity::{Entity, EntityId, EntityStore};
use crate::math::CollisionBox;

/// Upper bound on the frame time used for the follow correction
const MAX_CORRECTION_DT: f64 = 10.0;

/// Tween-damped camera that keeps a target entity centered
///
/// The target is a handle into the scene's entity table, resolved on every
/// update. When it no longer resolves the camera simply stays put.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera name
    pub name: String,
    /// Top-left corner of the viewport in world space
    pub position: DVec2,
    /// Rotation in radians
    pub rotation: f64,
    /// Convergence factor in (0, 1]; 1 snaps instantly
    pub tween: f64,
    /// Viewport width and height
    pub viewport: DVec2,
    target: Option<EntityId>,
}

impl Camera {
    /// Create a camera at the origin
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            position: DVec2::ZERO,
            rotation: 0.0,
            tween: 1.0,
            viewport: DVec2::new(width, height),
            target: None,
        }
    }

    /// Set the convergence factor (clamped into (0, 1])
    #[must_use]
    pub fn with_tween(mut self, tween: f64) -> Self {
        self.tween = tween.clamp(f64::EPSILON, 1.0);
        self
    }

    /// Follow an entity
    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the initial position
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = DVec2::new(x, y);
        self
    }

    /// Followed entity, if any
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Change or drop the followed entity
    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    /// Position that centers `entity` in the viewport
    pub fn ideal_position(&self, entity: &Entity) -> DVec2 {
        entity.center() - self.viewport * 0.5
    }

    /// Visible world rectangle
    pub fn view_box(&self) -> CollisionBox {
        CollisionBox::rectangle(self.position, self.viewport)
    }

    /// Move one step towards the target; returns false when there is none
    pub fn update(&mut self, dt: f64, entities: &EntityStore) -> bool {
        let Some(target) = self.target.and_then(|id| entities.by_id(id)) else {
            return false;
        };
        let offset = self.ideal_position(target) - self.position;
        let factor = (self.tween * dt.min(MAX_CORRECTION_DT)).min(1.0);
        self.position += DVec2::new(correction(offset.x, factor), correction(offset.y, factor));
        true
    }

    /// Switch the surface to world space as seen by this camera
    pub fn pre_draw(&self, surface: &mut dyn Surface) {
        surface.translate(-self.position);
        surface.rotate(-self.rotation);
    }

    /// Undo [`Camera::pre_draw`]
    pub fn post_draw(&self, surface: &mut dyn Surface) {
        surface.rotate(self.rotation);
        surface.translate(self.position);
    }
}

/// Whole-unit step towards `offset`, never past it
fn correction(offset: f64, factor: f64) -> f64 {
    if offset == 0.0 || factor <= 0.0 {
        return 0.0;
    }
    let step = offset.signum() * (offset.abs() * factor).ceil();
    if step.abs() > offset.abs() { offset } else { step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RasterSurface;

    fn store_with_target(x: f64, y: f64) -> (EntityStore, EntityId) {
        let mut entities = EntityStore::new();
        let id = entities.insert(Entity::new("target").with_position(x, y).with_size(16.0, 16.0));
        (entities, id)
    }

    #[test]
    fn test_converges_onto_target() {
        let (entities, id) = store_with_target(150.0, 100.0);
        let mut camera = Camera::new("main", 320.0, 200.0).with_tween(0.1).with_target(id);

        for _ in 0..100 {
            camera.update(1.0, &entities);
        }

        let focus = camera.position + camera.viewport * 0.5;
        let target = entities.by_id(id).unwrap();
        assert!(target.collision_box().contains(focus));
    }

    #[test]
    fn test_distance_strictly_decreases() {
        let (entities, id) = store_with_target(150.0, 100.0);
        let ideal = camera_ideal(&entities, id);
        for tween in [0.05, 0.1, 0.5, 1.0] {
            let mut camera = Camera::new("main", 320.0, 200.0)
                .with_tween(tween)
                .with_position(500.0, -300.0)
                .with_target(id);
            let mut distance = camera.position.distance(ideal);
            let mut guard = 0;
            while distance > 1.0 {
                camera.update(1.0, &entities);
                let next = camera.position.distance(ideal);
                assert!(next < distance, "tween {tween} diverged");
                distance = next;
                guard += 1;
                assert!(guard < 10_000);
            }
        }
    }

    fn camera_ideal(entities: &EntityStore, id: EntityId) -> DVec2 {
        Camera::new("ideal", 320.0, 200.0).ideal_position(entities.by_id(id).unwrap())
    }

    #[test]
    fn test_full_tween_snaps() {
        let (entities, id) = store_with_target(40.0, 40.0);
        let mut camera = Camera::new("main", 100.0, 100.0).with_target(id);
        camera.update(1.0, &entities);
        assert_eq!(camera.position, DVec2::new(-2.0, -2.0));
    }

    #[test]
    fn test_large_dt_does_not_overshoot() {
        let (entities, id) = store_with_target(40.0, 40.0);
        let mut camera = Camera::new("main", 100.0, 100.0).with_tween(0.5).with_target(id);
        camera.update(1_000.0, &entities);
        assert_eq!(camera.position, DVec2::new(-2.0, -2.0));
    }

    #[test]
    fn test_missing_target_is_a_no_op() {
        let (mut entities, id) = store_with_target(40.0, 40.0);
        let mut camera = Camera::new("main", 100.0, 100.0).with_target(id);
        entities.remove("target");

        assert!(!camera.update(1.0, &entities));
        assert_eq!(camera.position, DVec2::ZERO);
    }

    #[test]
    fn test_pre_and_post_draw_cancel_out() {
        let mut camera = Camera::new("main", 100.0, 100.0).with_position(12.0, -7.0);
        let mut surface = RasterSurface::new(4, 4);

        camera.pre_draw(&mut surface);
        let moved = surface.transform().transform_point2(DVec2::new(12.0, -7.0));
        assert!(moved.length() < 1e-9);
        camera.post_draw(&mut surface);

        camera.rotation = 0.25;
        camera.pre_draw(&mut surface);
        camera.post_draw(&mut surface);
        let back = surface.transform().transform_point2(DVec2::new(3.0, 5.0));
        assert!(back.distance(DVec2::new(3.0, 5.0)) < 1e-9);
    }
}
