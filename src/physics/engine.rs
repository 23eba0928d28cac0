//! Integration, world constraint and collision pass

use glam::DVec2;

use super::{CollisionEvent, CollisionMode};
use crate::behavior::{dispatch_collision, dispatch_update};
use crate::core::GameContext;
use crate::entity::{AttributeKey, Entity, EntityStore, PhysicsKind, World};
use crate::math::{VectorExt, add_all};

/// Steps every entity of a scene
///
/// The engine itself is nearly stateless: the world lives in the game
/// context and the entities in the scene's store. It only remembers the
/// events of the last step for diagnostics.
#[derive(Debug, Default)]
pub struct PhysicsEngine {
    mode: CollisionMode,
    last_collisions: Vec<CollisionEvent>,
    steps: u64,
}

impl PhysicsEngine {
    /// Create an engine emitting mirrored collision events
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how overlapping pairs are reported
    #[must_use]
    pub fn with_mode(mut self, mode: CollisionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current collision mode
    pub fn mode(&self) -> CollisionMode {
        self.mode
    }

    /// Change the collision mode
    pub fn set_mode(&mut self, mode: CollisionMode) {
        self.mode = mode;
    }

    /// Events detected by the last step
    pub fn last_collisions(&self) -> &[CollisionEvent] {
        &self.last_collisions
    }

    /// Number of steps run since the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Forget cached events and counters
    pub fn reset(&mut self) {
        self.last_collisions.clear();
        self.steps = 0;
    }

    /// Run one simulation step over `entities`
    pub fn update(&mut self, ctx: &mut GameContext, entities: &mut EntityStore, dt: f64) {
        let mut moved = 0usize;
        for slot in 0..entities.len() {
            let Some(entity) = entities.at_mut(slot) else {
                continue;
            };
            if entity.active && entity.physics == PhysicsKind::Dynamic {
                dispatch_update(ctx, entity, dt);
                if !entity.stuck_to_camera {
                    Self::integrate(ctx.world.as_ref(), entity, dt);
                    moved += 1;
                }
            }
            entity.forces.clear();
        }

        let events = self.detect_collisions(entities);
        // single events still reach the responses of both sides
        let deliveries: Vec<CollisionEvent> = match self.mode {
            CollisionMode::Mirrored => events.clone(),
            CollisionMode::Single => events
                .iter()
                .flat_map(|event| [*event, event.mirrored()])
                .collect(),
        };
        for event in &deliveries {
            let (Some(a), Some(b)) = (
                entities.slot_of(event.source),
                entities.slot_of(event.collider),
            ) else {
                continue;
            };
            let (source, collider) = entities.pair_mut(a, b);
            // an earlier response of this step may already have removed one side
            if !source.active || !collider.active {
                continue;
            }
            log::trace!(
                "Collision {} -> {} ({:?})",
                source.name,
                collider.name,
                event.penetration
            );
            dispatch_collision(ctx, event, source, collider);
        }

        self.steps += 1;
        log::debug!(
            "Physics step {}: {} moved, {} collisions",
            self.steps,
            moved,
            events.len()
        );
        self.last_collisions = events;
    }

    /// Find every overlapping pair of active collider-flagged entities
    pub fn detect_collisions(&self, entities: &EntityStore) -> Vec<CollisionEvent> {
        let candidates: Vec<&Entity> = entities
            .iter()
            .filter(|e| e.active && e.collider)
            .collect();

        let mut events = Vec::new();
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if !a.collision_box().intersects(b.collision_box()) {
                    continue;
                }
                let event = CollisionEvent::new(a, b);
                events.push(event);
                if self.mode == CollisionMode::Mirrored {
                    events.push(event.mirrored());
                }
            }
        }
        events
    }

    fn integrate(world: Option<&World>, entity: &mut Entity, dt: f64) {
        if let Some(world) = world {
            entity.forces.push(-world.gravity);
        }

        entity.net_force = add_all(&entity.forces);
        let mut acceleration = entity.net_force * entity.material.density * entity.mass;
        acceleration.maximize(entity.attributes.float(AttributeKey::MaxAcceleration));
        entity.acceleration = acceleration;

        let mut speed = (entity.speed + acceleration * dt) * entity.material.roughness;
        speed.maximize(entity.attributes.float(AttributeKey::MaxSpeed));
        entity.speed = speed;

        entity.set_position(entity.position() + speed * dt);
        entity.forces.clear();

        if let Some(world) = world {
            Self::constrain(world, entity);
        }
    }

    fn constrain(world: &World, entity: &mut Entity) {
        let max = (world.play_area - entity.size()).max(DVec2::ZERO);
        let position = entity.position();
        let clamped = position.clamp(DVec2::ZERO, max);
        if clamped != position {
            entity.set_position(clamped);
            entity.speed *= -entity.material.elasticity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, Pickup};
    use crate::core::EngineConfig;
    use crate::entity::Material;

    const EPSILON: f64 = 1e-9;

    fn world_context() -> GameContext {
        let mut ctx = GameContext::new(EngineConfig::default());
        ctx.world = Some(World::new(320.0, 200.0));
        ctx
    }

    fn bouncy_box(name: &str, x: f64, y: f64) -> Entity {
        Entity::new(name)
            .with_position(x, y)
            .with_size(16.0, 16.0)
            .with_material(Material::new("test", 0.1, 1.0, 1.0))
    }

    struct Push(DVec2);

    impl Behavior for Push {
        fn update(&mut self, _ctx: &mut GameContext, entity: &mut Entity, _dt: f64) {
            entity.apply_force(self.0);
        }
    }

    #[test]
    fn test_integration_scales_by_material_and_mass() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(
            Entity::new("heavy")
                .with_position(100.0, 100.0)
                .with_size(16.0, 16.0)
                .with_mass(2.0)
                .with_material(Material::new("mud", 0.1, 0.5, 0.9))
                .with_speed(1.0, 0.0)
                .with_behavior(Push(DVec2::new(2.0, 0.0))),
        );
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 0.5);

        let entity = entities.get("heavy").unwrap();
        assert!((entity.net_force - DVec2::new(2.0, 0.981)).length() < EPSILON);
        // (force - gravity) * density * mass
        assert!((entity.acceleration.x - 2.0).abs() < EPSILON);
        assert!((entity.acceleration.y - 0.981).abs() < EPSILON);
        // (speed + acceleration * dt) * roughness
        assert!((entity.speed.x - 1.8).abs() < EPSILON);
        assert!((entity.speed.y - 0.44145).abs() < EPSILON);
        // position + speed * dt
        assert!((entity.position().x - 100.9).abs() < EPSILON);
        assert!((entity.position().y - 100.220725).abs() < EPSILON);
    }

    #[test]
    fn test_single_step_integration() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(bouncy_box("box", 0.0, 0.0));
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);

        let entity = entities.get("box").unwrap();
        assert!((entity.acceleration.y - 0.981).abs() < EPSILON);
        assert!(entity.acceleration.x.abs() < EPSILON);
        assert!((entity.speed.y - 0.981).abs() < EPSILON);
        assert!((entity.position().y - 0.981).abs() < EPSILON);
        assert_eq!(entity.position().x, 0.0);
        assert!(entity.forces.is_empty());
    }

    #[test]
    fn test_boundary_clamp_reflects_velocity() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(bouncy_box("box", -5.0, 50.0).with_speed(-2.0, 0.0));
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);

        let entity = entities.get("box").unwrap();
        assert_eq!(entity.position().x, 0.0);
        // whole velocity is reversed and scaled once
        assert!((entity.speed.x - 0.2).abs() < EPSILON);
        assert!((entity.speed.y + 0.0981).abs() < EPSILON);
    }

    #[test]
    fn test_reflection_on_far_boundary() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(bouncy_box("box", 300.0, 50.0).with_speed(10.0, 0.0));
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);

        let entity = entities.get("box").unwrap();
        assert_eq!(entity.position().x, 304.0);
        assert!((entity.speed.x + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounds_and_force_clear_invariants() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(bouncy_box("right", 100.0, 100.0).with_behavior(Push(DVec2::new(3.0, 0.0))));
        entities.insert(bouncy_box("up", 10.0, 150.0).with_behavior(Push(DVec2::new(0.5, -4.0))));
        entities.insert(
            bouncy_box("wall", 50.0, 50.0)
                .with_physics(PhysicsKind::Static)
                .with_behavior(Push(DVec2::X)),
        );
        let mut physics = PhysicsEngine::new();

        for _ in 0..200 {
            if let Some(wall) = entities.get_mut("wall") {
                wall.apply_force(DVec2::Y);
            }
            physics.update(&mut ctx, &mut entities, 1.0);

            for entity in entities.iter() {
                assert!(entity.forces.is_empty(), "{} kept forces", entity.name);
                let p = entity.position();
                assert!(p.x >= 0.0 && p.x <= 320.0 - entity.size().x);
                assert!(p.y >= 0.0 && p.y <= 200.0 - entity.size().y);
            }
        }
        assert_eq!(entities.get("right").unwrap().position().x, 304.0);
    }

    #[test]
    fn test_static_and_stuck_entities_do_not_move() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(
            bouncy_box("floor", 0.0, 180.0)
                .with_physics(PhysicsKind::Static)
                .with_speed(5.0, 5.0),
        );
        entities.insert(
            bouncy_box("hud", 4.0, 4.0)
                .with_stuck_to_camera(true)
                .with_speed(5.0, 5.0)
                .with_behavior(Push(DVec2::ONE)),
        );
        let mut physics = PhysicsEngine::new();

        for _ in 0..10 {
            physics.update(&mut ctx, &mut entities, 1.0);
        }

        assert_eq!(entities.get("floor").unwrap().position(), DVec2::new(0.0, 180.0));
        let hud = entities.get("hud").unwrap();
        assert_eq!(hud.position(), DVec2::new(4.0, 4.0));
        assert!(hud.forces.is_empty());
    }

    #[test]
    fn test_no_world_means_no_gravity_or_constraint() {
        let mut ctx = GameContext::new(EngineConfig::default());
        let mut entities = EntityStore::new();
        entities.insert(bouncy_box("drifter", -5.0, 0.0).with_speed(-1.0, 0.0));
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);

        let entity = entities.get("drifter").unwrap();
        assert_eq!(entity.position(), DVec2::new(-6.0, 0.0));
        assert_eq!(entity.speed, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_limits_clamp_per_axis() {
        let mut ctx = world_context();
        let mut entities = EntityStore::new();
        entities.insert(
            bouncy_box("rocket", 100.0, 100.0)
                .with_attribute(AttributeKey::MaxAcceleration, 1.0)
                .with_attribute(AttributeKey::MaxSpeed, 1.5)
                .with_behavior(Push(DVec2::new(10.0, 0.0))),
        );
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);
        let rocket = entities.get("rocket").unwrap();
        assert_eq!(rocket.acceleration.x, 1.0);
        assert!((rocket.acceleration.y - 0.981).abs() < EPSILON);

        physics.update(&mut ctx, &mut entities, 1.0);
        let rocket = entities.get("rocket").unwrap();
        assert_eq!(rocket.speed.x, 1.5);
        assert_eq!(rocket.speed.y, 1.5);
    }

    #[test]
    fn test_mirrored_detection() {
        let mut entities = EntityStore::new();
        let a = entities.insert(Entity::new("a").with_position(10.0, 10.0).with_collider(true));
        let b = entities.insert(Entity::new("b").with_position(15.0, 15.0).with_collider(true));
        entities.insert(Entity::new("ghost").with_position(12.0, 12.0));

        let events = PhysicsEngine::new().detect_collisions(&entities);

        assert_eq!(events.len(), 2);
        assert_eq!((events[0].source, events[0].collider), (a, b));
        assert_eq!((events[1].source, events[1].collider), (b, a));
        assert!(events.iter().all(|e| e.penetration != DVec2::ZERO));
    }

    #[test]
    fn test_single_detection() {
        let mut entities = EntityStore::new();
        let a = entities.insert(Entity::new("a").with_position(10.0, 10.0).with_collider(true));
        entities.insert(Entity::new("b").with_position(15.0, 15.0).with_collider(true));
        entities.insert(Entity::new("far").with_position(100.0, 100.0).with_collider(true));

        let physics = PhysicsEngine::new().with_mode(CollisionMode::Single);
        let events = physics.detect_collisions(&entities);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, a);
        assert_eq!(events[0].penetration, DVec2::new(5.0, 5.0));
    }

    #[test]
    fn test_inactive_entities_are_not_detected() {
        let mut entities = EntityStore::new();
        entities.insert(Entity::new("a").with_position(10.0, 10.0).with_collider(true));
        let mut b = Entity::new("b").with_position(15.0, 15.0).with_collider(true);
        b.active = false;
        entities.insert(b);

        assert!(PhysicsEngine::new().detect_collisions(&entities).is_empty());
    }

    #[test]
    fn test_collisions_reach_responses_once() {
        let mut ctx = GameContext::new(EngineConfig::default());
        let mut entities = EntityStore::new();
        entities.insert(
            Entity::new("player")
                .with_position(10.0, 10.0)
                .with_collider(true)
                .with_collision_response(Pickup::default()),
        );
        entities.insert(
            Entity::new("coin_1")
                .with_position(14.0, 14.0)
                .with_physics(PhysicsKind::Static)
                .with_collider(true)
                .with_attribute(AttributeKey::Value, 5),
        );
        let mut physics = PhysicsEngine::new();

        physics.update(&mut ctx, &mut entities, 1.0);

        assert_eq!(physics.last_collisions().len(), 2);
        assert!(!entities.get("coin_1").unwrap().active);
        let player = entities.get("player").unwrap();
        assert_eq!(player.attributes.int(AttributeKey::Score), 5);

        physics.reset();
        assert!(physics.last_collisions().is_empty());
        assert_eq!(physics.steps(), 0);
    }

    #[test]
    fn test_single_mode_reaches_later_inserted_responses() {
        let mut ctx = GameContext::new(EngineConfig::default());
        let mut entities = EntityStore::new();
        let coin = entities.insert(
            Entity::new("coin_1")
                .with_position(14.0, 14.0)
                .with_physics(PhysicsKind::Static)
                .with_collider(true)
                .with_attribute(AttributeKey::Value, 7),
        );
        entities.insert(
            Entity::new("player")
                .with_position(10.0, 10.0)
                .with_collider(true)
                .with_collision_response(Pickup::default()),
        );
        let mut physics = PhysicsEngine::new().with_mode(CollisionMode::Single);

        physics.update(&mut ctx, &mut entities, 1.0);

        assert_eq!(physics.last_collisions().len(), 1);
        assert_eq!(physics.last_collisions()[0].source, coin);
        assert!(!entities.get("coin_1").unwrap().active);
        let player = entities.get("player").unwrap();
        assert_eq!(player.attributes.int(AttributeKey::Score), 7);
    }
}
