//! Scene hooks and the view they run against

use crate::core::GameContext;
use crate::entity::{Entity, EntityId, EntityStore, World};
use crate::physics::PhysicsEngine;
use crate::renderer::{Camera, Renderer};

/// Where a scene is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    /// Registered, never activated
    #[default]
    Created,
    /// `initialize` has run
    Initialized,
    /// Entities created, receiving input and updates
    Active,
    /// Entities cleared after deactivation
    Disposed,
}

/// Everything a scene hook may touch
pub struct Stage<'a> {
    pub ctx: &'a mut GameContext,
    pub physics: &'a mut PhysicsEngine,
    pub renderer: &'a mut Renderer,
    /// The scene's own entities
    pub entities: &'a mut EntityStore,
}

impl Stage<'_> {
    /// Insert an entity into the scene and the draw list
    pub fn add(&mut self, entity: Entity) -> EntityId {
        self.renderer.add(&entity);
        self.entities.insert(entity)
    }

    /// Replace the renderer's camera
    pub fn set_camera(&mut self, camera: Camera) {
        self.renderer.set_camera(camera);
    }

    /// Install the world shared by physics and rendering
    pub fn set_world(&mut self, world: World) {
        log::debug!(
            "World {}x{} gravity=({}, {})",
            world.play_area.x,
            world.play_area.y,
            world.gravity.x,
            world.gravity.y
        );
        self.ctx.world = Some(world);
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }
}

/// A named set of entities with lifecycle hooks
///
/// On activation the manager calls `initialize`, `load_resources` and
/// `create` in that order. While active, `input` runs every frame and
/// `update` every unpaused frame. `dispose` runs before the entities are
/// cleared.
pub trait Scene {
    /// Unique scene name
    fn name(&self) -> &str;

    fn initialize(&mut self, _stage: &mut Stage<'_>) {}

    /// Load images and sounds through `stage.ctx.resources`
    fn load_resources(&mut self, _stage: &mut Stage<'_>) {}

    /// Create the scene's entities
    fn create(&mut self, stage: &mut Stage<'_>);

    fn input(&mut self, _stage: &mut Stage<'_>) {}

    fn update(&mut self, _stage: &mut Stage<'_>, _dt: f64) {}

    fn dispose(&mut self, _stage: &mut Stage<'_>) {}
}
