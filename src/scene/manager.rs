//! Scene registry and transitions

use std::fmt;

use rustc_hash::FxHashMap;

use super::{Scene, SceneState, Stage};
use crate::core::GameContext;
use crate::entity::EntityStore;
use crate::physics::PhysicsEngine;
use crate::renderer::Renderer;

/// Errors raised by scene transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No scene registered under this name
    UnknownScene(String),
    /// The scene to be replaced is live and must be disposed first
    SceneActive(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScene(name) => write!(f, "Unknown scene: {name}"),
            Self::SceneActive(name) => write!(f, "Scene is active: {name}"),
        }
    }
}

impl std::error::Error for SceneError {}

struct SceneSlot {
    scene: Box<dyn Scene>,
    entities: EntityStore,
    state: SceneState,
}

/// Registered scenes and the one that is live
#[derive(Default)]
pub struct SceneManager {
    slots: FxHashMap<String, SceneSlot>,
    active: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene; an inactive scene of the same name is replaced
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SceneActive`] if the name belongs to the live
    /// scene, which is left untouched. Use [`SceneManager::replace`] to
    /// dispose it first.
    pub fn add(&mut self, scene: impl Scene + 'static) -> Result<(), SceneError> {
        let name = scene.name().to_owned();
        if self.active.as_deref() == Some(name.as_str()) {
            return Err(SceneError::SceneActive(name));
        }
        self.insert(name, Box::new(scene));
        Ok(())
    }

    /// Register a scene, disposing the live scene first if it has the same name
    pub fn replace(
        &mut self,
        scene: impl Scene + 'static,
        ctx: &mut GameContext,
        physics: &mut PhysicsEngine,
        renderer: &mut Renderer,
    ) {
        let name = scene.name().to_owned();
        if self.active.as_deref() == Some(name.as_str()) {
            self.deactivate(ctx, physics, renderer);
        }
        self.insert(name, Box::new(scene));
    }

    fn insert(&mut self, name: String, scene: Box<dyn Scene>) {
        log::debug!("Scene '{name}' registered");
        let slot = SceneSlot {
            scene,
            entities: EntityStore::new(),
            state: SceneState::Created,
        };
        if self.slots.insert(name.clone(), slot).is_some() {
            log::warn!("Scene '{name}' replaced");
        }
    }

    /// Whether a scene is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Name of the live scene
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Lifecycle state of a registered scene
    pub fn state(&self, name: &str) -> Option<SceneState> {
        self.slots.get(name).map(|slot| slot.state)
    }

    /// Entities of a registered scene
    pub fn entities(&self, name: &str) -> Option<&EntityStore> {
        self.slots.get(name).map(|slot| &slot.entities)
    }

    /// Entities of the live scene
    pub fn active_entities(&self) -> Option<&EntityStore> {
        self.active.as_deref().and_then(|name| self.entities(name))
    }

    /// Entities of the live scene (mutable)
    pub fn active_entities_mut(&mut self) -> Option<&mut EntityStore> {
        let name = self.active.as_deref()?;
        self.slots.get_mut(name).map(|slot| &mut slot.entities)
    }

    /// Make `name` the live scene.
    ///
    /// The current scene, if any, is disposed first: its dispose hook runs,
    /// its entities are cleared and the physics, renderer, input and world
    /// state are reset. Only then does the new scene go through
    /// `initialize`, `load_resources` and `create`.
    pub fn activate(
        &mut self,
        name: &str,
        ctx: &mut GameContext,
        physics: &mut PhysicsEngine,
        renderer: &mut Renderer,
    ) -> Result<(), SceneError> {
        if !self.slots.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_owned()));
        }
        self.deactivate(ctx, physics, renderer);

        let Some(slot) = self.slots.get_mut(name) else {
            return Err(SceneError::UnknownScene(name.to_owned()));
        };
        let SceneSlot { scene, entities, state } = slot;
        let mut stage = Stage { ctx, physics, renderer, entities };

        scene.initialize(&mut stage);
        *state = SceneState::Initialized;
        scene.load_resources(&mut stage);
        scene.create(&mut stage);
        *state = SceneState::Active;

        log::info!("Scene '{name}' active with {} entities", stage.entities.len());
        self.active = Some(name.to_owned());
        Ok(())
    }

    /// Dispose the live scene, leaving no scene active
    pub fn deactivate(
        &mut self,
        ctx: &mut GameContext,
        physics: &mut PhysicsEngine,
        renderer: &mut Renderer,
    ) {
        let Some(name) = self.active.take() else {
            return;
        };
        let Some(SceneSlot { scene, entities, state }) = self.slots.get_mut(&name) else {
            return;
        };

        scene.dispose(&mut Stage {
            ctx: &mut *ctx,
            physics: &mut *physics,
            renderer: &mut *renderer,
            entities: &mut *entities,
        });
        entities.clear();
        physics.reset();
        renderer.reset();
        ctx.input.clear();
        ctx.world = None;
        *state = SceneState::Disposed;
        log::info!("Scene '{name}' disposed");
    }

    /// Run the live scene's input hook
    pub fn input(
        &mut self,
        ctx: &mut GameContext,
        physics: &mut PhysicsEngine,
        renderer: &mut Renderer,
    ) {
        if let Some((scene, entities)) = self.active_parts() {
            scene.input(&mut Stage { ctx, physics, renderer, entities });
        }
    }

    /// Run the live scene's update hook
    pub fn update(
        &mut self,
        ctx: &mut GameContext,
        physics: &mut PhysicsEngine,
        renderer: &mut Renderer,
        dt: f64,
    ) {
        if let Some((scene, entities)) = self.active_parts() {
            scene.update(&mut Stage { ctx, physics, renderer, entities }, dt);
        }
    }

    fn active_parts(&mut self) -> Option<(&mut Box<dyn Scene>, &mut EntityStore)> {
        let name = self.active.as_deref()?;
        self.slots
            .get_mut(name)
            .map(|slot| (&mut slot.scene, &mut slot.entities))
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.slots.keys().collect();
        names.sort();
        f.debug_struct("SceneManager")
            .field("scenes", &names)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::EngineConfig;
    use crate::entity::{Entity, World};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recording {
        name: &'static str,
        entities: usize,
        log: Log,
    }

    impl Scene for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn initialize(&mut self, _stage: &mut Stage<'_>) {
            self.log.borrow_mut().push(format!("{}:initialize", self.name));
        }

        fn load_resources(&mut self, _stage: &mut Stage<'_>) {
            self.log.borrow_mut().push(format!("{}:load_resources", self.name));
        }

        fn create(&mut self, stage: &mut Stage<'_>) {
            self.log.borrow_mut().push(format!("{}:create", self.name));
            stage.set_world(World::new(320.0, 200.0));
            for i in 0..self.entities {
                stage.add(Entity::new(format!("{}_{i}", self.name)));
            }
        }

        fn dispose(&mut self, stage: &mut Stage<'_>) {
            self.log
                .borrow_mut()
                .push(format!("{}:dispose:{}", self.name, stage.entities.len()));
        }
    }

    struct Fixture {
        ctx: GameContext,
        physics: PhysicsEngine,
        renderer: Renderer,
        scenes: SceneManager,
        log: Log,
    }

    impl Fixture {
        fn new() -> Self {
            let log = Log::default();
            let mut scenes = SceneManager::new();
            scenes
                .add(Recording { name: "title", entities: 2, log: Rc::clone(&log) })
                .unwrap();
            scenes
                .add(Recording { name: "demo", entities: 5, log: Rc::clone(&log) })
                .unwrap();
            Self {
                ctx: GameContext::new(EngineConfig::default()),
                physics: PhysicsEngine::new(),
                renderer: Renderer::new(320, 200),
                scenes,
                log,
            }
        }

        fn activate(&mut self, name: &str) -> Result<(), SceneError> {
            self.scenes
                .activate(name, &mut self.ctx, &mut self.physics, &mut self.renderer)
        }
    }

    #[test]
    fn test_switching_scenes_empties_the_previous_one() {
        let mut fx = Fixture::new();

        fx.activate("demo").unwrap();
        assert_eq!(fx.scenes.entities("demo").unwrap().len(), 5);
        assert_eq!(fx.renderer.draw_order().len(), 5);

        fx.activate("title").unwrap();

        assert!(fx.scenes.entities("demo").unwrap().is_empty());
        assert_eq!(fx.scenes.entities("title").unwrap().len(), 2);
        assert_eq!(fx.renderer.draw_order().len(), 2);
        assert_eq!(fx.scenes.active_name(), Some("title"));
        assert_eq!(fx.scenes.state("demo"), Some(SceneState::Disposed));
        assert_eq!(fx.scenes.state("title"), Some(SceneState::Active));
    }

    #[test]
    fn test_dispose_precedes_next_setup() {
        let mut fx = Fixture::new();
        fx.activate("demo").unwrap();
        fx.log.borrow_mut().clear();

        fx.activate("title").unwrap();

        assert_eq!(
            *fx.log.borrow(),
            vec![
                "demo:dispose:5",
                "title:initialize",
                "title:load_resources",
                "title:create"
            ]
        );
    }

    #[test]
    fn test_unknown_scene_keeps_current() {
        let mut fx = Fixture::new();
        fx.activate("title").unwrap();

        let err = fx.activate("missing").unwrap_err();

        assert_eq!(err, SceneError::UnknownScene("missing".into()));
        assert_eq!(fx.scenes.active_name(), Some("title"));
        assert_eq!(fx.scenes.entities("title").unwrap().len(), 2);
    }

    #[test]
    fn test_dispose_resets_shared_state() {
        let mut fx = Fixture::new();
        fx.activate("demo").unwrap();
        fx.ctx.input.press(winit::keyboard::KeyCode::KeyA);
        assert!(fx.ctx.world.is_some());

        fx.scenes
            .deactivate(&mut fx.ctx, &mut fx.physics, &mut fx.renderer);

        assert!(fx.ctx.world.is_none());
        assert!(!fx.ctx.input.is_key_pressed(winit::keyboard::KeyCode::KeyA));
        assert!(fx.renderer.draw_order().is_empty());
        assert_eq!(fx.scenes.active_name(), None);
        assert!(fx.scenes.active_entities().is_none());
    }

    #[test]
    fn test_reactivation_starts_clean() {
        let mut fx = Fixture::new();
        fx.activate("demo").unwrap();
        fx.activate("title").unwrap();
        fx.activate("demo").unwrap();

        assert_eq!(fx.scenes.entities("demo").unwrap().len(), 5);
        assert_eq!(fx.renderer.draw_order().len(), 5);
    }

    #[test]
    fn test_adding_over_live_scene_is_refused() {
        let mut fx = Fixture::new();
        fx.activate("demo").unwrap();

        let err = fx
            .scenes
            .add(Recording { name: "demo", entities: 1, log: Rc::clone(&fx.log) })
            .unwrap_err();

        assert_eq!(err, SceneError::SceneActive("demo".into()));
        assert_eq!(fx.scenes.active_name(), Some("demo"));
        assert_eq!(fx.scenes.entities("demo").unwrap().len(), 5);
        assert_eq!(fx.renderer.draw_order().len(), 5);
    }

    #[test]
    fn test_replacing_live_scene_disposes_it() {
        let mut fx = Fixture::new();
        fx.activate("demo").unwrap();
        fx.log.borrow_mut().clear();

        fx.scenes.replace(
            Recording { name: "demo", entities: 1, log: Rc::clone(&fx.log) },
            &mut fx.ctx,
            &mut fx.physics,
            &mut fx.renderer,
        );

        assert_eq!(*fx.log.borrow(), vec!["demo:dispose:5"]);
        assert!(fx.ctx.world.is_none());
        assert!(fx.renderer.draw_order().is_empty());
        assert_eq!(fx.scenes.active_name(), None);
        assert_eq!(fx.scenes.state("demo"), Some(SceneState::Created));

        fx.activate("demo").unwrap();
        assert_eq!(fx.scenes.entities("demo").unwrap().len(), 1);
    }

    #[test]
    fn test_replacing_inactive_scene_keeps_live_one() {
        let mut fx = Fixture::new();
        fx.activate("title").unwrap();

        fx.scenes
            .add(Recording { name: "demo", entities: 3, log: Rc::clone(&fx.log) })
            .unwrap();

        assert_eq!(fx.scenes.active_name(), Some("title"));
        assert_eq!(fx.renderer.draw_order().len(), 2);
        fx.activate("demo").unwrap();
        assert_eq!(fx.scenes.entities("demo").unwrap().len(), 3);
    }
}
