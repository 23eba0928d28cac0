//! Layered draw pipeline

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use rustc_hash::{FxHashMap, FxHashSet};

use super::plugins::default_plugins;
use super::{Camera, Color, DrawPlugin, Overlay, RasterSurface, Surface, rgba};
use crate::behavior::dispatch_draw;
use crate::core::GameContext;
use crate::entity::{Entity, EntityId, EntityKind, EntityStore};

/// Sort key of one draw-list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DrawKey {
    layer: i32,
    priority: i32,
    id: EntityId,
}

/// What happened during one [`Renderer::draw`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Entities (children included) drawn by a plugin
    pub drawn: usize,
    /// Entities outside the viewport
    pub culled: usize,
    /// Entities with no plugin for their kind
    pub skipped: usize,
    /// Inactive entities swept after drawing
    pub removed: Vec<EntityId>,
}

/// Composes a scene's entities into the offscreen surface
///
/// Entities are drawn in ascending `(layer, priority)` order; equal keys keep
/// their insertion order. The list is re-sorted on every insertion.
pub struct Renderer {
    surface: RasterSurface,
    plugins: FxHashMap<EntityKind, Box<dyn DrawPlugin>>,
    draw_list: Vec<DrawKey>,
    camera: Option<Camera>,
    overlay: Overlay,
    background: Color,
    frames: u64,
}

impl Renderer {
    /// Create a renderer with the default plugins
    pub fn new(width: u32, height: u32) -> Self {
        let mut renderer = Self {
            surface: RasterSurface::new(width, height),
            plugins: FxHashMap::default(),
            draw_list: Vec::new(),
            camera: None,
            overlay: Overlay::new(),
            background: rgba(0, 0, 0, 255),
            frames: 0,
        };
        for (kind, plugin) in default_plugins() {
            renderer.plugins.insert(kind, plugin);
        }
        renderer
    }

    /// Set the clear color
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Register (or replace) the plugin for a kind
    pub fn register(&mut self, kind: EntityKind, plugin: Box<dyn DrawPlugin>) {
        log::debug!("Draw plugin '{}' registered for {}", plugin.name(), kind.as_str());
        self.plugins.insert(kind, plugin);
    }

    /// Remove the plugin for a kind
    pub fn unregister(&mut self, kind: EntityKind) -> Option<Box<dyn DrawPlugin>> {
        self.plugins.remove(&kind)
    }

    /// Add an entity to the draw list and re-sort it
    pub fn add(&mut self, entity: &Entity) {
        let id = entity.id();
        if self.draw_list.iter().any(|key| key.id == id) {
            return;
        }
        self.draw_list.push(DrawKey {
            layer: entity.layer,
            priority: entity.priority,
            id,
        });
        self.draw_list.sort_by_key(|key| (key.layer, key.priority));
    }

    /// Entity handles in draw order
    pub fn draw_order(&self) -> Vec<EntityId> {
        self.draw_list.iter().map(|key| key.id).collect()
    }

    /// Draw-list keys in draw order
    pub fn draw_keys(&self) -> Vec<(i32, i32)> {
        self.draw_list.iter().map(|key| (key.layer, key.priority)).collect()
    }

    /// Use `camera` for the following frames
    pub fn set_camera(&mut self, camera: Camera) {
        log::debug!("Camera '{}' active", camera.name);
        self.camera = Some(camera);
    }

    /// Current camera
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Current camera (mutable)
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Overlay settings
    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    /// The offscreen surface
    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Number of frames drawn
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forget the draw list and camera (scene change)
    pub fn reset(&mut self) {
        self.draw_list.clear();
        self.camera = None;
    }

    /// World rectangle currently visible
    fn viewport(&self) -> (DVec2, DVec2) {
        match &self.camera {
            Some(camera) => (camera.position, camera.viewport),
            None => {
                let (width, height) = self.surface.size();
                (DVec2::ZERO, DVec2::new(f64::from(width), f64::from(height)))
            }
        }
    }

    /// Draw one frame, then sweep inactive entities out of `entities`
    pub fn draw(
        &mut self,
        ctx: &GameContext,
        entities: &mut EntityStore,
        stats: &BTreeMap<String, String>,
    ) -> FrameReport {
        let viewport = self.viewport();
        self.surface.clear(self.background);

        let mut pass = DrawPass {
            surface: &mut self.surface,
            plugins: &self.plugins,
            camera: self.camera.as_ref(),
            report: FrameReport::default(),
            missing: FxHashSet::default(),
        };
        for key in &self.draw_list {
            let Some(entity) = entities.by_id_mut(key.id) else {
                continue;
            };
            if !entity.active {
                continue;
            }
            if !is_visible(entity, viewport) {
                pass.report.culled += 1;
                continue;
            }
            pass.entity(ctx, entity, false);
        }
        let mut report = pass.report;

        let camera = self.camera.as_ref();
        self.overlay.draw_world(ctx, &mut self.surface, entities, camera);
        self.overlay.draw_screen(ctx, &mut self.surface, stats, camera, entities);
        if ctx.paused {
            self.overlay.draw_pause(ctx, &mut self.surface);
        }

        report.removed = entities.sweep_inactive();
        self.draw_list.retain(|key| entities.by_id(key.id).is_some());
        self.frames += 1;

        log::trace!(
            "Frame {}: {} drawn, {} culled, {} removed",
            self.frames,
            report.drawn,
            report.culled,
            report.removed.len()
        );
        report
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("size", &self.surface.size())
            .field("plugins", &self.plugins.len())
            .field("draw_list", &self.draw_list.len())
            .field("camera", &self.camera.as_ref().map(|c| c.name.as_str()))
            .field("frames", &self.frames)
            .finish()
    }
}

/// Stuck entities and entities larger than the viewport always pass
fn is_visible(entity: &Entity, (view_position, view_size): (DVec2, DVec2)) -> bool {
    if entity.stuck_to_camera {
        return true;
    }
    let size = entity.size();
    if size.x > view_size.x && size.y > view_size.y {
        return true;
    }
    let position = entity.position();
    let view_end = view_position + view_size;
    position.x < view_end.x
        && position.x + size.x > view_position.x
        && position.y < view_end.y
        && position.y + size.y > view_position.y
}

/// State of one frame's entity pass
struct DrawPass<'a> {
    surface: &'a mut RasterSurface,
    plugins: &'a FxHashMap<EntityKind, Box<dyn DrawPlugin>>,
    camera: Option<&'a Camera>,
    report: FrameReport,
    missing: FxHashSet<EntityKind>,
}

impl DrawPass<'_> {
    /// Draw an entity and its children; `in_camera` is set when an ancestor
    /// already applied the camera transform
    fn entity(&mut self, ctx: &GameContext, entity: &mut Entity, in_camera: bool) {
        let camera = self.camera.filter(|_| !in_camera && !entity.stuck_to_camera);
        if let Some(camera) = camera {
            camera.pre_draw(&mut *self.surface);
        }

        dispatch_draw(ctx, &mut *self.surface, entity);
        match self.plugins.get(&entity.kind) {
            Some(plugin) => {
                if plugin.draw(&mut *self.surface, entity) {
                    entity.drawn_by = Some(plugin.name());
                    self.report.drawn += 1;
                }
            }
            None => {
                if self.missing.insert(entity.kind) {
                    log::warn!("No draw plugin for {} entities", entity.kind.as_str());
                }
                self.report.skipped += 1;
            }
        }

        let in_camera = in_camera || camera.is_some();
        for child in entity.children.iter_mut().filter(|c| c.active) {
            self.entity(ctx, child, in_camera);
        }

        if let Some(camera) = camera {
            camera.post_draw(&mut *self.surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, RainEmitter, dispatch_update};
    use crate::core::EngineConfig;
    use crate::entity::World;

    fn frame(renderer: &mut Renderer, ctx: &GameContext, entities: &mut EntityStore) -> FrameReport {
        renderer.draw(ctx, entities, &BTreeMap::new())
    }

    fn add(renderer: &mut Renderer, entities: &mut EntityStore, entity: Entity) -> EntityId {
        renderer.add(&entity);
        entities.insert(entity)
    }

    #[test]
    fn test_draw_order_by_layer_then_priority() {
        let mut renderer = Renderer::new(320, 200);
        let mut entities = EntityStore::new();
        let a = add(&mut renderer, &mut entities, Entity::new("a").with_layer(1, 5));
        let b = add(&mut renderer, &mut entities, Entity::new("b").with_layer(2, 1));
        let c = add(&mut renderer, &mut entities, Entity::new("c").with_layer(1, 2));

        assert_eq!(renderer.draw_order(), vec![c, a, b]);
    }

    #[test]
    fn test_sort_order_holds_after_every_insert() {
        let mut renderer = Renderer::new(320, 200);
        let mut entities = EntityStore::new();
        let keys = [(3, 1), (0, 9), (3, 0), (1, 1), (0, 9), (-2, 4), (1, 0)];
        for (i, (layer, priority)) in keys.into_iter().enumerate() {
            add(&mut renderer, &mut entities, Entity::new(format!("e{i}")).with_layer(layer, priority));
            let order = renderer.draw_keys();
            assert!(order.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_equal_keys_keep_insertion_order() {
        let mut renderer = Renderer::new(320, 200);
        let mut entities = EntityStore::new();
        let first = add(&mut renderer, &mut entities, Entity::new("first").with_layer(1, 1));
        let second = add(&mut renderer, &mut entities, Entity::new("second").with_layer(1, 1));
        add(&mut renderer, &mut entities, Entity::new("back").with_layer(0, 0));

        assert_eq!(&renderer.draw_order()[1..], &[first, second]);
    }

    #[test]
    fn test_plugins_are_recorded() {
        let ctx = GameContext::new(EngineConfig::default());
        let mut renderer = Renderer::new(64, 64);
        let mut entities = EntityStore::new();
        add(&mut renderer, &mut entities, Entity::new("box").with_position(1.0, 1.0));
        add(
            &mut renderer,
            &mut entities,
            Entity::new("ball").with_kind(EntityKind::Ellipse).with_position(20.0, 20.0),
        );

        let report = frame(&mut renderer, &ctx, &mut entities);

        assert_eq!(report.drawn, 2);
        assert_eq!(entities.get("box").unwrap().drawn_by, Some("rectangle"));
        assert_eq!(entities.get("ball").unwrap().drawn_by, Some("ellipse"));
        assert_eq!(renderer.surface().pixel(2, 2), Some(rgba(255, 255, 255, 255)));
    }

    #[test]
    fn test_viewport_culling() {
        let ctx = GameContext::new(EngineConfig::default());
        let mut renderer = Renderer::new(100, 100);
        renderer.set_camera(Camera::new("main", 100.0, 100.0).with_position(200.0, 0.0));
        let mut entities = EntityStore::new();
        add(&mut renderer, &mut entities, Entity::new("seen").with_position(250.0, 50.0));
        add(&mut renderer, &mut entities, Entity::new("hidden").with_position(10.0, 10.0));
        add(
            &mut renderer,
            &mut entities,
            Entity::new("hud").with_position(10.0, 10.0).with_stuck_to_camera(true),
        );
        add(
            &mut renderer,
            &mut entities,
            Entity::new("sky").with_size(1000.0, 1000.0).with_position(-2000.0, 0.0),
        );

        let report = frame(&mut renderer, &ctx, &mut entities);

        assert_eq!(report.culled, 1);
        assert_eq!(report.drawn, 3);
        assert!(entities.get("hidden").unwrap().drawn_by.is_none());
        // camera space: 250 - 200 = 50
        assert_eq!(renderer.surface().pixel(51, 51), Some(rgba(255, 255, 255, 255)));
    }

    #[test]
    fn test_unknown_kind_is_skipped_then_recovers() {
        let ctx = GameContext::new(EngineConfig::default());
        let mut renderer = Renderer::new(64, 64);
        let text_plugin = renderer.unregister(EntityKind::Text).unwrap();
        let mut entities = EntityStore::new();
        add(&mut renderer, &mut entities, Entity::new("label").with_text("hi"));

        let report = frame(&mut renderer, &ctx, &mut entities);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.drawn, 0);
        assert!(entities.get("label").unwrap().drawn_by.is_none());

        renderer.register(EntityKind::Text, text_plugin);
        let report = frame(&mut renderer, &ctx, &mut entities);
        assert_eq!(report.drawn, 1);
        assert_eq!(entities.get("label").unwrap().drawn_by, Some("text"));
    }

    #[test]
    fn test_inactive_entities_are_swept_after_draw() {
        let ctx = GameContext::new(EngineConfig::default());
        let mut renderer = Renderer::new(64, 64);
        let mut entities = EntityStore::new();
        add(&mut renderer, &mut entities, Entity::new("keep"));
        let gone = add(&mut renderer, &mut entities, Entity::new("gone"));
        entities.get_mut("gone").unwrap().active = false;

        let report = frame(&mut renderer, &ctx, &mut entities);

        assert_eq!(report.removed, vec![gone]);
        assert!(entities.get("gone").is_none());
        assert_eq!(renderer.draw_order().len(), 1);
    }

    struct Marker;

    impl Behavior for Marker {
        fn draw(&mut self, _ctx: &GameContext, surface: &mut dyn Surface, entity: &Entity) {
            surface.draw_text("marked", entity.position(), rgba(255, 0, 0, 255));
        }
    }

    #[test]
    fn test_behaviors_and_children_are_drawn() {
        let mut ctx = GameContext::new(EngineConfig::default());
        ctx.world = Some(World::new(64.0, 64.0));
        let mut renderer = Renderer::new(64, 64);
        let mut entities = EntityStore::new();
        let mut rain = Entity::new("rain")
            .with_size(64.0, 64.0)
            .with_fill(rgba(0, 0, 0, 0))
            .with_behavior(Marker)
            .with_particles(RainEmitter::new(3));
        dispatch_update(&mut ctx, &mut rain, 1.0);
        add(&mut renderer, &mut entities, rain);

        let report = frame(&mut renderer, &ctx, &mut entities);

        assert_eq!(report.drawn, 4);
        assert_eq!(renderer.surface().text()[0].text, "marked");
        let rain = entities.get("rain").unwrap();
        assert!(rain.children.iter().all(|drop| drop.drawn_by == Some("rectangle")));
    }
}
