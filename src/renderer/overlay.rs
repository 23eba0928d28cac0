//! Debug overlay and pause banner

use std::collections::BTreeMap;

use glam::DVec2;

use super::{Camera, Color, Surface, rgba};
use crate::core::GameContext;
use crate::entity::{Entity, EntityStore};
use crate::math::CollisionBox;

/// Height of one overlay text line
const LINE_HEIGHT: f64 = 10.0;

/// What each debug level adds, cumulatively:
///
/// 1. frame statistics, custom lines and camera info
/// 2. world grid, collision boxes and entity names
/// 3. position and speed of each entity
/// 4. forces and material of each entity
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Grid cell size in world units
    pub grid_step: f64,
    /// Grid line color
    pub grid_color: Color,
    /// Collision box color
    pub box_color: Color,
    /// Text color
    pub text_color: Color,
    /// Color dimming the screen behind the pause banner
    pub pause_shade: Color,
}

impl Overlay {
    /// Default colors, 16 unit grid
    pub fn new() -> Self {
        Self {
            grid_step: 16.0,
            grid_color: rgba(60, 60, 60, 160),
            box_color: rgba(255, 255, 0, 200),
            text_color: rgba(255, 255, 255, 255),
            pause_shade: rgba(0, 0, 0, 128),
        }
    }

    /// World-space part: grid, boxes and per-entity labels
    pub fn draw_world(
        &self,
        ctx: &GameContext,
        surface: &mut dyn Surface,
        entities: &EntityStore,
        camera: Option<&Camera>,
    ) {
        let level = ctx.debug.level();
        if level < 2 {
            return;
        }

        if let Some(camera) = camera {
            camera.pre_draw(surface);
        }
        if let Some(world) = &ctx.world {
            self.draw_grid(surface, world.play_area);
        }
        if let Some(camera) = camera {
            camera.post_draw(surface);
        }

        for entity in entities.iter().filter(|e| e.active) {
            let transformed = camera.is_some() && !entity.stuck_to_camera;
            if let Some(camera) = camera.filter(|_| transformed) {
                camera.pre_draw(surface);
            }
            self.draw_entity(surface, entity, level);
            if let Some(camera) = camera.filter(|_| transformed) {
                camera.post_draw(surface);
            }
        }
    }

    fn draw_grid(&self, surface: &mut dyn Surface, area: DVec2) {
        if self.grid_step <= 0.0 {
            return;
        }
        let mut x = 0.0;
        while x <= area.x {
            surface.draw_line(DVec2::new(x, 0.0), DVec2::new(x, area.y), self.grid_color);
            x += self.grid_step;
        }
        let mut y = 0.0;
        while y <= area.y {
            surface.draw_line(DVec2::new(0.0, y), DVec2::new(area.x, y), self.grid_color);
            y += self.grid_step;
        }
    }

    fn draw_entity(&self, surface: &mut dyn Surface, entity: &Entity, level: u8) {
        let (min, max) = entity.collision_box().bounds();
        if entity.collider {
            match entity.collision_box() {
                CollisionBox::Rectangle { .. } => {
                    surface.stroke_rect(min, max - min, self.box_color, 1.0);
                }
                CollisionBox::Ellipse { .. } => {
                    surface.stroke_ellipse(min, max - min, self.box_color, 1.0);
                }
            }
        }
        let mut origin = entity.position() - DVec2::new(0.0, 2.0);
        surface.draw_text(&entity.name, origin, self.text_color);

        if level >= 3 {
            origin.y += entity.size().y + LINE_HEIGHT + 2.0;
            let p = entity.position();
            let s = entity.speed;
            let line = format!("pos=({:.1},{:.1}) spd=({:.2},{:.2})", p.x, p.y, s.x, s.y);
            surface.draw_text(&line, origin, self.text_color);
        }
        if level >= 4 {
            origin.y += LINE_HEIGHT;
            let f = entity.net_force;
            let m = &entity.material;
            let line = format!(
                "frc=({:.2},{:.2}) mat={} e={:.2} d={:.2} r={:.2}",
                f.x, f.y, m.name, m.elasticity, m.density, m.roughness
            );
            surface.draw_text(&line, origin, self.text_color);
        }
    }

    /// Screen-space part: statistics and camera info
    pub fn draw_screen(
        &self,
        ctx: &GameContext,
        surface: &mut dyn Surface,
        stats: &BTreeMap<String, String>,
        camera: Option<&Camera>,
        entities: &EntityStore,
    ) {
        if !ctx.debug.enabled() {
            return;
        }
        let mut origin = DVec2::new(4.0, LINE_HEIGHT);
        let mut line = |surface: &mut dyn Surface, text: &str| {
            surface.draw_text(text, origin, self.text_color);
            origin.y += LINE_HEIGHT;
        };

        for (key, value) in stats {
            line(&mut *surface, &format!("{key}: {value}"));
        }
        for custom in ctx.debug.lines() {
            line(&mut *surface, custom);
        }
        if let Some(camera) = camera {
            let target = camera
                .target()
                .and_then(|id| entities.by_id(id))
                .map_or("none", |e| e.name.as_str());
            let text = ctx.messages.get(
                "debug.camera",
                &[
                    &camera.name,
                    &format!("{:.0}", camera.position.x),
                    &format!("{:.0}", camera.position.y),
                    &target,
                ],
            );
            line(&mut *surface, &text);
        }
    }

    /// Dim the screen and show the localized pause message
    pub fn draw_pause(&self, ctx: &GameContext, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        let size = DVec2::new(f64::from(width), f64::from(height));
        surface.fill_rect(DVec2::ZERO, size, self.pause_shade);

        let text = ctx.messages.get("game.state.paused", &[]);
        // about 6 pixels per character
        let origin = DVec2::new(size.x * 0.5 - text.chars().count() as f64 * 3.0, size.y * 0.5);
        surface.draw_text(&text, origin, self.text_color);
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}
