//! Per-kind draw plugins

use glam::{DAffine2, DVec2};

use super::{Color, Surface};
use crate::entity::{Entity, EntityKind};

/// Draws one kind of entity
pub trait DrawPlugin {
    /// Name recorded on the entities it draws
    fn name(&self) -> &'static str;

    /// Draw `entity` in the surface's current space; returns false when
    /// there was nothing to draw
    fn draw(&self, surface: &mut dyn Surface, entity: &Entity) -> bool;
}

/// Default plugin for each entity kind
pub fn default_plugins() -> Vec<(EntityKind, Box<dyn DrawPlugin>)> {
    vec![
        (EntityKind::Rectangle, Box::new(RectanglePlugin)),
        (EntityKind::Ellipse, Box::new(EllipsePlugin)),
        (EntityKind::Image, Box::new(ImagePlugin)),
        (EntityKind::Text, Box::new(TextPlugin)),
    ]
}

/// Run `draw` with the surface rotated around the entity's center
fn rotated(surface: &mut dyn Surface, entity: &Entity, draw: impl FnOnce(&mut dyn Surface)) {
    if entity.rotation == 0.0 {
        draw(&mut *surface);
        return;
    }
    let saved = surface.transform();
    let center = entity.center();
    surface.set_transform(
        saved
            * DAffine2::from_translation(center)
            * DAffine2::from_angle(entity.rotation)
            * DAffine2::from_translation(-center),
    );
    draw(&mut *surface);
    surface.set_transform(saved);
}

/// Shadow, body and outline of a simple shape
fn draw_shape(
    surface: &mut dyn Surface,
    entity: &Entity,
    fill: fn(&mut dyn Surface, DVec2, DVec2, Color),
    stroke: fn(&mut dyn Surface, DVec2, DVec2, Color, f64),
) {
    let style = &entity.style;
    let (position, size) = (entity.position(), entity.size());

    if let Some(shadow) = style.shadow {
        fill(surface, position + shadow.offset, size, shadow.color);
    }
    match style.fill {
        Some(body) => {
            fill(surface, position, size, body);
            stroke(surface, position, size, style.color, 1.0);
        }
        None => fill(surface, position, size, style.color),
    }
    if let Some(border) = style.border {
        stroke(surface, position, size, border.color, border.width);
    }
}

/// Plain rectangles
#[derive(Debug, Default)]
pub struct RectanglePlugin;

impl DrawPlugin for RectanglePlugin {
    fn name(&self) -> &'static str {
        "rectangle"
    }

    fn draw(&self, surface: &mut dyn Surface, entity: &Entity) -> bool {
        rotated(surface, entity, |surface| {
            draw_shape(
                surface,
                entity,
                |s, p, z, c| s.fill_rect(p, z, c),
                |s, p, z, c, w| s.stroke_rect(p, z, c, w),
            );
        });
        true
    }
}

/// Ellipses inscribed in the entity's bounds
#[derive(Debug, Default)]
pub struct EllipsePlugin;

impl DrawPlugin for EllipsePlugin {
    fn name(&self) -> &'static str {
        "ellipse"
    }

    fn draw(&self, surface: &mut dyn Surface, entity: &Entity) -> bool {
        rotated(surface, entity, |surface| {
            draw_shape(
                surface,
                entity,
                |s, p, z, c| s.fill_ellipse(p, z, c),
                |s, p, z, c, w| s.stroke_ellipse(p, z, c, w),
            );
        });
        true
    }
}

/// Bitmaps, scaled to the entity's size and mirrored when facing left
#[derive(Debug, Default)]
pub struct ImagePlugin;

impl DrawPlugin for ImagePlugin {
    fn name(&self) -> &'static str {
        "image"
    }

    fn draw(&self, surface: &mut dyn Surface, entity: &Entity) -> bool {
        let Some(image) = &entity.image else {
            log::debug!("{}: image entity without image, skipped", entity.name);
            return false;
        };
        rotated(surface, entity, |surface| {
            if entity.direction < 0.0 {
                let flipped = image::imageops::flip_horizontal(&**image);
                surface.draw_image(&flipped, entity.position(), entity.size());
            } else {
                surface.draw_image(image, entity.position(), entity.size());
            }
        });
        true
    }
}

/// Text labels anchored at the entity's bottom-left corner
#[derive(Debug, Default)]
pub struct TextPlugin;

impl DrawPlugin for TextPlugin {
    fn name(&self) -> &'static str {
        "text"
    }

    fn draw(&self, surface: &mut dyn Surface, entity: &Entity) -> bool {
        let Some(text) = entity.text.as_deref() else {
            return false;
        };
        if let Some(shadow) = entity.style.shadow {
            let origin = entity.position() + DVec2::new(0.0, entity.size().y) + shadow.offset;
            surface.draw_text(text, origin, shadow.color);
        }
        let origin = entity.position() + DVec2::new(0.0, entity.size().y);
        surface.draw_text(text, origin, entity.style.color);
        true
    }
}
