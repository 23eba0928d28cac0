//! The simulated game object

use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;
use smallvec::SmallVec;

use super::{AttributeKey, AttributeValue, Attributes, Material};
use crate::assets::ImageHandle;
use crate::behavior::{Behavior, BehaviorSlot, CollisionResponse, ParticleBehavior};
use crate::math::CollisionBox;
use crate::renderer::{Color, rgba};

/// Global counter for creation indices
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle to an entity, also its creation index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw creation index
    pub const fn index(self) -> u64 {
        self.0
    }
}

/// Whether the physics engine integrates the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsKind {
    /// Never moved by physics
    Static,
    /// Subject to forces and integration
    #[default]
    Dynamic,
}

/// Shape tag used to pick a draw plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    /// Filled or outlined rectangle
    #[default]
    Rectangle,
    /// Filled or outlined ellipse
    Ellipse,
    /// Bitmap
    Image,
    /// Text label
    Text,
}

impl EntityKind {
    /// Lowercase label for logs and overlays
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

/// Outline drawn around the shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Outline color
    pub color: Color,
    /// Outline width in pixels
    pub width: f64,
}

/// Offset copy drawn beneath the shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow color
    pub color: Color,
    /// Offset from the shape
    pub offset: DVec2,
}

/// Visual attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Main color (outline when there is a fill, otherwise the fill)
    pub color: Color,
    /// Fill color
    pub fill: Option<Color>,
    /// Optional outline
    pub border: Option<Border>,
    /// Optional drop shadow
    pub shadow: Option<Shadow>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: rgba(255, 255, 255, 255),
            fill: None,
            border: None,
            shadow: None,
        }
    }
}

/// A simulated game object
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    /// Unique key within the owning scene
    pub name: String,

    position: DVec2,
    size: DVec2,
    /// Current velocity
    pub speed: DVec2,
    /// Acceleration computed by the last physics step
    pub acceleration: DVec2,
    /// Sum of the forces consumed by the last physics step
    pub net_force: DVec2,
    /// Rotation in radians
    pub rotation: f64,
    /// Facing, -1.0 or 1.0
    pub direction: f64,

    /// Forces pending for the current physics step
    pub forces: SmallVec<[DVec2; 4]>,
    /// Physical profile
    pub material: Material,
    /// Static or dynamic
    pub physics: PhysicsKind,
    /// Mass
    pub mass: f64,
    /// Tunables
    pub attributes: Attributes,

    /// Shape tag for plugin dispatch
    pub kind: EntityKind,
    /// Colors and decorations
    pub style: Style,
    /// Bitmap for image entities
    pub image: Option<ImageHandle>,
    /// Label for text entities
    pub text: Option<String>,

    collision_box: CollisionBox,
    /// Participates in pairwise collision detection
    pub collider: bool,

    /// Exclusively owned sub-entities (particles)
    pub children: Vec<Entity>,
    behaviors: Vec<BehaviorSlot>,

    /// Coarse draw order
    pub layer: i32,
    /// Fine draw order within a layer
    pub priority: i32,
    /// Inactive entities are swept after the current draw pass
    pub active: bool,
    /// Drawn in screen space and exempt from physics
    pub stuck_to_camera: bool,
    /// Time lived so far
    pub life: f64,
    /// Lifetime limit, 0 for unlimited
    pub duration: f64,

    /// Name of the plugin that last drew this entity
    pub drawn_by: Option<&'static str>,
}

impl Entity {
    /// Create an entity with sane defaults for every physical parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            position: DVec2::ZERO,
            size: DVec2::splat(16.0),
            speed: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            net_force: DVec2::ZERO,
            rotation: 0.0,
            direction: 1.0,
            forces: SmallVec::new(),
            material: Material::DEFAULT,
            physics: PhysicsKind::Dynamic,
            mass: 1.0,
            attributes: Attributes::new(),
            kind: EntityKind::Rectangle,
            style: Style::default(),
            image: None,
            text: None,
            collision_box: CollisionBox::rectangle(DVec2::ZERO, DVec2::splat(16.0)),
            collider: false,
            children: Vec::new(),
            behaviors: Vec::new(),
            layer: 0,
            priority: 0,
            active: true,
            stuck_to_camera: false,
            life: 0.0,
            duration: 0.0,
            drawn_by: None,
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Set position
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.set_position(DVec2::new(x, y));
        self
    }

    /// Set size
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.set_size(DVec2::new(width, height));
        self
    }

    /// Set initial velocity
    #[must_use]
    pub fn with_speed(mut self, x: f64, y: f64) -> Self {
        self.speed = DVec2::new(x, y);
        self
    }

    /// Set material
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set physics kind
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsKind) -> Self {
        self.physics = physics;
        self
    }

    /// Set mass
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set shape kind (also picks the collision shape)
    #[must_use]
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self.update_box();
        self
    }

    /// Set main color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set fill color
    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.style.fill = Some(fill);
        self
    }

    /// Set outline
    #[must_use]
    pub fn with_border(mut self, color: Color, width: f64) -> Self {
        self.style.border = Some(Border { color, width });
        self
    }

    /// Set drop shadow
    #[must_use]
    pub fn with_shadow(mut self, color: Color, offset: DVec2) -> Self {
        self.style.shadow = Some(Shadow { color, offset });
        self
    }

    /// Use an image; the size follows the image's pixel dimensions
    #[must_use]
    pub fn with_image(mut self, image: ImageHandle) -> Self {
        self.set_image(image);
        self
    }

    /// Set label text (and the text kind)
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.kind = EntityKind::Text;
        self.update_box();
        self
    }

    /// Store an attribute
    #[must_use]
    pub fn with_attribute(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Opt into pairwise collision detection
    #[must_use]
    pub fn with_collider(mut self, collider: bool) -> Self {
        self.collider = collider;
        self
    }

    /// Set layer and priority
    #[must_use]
    pub fn with_layer(mut self, layer: i32, priority: i32) -> Self {
        self.layer = layer;
        self.priority = priority;
        self
    }

    /// Draw in screen space and skip physics
    #[must_use]
    pub fn with_stuck_to_camera(mut self, stuck: bool) -> Self {
        self.stuck_to_camera = stuck;
        self
    }

    /// Limit lifetime
    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Attach a plain behavior
    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.add_behavior(BehaviorSlot::Plain(Box::new(behavior)));
        self
    }

    /// Attach a collision-response behavior
    #[must_use]
    pub fn with_collision_response(mut self, behavior: impl CollisionResponse + 'static) -> Self {
        self.add_behavior(BehaviorSlot::Collision(Box::new(behavior)));
        self
    }

    /// Attach a particle behavior
    #[must_use]
    pub fn with_particles(mut self, behavior: impl ParticleBehavior + 'static) -> Self {
        self.add_behavior(BehaviorSlot::Particles(Box::new(behavior)));
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Stable handle
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Top-left corner
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Width and height
    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Center of the bounding rectangle
    pub fn center(&self) -> DVec2 {
        self.position + self.size * 0.5
    }

    /// Shape used for intersection tests
    pub fn collision_box(&self) -> &CollisionBox {
        &self.collision_box
    }

    /// Move the entity and re-derive its collision box
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
        self.update_box();
    }

    /// Resize the entity and re-derive its collision box
    pub fn set_size(&mut self, size: DVec2) {
        self.size = size;
        self.update_box();
    }

    /// Use an image and size the entity to its pixel dimensions
    pub fn set_image(&mut self, image: ImageHandle) {
        let (width, height) = image.dimensions();
        self.image = Some(image);
        self.kind = EntityKind::Image;
        self.set_size(DVec2::new(f64::from(width), f64::from(height)));
    }

    /// Recompute the collision box from position, size and kind
    pub fn update_box(&mut self) {
        self.collision_box = match self.kind {
            EntityKind::Ellipse => CollisionBox::ellipse(self.position, self.size),
            _ => CollisionBox::rectangle(self.position, self.size),
        };
    }

    /// Queue a force for the next physics step
    pub fn apply_force(&mut self, force: DVec2) {
        self.forces.push(force);
    }

    /// Advance the lifetime counter, deactivating on expiry
    pub fn tick_life(&mut self, dt: f64) {
        if self.duration > 0.0 {
            self.life += dt;
            if self.life >= self.duration {
                self.active = false;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Behaviors
    // -------------------------------------------------------------------------

    /// Attach a behavior at the end of the list
    pub fn add_behavior(&mut self, slot: BehaviorSlot) {
        self.behaviors.push(slot);
    }

    /// Attached behaviors in execution order
    pub fn behaviors(&self) -> &[BehaviorSlot] {
        &self.behaviors
    }

    /// Detach the behavior list so hooks can borrow the entity mutably
    pub(crate) fn take_behaviors(&mut self) -> Vec<BehaviorSlot> {
        std::mem::take(&mut self.behaviors)
    }

    /// Reattach a detached list, keeping behaviors added in the meantime after it
    pub(crate) fn restore_behaviors(&mut self, mut taken: Vec<BehaviorSlot>) {
        taken.append(&mut self.behaviors);
        self.behaviors = taken;
    }
}
