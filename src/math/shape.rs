//! Collision shapes derived from an entity's position and size

use glam::DVec2;

/// Shape used for intersection tests.
///
/// Both variants are described by their top-left corner and extent so the
/// box can always be rebuilt from an entity's position and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionBox {
    /// Axis-aligned rectangle
    Rectangle {
        /// Top-left corner
        position: DVec2,
        /// Width and height
        size: DVec2,
    },
    /// Axis-aligned ellipse inscribed in `position..position + size`
    Ellipse {
        /// Top-left corner of the bounding rectangle
        position: DVec2,
        /// Width and height of the bounding rectangle
        size: DVec2,
    },
}

impl CollisionBox {
    /// Rectangle from corner and size
    pub fn rectangle(position: DVec2, size: DVec2) -> Self {
        Self::Rectangle { position, size }
    }

    /// Ellipse inscribed in the given rectangle
    pub fn ellipse(position: DVec2, size: DVec2) -> Self {
        Self::Ellipse { position, size }
    }

    /// Top-left corner of the bounding rectangle
    pub fn position(&self) -> DVec2 {
        match *self {
            Self::Rectangle { position, .. } | Self::Ellipse { position, .. } => position,
        }
    }

    /// Extent of the bounding rectangle
    pub fn size(&self) -> DVec2 {
        match *self {
            Self::Rectangle { size, .. } | Self::Ellipse { size, .. } => size,
        }
    }

    /// Geometric center
    pub fn center(&self) -> DVec2 {
        self.position() + self.size() * 0.5
    }

    /// Bounds as (min, max)
    pub fn bounds(&self) -> (DVec2, DVec2) {
        let position = self.position();
        (position, position + self.size())
    }

    /// Check whether a point lies inside the shape
    pub fn contains(&self, point: DVec2) -> bool {
        match *self {
            Self::Rectangle { position, size } => {
                point.x >= position.x
                    && point.x <= position.x + size.x
                    && point.y >= position.y
                    && point.y <= position.y + size.y
            }
            Self::Ellipse { .. } => self.ellipse_distance(point) <= 1.0,
        }
    }

    /// Check whether two shapes overlap (touching edges do not count)
    pub fn intersects(&self, other: &CollisionBox) -> bool {
        if !self.bounds_overlap(other) {
            return false;
        }
        match (self, other) {
            (Self::Rectangle { .. }, Self::Rectangle { .. }) => true,
            (Self::Ellipse { .. }, Self::Ellipse { .. }) => {
                let delta = other.center() - self.center();
                let reach = (self.size() + other.size()) * 0.5;
                if reach.x <= 0.0 || reach.y <= 0.0 {
                    return false;
                }
                let n = delta / reach;
                n.length_squared() < 1.0
            }
            (Self::Rectangle { .. }, Self::Ellipse { .. }) => other.ellipse_hits_rect(self),
            (Self::Ellipse { .. }, Self::Rectangle { .. }) => self.ellipse_hits_rect(other),
        }
    }

    fn bounds_overlap(&self, other: &CollisionBox) -> bool {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Normalized squared distance from the ellipse center (1.0 on the rim)
    fn ellipse_distance(&self, point: DVec2) -> f64 {
        let radii = self.size() * 0.5;
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return f64::INFINITY;
        }
        ((point - self.center()) / radii).length_squared()
    }

    fn ellipse_hits_rect(&self, rect: &CollisionBox) -> bool {
        let (min, max) = rect.bounds();
        let closest = self.center().clamp(min, max);
        self.ellipse_distance(closest) < 1.0
    }
}

impl Default for CollisionBox {
    fn default() -> Self {
        Self::rectangle(DVec2::ZERO, DVec2::ZERO)
    }
}
