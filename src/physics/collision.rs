//! Collision events and detection mode

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// Two colliding entities, seen from `source`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity whose collision responses receive the event
    pub source: EntityId,
    /// The other entity
    pub collider: EntityId,
    /// Vector from the source's box center to the collider's box center
    pub penetration: DVec2,
}

impl CollisionEvent {
    /// Build the event for `source` hitting `collider`
    pub fn new(source: &Entity, collider: &Entity) -> Self {
        Self {
            source: source.id(),
            collider: collider.id(),
            penetration: collider.collision_box().center() - source.collision_box().center(),
        }
    }

    /// Same collision seen from the other side
    pub fn mirrored(&self) -> Self {
        Self {
            source: self.collider,
            collider: self.source,
            penetration: -self.penetration,
        }
    }
}

/// How many events an overlapping pair produces per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// One event per side (A→B and B→A)
    #[default]
    Mirrored,
    /// One event per pair, sourced at the earlier-inserted entity
    ///
    /// Responses on both sides still run; the collider sees the mirrored event.
    Single,
}

impl fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mirrored => write!(f, "mirrored"),
            Self::Single => write!(f, "single"),
        }
    }
}

impl FromStr for CollisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirrored" | "both" | "bidirectional" => Ok(Self::Mirrored),
            "single" | "once" => Ok(Self::Single),
            other => Err(format!("unknown collision mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penetration_points_at_collider() {
        let a = Entity::new("a").with_position(0.0, 0.0);
        let b = Entity::new("b").with_position(4.0, -2.0);
        let event = CollisionEvent::new(&a, &b);
        assert_eq!(event.penetration, DVec2::new(4.0, -2.0));

        let back = event.mirrored();
        assert_eq!(back.source, b.id());
        assert_eq!(back.collider, a.id());
        assert_eq!(back.penetration, DVec2::new(-4.0, 2.0));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Mirrored".parse::<CollisionMode>(), Ok(CollisionMode::Mirrored));
        assert_eq!(" single ".parse::<CollisionMode>(), Ok(CollisionMode::Single));
        assert!("sideways".parse::<CollisionMode>().is_err());
        assert_eq!(CollisionMode::default().to_string(), "mirrored");
    }
}
