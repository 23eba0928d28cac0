//! Play area and environmental forces

use glam::DVec2;

use super::Material;
use crate::math::Rng;

/// Bounds of the play area plus the forces every dynamic entity feels
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    /// Width and height of the play area
    pub play_area: DVec2,
    /// Gravity; the physics step applies it negated
    pub gravity: DVec2,
    /// Wind, read by weather-aware behaviors
    pub wind: DVec2,
    /// Ambient material
    pub material: Material,
}

impl World {
    /// Create a world with the given play area and default forces
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            play_area: DVec2::new(width, height),
            gravity: DVec2::new(0.0, -0.981),
            wind: DVec2::ZERO,
            material: Material::AIR,
        }
    }

    /// Set the play area
    pub fn with_play_area(mut self, width: f64, height: f64) -> Self {
        self.play_area = DVec2::new(width, height);
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: DVec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set wind
    pub fn with_wind(mut self, wind: DVec2) -> Self {
        self.wind = wind;
        self
    }

    /// Set the ambient material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Check whether a point lies inside the play area
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.play_area.x && point.y <= self.play_area.y
    }

    /// Randomize gravity strength (within 20%) and wind
    pub fn reshuffle(&mut self, rng: &mut Rng) {
        self.gravity *= rng.range(0.8, 1.2);
        self.wind = DVec2::new(rng.range(-0.5, 0.5), rng.range(-0.1, 0.1));
        log::debug!(
            "World reshuffled: gravity={:?} wind={:?}",
            self.gravity,
            self.wind
        );
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(320.0, 200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reshuffle_bounds() {
        let mut rng = Rng::new(99);
        let mut world = World::default();
        let base = world.gravity.y;

        world.reshuffle(&mut rng);

        assert!(world.gravity.y <= base * 0.8 + 1e-12);
        assert!(world.gravity.y >= base * 1.2 - 1e-12);
        assert!(world.wind.x.abs() <= 0.5);
    }

    #[test]
    fn test_contains() {
        let world = World::new(100.0, 50.0);
        assert!(world.contains(DVec2::new(10.0, 10.0)));
        assert!(!world.contains(DVec2::new(10.0, 60.0)));
    }
}
